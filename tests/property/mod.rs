// Property-based tests for the expression pipeline.
//
// Run all property tests:
//   cargo test --test property
//
// Run with more cases (default is 256):
//   PROPTEST_CASES=1000 cargo test --test property

mod generators;
mod lexer_properties;
mod lowering;
