#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Whatever parses must lower or fail cleanly, and lowering must be repeatable.
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(expr) = ksexpr::parse(s) {
            let first = ksexpr::codegen::transform(&expr);
            let second = ksexpr::codegen::transform(&expr);
            assert_eq!(first, second);
        }
    }
});
