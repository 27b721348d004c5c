#![no_main]
use libfuzzer_sys::fuzz_target;
use mule_assess::transform::{measure, measure_inline};

/// Fuzz the DataWeave heuristics; they must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = measure(s);
        let _ = measure_inline(s);
    }
});
