#![no_main]
use libfuzzer_sys::fuzz_target;
use mule_assess::scanner::scan_munit;

/// Fuzz the MUnit suite scanner.
fuzz_target!(|data: &[u8]| {
    let _ = scan_munit(data, "fuzz-suite.xml");
});
