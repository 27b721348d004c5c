#![no_main]
use libfuzzer_sys::fuzz_target;
use mule_assess::scanner::{read_artifact_json, read_pom};

/// Fuzz the build descriptor readers.
fuzz_target!(|data: &[u8]| {
    if let Ok(pom) = read_pom(data, "pom.xml") {
        let _ = pom.platform_version();
    }
    let _ = read_artifact_json(data, "mule-artifact.json");
});
