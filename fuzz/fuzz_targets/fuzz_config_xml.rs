#![no_main]
use libfuzzer_sys::fuzz_target;
use mule_assess::scanner::scan_config;
use mule_assess::transform::TransformAnalyzer;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the configuration scanner.
///
/// Wraps input in a Mule 4 flow so the flow, connector and capture paths
/// are reached as well as the document-level ones.
fuzz_target!(|data: &[u8]| {
    let analyzer = TransformAnalyzer::default();

    // Try raw input
    let _ = scan_config(data, "fuzz.xml", &analyzer);

    if let Ok(s) = std::str::from_utf8(data) {
        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<mule xmlns="http://www.mulesoft.org/schema/mule/core"
      xmlns:http="http://www.mulesoft.org/schema/mule/http"
      xmlns:ee="http://www.mulesoft.org/schema/mule/ee/core"
      xmlns:scripting="http://www.mulesoft.org/schema/mule/scripting">
  <flow name="fuzz">{s}</flow>
</mule>"#,
            );
            let _ = scan_config(wrapped.as_bytes(), "fuzz.xml", &analyzer);
        }
    }
});
