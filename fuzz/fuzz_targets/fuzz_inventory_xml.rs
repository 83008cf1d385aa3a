#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_license_audit::parsers::{CycloneDxXmlParser, InventoryParser};

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz the CycloneDX XML inventory parser.
///
/// Also wraps the input in a component list so the component walker sees
/// well-formed outer structure more often.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let parser = CycloneDxXmlParser::new();

        let _ = parser.parse_str(s);

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.5" version="1">
  <components><component>{s}</component></components>
</bom>"#,
            );
            if let Ok(keys) = parser.parse_str(&wrapped) {
                for key in &keys {
                    let _ = key.decode();
                }
            }
        }
    }
});
