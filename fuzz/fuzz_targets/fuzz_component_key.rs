#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_license_audit::model::ComponentKey;

/// Fuzz the component key decoder.
///
/// A decoded key must re-encode to a key that decodes to the same coordinate.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Some(dependency) = ComponentKey::new(s).decode() {
            let reencoded = ComponentKey::encode(&dependency);
            let again = reencoded.decode();
            assert_eq!(again.as_ref(), Some(&dependency));
        }
    }
});
