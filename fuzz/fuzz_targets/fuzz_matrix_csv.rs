#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_license_audit::matrix::CompatibilityMatrix;
use sbom_license_audit::model::License;

/// Fuzz the compatibility matrix parser and lookup.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(matrix) = CompatibilityMatrix::parse(s) {
            let candidates: Vec<License> = matrix.columns().iter().map(License::new).collect();
            if let Some(own) = s.lines().nth(1).and_then(|row| row.split(',').next()) {
                let _ = matrix.lookup(&License::new(own.trim()), &candidates);
            }
        }
    }
});
