//! Fuzz target for dataset manifest parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rp_core::dataset::DatasetManifest;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<DatasetManifest>(data);
});
