//! Fuzz target for simulation config parsing and validation.
//!
//! Parsing and validation should only ever return errors.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rp_config::Config;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Config::from_json(text);
    }
});
