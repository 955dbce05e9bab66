//! Fuzz target for `YYYY-MM` month parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rp_common::MonthKey;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(month) = text.parse::<MonthKey>() {
            // Accepted input must render back to something that parses to the same key.
            let again = month.to_string().parse::<MonthKey>().ok();
            assert_eq!(again, Some(month));
        }
    }
});
