//! Fuzz target for CSV dataset reading.
//!
//! Datasets are hand-editable files, so the reader must reject anything
//! malformed with an error rather than a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rp_core::dataset::{read_rows, validate_series, SeriesExpectation};

fuzz_target!(|data: &[u8]| {
    if let Ok(rows) = read_rows(data) {
        // Whatever parsed must also survive the series checks.
        let _ = validate_series(&rows, &SeriesExpectation::default());
    }
});
