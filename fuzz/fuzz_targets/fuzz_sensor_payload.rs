//! Fuzz target: sensor list decoding → table → patterns
//!
//! Any body that decodes must produce a table whose unoccupied patterns
//! are both `Off`.
//!
//! cargo fuzz run fuzz_sensor_payload

#![no_main]

use geoentry::pattern::LedPatterns;
use geoentry::sensors::{SensorTable, decode_sensor_list};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let body = String::from_utf8_lossy(data);
    if let Ok(records) = decode_sensor_list(&body) {
        let table = SensorTable::from_records(&records);
        assert_eq!(LedPatterns::resolve(&table, false), LedPatterns::OFF);
        let _ = LedPatterns::resolve(&table, true);
    }
});
