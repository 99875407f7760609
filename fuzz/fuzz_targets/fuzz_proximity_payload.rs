//! Fuzz target: `proximity::process_payload`
//!
//! Drives arbitrary bodies through shape normalization and the event
//! cursor.  Must never panic, and a rejected body must leave the cursor
//! exactly where it was.
//!
//! cargo fuzz run fuzz_proximity_payload

#![no_main]

use geoentry::proximity::{EventCursor, process_payload};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let body = String::from_utf8_lossy(data);
    let mut cursor = EventCursor::default();
    cursor.advance("seed");
    let before = cursor.clone();

    if process_payload(&body, &mut cursor).is_err() {
        assert_eq!(cursor, before, "cursor moved on a rejected body");
    }
});
