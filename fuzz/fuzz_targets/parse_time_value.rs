#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(value) = timeslider::fuzzing::parse_time_value_input(input) {
            debug_assert_eq!(value.floor_to_hour().floor_to_hour(), value.floor_to_hour());
            debug_assert!(value.floor_to_hour() <= value);
        }
    }
});
