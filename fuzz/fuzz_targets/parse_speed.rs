#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(speed) = timeslider::fuzzing::parse_speed_input(input) {
            let reparsed = timeslider::fuzzing::parse_speed_input(&speed.to_string());
            debug_assert_eq!(reparsed.ok(), Some(speed));
        }
    }
});
