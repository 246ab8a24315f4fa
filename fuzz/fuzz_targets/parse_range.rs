#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok((start, end)) = timeslider::fuzzing::parse_range_input(input) {
            debug_assert!(start <= end);
        }
    }
});
