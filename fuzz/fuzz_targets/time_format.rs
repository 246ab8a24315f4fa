#![no_main]

use libfuzzer_sys::fuzz_target;
use timeslider::time::TimeValue;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let value = TimeValue::from_timestamp(1_685_617_530).unwrap_or_default();
        if timeslider::fuzzing::render_time_format_input(input, value).is_err() {
            debug_assert!(input.trim().is_empty() || input.contains('['));
        }
    }
});
