#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(layer) = timeslider::fuzzing::parse_layer_input(input) {
            debug_assert_eq!(layer.name, layer.name.trim());
            debug_assert!(!layer.name.is_empty());
        }
    }
});
