#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(args) = timeslider::fuzzing::apply_config_from_toml(input) {
            debug_assert!(args.ticks != Some(0));
            for layer in &args.layers {
                debug_assert!(!layer.name.trim().is_empty());
            }
        }
    }
});
