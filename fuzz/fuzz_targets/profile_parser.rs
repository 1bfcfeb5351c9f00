//! Fuzz target for the raw profile text format.
//!
//! Parsed profiles are registered and every name they define is resolved,
//! so alias chasing sees arbitrary graphs.

#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;

use erebot_core::numeric::{raw, RawProfile};
use erebot_core::NumericProfile;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if input.len() > 4096 {
        return;
    }

    let Ok(profile) = RawProfile::parse("Fuzz", input) else {
        return;
    };
    let names: Vec<String> = profile.entries().map(|(name, _)| name.to_owned()).collect();

    let mut numerics = NumericProfile::new();
    let _ = numerics.register(raw::rfc2812());
    if numerics.register(Arc::new(profile)).is_err() {
        return;
    }

    for name in &names {
        // Cycles are errors, never panics or hangs.
        let _ = numerics.resolve(name);
    }
});
