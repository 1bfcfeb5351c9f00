//! Fuzz target for wildcard filters and formatting removal.

#![no_main]

use libfuzzer_sys::fuzz_target;

use erebot_core::matcher::{PrefixRule, TextComparison, TextWildcard};
use erebot_core::util::{strip_codes, StripFlags};
use erebot_core::TextWrapper;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if input.len() > 512 {
        return;
    }

    let (pattern, text) = input.split_once('\n').unwrap_or((input, ""));
    if let Ok(wildcard) = TextWildcard::new(pattern, PrefixRule::Optional) {
        let _ = wildcard.compare("!", text);
    }

    let stripped = strip_codes(text, StripFlags::ALL);
    let wrapped = TextWrapper::new(stripped.as_ref());
    for i in -3..3 {
        let _ = wrapped.token(i);
        let _ = wrapped.tokens(i, Some(-1));
    }
});
