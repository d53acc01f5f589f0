#![no_main]

use dgc_types::{hex_decode, hex_encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(bytes) = hex_decode(text) {
        assert_eq!(hex_encode(&bytes), text.to_ascii_lowercase());
    }
});
