#![no_main]

use dgc_types::{RawTestCase, TestCase};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(raw) = serde_json::from_str::<Vec<RawTestCase>>(body) else {
        return;
    };
    for case in raw {
        let _ = TestCase::from_raw(case);
    }
});
