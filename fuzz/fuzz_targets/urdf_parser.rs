#![no_main]
use libfuzzer_sys::fuzz_target;
use urdfkit::{parse_with_config, Config};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = urdfkit::parse(s);
        let _ = parse_with_config(s, Config::default().with_lenient(true));
    }
});
