#![no_main]
use libfuzzer_sys::fuzz_target;
use urdfkit::{parse_as, serialize};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(element) = urdfkit::parse(s) {
            let text = serialize(&element);
            let reparsed = parse_as(&text, element.type_name()).map(|e| serialize(&e));
            assert_eq!(reparsed.ok().as_deref(), Some(text.as_str()));
        }
    }
});
