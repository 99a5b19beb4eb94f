#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlgate::process;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let response = process(s);
        let xml = response.to_xml();
        assert!(xml.starts_with("<?xml"));
        assert!(matches!(response.status_code(), 200 | 400));
    }
});
