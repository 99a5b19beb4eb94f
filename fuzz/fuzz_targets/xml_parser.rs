#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlgate::{parse_tree, XmlParser};

fuzz_target!(|data: &[u8]| {
    if let Ok(doc) = XmlParser::new(data).parse() {
        if let Ok(s) = std::str::from_utf8(data) {
            let _ = parse_tree(s);
        }
        let _ = doc.root.elements().count();
    }
});
