#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    // A fragment is always a trimmed, non-empty slice of the input line
    if let Some(fragment) = aboutme::utils::parse_header_line(line) {
        assert!(!fragment.is_empty());
        assert_eq!(fragment, fragment.trim_end());
        assert!(line.contains(fragment));
    }
});
