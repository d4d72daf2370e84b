//! Fuzz target for the location expression parser
//!
//! Any string either parses or returns an error; a parsed location must
//! display to something that parses back to the same tree.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() > 1000 {
            return;
        }

        if let Ok(location) = ferro_genbank::parse_location(input) {
            let displayed = location.to_string();
            let reparsed = ferro_genbank::parse_location(&displayed)
                .expect("displayed location must parse");
            assert_eq!(reparsed, location);

            // evaluation must fail cleanly, never panic
            let _ = ferro_genbank::evaluate(&location, "ACGTACGTNN");
        }
    }
});
