//! Fuzz target for whole-record parsing
//!
//! Feeds arbitrary text to the lenient parser, then evaluates every
//! feature that survived.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() > 20_000 {
            return;
        }

        if let Ok(outcome) = ferro_genbank::parse_genbank(input) {
            for feature in outcome.record.features() {
                let _ = feature.sequence();
            }
            for reference in outcome.record.references() {
                let _ = reference.sequence();
            }
        }
    }
});
