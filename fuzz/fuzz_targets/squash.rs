#![no_main]

use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use statlog_core::{Status, StatusRecord, squash_at};

// First byte picks the cycle size; each following byte is one record drawn
// from a small alphabet so repeats are common.
fuzz_target!(|data: &[u8]| {
    let Some((&cycle, rest)) = data.split_first() else {
        return;
    };
    let cycle = usize::from(cycle % 8) + 1;
    let records: Vec<StatusRecord> = rest
        .iter()
        .map(|b| {
            let status = Status::ALL[usize::from(b % 4)];
            StatusRecord::new(status, if b & 0x10 == 0 { "" } else { "hook" })
        })
        .collect();
    let Some(now) = Utc.timestamp_opt(0, 0).single() else {
        return;
    };

    let squashed = squash_at(&records, cycle, now).expect("cycle size is at least 1");
    if records.len() <= cycle {
        assert_eq!(squashed.len(), records.len());
    }
    if !records.is_empty() {
        assert!(!squashed.is_empty());
    }
    assert!(squashed.len() <= records.len());
});
