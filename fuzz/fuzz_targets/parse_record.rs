#![no_main]

use libfuzzer_sys::fuzz_target;
use statlog_core::StatusRecord;

fuzz_target!(|data: &[u8]| {
    if let Ok(record) = serde_json::from_slice::<StatusRecord>(data) {
        let encoded = serde_json::to_vec(&record).expect("record serializes");
        let again: StatusRecord = serde_json::from_slice(&encoded).expect("record re-parses");
        assert_eq!(again, record);
    }
});
