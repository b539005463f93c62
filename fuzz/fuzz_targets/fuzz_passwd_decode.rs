#![no_main]
use accountdb_rs::core::passwd;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let entries = passwd::decode(data);
    if let Ok(encoded) = passwd::encode(&entries) {
        // a clean encode decodes to the same number of records
        assert_eq!(passwd::decode(&encoded).len(), entries.len());
    }
});
