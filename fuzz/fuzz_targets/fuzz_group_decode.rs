#![no_main]
use accountdb_rs::core::group;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let entries = group::decode(data);
    let _ = group::encode(&entries);
});
