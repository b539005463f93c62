#![no_main]
use accountdb_rs::core::shadow;
use libfuzzer_sys::fuzz_target;

// Decoding arbitrary bytes must never panic, and whatever decoded cleanly
// must encode again.
fuzz_target!(|data: &[u8]| {
    let mut entries = shadow::decode(data);
    entries.retain(|entry| entry.errors.is_empty());
    let _ = shadow::encode(&mut entries);
});
