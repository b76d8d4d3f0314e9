//! Fuzz target: `MemoryConfigStore::load`
//!
//! Feeds arbitrary bytes as a stored profile.  Loading must never panic,
//! and anything it accepts must pass validation.
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use libfuzzer_sys::fuzz_target;
use scarafw::adapters::config_store::MemoryConfigStore;
use scarafw::app::ports::ConfigPort;

fuzz_target!(|data: &[u8]| {
    let store = MemoryConfigStore::with_blob(data.to_vec());
    if let Ok(cfg) = store.load() {
        assert!(cfg.validate().is_ok());
    }
});
