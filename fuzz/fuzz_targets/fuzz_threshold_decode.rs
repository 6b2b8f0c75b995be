//! Fuzz target: `persist::decode`
//!
//! Whatever bytes sit in storage, every decoded threshold must lie in its
//! domain, and re-encoding a decoded Wide record must be stable.
//!
//! cargo fuzz run fuzz_threshold_decode

#![no_main]

use irrigation::config::PersistLayout;
use irrigation::persist::{decode, encode, encoded_len};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for layout in [PersistLayout::Wide, PersistLayout::SingleByte, PersistLayout::Quarter] {
        let d = decode(data, layout);
        let t = d.thresholds;
        assert!(t.humidity_pct() <= 100);
        assert!(t.water_level_raw() <= 1023);
        assert!((10..=80).contains(&t.temp_max_c()));

        if layout == PersistLayout::Wide {
            let bytes = encode(&t, layout);
            let again = decode(&bytes[..encoded_len(layout)], layout);
            assert_eq!(again.thresholds, t);
            assert!(again.defaulted.is_empty());
        }
    }
});
