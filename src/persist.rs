//! Threshold persistence: fixed-offset byte layouts over [`ByteStorage`].
//!
//! | Layout       | @0        | @1          | @2          | @3      | Loss                      |
//! |--------------|-----------|-------------|-------------|---------|---------------------------|
//! | `Wide`       | humidity  | water lo    | water hi    | temp    | none                      |
//! | `SingleByte` | humidity  | water & 0xFF| temp        |   -     | water high byte dropped   |
//! | `Quarter`    | humidity  | water / 4   | temp        |   -     | water low two bits dropped|
//!
//! On load every field is checked against its domain on its own; a field
//! that fails (for instance erased `0xFF` flash) falls back to its default
//! with a warning while the other fields keep their stored values.

use heapless::Vec;
use log::{info, warn};

use crate::app::ports::{ByteStorage, StorageError, ThresholdStore};
use crate::config::{
    PersistLayout, ThresholdSource, Thresholds, DEFAULT_HUMIDITY_THRESHOLD, DEFAULT_TEMP_MAX,
    DEFAULT_WATER_LEVEL_THRESHOLD,
};
use crate::error::ThresholdField;

/// Largest encoded size of any layout.
pub const MAX_ENCODED_LEN: usize = 4;

/// Bytes occupied by `layout`, starting at offset 0.
pub const fn encoded_len(layout: PersistLayout) -> usize {
    match layout {
        PersistLayout::Wide => 4,
        PersistLayout::SingleByte | PersistLayout::Quarter => 3,
    }
}

/// Serialize thresholds.  Only the first [`encoded_len`] bytes are used.
pub fn encode(t: &Thresholds, layout: PersistLayout) -> [u8; MAX_ENCODED_LEN] {
    let water = t.water_level_raw();
    match layout {
        PersistLayout::Wide => {
            let [lo, hi] = water.to_le_bytes();
            [t.humidity_pct(), lo, hi, t.temp_max_c()]
        }
        PersistLayout::SingleByte => [t.humidity_pct(), (water & 0xFF) as u8, t.temp_max_c(), 0],
        PersistLayout::Quarter => [t.humidity_pct(), (water / 4) as u8, t.temp_max_c(), 0],
    }
}

/// Result of [`decode`]: the thresholds plus the fields that had to be
/// replaced by their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub thresholds: Thresholds,
    pub defaulted: Vec<ThresholdField, 3>,
}

/// Parse stored bytes.  `bytes` must hold at least `encoded_len(layout)`
/// bytes; missing bytes are treated as erased.
pub fn decode(bytes: &[u8], layout: PersistLayout) -> Decoded {
    let byte = |i: usize| bytes.get(i).copied().unwrap_or(0xFF);

    let (humidity, water, temp) = match layout {
        PersistLayout::Wide => (
            byte(0),
            u16::from_le_bytes([byte(1), byte(2)]),
            byte(3),
        ),
        PersistLayout::SingleByte => (byte(0), u16::from(byte(1)), byte(2)),
        PersistLayout::Quarter => (byte(0), u16::from(byte(1)) * 4, byte(2)),
    };

    let mut thresholds = Thresholds::default();
    let mut defaulted = Vec::new();

    if let Err(e) = thresholds.set_humidity(i32::from(humidity)) {
        warn!("persist: {e}, using default {DEFAULT_HUMIDITY_THRESHOLD}");
        let _ = defaulted.push(ThresholdField::Humidity);
    }
    if let Err(e) = thresholds.set_water_level(i32::from(water)) {
        warn!("persist: {e}, using default {DEFAULT_WATER_LEVEL_THRESHOLD}");
        let _ = defaulted.push(ThresholdField::WaterLevel);
    }
    if let Err(e) = thresholds.set_temp_max(i32::from(temp)) {
        warn!("persist: {e}, using default {DEFAULT_TEMP_MAX}");
        let _ = defaulted.push(ThresholdField::TempMax);
    }

    Decoded {
        thresholds,
        defaulted,
    }
}

// ---------------------------------------------------------------------------
// ThresholdStore over a byte area
// ---------------------------------------------------------------------------

/// [`ThresholdStore`] that keeps thresholds at offset 0 of a
/// [`ByteStorage`] in the configured layout.
pub struct StoredThresholds<S: ByteStorage> {
    storage: S,
    layout: PersistLayout,
}

impl<S: ByteStorage> StoredThresholds<S> {
    pub fn new(storage: S, layout: PersistLayout) -> Self {
        Self { storage, layout }
    }

    pub fn layout(&self) -> PersistLayout {
        self.layout
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<S: ByteStorage> ThresholdStore for StoredThresholds<S> {
    fn load(&self) -> Result<Thresholds, StorageError> {
        let len = encoded_len(self.layout);
        let mut buf = [0u8; MAX_ENCODED_LEN];
        self.storage.read(0, &mut buf[..len])?;
        Ok(decode(&buf[..len], self.layout).thresholds)
    }

    fn save(&mut self, thresholds: &Thresholds) -> Result<(), StorageError> {
        let len = encoded_len(self.layout);
        let bytes = encode(thresholds, self.layout);
        self.storage.write(0, &bytes[..len])
    }
}

/// Resolve the boot-time thresholds according to `source`.
///
/// `Stored` loads from `store`, falling back to defaults when the store
/// cannot be read.  `ForceDefaults` ignores what is stored and writes the
/// defaults back.  Storage failures are logged, never fatal.
pub fn boot_thresholds<T: ThresholdStore>(store: &mut T, source: ThresholdSource) -> Thresholds {
    match source {
        ThresholdSource::Stored => match store.load() {
            Ok(t) => {
                info!(
                    "persist: loaded humidity={} water={} temp_max={}",
                    t.humidity_pct(),
                    t.water_level_raw(),
                    t.temp_max_c()
                );
                t
            }
            Err(e) => {
                warn!("persist: load failed ({e}), using defaults");
                Thresholds::default()
            }
        },
        ThresholdSource::ForceDefaults => {
            let t = Thresholds::default();
            if let Err(e) = store.save(&t) {
                warn!("persist: writing defaults failed ({e})");
            }
            info!(
                "persist: forced defaults humidity={} water={} temp_max={}",
                t.humidity_pct(),
                t.water_level_raw(),
                t.temp_max_c()
            );
            t
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ram([u8; 8]);

    impl ByteStorage for Ram {
        fn capacity(&self) -> usize {
            self.0.len()
        }
        fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
            let src = self
                .0
                .get(offset..offset + buf.len())
                .ok_or(StorageError::OutOfBounds)?;
            buf.copy_from_slice(src);
            Ok(())
        }
        fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
            let dst = self
                .0
                .get_mut(offset..offset + data.len())
                .ok_or(StorageError::OutOfBounds)?;
            dst.copy_from_slice(data);
            Ok(())
        }
    }

    fn erased() -> Ram {
        Ram([0xFF; 8])
    }

    #[test]
    fn wide_layout_is_lossless() {
        let t = Thresholds::new(33, 1021, 75).unwrap();
        let mut store = StoredThresholds::new(erased(), PersistLayout::Wide);
        store.save(&t).unwrap();
        assert_eq!(store.storage().0[..4], [33, 0xFD, 0x03, 75]);
        assert_eq!(store.load().unwrap(), t);
    }

    #[test]
    fn quarter_layout_drops_low_two_bits() {
        let t = Thresholds::new(45, 1023, 60).unwrap();
        let mut store = StoredThresholds::new(erased(), PersistLayout::Quarter);
        store.save(&t).unwrap();
        assert_eq!(store.load().unwrap().water_level_raw(), 1020);

        let t = Thresholds::new(45, 200, 60).unwrap();
        store.save(&t).unwrap();
        assert_eq!(store.load().unwrap().water_level_raw(), 200);
    }

    #[test]
    fn single_byte_layout_keeps_low_byte() {
        let t = Thresholds::new(45, 300, 60).unwrap();
        let mut store = StoredThresholds::new(erased(), PersistLayout::SingleByte);
        store.save(&t).unwrap();
        assert_eq!(store.storage().0[..3], [45, 44, 60]);
        assert_eq!(store.load().unwrap().water_level_raw(), 44);
    }

    #[test]
    fn erased_flash_loads_defaults() {
        let d = decode(&[0xFF; 4], PersistLayout::Wide);
        assert_eq!(d.thresholds, Thresholds::default());
        assert_eq!(
            d.defaulted.as_slice(),
            &[
                ThresholdField::Humidity,
                ThresholdField::WaterLevel,
                ThresholdField::TempMax
            ]
        );
    }

    #[test]
    fn one_bad_field_keeps_the_others() {
        let d = decode(&[30, 100, 5], PersistLayout::SingleByte);
        assert_eq!(d.thresholds.humidity_pct(), 30);
        assert_eq!(d.thresholds.water_level_raw(), 100);
        assert_eq!(d.thresholds.temp_max_c(), DEFAULT_TEMP_MAX);
        assert_eq!(d.defaulted.as_slice(), &[ThresholdField::TempMax]);
    }

    #[test]
    fn short_buffer_reads_as_erased() {
        let d = decode(&[50], PersistLayout::Wide);
        assert_eq!(d.thresholds.humidity_pct(), 50);
        assert_eq!(d.defaulted.len(), 2);
    }

    #[test]
    fn force_defaults_overwrites_storage() {
        let mut store = StoredThresholds::new(Ram([10, 20, 0, 30, 0, 0, 0, 0]), PersistLayout::Wide);
        let t = boot_thresholds(&mut store, ThresholdSource::ForceDefaults);
        assert_eq!(t, Thresholds::default());
        assert_eq!(store.storage().0[..4], [45, 200, 0, 60]);
    }

    #[test]
    fn stored_source_reads_back() {
        let mut store = StoredThresholds::new(Ram([10, 20, 0, 30, 0, 0, 0, 0]), PersistLayout::Wide);
        let t = boot_thresholds(&mut store, ThresholdSource::Stored);
        assert_eq!(t, Thresholds::new(10, 20, 30).unwrap());
    }
}
