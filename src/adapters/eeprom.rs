//! EEPROM-style byte storage on top of NVS.
//!
//! Implements [`ByteStorage`] for the firmware.  The whole area is one
//! NVS blob: it is read into a RAM mirror at startup and every write
//! updates the mirror, then commits the blob.  Bytes never written read
//! as `0xFF`, like an erased EEPROM.
//!
//! - **`target_os = "espidf"`**: NVS blob `"eeprom"` in the caller's
//!   namespace, committed with `nvs_commit()` on each write.
//! - **host**: RAM mirror only.

use core::ffi::CStr;

use log::info;

use crate::app::ports::{ByteStorage, StorageError};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::warn;

/// Size of the emulated EEPROM area.
pub const EEPROM_SIZE: usize = 64;

#[cfg(target_os = "espidf")]
const BLOB_KEY: &CStr = c"eeprom";

pub struct EepromAdapter {
    mirror: [u8; EEPROM_SIZE],
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    namespace: &'static CStr,
}

impl EepromAdapter {
    /// Initialise NVS flash and load the stored area, if any.
    ///
    /// On first boot or after a version mismatch the NVS partition is
    /// erased and re-initialised.
    #[cfg(target_os = "espidf")]
    pub fn new(namespace: &'static CStr) -> Result<Self, StorageError> {
        // SAFETY: called once from the main task before any NVS access.
        let ret = unsafe { nvs_flash_init() };
        if ret == ESP_ERR_NVS_NO_FREE_PAGES as esp_err_t
            || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as esp_err_t
        {
            warn!("eeprom: erasing and re-initialising NVS partition");
            if unsafe { nvs_flash_erase() } != ESP_OK as esp_err_t
                || unsafe { nvs_flash_init() } != ESP_OK as esp_err_t
            {
                return Err(StorageError::IoError);
            }
        } else if ret != ESP_OK as esp_err_t {
            return Err(StorageError::IoError);
        }

        let mut adapter = Self {
            mirror: [0xFF; EEPROM_SIZE],
            namespace,
        };
        match adapter.load_blob() {
            Ok(len) => info!("eeprom: loaded {len} bytes from NVS {namespace:?}"),
            Err(StorageError::NotFound) => info!("eeprom: {namespace:?} blank, starting erased"),
            Err(e) => return Err(e),
        }
        Ok(adapter)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(namespace: &'static CStr) -> Result<Self, StorageError> {
        info!("eeprom(sim): {namespace:?}, {EEPROM_SIZE} bytes erased");
        Ok(Self {
            mirror: [0xFF; EEPROM_SIZE],
            namespace,
        })
    }

    /// Current contents of the whole area.
    pub fn contents(&self) -> &[u8; EEPROM_SIZE] {
        &self.mirror
    }

    #[cfg(target_os = "espidf")]
    fn with_handle<T>(
        &self,
        write: bool,
        f: impl FnOnce(nvs_handle_t) -> Result<T, i32>,
    ) -> Result<T, i32> {
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };
        let mut handle: nvs_handle_t = 0;
        let ret = unsafe { nvs_open(self.namespace.as_ptr(), mode, &mut handle) };
        if ret != ESP_OK as esp_err_t {
            return Err(ret);
        }
        let result = f(handle);
        unsafe { nvs_close(handle) };
        result
    }

    #[cfg(target_os = "espidf")]
    fn load_blob(&mut self) -> Result<usize, StorageError> {
        let mut buf = [0xFFu8; EEPROM_SIZE];
        let result = self.with_handle(false, |handle| {
            let mut size = buf.len();
            let ret = unsafe {
                nvs_get_blob(handle, BLOB_KEY.as_ptr(), buf.as_mut_ptr().cast(), &mut size)
            };
            if ret != ESP_OK as esp_err_t {
                return Err(ret);
            }
            Ok(size)
        });
        match result {
            Ok(size) => {
                self.mirror[..size].copy_from_slice(&buf[..size]);
                Ok(size)
            }
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND as esp_err_t => Err(StorageError::NotFound),
            Err(e) => {
                warn!("eeprom: NVS read error {e}");
                Err(StorageError::IoError)
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn commit(&self) -> Result<(), StorageError> {
        self.with_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    BLOB_KEY.as_ptr(),
                    self.mirror.as_ptr().cast(),
                    self.mirror.len(),
                )
            };
            if ret != ESP_OK as esp_err_t {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK as esp_err_t {
                return Err(ret);
            }
            Ok(())
        })
        .map_err(|e| {
            warn!("eeprom: NVS write error {e}");
            StorageError::IoError
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn commit(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

impl ByteStorage for EepromAdapter {
    fn capacity(&self) -> usize {
        EEPROM_SIZE
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let src = offset
            .checked_add(buf.len())
            .and_then(|end| self.mirror.get(offset..end))
            .ok_or(StorageError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let dst = offset
            .checked_add(data.len())
            .and_then(|end| self.mirror.get_mut(offset..end))
            .ok_or(StorageError::OutOfBounds)?;
        if dst == data {
            return Ok(());
        }
        dst.copy_from_slice(data);
        self.commit()
    }
}
