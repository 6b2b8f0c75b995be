//! One-shot ADC initialisation and raw channel reads.
//!
//! Configures the ADC1 oneshot unit and the three sensor channels using
//! raw ESP-IDF sys calls.  Called once from `main()` before the control
//! loop starts.  Digital pins (motor, LED, buttons) are owned by
//! `esp-idf-hal` pin drivers instead and never touch this module.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    ChannelConfigFailed { channel: u32, rc: i32 },
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::ChannelConfigFailed { channel, rc } => {
                write!(f, "ADC1 channel {} config failed (rc={})", channel, rc)
            }
        }
    }
}

impl core::error::Error for HwInitError {}

// ── Channel map ───────────────────────────────────────────────

/// ADC1 channel of the soil humidity probe.
pub const ADC_CH_HUMIDITY: u32 = 0;
/// ADC1 channel of the temperature sensor.
pub const ADC_CH_TEMPERATURE: u32 = 1;
/// ADC1 channel of the reservoir level probe.
pub const ADC_CH_WATER: u32 = 2;

const SENSOR_CHANNELS: [u32; 3] = [ADC_CH_HUMIDITY, ADC_CH_TEMPERATURE, ADC_CH_WATER];

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: ADC1_HANDLE is written once in `init_adc()` before the control
/// loop starts and only read afterwards, all from the main task.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
pub fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for channel in SENSOR_CHANNELS {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::ChannelConfigFailed { channel, rc: ret });
        }
    }

    info!("hw_init: ADC1 configured (CH0=humidity, CH1=temp, CH2=water)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_adc() -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): ADC init skipped, {} simulated channels",
        SENSOR_CHANNELS.len()
    );
    Ok(())
}

/// Read a channel, rescaled from the 12-bit converter to 10 bits.
/// Returns 0 on a read error.
#[cfg(target_os = "espidf")]
pub fn adc_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: handle initialised in init_adc(); reads happen on the main task.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        log::warn!("hw_init: ADC1 CH{} read failed (rc={})", channel, ret);
        return 0;
    }
    (raw.clamp(0, 4095) >> 2) as u16
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_ADC: [AtomicU16; 3] = [AtomicU16::new(0), AtomicU16::new(0), AtomicU16::new(0)];

/// Inject the value the next host-side read of `channel` returns.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u32, raw: u16) {
    if let Some(slot) = SIM_ADC.get(channel as usize) {
        slot.store(raw, Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn adc_read(channel: u32) -> u16 {
    SIM_ADC
        .get(channel as usize)
        .map_or(0, |slot| slot.load(Ordering::Relaxed))
}
