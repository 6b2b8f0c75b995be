//! Sensor subsystem: analog inputs, smoothing, and unit conversion.
//!
//! The [`SensorHub`] owns the three analog inputs and produces one raw
//! [`SensorSample`] per control cycle.  Smoothing lives in
//! [`averaging`], conversion to engineering units in [`humidity`] and
//! [`temperature`]; the water level is used as the raw averaged count.

pub mod analog;
pub mod averaging;
pub mod humidity;
pub mod temperature;

use analog::AnalogInput;

/// Full-scale value of the 10-bit sample domain.
pub const ADC_MAX: u16 = 1023;

/// Analog channel identity.  Discriminants index the averaging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    Humidity = 0,
    Temperature = 1,
    WaterLevel = 2,
}

impl Channel {
    pub const COUNT: usize = 3;
    pub const ALL: [Channel; Self::COUNT] = [Self::Humidity, Self::Temperature, Self::WaterLevel];
}

/// One reading per channel, each in `[0, 1023]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorSample {
    pub humidity: u16,
    pub temperature: u16,
    pub water_level: u16,
}

impl SensorSample {
    pub fn get(&self, channel: Channel) -> u16 {
        match channel {
            Channel::Humidity => self.humidity,
            Channel::Temperature => self.temperature,
            Channel::WaterLevel => self.water_level,
        }
    }
}

/// Averaged sample converted to engineering units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    /// Soil humidity, 0–100 %.
    pub humidity_pct: u8,
    /// Temperature in °C (can be negative below 0.5 V).
    pub temperature_c: f32,
    /// Reservoir level, raw averaged ADC count.
    pub water_level: u16,
}

impl Reading {
    pub fn from_averaged(avg: SensorSample) -> Self {
        Self {
            humidity_pct: humidity::to_percent(avg.humidity),
            temperature_c: temperature::to_celsius(avg.temperature),
            water_level: avg.water_level,
        }
    }
}

/// Integer linear rescale with truncation toward zero, the classic
/// `map(x, in_min, in_max, out_min, out_max)` used by 8-bit firmware.
pub fn map_range(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Owns every analog input and produces a raw sample each cycle.
pub struct SensorHub {
    humidity: AnalogInput,
    temperature: AnalogInput,
    water_level: AnalogInput,
}

impl SensorHub {
    pub fn new(humidity: AnalogInput, temperature: AnalogInput, water_level: AnalogInput) -> Self {
        Self {
            humidity,
            temperature,
            water_level,
        }
    }

    pub fn read_all(&mut self) -> SensorSample {
        SensorSample {
            humidity: self.humidity.read(),
            temperature: self.temperature.read(),
            water_level: self.water_level.read(),
        }
    }
}
