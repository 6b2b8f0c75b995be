//! GPIO / peripheral pin assignments for the controller boards (ESP32-S3).
//!
//! Single source of truth for pin numbers.  `esp-idf-hal` pins are typed
//! (`peripherals.pins.gpio6`), so the binaries take the matching field and
//! log the number from here; keep the two in sync.

// ---------------------------------------------------------------------------
// Irrigation controller: actuators
// ---------------------------------------------------------------------------

/// Motor relay / MOSFET gate.  HIGH = pump running.
pub const MOTOR_GPIO: i32 = 6;
/// Alert LED (low water or over-temperature).  Active HIGH.
pub const ALERT_LED_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Irrigation controller: analog sensors (ADC1)
// ---------------------------------------------------------------------------

/// Soil humidity probe, ADC1 channel 0.
pub const HUMIDITY_ADC_GPIO: i32 = 1;
/// TMP36-style temperature sensor (10 mV/°C, 500 mV offset), ADC1 channel 1.
pub const TEMP_ADC_GPIO: i32 = 2;
/// Reservoir level probe, ADC1 channel 2.
pub const WATER_ADC_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Passenger counter: buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Train arrives / departs.
pub const STATION_BUTTON_GPIO: i32 = 10;
/// Passenger detected.
pub const PASSENGER_BUTTON_GPIO: i32 = 11;
/// Simulated start of a new day.
pub const NEW_DAY_BUTTON_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Passenger counter: indicator LEDs
// ---------------------------------------------------------------------------

/// Train at the station.
pub const STATION_LED_GPIO: i32 = 13;
/// Train in transit.
pub const MOVING_LED_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// UART console (commands in, status and logs out)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 43;
pub const UART_RX_GPIO: i32 = 44;
pub const UART_BAUD: u32 = 115_200;
