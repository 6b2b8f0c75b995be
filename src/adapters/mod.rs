//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                  |
//! |------------|---------------------|------------------------------|
//! | `hardware` | SensorPort          | ESP32 ADC1 (oneshot)         |
//! |            | ActuatorPort        | Motor and alert LED GPIOs    |
//! | `eeprom`   | ByteStorage         | NVS blob / RAM mirror        |
//! | `log_sink` | EventSink           | Serial log output            |
//! | `serial`   | (line framing)      | UART console RX              |
//! | `time`     | (uptime clock)      | ESP32 high-resolution timer  |

pub mod eeprom;
pub mod hardware;
pub mod log_sink;
pub mod serial;
pub mod time;
