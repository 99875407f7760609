//! Adapters implementing the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                 |
//! |------------|--------------------|-----------------------------|
//! | `device`   | all device ports   | the adapters below, bundled |
//! | `http`     | HttpPort           | ESP-IDF HTTP client         |
//! | `log_sink` | EventSink          | Serial log output           |
//! | `time`     | ClockPort, DelayNs | ESP32 system timer          |
//! | `wifi`     | ConnectivityPort   | ESP-IDF WiFi STA            |

pub mod device;
pub mod http;
pub mod log_sink;
pub mod time;
pub mod wifi;
