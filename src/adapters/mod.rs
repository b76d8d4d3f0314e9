//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements             | Connects to                 |
//! |----------------|------------------------|-----------------------------|
//! | `log_sink`     | EventSink              | `log` facade                |
//! | `config_store` | ConfigPort             | in-memory postcard blob     |
//! | `sim`          | MotionPort, EndstopPort| simulated mechanism         |
//! |                | CurrentPort, ClockPort |                             |

pub mod config_store;
pub mod log_sink;
pub mod sim;
