//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter        | Implements       | Connects to                  |
//! |----------------|------------------|------------------------------|
//! | `sysfs_led`    | LedSink          | /sys/class/leds brightness   |
//! | `time`         | Clock            | std monotonic clock          |
//! | `command_list` | CommandExecutor  | commands.txt + `sh -c`       |
//! | `input`        | (edge source)    | evdev button device          |

pub mod command_list;
pub mod input;
pub mod sysfs_led;
pub mod time;
