//! LED drivers: the serialized writer, patterns, the blink scheduler and
//! thread helpers.

pub mod blink;
pub mod led_patterns;
pub mod led_writer;
pub mod task_pin;
