//! evdev button input adapter.
//!
//! Reads key events from the button's input device and turns them into
//! [`ButtonEdge`]s. Key value 1 is a press, 0 a release; auto-repeat (2)
//! and non-key events are dropped.

use crate::fsm::ButtonEdge;

/// Map an `EV_KEY` value to an edge.
pub fn edge_from_value(value: i32) -> Option<ButtonEdge> {
    match value {
        1 => Some(ButtonEdge::Down),
        0 => Some(ButtonEdge::Up),
        _ => None,
    }
}

#[cfg(feature = "hardware")]
pub use device::ButtonInput;

#[cfg(feature = "hardware")]
mod device {
    use std::io;
    use std::path::Path;

    use evdev::{Device, EventType};
    use log::{debug, info};

    use super::edge_from_value;
    use crate::fsm::ButtonEdge;

    /// An opened button device.
    pub struct ButtonInput {
        device: Device,
    }

    impl ButtonInput {
        pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
            let path = path.as_ref();
            let device = Device::open(path)?;
            info!(
                "input: {} ({})",
                path.display(),
                device.name().unwrap_or("unnamed device")
            );
            Ok(Self { device })
        }

        /// Block reading events, calling `handler` for every edge. Returns
        /// only when the device read fails.
        pub fn run(&mut self, mut handler: impl FnMut(ButtonEdge)) -> io::Result<()> {
            loop {
                for event in self.device.fetch_events()? {
                    if event.event_type() != EventType::KEY {
                        continue;
                    }
                    match edge_from_value(event.value()) {
                        Some(edge) => handler(edge),
                        None => debug!("input: key {} value {} ignored", event.code(), event.value()),
                    }
                }
            }
        }
    }
}
