//! sysfs LED adapter.
//!
//! Implements [`LedSink`] by writing `"1"` / `"0"` to the kernel LED
//! class `brightness` files. Both files are opened once and kept open;
//! every write rewinds, writes and flushes so the kernel sees exactly one
//! value per call.

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use log::info;

use crate::app::ports::LedSink;
use crate::error::SinkError;
use crate::pins::Output;

/// Open handles to the red and green brightness files.
pub struct SysfsLeds {
    files: [File; Output::COUNT],
}

impl SysfsLeds {
    pub fn open(red: impl AsRef<Path>, green: impl AsRef<Path>) -> io::Result<Self> {
        let red = open_brightness(red.as_ref())?;
        let green = open_brightness(green.as_ref())?;
        Ok(Self { files: [red, green] })
    }
}

fn open_brightness(path: &Path) -> io::Result<File> {
    let file = OpenOptions::new().write(true).open(path)?;
    info!("LED: opened {}", path.display());
    Ok(file)
}

/// Rewind, write the brightness value, flush.
fn write_value<W: Write + Seek>(w: &mut W, on: bool) -> io::Result<()> {
    w.seek(SeekFrom::Start(0))?;
    w.write_all(if on { b"1" } else { b"0" })?;
    w.flush()
}

impl LedSink for SysfsLeds {
    fn write(&mut self, output: Output, on: bool) -> Result<(), SinkError> {
        write_value(&mut self.files[output.index()], on).map_err(|e| SinkError::new(output, &e))
    }
}
