// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::fmt;

pub mod alsa;
pub mod error;
pub mod format;
pub mod mock;

pub use error::DeviceError;
pub use format::{HwRequest, StreamFormat};

/// The result of a single interleaved write that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The device accepted this many frames. May be fewer than submitted.
    Accepted(usize),
    /// The device ran dry (or was suspended) and must be prepared again
    /// before it will accept more frames.
    Underrun(String),
    /// A signal interrupted the write before any frames were taken. The
    /// stream is still running; the write can be repeated as is.
    Interrupted,
}

/// A blocking audio output device. Dropping the device closes it.
pub trait Device: fmt::Display + Send {
    /// Negotiates interleaved f32le access with the requested channel count,
    /// rate, and period size, then commits the configuration. The device may
    /// adjust the rate and period size; the settled values are returned.
    fn negotiate(&mut self, request: &HwRequest) -> Result<StreamFormat, DeviceError>;

    /// Puts the device into the playback-ready state.
    fn prepare(&mut self) -> Result<(), DeviceError>;

    /// Starts the stream.
    fn start(&mut self) -> Result<(), DeviceError>;

    /// Writes interleaved samples, blocking until the device has taken some
    /// or all of them. The slice always holds a whole number of frames.
    fn write_interleaved(&mut self, samples: &[f32]) -> Result<WriteOutcome, DeviceError>;

    /// Blocks until every frame written so far has been played.
    fn drain(&mut self) -> Result<(), DeviceError>;
}

/// Opens the device with the given name. Names starting with "mock" give a
/// mock device; everything else is opened through ALSA.
pub fn open_device(name: &str) -> Result<Box<dyn Device>, DeviceError> {
    if name.starts_with("mock") {
        return Ok(Box::new(mock::Device::open(name)?));
    }

    Ok(Box::new(alsa::Device::open(name)?))
}
