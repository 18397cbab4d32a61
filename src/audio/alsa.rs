// Copyright (C) 2024 Michael Wilson <mike@mdwn.dev>
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

use alsa::pcm::{Access, Format, Frames, HwParams, PCM};
use alsa::{Direction, ValueOr};
use tracing::{debug, info};

use super::{DeviceError, HwRequest, StreamFormat, WriteOutcome};

// Linux errno values that a blocking writei reports for recoverable conditions.
const EINTR: i32 = 4;
const EPIPE: i32 = 32;
const ESTRPIPE: i32 = 86;

// Sorts a failed writei into what the caller should do next. Only an xrun or
// a suspend leaves the stream needing a prepare; an interrupted write has
// left the stream running with its queued frames intact.
fn classify_write_error(errno: i32, reason: String) -> Result<WriteOutcome, DeviceError> {
    match errno {
        EPIPE | ESTRPIPE => Ok(WriteOutcome::Underrun(reason)),
        EINTR => Ok(WriteOutcome::Interrupted),
        _ => Err(DeviceError::Write(reason)),
    }
}

// Device is a small abstraction of an ALSA playback PCM.
pub struct Device {
    // Name is the ALSA name the PCM was opened with.
    name: String,
    pcm: PCM,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ALSA)", self.name)
    }
}

impl Device {
    /// Opens a blocking playback PCM with the given name.
    pub fn open(name: &str) -> Result<Device, DeviceError> {
        let pcm = PCM::new(name, Direction::Playback, false)
            .map_err(|e| DeviceError::Open(name.to_string(), e.to_string()))?;

        Ok(Device {
            name: name.to_string(),
            pcm,
        })
    }
}

impl super::Device for Device {
    fn negotiate(&mut self, request: &HwRequest) -> Result<StreamFormat, DeviceError> {
        let hw_params =
            HwParams::any(&self.pcm).map_err(|e| DeviceError::HwParams(e.to_string()))?;

        hw_params
            .set_access(Access::RWInterleaved)
            .map_err(|e| DeviceError::Access(e.to_string()))?;
        hw_params
            .set_format(Format::FloatLE)
            .map_err(|e| DeviceError::Format(e.to_string()))?;
        hw_params
            .set_channels(u32::from(request.channels))
            .map_err(|e| DeviceError::Channels(e.to_string()))?;

        let sample_rate = hw_params
            .set_rate_near(request.sample_rate, ValueOr::Nearest)
            .map_err(|e| DeviceError::SampleRate(e.to_string()))?;
        debug!(
            requested = request.sample_rate,
            actual = sample_rate,
            "Negotiated sample rate."
        );

        let period_frames = hw_params
            .set_period_size_near(request.period_frames as Frames, ValueOr::Nearest)
            .map_err(|e| DeviceError::PeriodSize(request.period_frames, e.to_string()))?;
        debug!(
            requested = request.period_frames,
            actual = period_frames,
            "Negotiated period size."
        );

        self.pcm
            .hw_params(&hw_params)
            .map_err(|e| DeviceError::Commit(e.to_string()))?;

        let format = StreamFormat {
            channels: request.channels,
            sample_rate,
            period_frames: usize::try_from(period_frames).unwrap_or(0),
        };
        info!(device = self.name, format = %format, "Committed hardware parameters.");
        Ok(format)
    }

    fn prepare(&mut self) -> Result<(), DeviceError> {
        self.pcm
            .prepare()
            .map_err(|e| DeviceError::Prepare(e.to_string()))
    }

    fn start(&mut self) -> Result<(), DeviceError> {
        self.pcm
            .start()
            .map_err(|e| DeviceError::Start(e.to_string()))
    }

    fn write_interleaved(&mut self, samples: &[f32]) -> Result<WriteOutcome, DeviceError> {
        let io = self
            .pcm
            .io_f32()
            .map_err(|e| DeviceError::Write(e.to_string()))?;

        match io.writei(samples) {
            Ok(frames) => Ok(WriteOutcome::Accepted(frames)),
            Err(e) => classify_write_error(e.errno(), e.to_string()),
        }
    }

    fn drain(&mut self) -> Result<(), DeviceError> {
        self.pcm
            .drain()
            .map_err(|e| DeviceError::Drain(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xrun_and_suspend_are_underruns() {
        assert_eq!(
            classify_write_error(EPIPE, "Broken pipe".to_string()),
            Ok(WriteOutcome::Underrun("Broken pipe".to_string()))
        );
        assert!(matches!(
            classify_write_error(ESTRPIPE, "Streams pipe error".to_string()),
            Ok(WriteOutcome::Underrun(_))
        ));
    }

    #[test]
    fn test_interrupt_is_not_an_underrun() {
        assert_eq!(
            classify_write_error(EINTR, "Interrupted system call".to_string()),
            Ok(WriteOutcome::Interrupted)
        );
    }

    #[test]
    fn test_other_errors_are_fatal() {
        // ENODEV
        assert_eq!(
            classify_write_error(19, "No such device".to_string()),
            Err(DeviceError::Write("No such device".to_string()))
        );
    }
}
