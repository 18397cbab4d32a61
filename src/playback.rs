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
use std::io::Read;

use tracing::{debug, info, span, warn, Level};

use crate::audio::{Device, DeviceError, HwRequest, StreamFormat, WriteOutcome};

pub mod error;
pub mod source;


pub use error::PlaybackError;
pub use source::{Fill, SourceStream};

/// Counters describing a finished stream.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Full periods handed to the device.
    pub periods: usize,
    /// Frames the device accepted.
    pub frames: usize,
    /// Underruns recovered from.
    pub underruns: usize,
    /// Writes the device accepted only part of.
    pub partial_writes: usize,
    /// Trailing bytes that did not make up a full period.
    pub discarded_bytes: usize,
}

/// An open, configured playback device along with the buffer used to feed it.
/// The negotiated format never changes for the lifetime of the session.
pub struct Session {
    device: Box<dyn Device>,
    format: StreamFormat,
    /// Raw bytes of one period, as read from the source.
    bytes: Vec<u8>,
    /// Interleaved samples of one period, as written to the device.
    samples: Vec<f32>,
}

impl Session {
    /// Negotiates the requested parameters with the device, then prepares
    /// and starts it. The sample buffer is sized from the requested period,
    /// and a larger negotiated period is clamped down to it.
    pub fn open(mut device: Box<dyn Device>, request: &HwRequest) -> Result<Session, DeviceError> {
        let capacity_frames = request.period_frames;
        let samples = vec![0.0f32; capacity_frames * request.channels as usize];

        let negotiated = device.negotiate(request)?;
        let format = negotiated.clamp_period(capacity_frames);
        if format.period_frames < negotiated.period_frames {
            info!(
                negotiated = negotiated.period_frames,
                capacity = capacity_frames,
                "Negotiated period exceeds buffer, clamping."
            );
        }
        if format.period_frames == 0 {
            return Err(DeviceError::PeriodSize(
                request.period_frames,
                "device negotiated an empty period".to_string(),
            ));
        }

        device.prepare()?;
        device.start()?;

        Ok(Session {
            device,
            format,
            bytes: vec![0u8; format.period_bytes()],
            samples,
        })
    }

    /// Returns the format in effect for all transfers.
    pub fn format(&self) -> &StreamFormat {
        &self.format
    }

    /// Plays the source until it runs out. Only whole periods are played; a
    /// trailing partial period is dropped.
    pub fn play<R: Read>(&mut self, source: R) -> Result<PlaybackStats, PlaybackError> {
        let span = span!(Level::INFO, "play raw stream");
        let _enter = span.enter();

        let mut source = SourceStream::new(source);
        let mut stats = PlaybackStats::default();
        let period_bytes = self.format.period_bytes();
        let period_samples = self.format.period_samples();

        loop {
            match source
                .fill(&mut self.bytes[..period_bytes])
                .map_err(PlaybackError::Read)?
            {
                Fill::Complete => {}
                Fill::EndOfStream { discarded } => {
                    stats.discarded_bytes = discarded;
                    break;
                }
            }

            source::decode_f32le(
                &self.bytes[..period_bytes],
                &mut self.samples[..period_samples],
            );
            self.write_period(period_samples, &mut stats)?;
            stats.periods += 1;
        }

        info!(
            device = %self.device,
            bytes_read = source.bytes_read(),
            periods = stats.periods,
            frames = stats.frames,
            underruns = stats.underruns,
            discarded_bytes = stats.discarded_bytes,
            "Reached end of stream."
        );
        Ok(stats)
    }

    /// Hands the first `len` samples of the buffer to the device. Partial
    /// writes resume where the device stopped; underruns prepare the device
    /// and retry from the same offset, for as long as it takes. Interrupted
    /// writes are retried without touching the device state.
    fn write_period(&mut self, len: usize, stats: &mut PlaybackStats) -> Result<(), DeviceError> {
        let channels = self.format.channels as usize;
        let mut offset = 0;

        while offset < len {
            let remaining = &self.samples[offset..len];
            let remaining_frames = remaining.len() / channels;
            debug!(frames = remaining_frames, "Writing frames.");

            match self.device.write_interleaved(remaining)? {
                WriteOutcome::Accepted(frames) => {
                    let frames = frames.min(remaining_frames);
                    if frames < remaining_frames {
                        stats.partial_writes += 1;
                    }
                    offset += frames * channels;
                    stats.frames += frames;
                }
                WriteOutcome::Underrun(reason) => {
                    warn!(
                        device = %self.device,
                        reason,
                        remaining = remaining_frames,
                        "Write to audio interface failed, preparing device again."
                    );
                    stats.underruns += 1;
                    self.device.prepare()?;
                }
                WriteOutcome::Interrupted => {
                    debug!(remaining = remaining_frames, "Write interrupted, retrying.");
                }
            }
        }

        Ok(())
    }

    /// Waits for everything written to finish playing, then closes the device.
    pub fn finish(mut self) -> Result<(), DeviceError> {
        self.device.drain()?;
        debug!(device = %self.device, "Drained audio stream.");
        Ok(())
    }
}
