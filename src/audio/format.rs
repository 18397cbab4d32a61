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

use std::{fmt, mem};

/// Channel count of every stream. Raw files carry no header, so this is fixed.
pub const CHANNELS: u16 = 2;

/// Width in bytes of a single sample (32-bit little-endian float).
pub const SAMPLE_WIDTH: usize = mem::size_of::<f32>();

/// The hardware parameters requested from a device before negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HwRequest {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Target sample rate in Hz. The device may pick the nearest rate it supports.
    pub sample_rate: u32,
    /// Target period size in frames. The device may pick the nearest size it supports.
    pub period_frames: usize,
}

impl HwRequest {
    /// Creates a stereo request for the given rate and period size.
    pub fn new(sample_rate: u32, period_frames: usize) -> HwRequest {
        HwRequest {
            channels: CHANNELS,
            sample_rate,
            period_frames,
        }
    }
}

/// The stream format a device settled on after negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Negotiated sample rate in Hz.
    pub sample_rate: u32,
    /// Frames transferred per device write.
    pub period_frames: usize,
}

impl StreamFormat {
    /// Number of bytes in a single interleaved frame.
    pub fn frame_bytes(&self) -> usize {
        self.channels as usize * SAMPLE_WIDTH
    }

    /// Number of samples in one period.
    pub fn period_samples(&self) -> usize {
        self.period_frames * self.channels as usize
    }

    /// Number of bytes in one period.
    pub fn period_bytes(&self) -> usize {
        self.period_frames * self.frame_bytes()
    }

    /// Limits the period size to the given capacity in frames. A device may
    /// negotiate a period larger than the buffer we allocated; we then
    /// transfer less per write rather than overflow the buffer.
    pub fn clamp_period(self, capacity_frames: usize) -> StreamFormat {
        StreamFormat {
            period_frames: self.period_frames.min(capacity_frames),
            ..self
        }
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "f32le, {} channels, {}Hz, {} frames/period",
            self.channels, self.sample_rate, self.period_frames
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(period_frames: usize) -> StreamFormat {
        StreamFormat {
            channels: 2,
            sample_rate: 48000,
            period_frames,
        }
    }

    #[test]
    fn test_hw_request_is_stereo() {
        let request = HwRequest::new(48000, 1024);
        assert_eq!(request.channels, 2);
        assert_eq!(request.sample_rate, 48000);
        assert_eq!(request.period_frames, 1024);
    }

    #[test]
    fn test_byte_sizes() {
        let format = format(1024);
        assert_eq!(format.frame_bytes(), 8);
        assert_eq!(format.period_samples(), 2048);
        assert_eq!(format.period_bytes(), 8192);
    }

    #[test]
    fn test_clamp_period() {
        // Larger than capacity gets clamped.
        assert_eq!(format(4096).clamp_period(1024).period_frames, 1024);

        // Smaller or equal is left alone.
        assert_eq!(format(512).clamp_period(1024).period_frames, 512);
        assert_eq!(format(1024).clamp_period(1024).period_frames, 1024);

        // Other fields are untouched.
        let clamped = format(4096).clamp_period(256);
        assert_eq!(clamped.sample_rate, 48000);
        assert_eq!(clamped.channels, 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", format(1024)),
            "f32le, 2 channels, 48000Hz, 1024 frames/period"
        );
    }
}
