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
use serde::Deserialize;

use super::error::ConfigError;
use crate::audio::HwRequest;

const DEFAULT_DEVICE: &str = "default";
const DEFAULT_SAMPLE_RATE: u32 = 48000;
const DEFAULT_PERIOD_SIZE: usize = 1024;

/// Largest accepted period size in frames. The sample buffer is allocated
/// from this value before the device is touched.
pub const MAX_PERIOD_SIZE: usize = 1 << 16;

/// The audio configuration.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Audio {
    /// The audio device.
    device: Option<String>,

    /// Target sample rate in Hz (default: 48000).
    sample_rate: Option<u32>,

    /// Target period size in frames (default: 1024). This also sizes the
    /// sample buffer, so a device that negotiates a larger period gets
    /// clamped to it.
    period_size: Option<usize>,
}

impl Audio {
    /// New will create a new Audio configuration.
    pub fn new(device: &str) -> Audio {
        Audio {
            device: Some(device.to_string()),
            ..Default::default()
        }
    }

    /// Returns the device from the configuration.
    pub fn device(&self) -> &str {
        self.device.as_deref().unwrap_or(DEFAULT_DEVICE)
    }

    /// Returns the target sample rate (default: 48000)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    /// Returns the target period size in frames (default: 1024)
    pub fn period_size(&self) -> usize {
        self.period_size.unwrap_or(DEFAULT_PERIOD_SIZE)
    }

    /// Returns the hardware parameters to request from the device.
    pub fn hw_request(&self) -> HwRequest {
        HwRequest::new(self.sample_rate(), self.period_size())
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate() == 0 {
            return Err(ConfigError::Invalid(
                "sample_rate",
                "must be greater than 0".to_string(),
            ));
        }
        if self.period_size() == 0 {
            return Err(ConfigError::Invalid(
                "period_size",
                "must be greater than 0".to_string(),
            ));
        }
        if self.period_size() > MAX_PERIOD_SIZE {
            return Err(ConfigError::Invalid(
                "period_size",
                format!("must be at most {}", MAX_PERIOD_SIZE),
            ));
        }
        Ok(())
    }
}
