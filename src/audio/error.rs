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

/// Errors reported by an audio output device. Each variant names the stage
/// that failed and carries the device's own description of the failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("cannot open audio device {0} ({1})")]
    Open(String, String),

    #[error("cannot initialize hardware parameter structure ({0})")]
    HwParams(String),

    #[error("cannot set access type ({0})")]
    Access(String),

    #[error("cannot set sample format ({0})")]
    Format(String),

    #[error("cannot set channel count ({0})")]
    Channels(String),

    #[error("cannot set sample rate ({0})")]
    SampleRate(String),

    #[error("cannot set period size near {0} ({1})")]
    PeriodSize(usize, String),

    #[error("cannot set parameters ({0})")]
    Commit(String),

    #[error("cannot prepare audio interface for use ({0})")]
    Prepare(String),

    #[error("cannot start audio stream ({0})")]
    Start(String),

    #[error("write to audio interface failed ({0})")]
    Write(String),

    #[error("cannot drain audio stream ({0})")]
    Drain(String),
}
