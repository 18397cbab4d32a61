// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
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
use std::{collections::VecDeque, fmt, sync::Arc};

use parking_lot::Mutex;
#[cfg(test)]
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};

use super::{DeviceError, HwRequest, StreamFormat, WriteOutcome};

/// Opening a mock device with this name fails, as if the device did not exist.
pub const UNAVAILABLE: &str = "mock-unavailable";

/// A call made against a mock device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Negotiate,
    Prepare,
    Start,
    /// A write with the number of frames submitted.
    Write(usize),
    Drain,
}

/// A scripted response to a single write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Report an underrun. The device refuses writes until it is prepared again.
    Underrun,
    /// Report an interrupted write. The device stays ready.
    Interrupted,
    /// Accept at most this many frames.
    Accept(usize),
    /// Fail the write with an unrecoverable error.
    Fail,
}

#[derive(Default)]
struct State {
    adjusted_rate: Option<u32>,
    adjusted_period: Option<usize>,
    negotiate_error: Option<DeviceError>,
    prepare_error: Option<DeviceError>,
    responses: VecDeque<Response>,
    #[cfg(test)]
    random_underruns: Option<(StdRng, f64)>,
    needs_prepare: bool,
    format: Option<StreamFormat>,
    calls: Vec<Call>,
    accepted: Vec<usize>,
    played: Vec<f32>,
}

/// A mock device. Doesn't actually play anything, but records everything it
/// was asked to do. Clones share state, so a test can keep a handle while the
/// playback session owns another.
#[derive(Clone)]
pub struct Device {
    name: String,
    state: Arc<Mutex<State>>,
}

impl Device {
    /// Opens the given mock device.
    pub fn open(name: &str) -> Result<Device, DeviceError> {
        if name == UNAVAILABLE {
            return Err(DeviceError::Open(
                name.to_string(),
                "No such device".to_string(),
            ));
        }

        Ok(Device {
            name: name.to_string(),
            state: Arc::new(Mutex::new(State::default())),
        })
    }

    /// Makes negotiation settle on the given sample rate.
    pub fn adjust_rate(&self, sample_rate: u32) {
        self.state.lock().adjusted_rate = Some(sample_rate);
    }

    /// Makes negotiation settle on the given period size.
    pub fn adjust_period(&self, period_frames: usize) {
        self.state.lock().adjusted_period = Some(period_frames);
    }

    /// Makes negotiation fail with the given error.
    pub fn reject_negotiation(&self, err: DeviceError) {
        self.state.lock().negotiate_error = Some(err);
    }

    /// Makes every following prepare fail with the given error.
    pub fn fail_prepare(&self, err: DeviceError) {
        self.state.lock().prepare_error = Some(err);
    }

    /// Queues responses for the next writes. Once the queue is empty every
    /// write is accepted in full.
    pub fn script<I: IntoIterator<Item = Response>>(&self, responses: I) {
        self.state.lock().responses.extend(responses);
    }

    /// Reports an underrun on each write with the given probability.
    #[cfg(test)]
    pub fn underrun_randomly(&self, seed: u64, probability: f64) {
        self.state.lock().random_underruns = Some((StdRng::seed_from_u64(seed), probability));
    }

    /// Returns every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Returns the number of times the given call was made.
    pub fn count(&self, call: &Call) -> usize {
        self.state.lock().calls.iter().filter(|c| *c == call).count()
    }

    /// Returns the frame count of every write that was accepted, in order.
    pub fn accepted(&self) -> Vec<usize> {
        self.state.lock().accepted.clone()
    }

    /// Returns every sample the device accepted, in order.
    pub fn played(&self) -> Vec<f32> {
        self.state.lock().played.clone()
    }

    /// Returns the negotiated format, if negotiation happened.
    pub fn format(&self) -> Option<StreamFormat> {
        self.state.lock().format
    }
}

impl State {
    fn next_response(&mut self) -> Option<Response> {
        if let Some(response) = self.responses.pop_front() {
            return Some(response);
        }

        #[cfg(test)]
        if let Some((rng, probability)) = self.random_underruns.as_mut() {
            if rng.gen_bool(*probability) {
                return Some(Response::Underrun);
            }
        }

        None
    }
}

impl super::Device for Device {
    fn negotiate(&mut self, request: &HwRequest) -> Result<StreamFormat, DeviceError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Negotiate);

        if let Some(err) = state.negotiate_error.clone() {
            return Err(err);
        }

        let format = StreamFormat {
            channels: request.channels,
            sample_rate: state.adjusted_rate.unwrap_or(request.sample_rate),
            period_frames: state.adjusted_period.unwrap_or(request.period_frames),
        };
        info!(device = self.name, format = %format, "Committed hardware parameters (mock).");
        state.format = Some(format);
        Ok(format)
    }

    fn prepare(&mut self) -> Result<(), DeviceError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Prepare);

        if let Some(err) = state.prepare_error.clone() {
            return Err(err);
        }
        state.needs_prepare = false;
        Ok(())
    }

    fn start(&mut self) -> Result<(), DeviceError> {
        self.state.lock().calls.push(Call::Start);
        Ok(())
    }

    fn write_interleaved(&mut self, samples: &[f32]) -> Result<WriteOutcome, DeviceError> {
        let mut state = self.state.lock();
        let channels = state
            .format
            .map(|format| format.channels as usize)
            .ok_or_else(|| DeviceError::Write("device is not configured".to_string()))?;
        let frames = samples.len() / channels;
        state.calls.push(Call::Write(frames));

        if state.needs_prepare {
            return Ok(WriteOutcome::Underrun("device not prepared".to_string()));
        }

        let accepted = match state.next_response() {
            Some(Response::Underrun) => {
                state.needs_prepare = true;
                return Ok(WriteOutcome::Underrun("Broken pipe".to_string()));
            }
            Some(Response::Interrupted) => return Ok(WriteOutcome::Interrupted),
            Some(Response::Fail) => return Err(DeviceError::Write("No such device".to_string())),
            Some(Response::Accept(limit)) => frames.min(limit),
            None => frames,
        };

        debug!(device = self.name, frames, accepted, "Mock write.");
        state.accepted.push(accepted);
        state
            .played
            .extend_from_slice(&samples[..accepted * channels]);
        Ok(WriteOutcome::Accepted(accepted))
    }

    fn drain(&mut self) -> Result<(), DeviceError> {
        self.state.lock().calls.push(Call::Drain);
        Ok(())
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Device as _;

    #[test]
    fn test_negotiate_adjusts() {
        let mut device = Device::open("mock").unwrap();
        device.adjust_rate(44100);
        device.adjust_period(512);

        let format = device.negotiate(&HwRequest::new(48000, 1024)).unwrap();
        assert_eq!(format.sample_rate, 44100);
        assert_eq!(format.period_frames, 512);
        assert_eq!(device.format(), Some(format));
    }

    #[test]
    fn test_write_before_negotiate_fails() {
        let mut device = Device::open("mock").unwrap();
        assert!(device.write_interleaved(&[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_underrun_until_prepared() {
        let mut device = Device::open("mock").unwrap();
        device.negotiate(&HwRequest::new(48000, 4)).unwrap();
        device.script([Response::Underrun]);

        let samples = [0.5f32; 8];
        assert!(matches!(
            device.write_interleaved(&samples).unwrap(),
            WriteOutcome::Underrun(_)
        ));
        // Still in the underrun state.
        assert!(matches!(
            device.write_interleaved(&samples).unwrap(),
            WriteOutcome::Underrun(_)
        ));

        device.prepare().unwrap();
        assert_eq!(
            device.write_interleaved(&samples).unwrap(),
            WriteOutcome::Accepted(4)
        );
        assert_eq!(device.played(), samples.to_vec());
    }

    #[test]
    fn test_partial_accept() {
        let mut device = Device::open("mock").unwrap();
        device.negotiate(&HwRequest::new(48000, 4)).unwrap();
        device.script([Response::Accept(1)]);

        let samples = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        assert_eq!(
            device.write_interleaved(&samples).unwrap(),
            WriteOutcome::Accepted(1)
        );
        assert_eq!(device.played(), vec![1.0, 2.0]);
        assert_eq!(device.calls(), vec![Call::Negotiate, Call::Write(4)]);
    }
}
