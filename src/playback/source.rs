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
use std::io::{self, ErrorKind, Read};

use crate::audio::format::SAMPLE_WIDTH;

/// The result of filling a chunk from the source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// The chunk was filled completely.
    Complete,
    /// The stream ended first. Holds how many bytes of the chunk had been
    /// read; they are not usable and get dropped.
    EndOfStream { discarded: usize },
}

/// A sequential, read-once stream of raw sample bytes.
pub struct SourceStream<R> {
    reader: R,
    bytes_read: u64,
}

impl<R: Read> SourceStream<R> {
    pub fn new(reader: R) -> SourceStream<R> {
        SourceStream {
            reader,
            bytes_read: 0,
        }
    }

    /// Fills the whole of `chunk`, reading as many times as it takes. A read
    /// returning zero bytes is the only end-of-stream signal.
    pub fn fill(&mut self, chunk: &mut [u8]) -> io::Result<Fill> {
        let mut filled = 0;
        while filled < chunk.len() {
            match self.reader.read(&mut chunk[filled..]) {
                Ok(0) => return Ok(Fill::EndOfStream { discarded: filled }),
                Ok(read) => {
                    filled += read;
                    self.bytes_read += read as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(Fill::Complete)
    }

    /// Total bytes read from the stream so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

/// Decodes little-endian f32 samples from `bytes` into `samples`.
pub fn decode_f32le(bytes: &[u8], samples: &mut [f32]) {
    for (sample, raw) in samples.iter_mut().zip(bytes.chunks_exact(SAMPLE_WIDTH)) {
        *sample = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
    }
}
