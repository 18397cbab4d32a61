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
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn rawplay(device: &str, path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rawplay"))
        .arg(path)
        .env_remove("RAWPLAY_CONFIG")
        .env_remove("RAWPLAY_SAMPLE_RATE")
        .env_remove("RAWPLAY_PERIOD_SIZE")
        .env("RAWPLAY_DEVICE", device)
        .output()
        .expect("failed to run rawplay")
}

fn write_stream(path: &Path, frames: usize) -> Result<(), Box<dyn Error>> {
    let bytes: Vec<u8> = (0..frames * 2)
        .flat_map(|i| (i as f32 / 65536.0).to_le_bytes())
        .collect();
    fs::write(path, bytes)?;
    Ok(())
}

#[test]
fn test_plays_to_completion() -> Result<(), Box<dyn Error>> {
    let tempdir = tempfile::tempdir()?;
    let path = tempdir.path().join("stream.raw");
    write_stream(&path, 2500)?;

    let output = rawplay("mock", &path);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Got actual period size: 1024"));
    assert!(stdout.contains("Playing back from file:"));
    Ok(())
}

#[test]
fn test_empty_stream() -> Result<(), Box<dyn Error>> {
    let tempdir = tempfile::tempdir()?;
    let path = tempdir.path().join("empty.raw");
    fs::write(&path, b"")?;

    let output = rawplay("mock", &path);

    assert_eq!(output.status.code(), Some(0));
    Ok(())
}

#[test]
fn test_device_open_failure() -> Result<(), Box<dyn Error>> {
    let tempdir = tempfile::tempdir()?;
    let path = tempdir.path().join("stream.raw");
    write_stream(&path, 1024)?;

    let output = rawplay("mock-unavailable", &path);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("cannot open audio device mock-unavailable (No such device)"));
    Ok(())
}

#[test]
fn test_missing_source_file() -> Result<(), Box<dyn Error>> {
    let tempdir = tempfile::tempdir()?;
    let path = tempdir.path().join("missing.raw");

    let output = rawplay("mock", &path);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("cannot open source file"));
    Ok(())
}

#[test]
fn test_oversized_period_rejected() -> Result<(), Box<dyn Error>> {
    let tempdir = tempfile::tempdir()?;
    let path = tempdir.path().join("stream.raw");
    write_stream(&path, 1024)?;

    let output = Command::new(env!("CARGO_BIN_EXE_rawplay"))
        .arg(&path)
        .env_remove("RAWPLAY_CONFIG")
        .env("RAWPLAY_DEVICE", "mock")
        .env("RAWPLAY_PERIOD_SIZE", "1000000")
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("period_size"));
    Ok(())
}

#[test]
fn test_missing_argument() {
    let output = Command::new(env!("CARGO_BIN_EXE_rawplay"))
        .output()
        .expect("failed to run rawplay");

    assert_eq!(output.status.code(), Some(2));
}
