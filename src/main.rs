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
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{crate_version, Parser};
use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;

use rawplay::audio;
use rawplay::config;
use rawplay::logging;
use rawplay::playback::{PlaybackError, Session};

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Plays a raw stereo f32le sample file through an audio device.",
    long_about = "Plays a raw stereo f32le sample file through an audio device.\n\n\
        The device, sample rate, and period size are read from the YAML file named by \
        RAWPLAY_CONFIG and from RAWPLAY_DEVICE, RAWPLAY_SAMPLE_RATE, and RAWPLAY_PERIOD_SIZE."
)]
struct Cli {
    /// The path to the raw sample file.
    path: PathBuf,
}

fn main() -> ExitCode {
    logging::subscriber(io::stderr).init();

    let cli = Cli::parse();

    match play(&cli.path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn play(path: &Path) -> Result<(), PlaybackError> {
    let config = config::load()?;
    let source = File::open(path).map_err(|source| PlaybackError::Source {
        path: path.to_path_buf(),
        source,
    })?;

    let device = audio::open_device(config.device())?;
    info!(device = %device, "Opened audio device.");
    let mut session = Session::open(device, &config.hw_request())?;
    println!("Got actual period size: {}", session.format().period_frames);

    println!("Playing back from file: {}", path.display());
    session.play(source)?;
    session.finish()?;
    Ok(())
}
