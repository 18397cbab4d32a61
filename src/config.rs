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
use std::env;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use tracing::debug;

pub mod audio;
pub mod error;

pub use audio::Audio;
pub use error::ConfigError;

/// Prefix of the environment variables that override config values, e.g. RAWPLAY_DEVICE.
pub const ENV_PREFIX: &str = "RAWPLAY";

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_VAR: &str = "RAWPLAY_CONFIG";

/// Loads the audio configuration. Values come from the file named by
/// RAWPLAY_CONFIG, if set, overridden by RAWPLAY_* environment variables.
pub fn load() -> Result<Audio, ConfigError> {
    let path = env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
    load_from(
        path.as_deref(),
        Environment::with_prefix(ENV_PREFIX).try_parsing(true),
    )
}

fn load_from(path: Option<&Path>, environment: Environment) -> Result<Audio, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        debug!(path = %path.display(), "Reading config file.");
        builder = builder.add_source(File::from(path));
    }

    let audio = builder
        .add_source(environment)
        .build()?
        .try_deserialize::<Audio>()?;
    audio.validate()?;
    Ok(audio)
}
