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
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;

/// Typed error for every stage of drum patch encoding so callers can tell
/// caller mistakes apart from broken containers and I/O failures.
#[derive(Debug, thiserror::Error)]
pub enum DrumError {
    /// Invalid slot count, bad enum value or otherwise unusable input.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// The loaded samples do not share a sample rate.
    #[error("Sample rate mismatch: expected {expected}Hz, sample {index} is {found}Hz")]
    FormatMismatch {
        expected: u32,
        found: u32,
        index: usize,
    },

    /// The muxer output does not have the layout the chunk patcher expects.
    #[error("Corrupt container: {0}")]
    CorruptContainer(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to decode {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: symphonia::core::errors::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Descriptor serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl DrumError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        DrumError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn corrupt<S: Into<String>>(message: S) -> Self {
        DrumError::CorruptContainer(message.into())
    }
}

#[cfg(test)]
mod test {
    use std::io;

    use super::DrumError;

    #[test]
    fn test_io_error_names_path() {
        let err = DrumError::io(
            "/tmp/missing.wav",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/missing.wav"), "{}", message);
        assert!(message.contains("no such file"), "{}", message);
    }

    #[test]
    fn test_format_mismatch_message() {
        let err = DrumError::FormatMismatch {
            expected: 44100,
            found: 48000,
            index: 1,
        };
        assert_eq!(
            "Sample rate mismatch: expected 44100Hz, sample 1 is 48000Hz",
            err.to_string()
        );
    }
}
