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

//! Decoded drum samples.
//!
//! This module provides:
//! - `AudioSample`, a mono 16-bit PCM buffer with its sample rate
//! - `SampleSet`, the ordered samples that become drum slots
//! - Decoding from files and in-memory buffers
//! - Peak normalization

mod loader;
mod normalize;

pub use loader::{load_buffer, load_file};
pub use normalize::{normalize, normalize_gain, NORMALIZE_TARGET};

use crate::drum::SLOT_COUNT;
use crate::error::DrumError;

/// A decoded, mono, 16-bit sample. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSample {
    /// Sample rate of the audio data.
    sample_rate: u32,
    /// Mono PCM frames.
    pcm16: Vec<i16>,
}

impl AudioSample {
    /// Creates a new sample. Fails if there are no frames.
    pub fn new(sample_rate: u32, pcm16: Vec<i16>) -> Result<Self, DrumError> {
        if pcm16.is_empty() {
            return Err(DrumError::Argument(
                "sample contains no audio frames".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(DrumError::Argument(
                "sample rate must be greater than 0".to_string(),
            ));
        }

        Ok(AudioSample {
            sample_rate,
            pcm16,
        })
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the number of frames.
    pub fn frames(&self) -> usize {
        self.pcm16.len()
    }

    /// Returns the PCM data.
    pub fn pcm16(&self) -> &[i16] {
        &self.pcm16
    }

    /// Returns a peak-normalized copy of this sample.
    pub fn normalized(mut self) -> Self {
        normalize(&mut self.pcm16);
        self
    }
}

/// The ordered samples of one drum patch. Holds at most `SLOT_COUNT` samples.
#[derive(Clone, Debug, Default)]
pub struct SampleSet {
    samples: Vec<AudioSample>,
}

impl SampleSet {
    /// Creates an empty sample set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from already decoded samples.
    pub fn from_samples(samples: Vec<AudioSample>) -> Result<Self, DrumError> {
        let mut set = SampleSet::new();
        for sample in samples {
            set.push(sample)?;
        }
        Ok(set)
    }

    /// Appends a sample to the next free slot.
    pub fn push(&mut self, sample: AudioSample) -> Result<(), DrumError> {
        if self.samples.len() >= SLOT_COUNT {
            return Err(DrumError::Argument(format!(
                "too many samples, a drum patch holds at most {}",
                SLOT_COUNT
            )));
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AudioSample> {
        self.samples.iter()
    }

    /// Frame counts of every sample, in slot order.
    pub fn lengths(&self) -> Vec<usize> {
        self.samples.iter().map(AudioSample::frames).collect()
    }

    /// Returns the shared sample rate. Every sample must match the first one.
    pub fn sample_rate(&self) -> Result<u32, DrumError> {
        let first = self
            .samples
            .first()
            .ok_or_else(|| DrumError::Argument("no samples".to_string()))?;
        let expected = first.sample_rate();

        match self
            .samples
            .iter()
            .enumerate()
            .find(|(_, sample)| sample.sample_rate() != expected)
        {
            Some((index, sample)) => Err(DrumError::FormatMismatch {
                expected,
                found: sample.sample_rate(),
                index,
            }),
            None => Ok(expected),
        }
    }

    /// Concatenates every sample, appending one silent frame after each.
    pub fn concatenate_with_gaps(&self) -> Vec<i16> {
        let total = self.samples.iter().map(|s| s.frames() + 1).sum();
        let mut pcm = Vec::with_capacity(total);
        for sample in &self.samples {
            pcm.extend_from_slice(sample.pcm16());
            pcm.push(0);
        }
        pcm
    }
}
