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
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::descriptor::PatchDescriptor;
use super::layout::{check_slot_count, SlotLayout};
use crate::container::{patch, AiffMuxer, ContainerMuxer};
use crate::error::DrumError;
use crate::samples::{self, SampleSet};

/// Loads the given files into a sample set, in slot order. The count is
/// checked before any file is opened.
pub fn load_samples<P: AsRef<Path>>(paths: &[P], normalize: bool) -> Result<SampleSet, DrumError> {
    check_slot_count(paths.len())?;

    let mut set = SampleSet::new();
    for path in paths {
        let sample = samples::load_file(path)?;
        set.push(if normalize {
            sample.normalized()
        } else {
            sample
        })?;
    }
    Ok(set)
}

/// Encodes a sample set and descriptor into a finished drum patch.
pub struct DrumEncoder {
    samples: SampleSet,
    descriptor: PatchDescriptor,
    layout: SlotLayout,
    muxer: Box<dyn ContainerMuxer>,
}

impl DrumEncoder {
    /// Creates an encoder that packs the samples automatically into an AIFF container.
    pub fn new(samples: SampleSet, descriptor: PatchDescriptor) -> Self {
        DrumEncoder {
            samples,
            descriptor,
            layout: SlotLayout::Auto,
            muxer: Box::new(AiffMuxer),
        }
    }

    /// Replaces the slot layout.
    pub fn with_layout(mut self, layout: SlotLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replaces the container muxer.
    pub fn with_muxer(mut self, muxer: Box<dyn ContainerMuxer>) -> Self {
        self.muxer = muxer;
        self
    }

    pub fn descriptor(&self) -> &PatchDescriptor {
        &self.descriptor
    }

    /// Produces the patched container bytes. Nothing is written to disk.
    pub fn encode(&self) -> Result<Vec<u8>, DrumError> {
        let boundaries = self.layout.resolve(&self.samples.lengths())?;
        let sample_rate = self.samples.sample_rate()?;

        let mut descriptor = self.descriptor.clone();
        descriptor.set_boundaries(boundaries);
        let json = descriptor.to_json()?;
        debug!(json, "Serialized drum descriptor");

        let pcm = self.samples.concatenate_with_gaps();
        let mut container = self.muxer.write_container(sample_rate, 1, &pcm, &json)?;
        let report = patch(&mut container)?;
        debug!(
            chunk_size_index = report.chunk_size_index,
            removed = report.removed,
            chunk_size = report.chunk_size,
            "Patched application chunk"
        );

        Ok(container.into_inner())
    }

    /// Encodes the patch and writes it to `path`. The file only appears once
    /// the whole patch has been written; on failure any existing file is left
    /// untouched.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), DrumError> {
        let path = path.as_ref();
        let bytes = self.encode()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| DrumError::io(dir, e))?;

        if let Err(e) = temp.write_all(&bytes).and_then(|_| temp.flush()) {
            discard(temp);
            return Err(DrumError::io(path, e));
        }

        if let Err(e) = temp.persist(path) {
            discard(e.file);
            return Err(DrumError::io(path, e.error));
        }

        info!(
            path = ?path,
            slots = self.samples.len(),
            bytes = bytes.len(),
            "Drum patch written"
        );
        Ok(())
    }
}

fn discard(temp: NamedTempFile) {
    let temp_path = temp.path().to_path_buf();
    if let Err(e) = temp.close() {
        warn!(path = ?temp_path, err = %e, "Unable to remove temporary file");
    }
}
