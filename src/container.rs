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

//! AIFF container writing and post-processing.
//!
//! The generic AIFF writer stores the descriptor in an `APPL` chunk under its
//! own signature and annotates it with the writer's name. The patcher then
//! rewrites the chunk into the form the OP-1 reads.

mod aiff;
mod dump;
mod patcher;
mod raw;

pub use aiff::{AiffMuxer, WRITER_ANNOTATION};
pub use dump::{extract_descriptor, read_descriptor};
pub use patcher::{patch, PatchReport, DEVICE_SIGNATURE, GENERIC_SIGNATURE, METADATA_CHUNK_ID};
pub use raw::RawContainer;

use crate::error::DrumError;

/// Writes PCM audio plus one string metadata tag into a container.
pub trait ContainerMuxer {
    /// Writes interleaved 16-bit PCM and the metadata tag, returning the
    /// container bytes.
    fn write_container(
        &self,
        sample_rate: u32,
        channels: u16,
        pcm: &[i16],
        metadata: &str,
    ) -> Result<RawContainer, DrumError>;
}
