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

//! Builds OP-1 drum patches.
//!
//! Up to 24 samples are concatenated into one mono AIFF file. The slice
//! boundaries and the patch parameters travel in an `APPL` chunk as JSON,
//! tagged the way the OP-1 expects.

pub mod config;
pub mod container;
pub mod drum;
pub mod error;
pub mod samples;
#[cfg(test)]
mod testutil;

pub use error::DrumError;
