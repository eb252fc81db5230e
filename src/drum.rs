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

//! OP-1 drum patch encoding.
//!
//! This module provides:
//! - Slot layout (back to back packing or explicit boundaries)
//! - The patch descriptor and its JSON form
//! - The encoder that ties samples, descriptor and container together

mod descriptor;
mod encoder;
mod layout;

pub use descriptor::{
    Direction, DrumSlotParams, FxType, LfoType, PatchDescriptor, PlayMode, PARAM_COUNT,
    PITCH_CENTER, VOLUME_FLAT,
};
pub use encoder::{load_samples, DrumEncoder};
pub use layout::{
    check_slot_count, frame_to_device_time, SlotBoundaries, SlotLayout, BYTES_PER_MAX_SECONDS,
    DEVICE_END, SLOT_COUNT,
};
