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

//! Slot boundary calculation.
//!
//! The OP-1 addresses drum slices in its own time units: the 12 second drum
//! buffer (44.1kHz, 16-bit) is spread over `0..=DEVICE_END`.

use tracing::debug;

use crate::error::DrumError;

/// Number of drum slots in a patch.
pub const SLOT_COUNT: usize = 24;

/// Last addressable device time unit of a drum patch.
pub const DEVICE_END: u64 = 0x7FFF_FFFE;

/// Bytes of 16-bit audio at the reference rate in the 12 seconds the device holds.
pub const BYTES_PER_MAX_SECONDS: u64 = 44100 * 2 * 12;

/// Converts a frame position into device time units.
///
/// The scale factor is truncated before multiplying. The device firmware
/// expects exactly this rounding, so the order of operations must stay.
pub fn frame_to_device_time(frame: u64) -> u64 {
    (DEVICE_END / BYTES_PER_MAX_SECONDS)
        .saturating_mul(frame)
        .saturating_mul(std::mem::size_of::<i16>() as u64)
}

/// Fails unless `count` samples fit into a patch.
pub fn check_slot_count(count: usize) -> Result<(), DrumError> {
    if count == 0 {
        return Err(DrumError::Argument("no samples".to_string()));
    }
    if count > SLOT_COUNT {
        return Err(DrumError::Argument(format!(
            "too many samples: {} given, at most {} fit into a drum patch",
            count, SLOT_COUNT
        )));
    }
    Ok(())
}

/// Start and end of every slot, in device time units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotBoundaries {
    pub start: [u32; SLOT_COUNT],
    pub end: [u32; SLOT_COUNT],
}

impl Default for SlotBoundaries {
    fn default() -> Self {
        SlotBoundaries {
            start: [0; SLOT_COUNT],
            end: [0; SLOT_COUNT],
        }
    }
}

/// How slot boundaries are chosen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SlotLayout {
    /// Pack the samples back to back in the order they were added.
    #[default]
    Auto,
    /// Use the given frame positions verbatim. No ordering or overlap checks
    /// are made.
    Explicit {
        start: [u32; SLOT_COUNT],
        end: [u32; SLOT_COUNT],
    },
}

impl SlotLayout {
    /// Computes the slot boundaries in frames for samples of the given lengths.
    pub fn frame_boundaries(
        &self,
        lengths: &[usize],
    ) -> Result<([u64; SLOT_COUNT], [u64; SLOT_COUNT]), DrumError> {
        check_slot_count(lengths.len())?;

        match self {
            SlotLayout::Auto => Ok(auto_frame_boundaries(lengths)),
            SlotLayout::Explicit { start, end } => {
                Ok((start.map(u64::from), end.map(u64::from)))
            }
        }
    }

    /// Computes the slot boundaries in device time units.
    pub fn resolve(&self, lengths: &[usize]) -> Result<SlotBoundaries, DrumError> {
        let (start, end) = self.frame_boundaries(lengths)?;

        let mut boundaries = SlotBoundaries::default();
        for slot in 0..SLOT_COUNT {
            boundaries.start[slot] = to_device_time(start[slot])?;
            boundaries.end[slot] = to_device_time(end[slot])?;
        }

        debug!(
            start = ?boundaries.start,
            end = ?boundaries.end,
            "Resolved slot boundaries"
        );
        Ok(boundaries)
    }
}

/// Packs the samples back to back. Every sample is followed by the silent
/// frame the muxer inserts, which the slot's end covers. Unused slots collapse
/// to a zero length marker at the end of the audio.
fn auto_frame_boundaries(lengths: &[usize]) -> ([u64; SLOT_COUNT], [u64; SLOT_COUNT]) {
    let mut start = [0u64; SLOT_COUNT];
    let mut end = [0u64; SLOT_COUNT];

    let mut acc: u64 = 0;
    for (slot, length) in lengths.iter().enumerate() {
        start[slot] = acc;
        acc += *length as u64;
        end[slot] = acc + 1;
        acc += 1;
    }

    for slot in lengths.len()..SLOT_COUNT {
        start[slot] = acc;
        end[slot] = acc;
    }

    (start, end)
}

fn to_device_time(frame: u64) -> Result<u32, DrumError> {
    let time = frame_to_device_time(frame);
    if time > DEVICE_END {
        return Err(DrumError::Argument(format!(
            "frame {} is beyond the {} second drum time budget",
            frame,
            BYTES_PER_MAX_SECONDS / 2 / 44100
        )));
    }
    // DEVICE_END fits in a u32.
    Ok(time as u32)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scale_factor() {
        // 0x7FFFFFFE / 1058400 truncates to 2028 before doubling.
        assert_eq!(4056, frame_to_device_time(1));
        assert_eq!(0, frame_to_device_time(0));
        assert_eq!(4056 * 44101, frame_to_device_time(44101));
    }

    #[test]
    fn test_frame_to_device_time_monotonic() {
        let mut previous = 0;
        for frame in (0..2_000_000u64).step_by(997) {
            let time = frame_to_device_time(frame);
            assert!(time >= previous);
            assert_eq!(time, frame_to_device_time(frame));
            previous = time;
        }
        assert!(frame_to_device_time(u64::MAX) >= previous);
    }

    #[test]
    fn test_slot_count() {
        assert!(matches!(check_slot_count(0), Err(DrumError::Argument(_))));
        assert!(matches!(check_slot_count(25), Err(DrumError::Argument(_))));
        assert!(check_slot_count(1).is_ok());
        assert!(check_slot_count(24).is_ok());
    }

    #[test]
    fn test_auto_layout_properties() {
        for n in 1..=SLOT_COUNT {
            let lengths: Vec<usize> = (0..n).map(|i| 100 + i * 37).collect();
            let (start, end) = SlotLayout::Auto.frame_boundaries(&lengths).unwrap();

            assert_eq!(0, start[0]);
            for i in 1..n {
                assert_eq!(start[i - 1] + lengths[i - 1] as u64 + 1, start[i]);
            }
            for i in 0..SLOT_COUNT {
                assert!(end[i] >= start[i]);
            }

            let total: u64 = lengths.iter().map(|l| *l as u64 + 1).sum();
            for i in n..SLOT_COUNT {
                assert_eq!(total, start[i]);
                assert_eq!(total, end[i]);
            }
        }
    }

    #[test]
    fn test_single_second_sample() {
        let boundaries = SlotLayout::Auto.resolve(&[44100]).unwrap();
        assert_eq!(0, boundaries.start[0]);
        assert_eq!(frame_to_device_time(44101) as u32, boundaries.end[0]);
        for slot in 1..SLOT_COUNT {
            assert_eq!(boundaries.end[0], boundaries.start[slot]);
            assert_eq!(boundaries.end[0], boundaries.end[slot]);
        }
    }

    #[test]
    fn test_explicit_layout_verbatim() {
        let mut start = [0u32; SLOT_COUNT];
        let mut end = [0u32; SLOT_COUNT];
        start[0] = 500;
        end[0] = 10;
        end[23] = 7;
        let layout = SlotLayout::Explicit { start, end };

        let boundaries = layout.resolve(&[1000, 2000]).unwrap();
        assert_eq!(frame_to_device_time(500) as u32, boundaries.start[0]);
        assert_eq!(frame_to_device_time(10) as u32, boundaries.end[0]);
        assert_eq!(frame_to_device_time(7) as u32, boundaries.end[23]);
        assert_eq!(0, boundaries.start[1]);
    }

    #[test]
    fn test_explicit_all_zero_is_respected() {
        let layout = SlotLayout::Explicit {
            start: [0; SLOT_COUNT],
            end: [0; SLOT_COUNT],
        };
        assert_eq!(
            SlotBoundaries::default(),
            layout.resolve(&[44100]).unwrap()
        );
    }

    #[test]
    fn test_layout_slot_count_errors() {
        assert!(matches!(
            SlotLayout::Auto.resolve(&[]),
            Err(DrumError::Argument(_))
        ));
        assert!(matches!(
            SlotLayout::Auto.resolve(&[1; 25]),
            Err(DrumError::Argument(_))
        ));
    }

    #[test]
    fn test_time_budget_exceeded() {
        // 12 seconds plus the gap frame still fit, far more does not.
        assert!(SlotLayout::Auto.resolve(&[529_000]).is_ok());
        assert!(matches!(
            SlotLayout::Auto.resolve(&[600_000]),
            Err(DrumError::Argument(_))
        ));
    }
}
