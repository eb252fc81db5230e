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
use tracing::{debug, warn};

/// Level the peak of a normalized sample is scaled towards.
pub const NORMALIZE_TARGET: i32 = 2 << 14;

/// Returns the integer gain that brings the peak towards `NORMALIZE_TARGET`,
/// or `None` for silent or empty input.
///
/// The peak is measured as an unsigned magnitude, so a sample at `i16::MIN`
/// counts as 32768 rather than wrapping.
pub fn normalize_gain(samples: &[i16]) -> Option<i32> {
    let peak = samples.iter().map(|s| s.unsigned_abs()).max()?;
    if peak == 0 {
        return None;
    }
    Some(NORMALIZE_TARGET / i32::from(peak))
}

/// Scales the samples in place by `normalize_gain`, clamping to the i16 range.
/// Returns false if the input was silent and left untouched.
pub fn normalize(samples: &mut [i16]) -> bool {
    let Some(gain) = normalize_gain(samples) else {
        warn!("Sample is silent, skipping normalization");
        return false;
    };

    debug!(gain, "Normalizing sample");
    for sample in samples.iter_mut() {
        let scaled = i32::from(*sample) * gain;
        *sample = scaled.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
    }
    true
}
