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

use std::error::Error;
use std::fs::File;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Writes a 16-bit integer WAV file. `channels` holds one vector per channel;
/// all channels must have the same length.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    channels: Vec<Vec<i16>>,
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;

    let num_channels = channels.len();
    assert!(num_channels > 0, "Need at least one channel!");
    assert!(num_channels <= u16::MAX.into(), "Too many channels!");
    let frames = channels[0].len();
    assert!(
        channels.iter().all(|channel| channel.len() == frames),
        "Channels must have the same length"
    );

    let mut writer = WavWriter::new(
        file,
        WavSpec {
            channels: num_channels as u16,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    )?;

    for frame in 0..frames {
        for channel in &channels {
            writer.write_sample(channel[frame])?;
        }
    }
    writer.finalize()?;

    Ok(())
}

/// Builds a mono ramp of the given length, useful for spotting slot offsets.
pub fn ramp(frames: usize) -> Vec<i16> {
    (0..frames).map(|i| (i % 1000) as i16 + 1).collect()
}
