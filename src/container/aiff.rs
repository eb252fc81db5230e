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
use std::io::{self, Write};

use byteorder::{BigEndian, WriteBytesExt};
use tracing::debug;

use super::patcher::{GENERIC_SIGNATURE, METADATA_CHUNK_ID};
use super::raw::RawContainer;
use super::ContainerMuxer;
use crate::error::DrumError;

const FORM_CHUNK_ID: &[u8; 4] = b"FORM";
const AIFF_FORMAT_ID: &[u8; 4] = b"AIFF";
const COMM_CHUNK_ID: &[u8; 4] = b"COMM";
const SSND_CHUNK_ID: &[u8; 4] = b"SSND";

const COMM_CHUNK_SIZE: u32 = 18;
const BITS_PER_SAMPLE: u16 = 16;

/// Annotation the writer appends to the software tag it stores.
pub const WRITER_ANNOTATION: &str = concat!(" (libaiff-", env!("CARGO_PKG_VERSION"), ")");

/// Writes big-endian 16-bit PCM AIFF files. The metadata string is stored as
/// the software tag: an `APPL` chunk under the generic signature, followed by
/// `WRITER_ANNOTATION`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AiffMuxer;

impl ContainerMuxer for AiffMuxer {
    fn write_container(
        &self,
        sample_rate: u32,
        channels: u16,
        pcm: &[i16],
        metadata: &str,
    ) -> Result<RawContainer, DrumError> {
        if channels == 0 {
            return Err(DrumError::Argument(
                "container needs at least one channel".to_string(),
            ));
        }
        if pcm.len() % usize::from(channels) != 0 {
            return Err(DrumError::Argument(format!(
                "{} samples do not divide into {} channels",
                pcm.len(),
                channels
            )));
        }

        let mut software = Vec::with_capacity(metadata.len() + WRITER_ANNOTATION.len());
        software.extend_from_slice(metadata.as_bytes());
        software.extend_from_slice(WRITER_ANNOTATION.as_bytes());

        let mut out = Vec::new();
        write_aiff(&mut out, sample_rate, channels, pcm, &software)
            .map_err(|e| DrumError::Argument(format!("unable to build container: {}", e)))?;

        debug!(
            sample_rate,
            channels,
            frames = pcm.len() / usize::from(channels),
            bytes = out.len(),
            "Wrote AIFF container"
        );
        Ok(RawContainer::new(out))
    }
}

fn write_aiff<W: Write>(
    writer: &mut W,
    sample_rate: u32,
    channels: u16,
    pcm: &[i16],
    software: &[u8],
) -> io::Result<()> {
    let frames = chunk_len(pcm.len() / usize::from(channels))?;
    let appl_size = chunk_len(GENERIC_SIGNATURE.len() + software.len())?;
    let ssnd_size = chunk_len(8 + pcm.len() * 2)?;

    let form_size = chunk_len(
        AIFF_FORMAT_ID.len()
            + 8
            + COMM_CHUNK_SIZE as usize
            + 8
            + padded(appl_size as usize)
            + 8
            + padded(ssnd_size as usize),
    )?;

    writer.write_all(FORM_CHUNK_ID)?;
    writer.write_u32::<BigEndian>(form_size)?;
    writer.write_all(AIFF_FORMAT_ID)?;

    writer.write_all(COMM_CHUNK_ID)?;
    writer.write_u32::<BigEndian>(COMM_CHUNK_SIZE)?;
    writer.write_u16::<BigEndian>(channels)?;
    writer.write_u32::<BigEndian>(frames)?;
    writer.write_u16::<BigEndian>(BITS_PER_SAMPLE)?;
    writer.write_all(&sample_rate_to_extended(sample_rate))?;

    writer.write_all(METADATA_CHUNK_ID)?;
    writer.write_u32::<BigEndian>(appl_size)?;
    writer.write_all(GENERIC_SIGNATURE)?;
    writer.write_all(software)?;
    if appl_size % 2 == 1 {
        writer.write_all(&[0])?;
    }

    writer.write_all(SSND_CHUNK_ID)?;
    writer.write_u32::<BigEndian>(ssnd_size)?;
    writer.write_u32::<BigEndian>(0)?; // offset
    writer.write_u32::<BigEndian>(0)?; // block size
    for sample in pcm {
        writer.write_i16::<BigEndian>(*sample)?;
    }

    Ok(())
}

fn chunk_len(len: usize) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} bytes do not fit into an AIFF chunk", len),
        )
    })
}

fn padded(len: usize) -> usize {
    len + len % 2
}

/// Encodes an integer sample rate as an 80-bit IEEE 754 extended float.
fn sample_rate_to_extended(rate: u32) -> [u8; 10] {
    let mut out = [0u8; 10];
    if rate == 0 {
        return out;
    }

    let shift = rate.leading_zeros();
    let exponent = 16383 + 31 - shift as u16;
    // The integer bit is explicit in the extended format.
    let mantissa = u64::from(rate) << (32 + shift);

    out[..2].copy_from_slice(&exponent.to_be_bytes());
    out[2..].copy_from_slice(&mantissa.to_be_bytes());
    out
}
