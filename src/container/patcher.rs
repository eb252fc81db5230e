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

//! Rewrites the generic `APPL` chunk into the OP-1's form.
//!
//! The chunk is retagged from the writer's signature to the device signature
//! and the writer annotation after the JSON payload is cut out. The chunk's
//! declared size is reduced by the number of bytes removed. Nothing is
//! modified unless every step succeeds.

use tracing::debug;

use super::raw::RawContainer;
use crate::error::DrumError;

/// Chunk holding application specific data.
pub const METADATA_CHUNK_ID: &[u8; 4] = b"APPL";

/// Signature the generic writer uses for its software tag.
pub const GENERIC_SIGNATURE: &[u8; 4] = b"m3ga";

/// Signature the OP-1 looks for.
pub const DEVICE_SIGNATURE: &[u8; 4] = b"op-1";

const ANNOTATION_START: &[u8; 4] = b" (li";
const ANNOTATION_END: &[u8; 1] = b")";

/// What the patcher changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchReport {
    /// Offset of the chunk size field.
    pub chunk_size_index: usize,
    /// Chunk size before patching.
    pub original_chunk_size: u32,
    /// Chunk size after patching.
    pub chunk_size: u32,
    /// Offset the removed annotation started at.
    pub annotation_index: usize,
    /// Number of bytes removed.
    pub removed: usize,
}

/// Patches the container in place. On error the container is left untouched.
pub fn patch(container: &mut RawContainer) -> Result<PatchReport, DrumError> {
    let chunk_index = container
        .find(METADATA_CHUNK_ID, 0)
        .ok_or_else(|| DrumError::corrupt("no APPL chunk found"))?;

    let chunk_size_index = chunk_index + METADATA_CHUNK_ID.len();
    let original_chunk_size = container
        .read_u32_be(chunk_size_index)
        .ok_or_else(|| DrumError::corrupt("APPL chunk size is truncated"))?;
    debug!(chunk_size_index, original_chunk_size, "Found APPL chunk");

    let signature_index = chunk_size_index + 4;
    let signature = container
        .bytes_at(signature_index, GENERIC_SIGNATURE.len())
        .ok_or_else(|| DrumError::corrupt("APPL signature is truncated"))?;
    if signature != GENERIC_SIGNATURE {
        return Err(DrumError::corrupt(format!(
            "unexpected APPL signature '{}', expected '{}'",
            String::from_utf8_lossy(signature),
            String::from_utf8_lossy(GENERIC_SIGNATURE)
        )));
    }

    let data_start = signature_index + GENERIC_SIGNATURE.len();
    let chunk_end = (chunk_size_index + 4)
        .checked_add(original_chunk_size as usize)
        .filter(|end| *end <= container.len() && *end >= data_start)
        .ok_or_else(|| {
            DrumError::corrupt(format!(
                "APPL chunk size {} does not fit the container",
                original_chunk_size
            ))
        })?;

    let annotation_index = container
        .find_within(ANNOTATION_START, data_start..chunk_end)
        .ok_or_else(|| DrumError::corrupt("writer annotation not found in APPL chunk"))?;
    let annotation_close = container
        .find_within(ANNOTATION_END, annotation_index..chunk_end)
        .ok_or_else(|| DrumError::corrupt("writer annotation is not terminated"))?;
    let removed = annotation_close - annotation_index + 1;

    // Validated; from here on every step is in bounds.
    let chunk_size = original_chunk_size - removed as u32;
    container
        .overwrite(signature_index, DEVICE_SIGNATURE)
        .ok_or_else(|| DrumError::corrupt("unable to retag APPL chunk"))?;
    container
        .remove_span(annotation_index, removed)
        .ok_or_else(|| DrumError::corrupt("unable to remove writer annotation"))?;
    container
        .write_u32_be(chunk_size_index, chunk_size)
        .ok_or_else(|| DrumError::corrupt("unable to update APPL chunk size"))?;

    debug!(
        annotation_index,
        removed, chunk_size, "Removed writer annotation"
    );

    Ok(PatchReport {
        chunk_size_index,
        original_chunk_size,
        chunk_size,
        annotation_index,
        removed,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::container::{AiffMuxer, ContainerMuxer, WRITER_ANNOTATION};

    /// Builds `prefix + APPL + size + signature + payload + suffix` with the
    /// declared size covering the signature and payload.
    fn appl_buffer(prefix: &[u8], signature: &[u8], payload: &[u8], suffix: &[u8]) -> Vec<u8> {
        let mut bytes = prefix.to_vec();
        bytes.extend_from_slice(b"APPL");
        bytes.extend_from_slice(&((signature.len() + payload.len()) as u32).to_be_bytes());
        bytes.extend_from_slice(signature);
        bytes.extend_from_slice(payload);
        bytes.extend_from_slice(suffix);
        bytes
    }

    #[test]
    fn test_patch_synthetic() {
        let payload = b"{\"a\":1} (libsndfile-1.0.28)";
        let bytes = appl_buffer(b"FORM\0\0\0\0AIFF", b"m3ga", payload, b"SSNDdata");
        let original_len = bytes.len();
        let mut raw = RawContainer::new(bytes);

        let report = patch(&mut raw).unwrap();
        assert_eq!(16, report.chunk_size_index);
        assert_eq!(" (libsndfile-1.0.28)".len(), report.removed);
        assert_eq!(4 + payload.len() as u32, report.original_chunk_size);
        assert_eq!(
            report.original_chunk_size - report.removed as u32,
            report.chunk_size
        );

        assert_eq!(original_len - report.removed, raw.len());
        assert_eq!(Some(report.chunk_size), raw.read_u32_be(16));
        assert_eq!(
            appl_buffer(b"FORM\0\0\0\0AIFF", b"op-1", b"{\"a\":1}", b"SSNDdata"),
            raw.into_inner()
        );
    }

    #[test]
    fn test_patch_muxer_output() {
        let json = "{\"drum_version\":1}";
        let mut raw = AiffMuxer
            .write_container(44100, 1, &[1, 2, 3, 0], json)
            .unwrap();
        let original_len = raw.len();
        let chunk_index = raw.find(b"APPL", 0).unwrap();
        let original_size = raw.read_u32_be(chunk_index + 4).unwrap();

        let report = patch(&mut raw).unwrap();
        assert_eq!(WRITER_ANNOTATION.len(), report.removed);
        assert_eq!(original_len - report.removed, raw.len());
        assert_eq!(
            original_size - report.removed as u32,
            raw.read_u32_be(report.chunk_size_index).unwrap()
        );
        assert_eq!(
            4 + json.len() as u32,
            raw.read_u32_be(report.chunk_size_index).unwrap()
        );
        assert_eq!(Some(&b"op-1"[..]), raw.bytes_at(chunk_index + 8, 4));
        assert_eq!(
            Some(json.as_bytes()),
            raw.bytes_at(chunk_index + 12, json.len())
        );
    }

    #[test]
    fn test_patch_twice_fails_on_signature() {
        let mut raw = AiffMuxer.write_container(44100, 1, &[0], "{}").unwrap();
        patch(&mut raw).unwrap();
        let patched = raw.clone();

        match patch(&mut raw) {
            Err(DrumError::CorruptContainer(message)) => {
                assert!(message.contains("signature"), "{}", message)
            }
            other => panic!("expected CorruptContainer, got {:?}", other),
        }
        assert_eq!(patched, raw);
    }

    #[test]
    fn test_missing_appl() {
        let mut raw = RawContainer::new(b"FORM\0\0\0\x04AIFFSSND\0\0\0\0".to_vec());
        assert!(matches!(
            patch(&mut raw),
            Err(DrumError::CorruptContainer(_))
        ));

        let mut empty = RawContainer::default();
        assert!(matches!(
            patch(&mut empty),
            Err(DrumError::CorruptContainer(_))
        ));
    }

    #[test]
    fn test_truncated_header() {
        let mut raw = RawContainer::new(b"xxAPPL\0\0".to_vec());
        assert!(matches!(
            patch(&mut raw),
            Err(DrumError::CorruptContainer(_))
        ));

        let mut raw = RawContainer::new(b"xxAPPL\0\0\0\x08m3".to_vec());
        assert!(matches!(
            patch(&mut raw),
            Err(DrumError::CorruptContainer(_))
        ));
    }

    #[test]
    fn test_missing_annotation_leaves_buffer_untouched() {
        let bytes = appl_buffer(b"", b"m3ga", b"{\"a\":1}", b"SSND (lib)");
        let mut raw = RawContainer::new(bytes.clone());
        assert!(matches!(
            patch(&mut raw),
            Err(DrumError::CorruptContainer(_))
        ));
        assert_eq!(bytes, raw.into_inner());
    }

    #[test]
    fn test_unterminated_annotation() {
        let bytes = appl_buffer(b"", b"m3ga", b"{} (libsndfile", b")");
        let mut raw = RawContainer::new(bytes.clone());
        assert!(matches!(
            patch(&mut raw),
            Err(DrumError::CorruptContainer(_))
        ));
        assert_eq!(bytes, raw.into_inner());
    }

    #[test]
    fn test_chunk_size_past_end() {
        let mut bytes = appl_buffer(b"", b"m3ga", b"{} (lib)", b"");
        bytes[7] = 0xFF;
        let mut raw = RawContainer::new(bytes);
        assert!(matches!(
            patch(&mut raw),
            Err(DrumError::CorruptContainer(_))
        ));
    }

    #[test]
    fn test_wrong_signature() {
        let bytes = appl_buffer(b"", b"abcd", b"{} (lib)", b"");
        let mut raw = RawContainer::new(bytes);
        assert!(matches!(
            patch(&mut raw),
            Err(DrumError::CorruptContainer(_))
        ));
    }
}
