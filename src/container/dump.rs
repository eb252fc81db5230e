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
use std::fs;
use std::path::Path;

use tracing::debug;

use super::patcher::{DEVICE_SIGNATURE, METADATA_CHUNK_ID};
use super::raw::{find_in, read_u32_be};
use crate::error::DrumError;

/// Returns the descriptor JSON embedded in a patched drum container.
pub fn extract_descriptor(bytes: &[u8]) -> Result<String, DrumError> {
    let chunk_index = find_in(bytes, METADATA_CHUNK_ID, 0..bytes.len())
        .ok_or_else(|| DrumError::corrupt("no APPL chunk found"))?;
    let size_index = chunk_index + METADATA_CHUNK_ID.len();
    let chunk_size = read_u32_be(bytes, size_index)
        .ok_or_else(|| DrumError::corrupt("APPL chunk size is truncated"))?
        as usize;

    let signature_index = size_index + 4;
    let signature = bytes
        .get(signature_index..signature_index + DEVICE_SIGNATURE.len())
        .ok_or_else(|| DrumError::corrupt("APPL signature is truncated"))?;
    if signature != DEVICE_SIGNATURE {
        return Err(DrumError::corrupt(format!(
            "APPL chunk is tagged '{}', not a drum patch",
            String::from_utf8_lossy(signature)
        )));
    }

    let payload_start = signature_index + DEVICE_SIGNATURE.len();
    let payload = chunk_size
        .checked_sub(DEVICE_SIGNATURE.len())
        .and_then(|len| bytes.get(payload_start..payload_start.checked_add(len)?))
        .ok_or_else(|| {
            DrumError::corrupt(format!(
                "APPL chunk size {} does not fit the container",
                chunk_size
            ))
        })?;

    debug!(chunk_index, chunk_size, "Found drum descriptor");
    String::from_utf8(payload.to_vec())
        .map_err(|e| DrumError::corrupt(format!("descriptor is not UTF-8: {}", e)))
}

/// Reads a drum patch from disk and returns its descriptor JSON.
pub fn read_descriptor<P: AsRef<Path>>(path: P) -> Result<String, DrumError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| DrumError::io(path, e))?;
    extract_descriptor(&bytes)
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::container::{patch, AiffMuxer, ContainerMuxer};

    fn patched(json: &str) -> Vec<u8> {
        let mut raw = AiffMuxer.write_container(44100, 1, &[1, 2, 0], json).unwrap();
        patch(&mut raw).unwrap();
        raw.into_inner()
    }

    #[test]
    fn test_extract() {
        let json = "{\"drum_version\":1,\"type\":\"drum\"}";
        assert_eq!(json, extract_descriptor(&patched(json)).unwrap());
    }

    #[test]
    fn test_extract_unpatched() {
        let raw = AiffMuxer.write_container(44100, 1, &[0], "{}").unwrap();
        assert!(matches!(
            extract_descriptor(raw.as_bytes()),
            Err(DrumError::CorruptContainer(_))
        ));
    }

    #[test]
    fn test_extract_garbage() {
        assert!(extract_descriptor(b"").is_err());
        assert!(extract_descriptor(b"APPL").is_err());
        assert!(extract_descriptor(b"APPL\0\0\0\x02op-1").is_err());
        assert!(extract_descriptor(b"APPL\0\0\0\x40op-1{}").is_err());
        assert_eq!("{}", extract_descriptor(b"APPL\0\0\0\x06op-1{}").unwrap());
    }

    #[test]
    fn test_read_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kit.aif");
        fs::write(&path, patched("{\"a\":true}")).unwrap();
        assert_eq!("{\"a\":true}", read_descriptor(&path).unwrap());

        assert!(matches!(
            read_descriptor(dir.path().join("missing.aif")),
            Err(DrumError::Io { .. })
        ));
    }
}
