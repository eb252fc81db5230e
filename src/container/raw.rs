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
use std::ops::Range;

use byteorder::{BigEndian, ByteOrder};

/// Raw container bytes. Every accessor is bounds checked and returns `None`
/// instead of reading or writing outside the buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawContainer {
    bytes: Vec<u8>,
}

impl RawContainer {
    pub fn new(bytes: Vec<u8>) -> Self {
        RawContainer { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }

    /// Finds the first occurrence of `pattern` starting at `from`.
    pub fn find(&self, pattern: &[u8], from: usize) -> Option<usize> {
        find_in(&self.bytes, pattern, from..self.bytes.len())
    }

    /// Finds the first occurrence of `pattern` lying entirely inside `range`.
    pub fn find_within(&self, pattern: &[u8], range: Range<usize>) -> Option<usize> {
        find_in(&self.bytes, pattern, range)
    }

    /// Returns `len` bytes at `offset`.
    pub fn bytes_at(&self, offset: usize, len: usize) -> Option<&[u8]> {
        self.bytes.get(offset..offset.checked_add(len)?)
    }

    /// Reads a big-endian u32 at `offset`.
    pub fn read_u32_be(&self, offset: usize) -> Option<u32> {
        read_u32_be(&self.bytes, offset)
    }

    /// Writes a big-endian u32 at `offset`.
    pub fn write_u32_be(&mut self, offset: usize, value: u32) -> Option<()> {
        let end = offset.checked_add(4)?;
        BigEndian::write_u32(self.bytes.get_mut(offset..end)?, value);
        Some(())
    }

    /// Overwrites bytes at `offset` with `data`.
    pub fn overwrite(&mut self, offset: usize, data: &[u8]) -> Option<()> {
        let end = offset.checked_add(data.len())?;
        self.bytes.get_mut(offset..end)?.copy_from_slice(data);
        Some(())
    }

    /// Removes `len` bytes at `offset`, shifting the tail left.
    pub fn remove_span(&mut self, offset: usize, len: usize) -> Option<()> {
        let end = offset.checked_add(len)?;
        if end > self.bytes.len() {
            return None;
        }
        self.bytes.drain(offset..end);
        Some(())
    }
}

impl From<Vec<u8>> for RawContainer {
    fn from(bytes: Vec<u8>) -> Self {
        RawContainer::new(bytes)
    }
}

/// Finds `pattern` inside `bytes[range]`, returning an absolute offset.
pub(super) fn find_in(bytes: &[u8], pattern: &[u8], range: Range<usize>) -> Option<usize> {
    if pattern.is_empty() {
        return None;
    }
    let haystack = bytes.get(range.start..range.end.min(bytes.len()))?;
    haystack
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|position| range.start + position)
}

pub(super) fn read_u32_be(bytes: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    bytes.get(offset..end).map(BigEndian::read_u32)
}
