pub mod error;

use crate::error::CursorError;
use byteorder::{ByteOrder, LittleEndian};
use std::fs;
use std::path::{Path, PathBuf};

pub type Result<T> = core::result::Result<T, CursorError>;

/// Sequential little-endian reader over an immutable byte slice.
///
/// Every read is bounds-checked. A failed read reports how many bytes were
/// wanted and how many were left; the position after a failure is
/// unspecified and the caller is expected to stop decoding.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails unless at least `count` more bytes are available.
    pub fn ensure(&self, count: usize) -> Result<()> {
        if count > self.remaining() {
            return Err(self.eof(count));
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let slice = self.peek_bytes(count)?;
        self.pos += count;
        Ok(slice)
    }

    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(count).ok_or_else(|| self.eof(count))?;
        self.data.get(self.pos..end).ok_or_else(|| self.eof(count))
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn peek_u32(&self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.peek_bytes(4)?))
    }

    pub fn read_vec2(&mut self) -> Result<[f32; 2]> {
        Ok([self.read_f32()?, self.read_f32()?])
    }

    pub fn read_vec3(&mut self) -> Result<[f32; 3]> {
        Ok([self.read_f32()?, self.read_f32()?, self.read_f32()?])
    }

    fn eof(&self, wanted: usize) -> CursorError {
        CursorError::UnexpectedEof {
            offset: self.pos,
            wanted,
            remaining: self.remaining(),
        }
    }
}

/// Recursively collects every regular file below `root`.
///
/// Missing or unreadable directories are skipped silently; used by the
/// sample-data sweeps in tests.
pub fn collect_files_recursive(root: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, out);
        } else if path.is_file() {
            out.push(path);
        }
    }
}
