//! Table files.
//!
//! Layout: the magic `LXTB`, a little-endian u32 version, the entry count as a
//! varint, then for every entry the varint key length, key bytes, varint value
//! length and value bytes, and finally a little-endian CRC32 of everything
//! before it. Entries are stored in strictly ascending key order.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, warn};

use crate::error::{LexicoreError, Result};
use crate::storage::memory::MemoryTable;
use crate::util::varint::{read_u64, write_u64};

const MAGIC: &[u8; 4] = b"LXTB";
const VERSION: u32 = 1;
const CHECKSUM_LEN: usize = 4;

/// Write `table` to `path`, replacing any existing file.
pub fn write_table<P: AsRef<Path>>(path: P, table: &MemoryTable) -> Result<()> {
    let path = path.as_ref();
    let mut body = Vec::new();
    body.write_all(MAGIC)?;
    body.write_u32::<LittleEndian>(VERSION)?;
    write_u64(&mut body, table.len() as u64)?;
    for (key, value) in table.iter() {
        write_u64(&mut body, key.len() as u64)?;
        body.write_all(key)?;
        write_u64(&mut body, value.len() as u64)?;
        body.write_all(value)?;
    }
    let checksum = crc32fast::hash(&body);

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&body)?;
    writer.write_u32::<LittleEndian>(checksum)?;
    writer.flush()?;

    debug!(
        "wrote table with {} entries to {}",
        table.len(),
        path.display()
    );
    Ok(())
}

/// Read a table written by [`write_table`].
///
/// Structural problems are reported as corruption. The checksum is only
/// compared when `verify_checksum` is set.
pub fn read_table<P: AsRef<Path>>(path: P, verify_checksum: bool) -> Result<MemoryTable> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let table = parse_table(&data, verify_checksum).inspect_err(|e| {
        if e.is_corruption() {
            warn!("table file {} is damaged: {e}", path.display());
        }
    })?;
    debug!(
        "read table with {} entries from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

fn parse_table(data: &[u8], verify_checksum: bool) -> Result<MemoryTable> {
    if data.len() < MAGIC.len() + 4 + CHECKSUM_LEN {
        return Err(LexicoreError::corruption("Table file is truncated"));
    }
    let (body, mut trailer) = data.split_at(data.len() - CHECKSUM_LEN);
    let stored = trailer.read_u32::<LittleEndian>()?;
    if verify_checksum && crc32fast::hash(body) != stored {
        return Err(LexicoreError::corruption("Table checksum mismatch"));
    }

    let mut input = body;
    let mut magic = [0u8; 4];
    input.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(LexicoreError::corruption("Invalid table magic number"));
    }
    let version = input.read_u32::<LittleEndian>()?;
    if version != VERSION {
        return Err(LexicoreError::corruption(format!(
            "Unsupported table version: {version}"
        )));
    }

    let count = read_length(&mut input)?;
    let mut entries = Vec::with_capacity(count.min(input.len()));
    for _ in 0..count {
        let key = read_bytes(&mut input)?;
        let value = read_bytes(&mut input)?;
        entries.push((key, value));
    }
    if !input.is_empty() {
        return Err(LexicoreError::corruption("Trailing bytes after table entries"));
    }

    MemoryTable::from_sorted(entries)
}

fn read_length(input: &mut &[u8]) -> Result<usize> {
    let len = read_u64(input).map_err(truncated)?;
    usize::try_from(len).map_err(|_| LexicoreError::corruption("Length out of range"))
}

fn read_bytes(input: &mut &[u8]) -> Result<Vec<u8>> {
    let len = read_length(input)?;
    if len > input.len() {
        return Err(LexicoreError::corruption("Entry runs past end of table"));
    }
    let (bytes, rest) = input.split_at(len);
    *input = rest;
    Ok(bytes.to_vec())
}

fn truncated(err: LexicoreError) -> LexicoreError {
    match err {
        LexicoreError::Io(_) => LexicoreError::corruption("Table file is truncated"),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::builder::TableBuilder;
    use crate::storage::layout::KeyLayout;
    use tempfile::TempDir;

    fn sample() -> MemoryTable {
        let mut builder = TableBuilder::new(KeyLayout::Chunked);
        builder.add_term("apple", 3, 5).unwrap();
        builder.add_term("banana", 1, 1).unwrap();
        builder.add_chunk("banana", 7, b"chunk").unwrap();
        builder.build()
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terms.lxt");
        let table = sample();

        write_table(&path, &table).unwrap();
        let loaded = read_table(&path, true).unwrap();

        let original: Vec<_> = table.iter().collect();
        let reloaded: Vec<_> = loaded.iter().collect();
        assert_eq!(original, reloaded);
    }

    #[test]
    fn test_checksum_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("terms.lxt");
        write_table(&path, &sample()).unwrap();

        let mut data = fs::read(&path).unwrap();
        let last_entry_byte = data.len() - CHECKSUM_LEN - 1;
        data[last_entry_byte] ^= 0x01;
        fs::write(&path, &data).unwrap();

        assert!(read_table(&path, true).unwrap_err().is_corruption());
        assert!(read_table(&path, false).is_ok());
    }

    #[test]
    fn test_bad_magic_and_truncation() {
        let mut data = b"NOPE".to_vec();
        data.extend_from_slice(&VERSION.to_le_bytes());
        data.push(0);
        let checksum = crc32fast::hash(&data);
        data.extend_from_slice(&checksum.to_le_bytes());
        assert!(parse_table(&data, true).unwrap_err().is_corruption());

        assert!(parse_table(b"LX", true).unwrap_err().is_corruption());

        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&VERSION.to_le_bytes());
        data.push(1); // one entry that never follows
        let checksum = crc32fast::hash(&data);
        data.extend_from_slice(&checksum.to_le_bytes());
        assert!(parse_table(&data, true).unwrap_err().is_corruption());
    }
}
