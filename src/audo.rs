use crate::asset::AssetFileType;
use crate::error::{Error, Result};
use crate::index::{Entry, EntryMeta};
use crate::io::Reader;

const CLASSIFY_HEADER_LEN: usize = 12;

pub fn read(data: &[u8], chunk_offset: u32) -> Result<Vec<Entry>> {
    let payload_offset = chunk_offset + 8;
    let mut reader = Reader::new(data);
    reader.seek_to(payload_offset)?;

    let count = reader.read_bounded_u32()?;
    let mut offsets = Vec::with_capacity(count as usize);
    for _ in 0..count {
        offsets.push(reader.read_bounded_u32()?);
    }

    let mut entries = Vec::with_capacity(count as usize);
    for blob_offset in offsets {
        entries.push(read_blob(data, blob_offset)?);
    }

    Ok(entries)
}

fn read_blob(data: &[u8], blob_offset: u32) -> Result<Entry> {
    let mut reader = Reader::new(data);
    reader.seek_to(blob_offset)?;

    let size = reader.read_bounded_u32()?;

    let header_len = CLASSIFY_HEADER_LEN.min(size as usize);
    let header_start = blob_offset as usize + 4;
    let header = data
        .get(header_start..header_start + header_len)
        .ok_or_else(|| Error::invalid_format("AUDO blob header runs past end of archive"))?;
    let file_type = AssetFileType::classify_audio(header);

    Ok(Entry {
        offset: blob_offset + 4,
        size,
        meta: EntryMeta::Audo { file_type },
    })
}
