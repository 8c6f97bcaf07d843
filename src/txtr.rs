use crate::error::{Error, Result};
use crate::index::{Entry, EntryMeta};
use crate::io::Reader;
use crate::png;

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
    for info_offset in offsets {
        entries.push(read_entry(data, info_offset)?);
    }

    Ok(entries)
}

fn read_entry(data: &[u8], info_offset: u32) -> Result<Entry> {
    let mut reader = Reader::new(data);
    reader.seek_to(info_offset)?;

    let unknown1 = reader.read_u32()?;
    let unknown2 = reader.read_u32()?;
    let payload_offset = reader.read_bounded_u32()?;

    if unknown1 > 1 {
        return Err(Error::invalid_format(format!(
            "unexpected value of non-reverse-engineered field unknown1: {}",
            unknown1
        )));
    }

    if unknown2 != 0 {
        return Err(Error::invalid_format(format!(
            "unexpected value of non-reverse-engineered field unknown2: {}",
            unknown2
        )));
    }

    let image = data
        .get(payload_offset as usize..)
        .ok_or_else(|| Error::invalid_format("TXTR payload offset out of range"))?;
    let info = png::sniff(image)?;

    Ok(Entry {
        offset: payload_offset,
        size: info.file_size,
        meta: EntryMeta::Txtr {
            unknown1: unknown1 as u8,
            unknown2,
            width: info.width,
            height: info.height,
        },
    })
}
