use crate::error::{Error, Result};
use crate::index::{Entry, EntryMeta, Tpag};
use crate::io::Reader;

const SPRITE_RECORD_SIZE: u32 = 80;
const NAME_OFFSET_FIELD: u32 = 0;
const TPAG_COUNT_FIELD: u32 = 76;

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
    for record_offset in offsets {
        entries.push(read_sprite(data, record_offset)?);
    }

    Ok(entries)
}

fn read_sprite(data: &[u8], record_offset: u32) -> Result<Entry> {
    let mut reader = Reader::new(data);

    reader.seek_to(record_offset + NAME_OFFSET_FIELD)?;
    let name_string_offset = reader.read_bounded_u32()?;

    if name_string_offset < 4 {
        return Err(Error::invalid_format(format!(
            "sprite name_string_offset {} is below the minimum of 4",
            name_string_offset
        )));
    }

    reader.seek_to(record_offset + TPAG_COUNT_FIELD)?;
    let tpag_count = reader.read_bounded_u32()?;

    reader.seek_to(name_string_offset - 4)?;
    let name = reader.read_pascal_string()?;

    let mut tpag_offsets = Vec::with_capacity(tpag_count as usize);
    reader.seek_to(record_offset + SPRITE_RECORD_SIZE)?;
    for _ in 0..tpag_count {
        tpag_offsets.push(reader.read_bounded_u32()?);
    }

    let mut tpag = Vec::with_capacity(tpag_count as usize);
    for tpag_offset in tpag_offsets {
        tpag.push(read_tpag(data, tpag_offset)?);
    }

    Ok(Entry {
        offset: record_offset,
        size: SPRITE_RECORD_SIZE,
        meta: EntryMeta::Sprt { name, tpag },
    })
}

fn read_tpag(data: &[u8], tpag_offset: u32) -> Result<Tpag> {
    let mut reader = Reader::new(data);
    reader.seek_to(tpag_offset)?;

    let x = reader.read_u16()?;
    let y = reader.read_u16()?;
    let width = reader.read_u16()?;
    let height = reader.read_u16()?;

    reader.seek_to(tpag_offset + 20)?;
    let txtr_index = reader.read_u16()?;

    Ok(Tpag {
        x,
        y,
        width,
        height,
        txtr_index,
    })
}
