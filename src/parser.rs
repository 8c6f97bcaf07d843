use log::debug;

use crate::audo;
use crate::error::{Error, Result};
use crate::index::{Chunk, Index};
use crate::io::{Reader, INT32_MAX};
use crate::section::SectionTag;
use crate::sprt;
use crate::txtr;

const FORM_HEADER_SIZE: u32 = 8;
const CHUNK_HEADER_SIZE: u32 = 8;

pub fn read_index(data: &[u8]) -> Result<Index> {
    let mut reader = Reader::new(data);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != b"FORM" {
        return Err(Error::invalid_format("missing FORM magic"));
    }

    let form_size = reader.read_u32()?;
    let end = FORM_HEADER_SIZE
        .checked_add(form_size)
        .ok_or_else(|| Error::invalid_format("form_size overflows file end"))?;

    if u64::from(end) > reader.len() {
        return Err(Error::invalid_format(
            "FORM declares a size larger than the file",
        ));
    }

    let mut index = Index::new();
    let mut offset = FORM_HEADER_SIZE;

    while offset < end {
        if offset + CHUNK_HEADER_SIZE > end {
            return Err(Error::invalid_format(
                "chunk header runs past the end of the file",
            ));
        }

        reader.seek_to(offset)?;

        let mut chunk_magic = [0u8; 4];
        reader.read_exact(&mut chunk_magic)?;
        let tag = SectionTag::parse(&chunk_magic)?;

        let size = reader.read_u32()?;

        if size > INT32_MAX - CHUNK_HEADER_SIZE {
            return Err(Error::invalid_format(format!(
                "section {} size out of range: {}",
                tag, size
            )));
        }

        if offset + CHUNK_HEADER_SIZE + size > end {
            return Err(Error::invalid_format(format!(
                "section {} overflows file",
                tag
            )));
        }

        debug!(
            "indexing section {} at offset {} (payload {} bytes)",
            tag, offset, size
        );

        let entries = match tag {
            SectionTag::Sprt => sprt::read(data, offset)?,
            SectionTag::Txtr => txtr::read(data, offset)?,
            SectionTag::Audo => audo::read(data, offset)?,
            _ => Vec::new(),
        };

        index.chunks.push(Chunk {
            tag,
            offset,
            payload_size: size,
            entries,
        });

        offset += CHUNK_HEADER_SIZE + size;
    }

    Ok(index)
}
