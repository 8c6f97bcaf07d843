use std::convert::TryFrom;

use log::debug;

use crate::error::{Error, Result};
use crate::index::{Chunk, Entry, EntryMeta, Index};
use crate::patch::{Patch, PatchSet, PatchSource, SprtCoordinate};
use crate::section::SectionTag;

#[derive(Debug, Clone)]
pub struct PlannedEntry<'a> {
    pub offset: u32,
    pub size: u32,
    pub patch: Option<&'a Patch>,
    pub source: &'a Entry,
}

#[derive(Debug, Clone)]
pub struct PlannedChunk<'a> {
    pub tag: SectionTag,
    pub offset: u32,
    pub payload_size: u32,
    pub entries: Vec<PlannedEntry<'a>>,
    pub source: &'a Chunk,
}

#[derive(Debug, Clone)]
pub struct PlannedIndex<'a> {
    pub chunks: Vec<PlannedChunk<'a>>,
}

impl<'a> PlannedIndex<'a> {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn section(&self, tag: SectionTag) -> Option<&PlannedChunk<'a>> {
        self.chunks.iter().find(|c| c.tag == tag)
    }

    // form_size = sum(payload_size + 8) over the planned index.
    pub fn form_size(&self) -> u32 {
        self.chunks
            .iter()
            .map(|c| c.payload_size + 8)
            .fold(0u32, |a, b| a + b)
    }
}

pub fn plan<'a>(index: &'a Index, patches: &'a PatchSet) -> Result<PlannedIndex<'a>> {
    let mut chunks: Vec<PlannedChunk<'a>> = index
        .chunks
        .iter()
        .map(|chunk| PlannedChunk {
            tag: chunk.tag,
            offset: chunk.offset,
            payload_size: chunk.payload_size,
            entries: chunk
                .entries
                .iter()
                .map(|entry| PlannedEntry {
                    offset: entry.offset,
                    size: entry.size,
                    patch: None,
                    source: entry,
                })
                .collect(),
            source: chunk,
        })
        .collect();

    for patch in patches {
        apply_patch(&mut chunks, patch)?;
    }

    Ok(PlannedIndex { chunks })
}

fn find_chunk(chunks: &[PlannedChunk], tag: SectionTag) -> Result<usize> {
    chunks
        .iter()
        .position(|c| c.tag == tag)
        .ok_or_else(|| Error::patch_conflict(format!("archive contains no {} section", tag)))
}

fn apply_patch<'a>(chunks: &mut Vec<PlannedChunk<'a>>, patch: &'a Patch) -> Result<()> {
    match patch {
        Patch::Sprt { name, coordinates } => {
            let chunk_idx = find_chunk(chunks, SectionTag::Sprt)?;
            apply_sprt_patch(&chunks[chunk_idx], name, coordinates)
        }

        Patch::Txtr {
            index,
            source,
            width,
            height,
        } => {
            let chunk_idx = find_chunk(chunks, SectionTag::Txtr)?;
            validate_txtr_entry(&chunks[chunk_idx], *index, *width, *height)?;
            apply_sized_patch(chunks, chunk_idx, *index, patch, source)
        }

        Patch::Audo {
            index,
            source,
            file_type,
        } => {
            let chunk_idx = find_chunk(chunks, SectionTag::Audo)?;
            validate_audo_entry(&chunks[chunk_idx], *index, *file_type)?;
            apply_sized_patch(chunks, chunk_idx, *index, patch, source)
        }
    }
}

fn entry_or_range_error<'a>(
    chunk: &'a PlannedChunk,
    index: usize,
) -> Result<&'a PlannedEntry<'a>> {
    chunk.entries.get(index).ok_or_else(|| {
        Error::patch_conflict(format!(
            "patch index out of range: section = {}, patch index = {}, entry count = {}",
            chunk.tag,
            index,
            chunk.entries.len()
        ))
    })
}

fn ensure_unpatched(chunk: &PlannedChunk, index: usize) -> Result<()> {
    if chunk.entries[index].patch.is_some() {
        return Err(Error::patch_conflict(format!(
            "section {}, entry {} is already patched",
            chunk.tag, index
        )));
    }
    Ok(())
}

fn validate_txtr_entry(chunk: &PlannedChunk, index: usize, width: u32, height: u32) -> Result<()> {
    let entry = entry_or_range_error(chunk, index)?;
    ensure_unpatched(chunk, index)?;

    if let EntryMeta::Txtr {
        width: entry_width,
        height: entry_height,
        ..
    } = &entry.source.meta
    {
        if *entry_width != width || *entry_height != height {
            return Err(Error::patch_conflict(format!(
                "section {}, entry {} sprite dimensions mismatch: entry dimensions = {}x{}, patch dimensions = {}x{}",
                chunk.tag, index, entry_width, entry_height, width, height
            )));
        }
    }

    Ok(())
}

fn validate_audo_entry(
    chunk: &PlannedChunk,
    index: usize,
    patch_type: crate::asset::AssetFileType,
) -> Result<()> {
    let entry = entry_or_range_error(chunk, index)?;
    ensure_unpatched(chunk, index)?;

    let entry_type = entry.source.file_type();
    if entry_type != patch_type {
        return Err(Error::patch_conflict(format!(
            "section {}, entry {} type mismatch: entry type = {}, patch type = {}",
            chunk.tag, index, entry_type, patch_type
        )));
    }

    Ok(())
}

fn apply_sized_patch<'a>(
    chunks: &mut Vec<PlannedChunk<'a>>,
    chunk_idx: usize,
    entry_index: usize,
    patch: &'a Patch,
    source: &PatchSource,
) -> Result<()> {
    let new_size = source
        .len()
        .map_err(Error::from)
        .and_then(|len| {
            u32::try_from(len)
                .map_err(|_| Error::out_of_memory("replacement payload exceeds u32 size"))
        })?;

    let chunk = &mut chunks[chunk_idx];
    let old_size = chunk.entries[entry_index].size;
    let old_offset = chunk.entries[entry_index].offset;
    let delta = i64::from(new_size) - i64::from(old_size);

    debug!(
        "patching section {} entry {}: size {} -> {} (delta {})",
        chunk.tag, entry_index, old_size, new_size, delta
    );

    chunk.entries[entry_index].size = new_size;
    chunk.entries[entry_index].patch = Some(patch);
    chunk.payload_size = apply_delta_u32(chunk.payload_size, delta)?;

    for entry in chunk.entries.iter_mut() {
        if entry.offset > old_offset {
            entry.offset = apply_delta_u32(entry.offset, delta)?;
        }
    }

    cascade(&mut chunks[chunk_idx + 1..], delta)
}

fn apply_delta_u32(value: u32, delta: i64) -> Result<u32> {
    let result = i64::from(value) + delta;
    u32::try_from(result)
        .map_err(|_| Error::invalid_format(format!("offset/size delta underflowed: {}", result)))
}

// The tail must consist entirely of movable (TXTR/AUDO) chunks: a single
// non-movable chunk anywhere in it fails the whole patch, since non-movable
// sections are copied opaquely and their internal absolute offsets can't be
// rewritten.
fn cascade(tail: &mut [PlannedChunk], delta: i64) -> Result<()> {
    if delta == 0 {
        return Ok(());
    }

    for chunk in tail.iter_mut() {
        if !chunk.tag.is_movable() {
            return Err(Error::not_implemented("move", chunk.tag));
        }

        chunk.offset = apply_delta_u32(chunk.offset, delta)?;

        for entry in chunk.entries.iter_mut() {
            entry.offset = apply_delta_u32(entry.offset, delta)?;
        }
    }

    Ok(())
}

fn apply_sprt_patch(chunk: &PlannedChunk, name: &str, coordinates: &[SprtCoordinate]) -> Result<()> {
    let entry = chunk
        .entries
        .iter()
        .find(|entry| matches!(&entry.source.meta, EntryMeta::Sprt { name: n, .. } if n == name))
        .ok_or_else(|| Error::patch_conflict(format!("can't find sprite {} in game archive", name)))?;

    let tpag = match &entry.source.meta {
        EntryMeta::Sprt { tpag, .. } => tpag,
        _ => unreachable!("SPRT chunk entry always carries Sprt metadata"),
    };

    for coord in coordinates {
        let stored = tpag.get(coord.tpag_index).ok_or_else(|| {
            Error::patch_conflict(format!(
                "Sprite {} index out of range: {} >= {}",
                name,
                coord.tpag_index,
                tpag.len()
            ))
        })?;

        if stored.x != coord.x
            || stored.y != coord.y
            || stored.width != coord.width
            || stored.height != coord.height
            || stored.txtr_index != coord.txtr_index
        {
            return Err(Error::patch_conflict(format!(
                "Sprite {} {} has incompatible coordinates. patch: x={} y={} width={} height={} txtr_index={}, game archive: x={} y={} width={} height={} txtr_index={}",
                name, coord.tpag_index,
                coord.x, coord.y, coord.width, coord.height, coord.txtr_index,
                stored.x, stored.y, stored.width, stored.height, stored.txtr_index,
            )));
        }
    }

    Ok(())
}
