use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use log::warn;

use crate::error::{Error, Result};
use crate::index::EntryMeta;
use crate::patch::{Patch, PatchSource};
use crate::plan::{PlannedChunk, PlannedEntry, PlannedIndex};
use crate::section::SectionTag;

pub fn write_archive(target: &Path, source: &[u8], planned: &PlannedIndex) -> Result<()> {
    let tmp_path = tmp_path_for(target);

    // Every failure from here on, including the final commit step, funnels
    // through the same cleanup below rather than using `?` directly — a
    // partially-committed rename must not leave `tmp_path` behind.
    let result = write_to(&tmp_path, source, planned).and_then(|()| commit(&tmp_path, target));

    if result.is_err() && tmp_path.exists() {
        if let Err(cleanup_err) = std::fs::remove_file(&tmp_path) {
            warn!(
                "failed to remove temp file {} after write error: {}",
                tmp_path.display(),
                cleanup_err
            );
        }
    }

    result
}

fn commit(tmp_path: &Path, target: &Path) -> Result<()> {
    // `rename` over an existing path is atomic on the platforms this is
    // expected to run on; removing the target first is only needed where
    // that isn't guaranteed.
    if target.exists() {
        std::fs::remove_file(target)?;
    }
    std::fs::rename(tmp_path, target)?;
    Ok(())
}

fn tmp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

fn write_to(tmp_path: &Path, source: &[u8], planned: &PlannedIndex) -> Result<()> {
    let mut out = File::create(tmp_path)?;

    out.write_all(b"FORM")?;
    out.write_u32::<LittleEndian>(planned.form_size())?;

    for chunk in &planned.chunks {
        out.seek(SeekFrom::Start(u64::from(chunk.offset)))?;
        out.write_all(chunk.tag.as_str().as_bytes())?;
        out.write_u32::<LittleEndian>(chunk.payload_size)?;

        match chunk.tag {
            SectionTag::Txtr => write_txtr_chunk(&mut out, source, chunk)?,
            SectionTag::Audo => write_audo_chunk(&mut out, source, chunk)?,
            _ => copy_opaque_chunk(&mut out, source, chunk)?,
        }
    }

    out.flush()?;
    Ok(())
}

fn entry_bytes<'a>(source: &'a [u8], entry: &PlannedEntry, len: u32) -> Result<&'a [u8]> {
    let start = entry.source.offset as usize;
    let end = start + len as usize;
    source
        .get(start..end)
        .ok_or_else(|| Error::invalid_format("source entry runs past end of archive"))
}

fn write_entry_payload(out: &mut File, source: &[u8], entry: &PlannedEntry) -> Result<()> {
    out.seek(SeekFrom::Start(u64::from(entry.offset)))?;

    match entry.patch {
        Some(patch) => write_patch_source(out, patch_source_of(patch)),
        None => {
            let bytes = entry_bytes(source, entry, entry.size)?;
            out.write_all(bytes)?;
            Ok(())
        }
    }
}

fn patch_source_of(patch: &Patch) -> &PatchSource {
    match patch {
        Patch::Txtr { source, .. } => source,
        Patch::Audo { source, .. } => source,
        Patch::Sprt { .. } => unreachable!("SPRT patches never reach the writer's entry path"),
    }
}

fn write_patch_source(out: &mut File, source: &PatchSource) -> Result<()> {
    match source {
        PatchSource::Memory(bytes) => {
            out.write_all(bytes)?;
        }
        PatchSource::File(path) => {
            let mut file = File::open(path)?;
            std::io::copy(&mut file, out)?;
        }
    }
    Ok(())
}

fn write_txtr_chunk(out: &mut File, source: &[u8], chunk: &PlannedChunk) -> Result<()> {
    let count = chunk.entries.len() as u32;

    out.write_u32::<LittleEndian>(count)?;

    for i in 0..count {
        let info_offset = chunk.offset + 12 + 4 * count + 12 * i;
        out.write_u32::<LittleEndian>(info_offset)?;
    }

    for entry in &chunk.entries {
        let (unknown1, unknown2) = match &entry.source.meta {
            EntryMeta::Txtr {
                unknown1, unknown2, ..
            } => (*unknown1, *unknown2),
            _ => unreachable!("TXTR chunk entry always carries Txtr metadata"),
        };

        out.write_u32::<LittleEndian>(u32::from(unknown1))?;
        out.write_u32::<LittleEndian>(unknown2)?;
        out.write_u32::<LittleEndian>(entry.offset)?;
    }

    for entry in &chunk.entries {
        write_entry_payload(out, source, entry)?;
    }

    Ok(())
}

fn write_audo_chunk(out: &mut File, source: &[u8], chunk: &PlannedChunk) -> Result<()> {
    let count = chunk.entries.len() as u32;

    out.write_u32::<LittleEndian>(count)?;

    for entry in &chunk.entries {
        out.write_u32::<LittleEndian>(entry.offset - 4)?;
    }

    for entry in &chunk.entries {
        out.seek(SeekFrom::Start(u64::from(entry.offset - 4)))?;

        match entry.patch {
            Some(patch) => {
                out.write_u32::<LittleEndian>(entry.size)?;
                write_patch_source(out, patch_source_of(patch))?;
            }
            None => {
                let bytes = entry_bytes_with_prefix(source, entry)?;
                out.write_all(bytes)?;
            }
        }
    }

    Ok(())
}

fn entry_bytes_with_prefix<'a>(source: &'a [u8], entry: &PlannedEntry) -> Result<&'a [u8]> {
    let start = entry.source.offset as usize - 4;
    let end = start + 4 + entry.size as usize;
    source
        .get(start..end)
        .ok_or_else(|| Error::invalid_format("source AUDO blob runs past end of archive"))
}

fn copy_opaque_chunk(out: &mut File, source: &[u8], chunk: &PlannedChunk) -> Result<()> {
    // The 8-byte chunk header was already written by the caller; only the
    // payload itself still needs copying.
    let start = chunk.source.offset as usize + 8;
    let len = chunk.source.payload_size as usize;
    let bytes = source
        .get(start..start + len)
        .ok_or_else(|| Error::invalid_format("opaque chunk runs past end of archive"))?;

    out.write_all(bytes)?;
    Ok(())
}
