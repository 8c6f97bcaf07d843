use std::fs;
use std::path::{Path, PathBuf};

use crate::asset::AssetFileType;
use crate::error::{Error, Result};
use crate::index::{EntryMeta, Index};
use crate::section::SectionTag;

pub fn dump(data: &[u8], index: &Index, outdir: &Path) -> Result<()> {
    if let Some(chunk) = index.section(SectionTag::Txtr) {
        let dir = outdir.join("txtr");
        fs::create_dir_all(&dir)?;

        for (i, entry) in chunk.entries.iter().enumerate() {
            let bytes = entry_bytes(data, entry.offset, entry.size)?;
            let path = dump_path(&dir, i, AssetFileType::Png);
            fs::write(path, bytes)?;
        }
    }

    if let Some(chunk) = index.section(SectionTag::Audo) {
        let dir = outdir.join("audo");
        fs::create_dir_all(&dir)?;

        for (i, entry) in chunk.entries.iter().enumerate() {
            let bytes = entry_bytes(data, entry.offset, entry.size)?;
            let file_type = match &entry.meta {
                EntryMeta::Audo { file_type } => *file_type,
                _ => unreachable!("AUDO chunk entry always carries Audo metadata"),
            };
            let path = dump_path(&dir, i, file_type);
            fs::write(path, bytes)?;
        }
    }

    Ok(())
}

fn dump_path(dir: &Path, index: usize, file_type: AssetFileType) -> PathBuf {
    dir.join(format!("{:04}.{}", index, file_type.extension()))
}

fn entry_bytes(data: &[u8], offset: u32, size: u32) -> Result<&[u8]> {
    let start = offset as usize;
    let end = start + size as usize;
    data.get(start..end)
        .ok_or_else(|| Error::invalid_format("dumped entry runs past end of archive"))
}
