use crate::asset::AssetFileType;
use crate::section::SectionTag;

// TPAG records are immutable after parse, only checked for equality by SPRT patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tpag {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub txtr_index: u16,
}

#[derive(Debug, Clone)]
pub enum EntryMeta {
    // unknown1/unknown2 are preserved byte-for-byte, never reverse-engineered.
    Txtr {
        unknown1: u8,
        unknown2: u32,
        width: u32,
        height: u32,
    },

    Audo { file_type: AssetFileType },

    Sprt { name: String, tpag: Vec<Tpag> },
}

#[derive(Debug, Clone)]
pub struct Entry {
    // For AUDO this is past the 4-byte size prefix. SPRT entries are never
    // rewritten, so their offset is purely informational.
    pub offset: u32,

    // Meaningless for SPRT; the SPRT chunk is always copied opaquely.
    pub size: u32,

    pub meta: EntryMeta,
}

impl Entry {
    pub fn file_type(&self) -> AssetFileType {
        match &self.meta {
            EntryMeta::Txtr { .. } => AssetFileType::Png,
            EntryMeta::Audo { file_type } => *file_type,
            EntryMeta::Sprt { .. } => AssetFileType::Unknown,
        }
    }
}

// Chunks other than SPRT/TXTR/AUDO carry no entries and are an opaque region.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub tag: SectionTag,

    // Offset of the 8-byte chunk header within the file.
    pub offset: u32,

    // Payload size, excluding the 8-byte header.
    pub payload_size: u32,

    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Default)]
pub struct Index {
    pub chunks: Vec<Chunk>,
}

impl Index {
    pub fn new() -> Self {
        Index { chunks: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn section(&self, tag: SectionTag) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.tag == tag)
    }

    pub fn section_index(&self, tag: SectionTag) -> Option<usize> {
        self.chunks.iter().position(|c| c.tag == tag)
    }
}
