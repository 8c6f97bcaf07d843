use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionTag {
    Gen8,
    Optn,
    Extn,
    Sond,
    Sprt,
    Bgnd,
    Path,
    Scpt,
    Shdr,
    Font,
    Tmln,
    Objt,
    Room,
    Dafl,
    Tpag,
    Code,
    Vari,
    Func,
    Strg,
    Txtr,
    Audo,
    Agrp,
    Lang,
    Glob,
    Embi,
    Tgin,
    End,
}

impl SectionTag {
    pub fn parse(magic: &[u8; 4]) -> Result<Self> {
        let tag = match magic {
            b"GEN8" => SectionTag::Gen8,
            b"OPTN" => SectionTag::Optn,
            b"EXTN" => SectionTag::Extn,
            b"SOND" => SectionTag::Sond,
            b"SPRT" => SectionTag::Sprt,
            b"BGND" => SectionTag::Bgnd,
            b"PATH" => SectionTag::Path,
            b"SCPT" => SectionTag::Scpt,
            b"SHDR" => SectionTag::Shdr,
            b"FONT" => SectionTag::Font,
            b"TMLN" => SectionTag::Tmln,
            b"OBJT" => SectionTag::Objt,
            b"ROOM" => SectionTag::Room,
            b"DAFL" => SectionTag::Dafl,
            b"TPAG" => SectionTag::Tpag,
            b"CODE" => SectionTag::Code,
            b"VARI" => SectionTag::Vari,
            b"FUNC" => SectionTag::Func,
            b"STRG" => SectionTag::Strg,
            b"TXTR" => SectionTag::Txtr,
            b"AUDO" => SectionTag::Audo,
            b"AGRP" => SectionTag::Agrp,
            b"LANG" => SectionTag::Lang,
            b"GLOB" => SectionTag::Glob,
            b"EMBI" => SectionTag::Embi,
            b"TGIN" => SectionTag::Tgin,
            _ => {
                return Err(Error::unsupported(format!(
                    "unsupported section {:?}",
                    String::from_utf8_lossy(magic)
                )))
            }
        };

        Ok(tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionTag::Gen8 => "GEN8",
            SectionTag::Optn => "OPTN",
            SectionTag::Extn => "EXTN",
            SectionTag::Sond => "SOND",
            SectionTag::Sprt => "SPRT",
            SectionTag::Bgnd => "BGND",
            SectionTag::Path => "PATH",
            SectionTag::Scpt => "SCPT",
            SectionTag::Shdr => "SHDR",
            SectionTag::Font => "FONT",
            SectionTag::Tmln => "TMLN",
            SectionTag::Objt => "OBJT",
            SectionTag::Room => "ROOM",
            SectionTag::Dafl => "DAFL",
            SectionTag::Tpag => "TPAG",
            SectionTag::Code => "CODE",
            SectionTag::Vari => "VARI",
            SectionTag::Func => "FUNC",
            SectionTag::Strg => "STRG",
            SectionTag::Txtr => "TXTR",
            SectionTag::Audo => "AUDO",
            SectionTag::Agrp => "AGRP",
            SectionTag::Lang => "LANG",
            SectionTag::Glob => "GLOB",
            SectionTag::Embi => "EMBI",
            SectionTag::Tgin => "TGIN",
            SectionTag::End => "END",
        }
    }

    // Only TXTR and AUDO are cascade-shiftable by the planner.
    pub fn is_movable(&self) -> bool {
        matches!(self, SectionTag::Txtr | SectionTag::Audo)
    }
}

impl fmt::Display for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
