use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
const CHUNK_HEADER_SIZE: usize = 8; // 4-byte length + 4-byte type
const CHUNK_CRC_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngInfo {
    pub file_size: u32,
    pub width: u32,
    pub height: u32,
}

// file_size is the byte span from the signature through the end of IEND.
pub fn sniff(data: &[u8]) -> Result<PngInfo> {
    if data.len() < PNG_SIGNATURE.len() || data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        return Err(Error::invalid_format("not a PNG file (bad signature)"));
    }

    let mut pos = PNG_SIGNATURE.len();
    let mut width = None;
    let mut height = None;

    loop {
        if pos + CHUNK_HEADER_SIZE > data.len() {
            return Err(Error::invalid_format("PNG truncated before IEND"));
        }

        let length = BigEndian::read_u32(&data[pos..pos + 4]) as usize;
        let kind = &data[pos + 4..pos + 8];
        let body_start = pos + CHUNK_HEADER_SIZE;
        let body_end = body_start
            .checked_add(length)
            .ok_or_else(|| Error::invalid_format("PNG chunk length overflow"))?;
        let chunk_end = body_end + CHUNK_CRC_SIZE;

        if chunk_end > data.len() {
            return Err(Error::invalid_format("PNG chunk runs past end of buffer"));
        }

        if kind == b"IHDR" {
            if length < 8 {
                return Err(Error::invalid_format("IHDR chunk too small"));
            }
            width = Some(BigEndian::read_u32(&data[body_start..body_start + 4]));
            height = Some(BigEndian::read_u32(&data[body_start + 4..body_start + 8]));
        }

        pos = chunk_end;

        if kind == b"IEND" {
            let width = width.ok_or_else(|| Error::invalid_format("PNG missing IHDR"))?;
            let height = height.ok_or_else(|| Error::invalid_format("PNG missing IHDR"))?;

            return Ok(PngInfo {
                file_size: pos as u32,
                width,
                height,
            });
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::make_png;
    use super::*;

    #[test]
    fn sniffs_dimensions_and_size() {
        let png = make_png(64, 64, 10);
        let info = sniff(&png).unwrap();
        assert_eq!(info.width, 64);
        assert_eq!(info.height, 64);
        assert_eq!(info.file_size, png.len() as u32);
    }

    #[test]
    fn rejects_bad_signature() {
        let mut png = make_png(1, 1, 0);
        png[1] = b'X';
        assert!(sniff(&png).is_err());
    }

    #[test]
    fn ignores_trailing_bytes_after_iend() {
        let mut png = make_png(16, 8, 4);
        let real_size = png.len();
        png.extend_from_slice(b"trailing garbage from the next chunk header");
        let info = sniff(&png).unwrap();
        assert_eq!(info.file_size, real_size as u32);
    }
}
