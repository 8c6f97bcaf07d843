use std::io::{Cursor, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

// Fields are unsigned 32-bit on disk but the original format treats offsets
// as signed; reject anything that wouldn't fit in i32 rather than wrapping.
pub const INT32_MAX: u32 = i32::MAX as u32;

pub struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
    len: u64,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Reader {
            len: data.len() as u64,
            cursor: Cursor::new(data),
        }
    }

    pub fn position(&self) -> u32 {
        self.cursor.position() as u32
    }

    pub fn seek_to(&mut self, offset: u32) -> Result<()> {
        if u64::from(offset) > self.len {
            return Err(Error::invalid_format(format!(
                "seek offset {} past end of archive ({} bytes)",
                offset, self.len
            )));
        }

        self.cursor.seek(SeekFrom::Start(u64::from(offset)))?;

        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    pub fn read_bounded_u32(&mut self) -> Result<u32> {
        let value = self.read_u32()?;

        if value > INT32_MAX {
            return Err(Error::invalid_format(format!(
                "value {} exceeds INT32_MAX",
                value
            )));
        }

        Ok(value)
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.cursor.read_exact(buf)?;
        Ok(())
    }

    pub fn read_vec(&mut self, count: u32) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; count as usize];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_pascal_string(&mut self) -> Result<String> {
        let length = self.read_u32()?;

        if length == u32::MAX {
            return Err(Error::invalid_format("string length is UINT32_MAX"));
        }

        let bytes = self.read_vec(length)?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn bytes(&self) -> &'a [u8] {
        *self.cursor.get_ref()
    }

    pub fn len(&self) -> u64 {
        self.len
    }
}
