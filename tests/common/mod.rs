//! Synthetic FORM archive builder shared by the integration tests. Builds a
//! minimal, well-formed archive byte-for-byte so the planner and writer can
//! be exercised without a real game archive fixture.

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

/// One chunk to emit. `build` receives the chunk's own header offset (the
/// absolute position of its 4-byte magic) and returns the payload bytes;
/// this is enough to compute any internal absolute offsets a section needs
/// to embed, since every earlier chunk's size is already fixed.
pub struct ChunkSpec {
    pub tag: &'static [u8; 4],
    pub build: Box<dyn Fn(u32) -> Vec<u8>>,
}

pub fn build_archive(chunks: Vec<ChunkSpec>) -> Vec<u8> {
    let mut out = vec![0u8; 8];
    let mut offset = 8u32;

    for chunk in chunks {
        let payload = (chunk.build)(offset);
        out.extend_from_slice(chunk.tag);
        out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        out.extend_from_slice(&payload);
        offset += 8 + payload.len() as u32;
    }

    out[0..4].copy_from_slice(b"FORM");
    LittleEndian::write_u32(&mut out[4..8], offset - 8);
    out
}

/// An opaque chunk with an arbitrary fixed payload (GEN8, STRG stand-ins).
pub fn opaque_chunk(tag: &'static [u8; 4], payload: Vec<u8>) -> ChunkSpec {
    ChunkSpec {
        tag,
        build: Box::new(move |_offset| payload.clone()),
    }
}

fn write_png_chunk(out: &mut Vec<u8>, kind: &[u8; 4], body: &[u8]) {
    let mut len = [0u8; 4];
    BigEndian::write_u32(&mut len, body.len() as u32);
    out.extend_from_slice(&len);
    out.extend_from_slice(kind);
    out.extend_from_slice(body);
    out.write_u32::<BigEndian>(0).unwrap(); // CRC is never checked by the sniffer
}

/// Builds a minimal well-formed PNG with the given dimensions, padded to
/// reach the requested total byte length via its IDAT body.
pub fn make_png(width: u32, height: u32, total_len: usize) -> Vec<u8> {
    const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
    const FIXED_OVERHEAD: usize = 8 + (8 + 13 + 4) + (8 + 0 + 4) + (8 + 0 + 4);

    let extra = total_len.saturating_sub(FIXED_OVERHEAD);

    let mut out = Vec::new();
    out.extend_from_slice(&SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.write_u32::<BigEndian>(width).unwrap();
    ihdr.write_u32::<BigEndian>(height).unwrap();
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
    write_png_chunk(&mut out, b"IHDR", &ihdr);

    write_png_chunk(&mut out, b"IDAT", &vec![0u8; extra]);
    write_png_chunk(&mut out, b"IEND", &[]);

    out
}

/// A TXTR chunk holding the given PNGs, in order.
pub fn txtr_chunk(pngs: Vec<Vec<u8>>) -> ChunkSpec {
    ChunkSpec {
        tag: b"TXTR",
        build: Box::new(move |chunk_offset| {
            let count = pngs.len() as u32;
            let descriptors_start = chunk_offset + 12 + 4 * count;
            let payload_data_start = descriptors_start + 12 * count;

            let mut payload_offsets = Vec::with_capacity(pngs.len());
            let mut running = payload_data_start;
            for png in &pngs {
                payload_offsets.push(running);
                running += png.len() as u32;
            }

            let mut out = Vec::new();
            out.write_u32::<LittleEndian>(count).unwrap();
            for i in 0..count {
                out.write_u32::<LittleEndian>(chunk_offset + 12 + 4 * count + 12 * i)
                    .unwrap();
            }
            for offset in &payload_offsets {
                out.write_u32::<LittleEndian>(0).unwrap(); // unknown1
                out.write_u32::<LittleEndian>(0).unwrap(); // unknown2
                out.write_u32::<LittleEndian>(*offset).unwrap();
            }
            for png in &pngs {
                out.extend_from_slice(png);
            }

            out
        }),
    }
}

/// An AUDO chunk holding the given blobs, in order.
pub fn audo_chunk(blobs: Vec<Vec<u8>>) -> ChunkSpec {
    ChunkSpec {
        tag: b"AUDO",
        build: Box::new(move |chunk_offset| {
            let count = blobs.len() as u32;
            let offsets_start = chunk_offset + 8 + 4;
            let blob_data_start = offsets_start + 4 * count;

            let mut blob_offsets = Vec::with_capacity(blobs.len());
            let mut running = blob_data_start;
            for blob in &blobs {
                blob_offsets.push(running);
                running += 4 + blob.len() as u32;
            }

            let mut out = Vec::new();
            out.write_u32::<LittleEndian>(count).unwrap();
            for offset in &blob_offsets {
                out.write_u32::<LittleEndian>(*offset).unwrap();
            }
            for blob in &blobs {
                out.write_u32::<LittleEndian>(blob.len() as u32).unwrap();
                out.extend_from_slice(blob);
            }

            out
        }),
    }
}

/// A RIFF/WAVE blob of the given payload length, past the 12-byte header.
pub fn wave_blob(body_len: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.write_u32::<LittleEndian>(0).unwrap();
    out.extend_from_slice(b"WAVE");
    out.extend(std::iter::repeat(0u8).take(body_len));
    out
}

pub fn ogg_blob(body_len: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"OggS");
    out.extend(std::iter::repeat(0u8).take(body_len));
    out
}

/// A single sprite, name plus its ordered TPAG table, for a SPRT chunk.
pub struct SpriteSpec {
    pub name: &'static str,
    pub tpag: Vec<(u16, u16, u16, u16, u16)>, // (x, y, width, height, txtr_index)
}

/// A SPRT chunk holding the given sprites. Sprite records, name strings, and
/// TPAG records are laid out sequentially after the chunk's own offset
/// table, mirroring how the reader resolves them (all absolute offsets).
pub fn sprt_chunk(sprites: Vec<SpriteSpec>) -> ChunkSpec {
    ChunkSpec {
        tag: b"SPRT",
        build: Box::new(move |chunk_offset| {
            let count = sprites.len() as u32;
            let mut cursor = chunk_offset + 8 + 4 + 4 * count;

            let mut record_offsets = Vec::with_capacity(sprites.len());
            let mut sections: Vec<Vec<u8>> = Vec::with_capacity(sprites.len());

            for sprite in &sprites {
                let mut section = Vec::new();

                let name_bytes = sprite.name.as_bytes();
                let name_len_offset = cursor;
                section.write_u32::<LittleEndian>(name_bytes.len() as u32).unwrap();
                let name_string_offset = name_len_offset + 4;
                section.extend_from_slice(name_bytes);

                let record_offset = name_string_offset + name_bytes.len() as u32;
                record_offsets.push(record_offset);

                let tpag_count = sprite.tpag.len() as u32;
                let tpag_array_start = record_offset + 80;
                let tpag_records_start = tpag_array_start + 4 * tpag_count;

                let mut record = vec![0u8; 80];
                LittleEndian::write_u32(&mut record[0..4], name_string_offset);
                LittleEndian::write_u32(&mut record[76..80], tpag_count);
                section.extend_from_slice(&record);

                for i in 0..tpag_count {
                    section
                        .write_u32::<LittleEndian>(tpag_records_start + i * 22)
                        .unwrap();
                }

                for &(x, y, width, height, txtr_index) in &sprite.tpag {
                    let mut tpag_record = vec![0u8; 22];
                    LittleEndian::write_u16(&mut tpag_record[0..2], x);
                    LittleEndian::write_u16(&mut tpag_record[2..4], y);
                    LittleEndian::write_u16(&mut tpag_record[4..6], width);
                    LittleEndian::write_u16(&mut tpag_record[6..8], height);
                    LittleEndian::write_u16(&mut tpag_record[20..22], txtr_index);
                    section.extend_from_slice(&tpag_record);
                }

                cursor += section.len() as u32;
                sections.push(section);
            }

            let mut out = Vec::new();
            out.write_u32::<LittleEndian>(count).unwrap();
            for offset in &record_offsets {
                out.write_u32::<LittleEndian>(*offset).unwrap();
            }
            for section in sections {
                out.extend_from_slice(&section);
            }

            out
        }),
    }
}
