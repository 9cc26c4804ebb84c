//! ROOT compression blocks (ZL = zlib, L4 = LZ4, ZS = zstd, XZ = LZMA).
//!
//! Compressed payloads are a sequence of blocks, each with a 9-byte header:
//! ```text
//! bytes 0-1:  algorithm tag
//! byte  2:    method
//! bytes 3-5:  compressed size   (little-endian u24)
//! bytes 6-8:  uncompressed size (little-endian u24)
//! ```

use std::io::Read;

use crate::error::{Result, RootError};

/// Size of the per-block header.
pub(crate) const BLOCK_HEADER_LEN: usize = 9;

/// Decompress a ROOT payload into exactly `expected_len` bytes.
pub fn decompress(src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_len);
    let mut offset = 0;

    while out.len() < expected_len && offset + BLOCK_HEADER_LEN <= src.len() {
        let tag = &src[offset..offset + 2];
        let c_size = read_le24(&src[offset + 3..offset + 6]);
        let u_size = read_le24(&src[offset + 6..offset + 9]);
        offset += BLOCK_HEADER_LEN;

        let end = offset + c_size;
        if end > src.len() {
            return Err(RootError::Decompression(format!(
                "block claims {c_size} bytes but only {} remain",
                src.len() - offset
            )));
        }
        let block = &src[offset..end];

        let decoded = match tag {
            b"ZL" => zlib(block, u_size)?,
            b"L4" => lz4(block, u_size)?,
            b"ZS" => zstd(block, u_size)?,
            b"XZ" => xz(block, u_size)?,
            other => {
                return Err(RootError::Decompression(format!(
                    "unknown algorithm tag {:?}",
                    String::from_utf8_lossy(other)
                )));
            }
        };
        if decoded.len() != u_size {
            return Err(RootError::Decompression(format!(
                "block inflated to {} bytes, header says {u_size}",
                decoded.len()
            )));
        }

        out.extend_from_slice(&decoded);
        offset = end;
    }

    if out.len() != expected_len {
        return Err(RootError::Decompression(format!(
            "payload inflated to {} bytes, key says {expected_len}",
            out.len()
        )));
    }
    Ok(out)
}

fn zlib(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected);
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| RootError::Decompression(format!("zlib: {e}")))?;
    Ok(out)
}

fn lz4(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    // An 8-byte xxhash64 checksum precedes the LZ4 block; it is not verified.
    let body = data
        .get(8..)
        .ok_or_else(|| RootError::Decompression("lz4: block shorter than checksum".into()))?;
    lz4_flex::decompress(body, expected).map_err(|e| RootError::Decompression(format!("lz4: {e}")))
}

fn zstd(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut source = data;
    let mut decoder = ruzstd::decoding::StreamingDecoder::new(&mut source)
        .map_err(|e| RootError::Decompression(format!("zstd: {e}")))?;
    let mut out = Vec::with_capacity(expected);
    decoder.read_to_end(&mut out).map_err(|e| RootError::Decompression(format!("zstd: {e}")))?;
    Ok(out)
}

fn xz(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut input = std::io::BufReader::new(data);
    let mut out = Vec::with_capacity(expected);
    lzma_rs::xz_decompress(&mut input, &mut out)
        .map_err(|e| RootError::Decompression(format!("xz: {e}")))?;
    Ok(out)
}

fn read_le24(b: &[u8]) -> usize {
    b[0] as usize | ((b[1] as usize) << 8) | ((b[2] as usize) << 16)
}

/// Write a 9-byte block header.
#[cfg(any(test, feature = "test-fixtures"))]
pub(crate) fn block_header(tag: &[u8; 2], method: u8, c_len: usize, u_len: usize) -> [u8; 9] {
    let c = (c_len as u32).to_le_bytes();
    let u = (u_len as u32).to_le_bytes();
    [tag[0], tag[1], method, c[0], c[1], c[2], u[0], u[1], u[2]]
}
