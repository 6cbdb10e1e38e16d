//! IDX framing as used by MNIST and its derivatives (Fashion-MNIST, EMNIST, …).
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (big-endian u32)
//! bytes 12-15:  cols        (big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   0x00 0x00 0x08 0x01
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes
//! ```

use crate::error::{NnError, Result};

/// Header of an IDX3 image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdxImageHeader {
    pub n_items: usize,
    pub rows: usize,
    pub cols: usize,
}

/// Validates an IDX3 image file and returns its header and pixel payload.
///
/// The payload is cut to the declared item count; a shorter file is an error.
pub fn image_payload(bytes: &[u8]) -> Result<(IdxImageHeader, &[u8])> {
    check_magic(bytes, 3, "image")?;
    if bytes.len() < 16 {
        return Err(NnError::InvalidData(format!(
            "IDX image file too short: expected at least 16 header bytes, got {}",
            bytes.len()
        )));
    }

    let header = IdxImageHeader {
        n_items: read_be_u32(bytes, 4),
        rows: read_be_u32(bytes, 8),
        cols: read_be_u32(bytes, 12),
    };

    let data_len = header.rows
        .checked_mul(header.cols)
        .and_then(|n_pixels| n_pixels.checked_mul(header.n_items))
        .ok_or_else(|| NnError::InvalidData(format!(
            "IDX image file: {} items of {}x{} pixels overflows usize",
            header.n_items, header.rows, header.cols
        )))?;

    let payload = &bytes[16..];
    if payload.len() < data_len {
        return Err(NnError::InvalidData(format!(
            "IDX image file too short: header declares {} data bytes, file holds {}",
            data_len,
            payload.len()
        )));
    }

    Ok((header, &payload[..data_len]))
}

/// Validates an IDX1 label file and returns its label payload.
pub fn label_payload(bytes: &[u8]) -> Result<&[u8]> {
    check_magic(bytes, 1, "label")?;
    if bytes.len() < 8 {
        return Err(NnError::InvalidData(format!(
            "IDX label file too short: expected at least 8 header bytes, got {}",
            bytes.len()
        )));
    }

    let n_items = read_be_u32(bytes, 4);
    let payload = &bytes[8..];
    if payload.len() < n_items {
        return Err(NnError::InvalidData(format!(
            "IDX label file too short: header declares {} labels, file holds {}",
            n_items,
            payload.len()
        )));
    }

    Ok(&payload[..n_items])
}

fn check_magic(bytes: &[u8], dimensions: u8, kind: &str) -> Result<()> {
    if bytes.len() < 4 {
        return Err(NnError::InvalidData(format!(
            "IDX {} file too short: {} bytes",
            kind,
            bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(NnError::InvalidData(format!(
            "IDX {} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            kind, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(NnError::InvalidData(format!(
            "IDX {} file: dtype must be 0x08 (uint8), got 0x{:02X}",
            kind, bytes[2]
        )));
    }
    if bytes[3] != dimensions {
        return Err(NnError::InvalidData(format!(
            "IDX {} file: expected {} dimensions, got {}",
            kind, dimensions, bytes[3]
        )));
    }
    Ok(())
}

fn read_be_u32(bytes: &[u8], offset: usize) -> usize {
    let word = [bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]];
    u32::from_be_bytes(word) as usize
}
