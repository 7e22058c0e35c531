//! Streaming reader for IDX image/label file pairs (MNIST and friends).
//!
//! # IDX3 image stream
//! ```text
//! bytes  0-3:   magic 2051 (0x00000803, big-endian u32)
//! bytes  4-7:   N     (number of images)
//! bytes  8-11:  rows
//! bytes 12-15:  cols
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label stream
//! ```text
//! bytes  0-3:   magic 2049 (0x00000801, big-endian u32)
//! bytes  4-7:   N     (number of labels)
//! bytes  8..:   N bytes, one class index each
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};

pub const IMAGE_MAGIC: u32 = 2051;
pub const LABEL_MAGIC: u32 = 2049;

/// Largest `rows * cols` a header may declare.
pub const MAX_RECORD_PIXELS: usize = u16::MAX as usize;

/// One decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledImage {
    pub label: u8,
    /// Raw pixel intensities, `rows * cols` of them.
    pub pixels: Vec<u8>,
}

/// Lazy, single-pass iterator over an image stream and a label stream read in lockstep.
///
/// Both headers are validated on construction, before any record is read.
pub struct IdxReader<I, L> {
    images: I,
    labels: L,
    rows: usize,
    cols: usize,
    remaining: usize,
}

impl IdxReader<BufReader<File>, BufReader<File>> {
    pub fn open(images: impl AsRef<Path>, labels: impl AsRef<Path>) -> Result<Self> {
        IdxReader::new(
            BufReader::new(File::open(images)?),
            BufReader::new(File::open(labels)?),
        )
    }
}

impl<I: Read, L: Read> IdxReader<I, L> {
    pub fn new(mut images: I, mut labels: L) -> Result<Self> {
        expect_magic(&mut images, "image", IMAGE_MAGIC)?;
        expect_magic(&mut labels, "label", LABEL_MAGIC)?;

        let count = read_u32(&mut images)? as usize;
        let rows = read_u32(&mut images)? as usize;
        let cols = read_u32(&mut images)? as usize;
        let label_count = read_u32(&mut labels)? as usize;

        if count != label_count {
            return Err(Error::Format(format!(
                "image stream declares {} items but label stream declares {}",
                count, label_count
            )));
        }
        match rows.checked_mul(cols) {
            Some(pixels) if pixels <= MAX_RECORD_PIXELS => {}
            _ => {
                return Err(Error::Format(format!(
                    "image size {}x{} exceeds {} pixels",
                    rows, cols, MAX_RECORD_PIXELS
                )))
            }
        }

        Ok(IdxReader {
            images,
            labels,
            rows,
            cols,
            remaining: count,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Records not yet read.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn read_record(&mut self) -> Result<LabeledImage> {
        let mut label = [0u8; 1];
        self.labels.read_exact(&mut label)?;
        let mut pixels = vec![0u8; self.rows * self.cols];
        self.images.read_exact(&mut pixels)?;
        Ok(LabeledImage {
            label: label[0],
            pixels,
        })
    }
}

impl<I: Read, L: Read> Iterator for IdxReader<I, L> {
    type Item = Result<LabeledImage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.read_record() {
            Ok(record) => {
                self.remaining -= 1;
                Some(Ok(record))
            }
            Err(e) => {
                // a broken stream cannot be resynchronised
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn expect_magic<R: Read>(reader: &mut R, stream: &'static str, expected: u32) -> Result<()> {
    let found = read_u32(reader)?;
    if found != expected {
        return Err(Error::InvalidMagic {
            stream,
            expected,
            found,
        });
    }
    Ok(())
}
