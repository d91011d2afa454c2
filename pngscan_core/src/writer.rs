use std::io::Write;

use pngscan_codec::{u32_to_bytes, Endian, RangeCheck};
use tracing::trace;

use crate::chunk::ChunkType;
use crate::crc::Crc32;
use crate::error::{Error, Result};
use crate::extract::validate_palette_len;
use crate::format::{HeaderMetadata, CHUNK_ENVELOPE, MAX_CHUNK_LEN, SIGNATURE};

/// Serializes a container chunk by chunk.
///
/// The signature goes out on construction; [`Writer::finish`] appends IEND.
/// No ordering rules are enforced here, so a writer can also produce the
/// malformed inputs a decoder must reject.
///
/// ```
/// use pngscan_core::{decode, ColorType, DecodeOptions, HeaderMetadata, Writer};
///
/// let mut w = Writer::new(Vec::new())?;
/// w.write_header(&HeaderMetadata::new(1, 1, 8, ColorType::Grayscale))?;
/// w.write_image_data(&[0x78, 0x9c, 0x63, 0x60, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01], 0)?;
/// let bytes = w.finish()?;
///
/// let decoded = decode(&bytes, &DecodeOptions::default())?;
/// assert_eq!(decoded.chunks.len(), 3);
/// # Ok::<(), pngscan_core::Error>(())
/// ```
#[derive(Debug)]
pub struct Writer<W: Write> {
    inner: W,
    index: usize,
    offset: usize,
}

impl<W: Write> Writer<W> {
    pub fn new(mut inner: W) -> Result<Self> {
        inner.write_all(&SIGNATURE)?;
        Ok(Self {
            inner,
            index: 0,
            offset: SIGNATURE.len(),
        })
    }

    /// Number of chunks written so far.
    pub fn chunk_count(&self) -> usize {
        self.index
    }

    /// Bytes written so far, signature included.
    pub fn bytes_written(&self) -> usize {
        self.offset
    }

    /// Write one chunk: length, type, data, then the CRC of type and data.
    pub fn write_chunk(&mut self, chunk_type: ChunkType, data: &[u8]) -> Result<()> {
        let length = u32::try_from(data.len())
            .ok()
            .filter(|&len| len <= MAX_CHUNK_LEN)
            .ok_or_else(|| Error::ChunkTooLong {
                index: self.index,
                offset: self.offset,
                length: data.len() as u64,
                max: MAX_CHUNK_LEN,
            })?;

        let mut crc = Crc32::new();
        crc.update(chunk_type.as_bytes());
        crc.update(data);

        self.inner.write_all(&u32_to_bytes(length, RangeCheck::Enforce, Endian::Big)?)?;
        self.inner.write_all(chunk_type.as_bytes())?;
        self.inner.write_all(data)?;
        self.inner.write_all(&u32_to_bytes(crc.finalize(), RangeCheck::Enforce, Endian::Big)?)?;

        trace!(index = self.index, chunk_type = %chunk_type, length, "wrote chunk");
        self.index += 1;
        self.offset += CHUNK_ENVELOPE + data.len();
        Ok(())
    }

    pub fn write_header(&mut self, header: &HeaderMetadata) -> Result<()> {
        self.write_chunk(ChunkType::IHDR, &header.to_bytes())
    }

    /// Write a PLTE chunk. The payload must hold whole RGB triplets.
    pub fn write_palette(&mut self, rgb: &[u8]) -> Result<()> {
        validate_palette_len(rgb.len())?;
        self.write_chunk(ChunkType::PLTE, rgb)
    }

    /// Write `data` as consecutive IDAT chunks of at most `segment_len`
    /// bytes each. A `segment_len` of zero writes a single chunk.
    pub fn write_image_data(&mut self, data: &[u8], segment_len: usize) -> Result<()> {
        if segment_len == 0 || data.is_empty() {
            return self.write_chunk(ChunkType::IDAT, data);
        }
        for segment in data.chunks(segment_len) {
            self.write_chunk(ChunkType::IDAT, segment)?;
        }
        Ok(())
    }

    /// Append IEND, flush, and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.write_chunk(ChunkType::IEND, &[])?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    /// Hand back the sink without writing IEND.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
