//! Structural extraction from a decoded chunk sequence: the IHDR header,
//! the optional PLTE palette, and the IDAT compressed stream.

use std::io::{self, Write};

use crate::chunk::{Chunk, ChunkType};
use crate::error::{Error, Result};
use crate::format::{HeaderMetadata, MAX_PALETTE_ENTRIES};

/// Parse the first chunk as the image header.
pub fn extract_header(chunks: &[Chunk<'_>]) -> Result<HeaderMetadata> {
    match chunks.first() {
        Some(chunk) if chunk.chunk_type == ChunkType::IHDR => HeaderMetadata::from_bytes(chunk.data),
        other => Err(Error::MissingHeader {
            found: other.map(|c| c.chunk_type),
        }),
    }
}

// ── Palette ────────────────────────────────────────────────────────────────

/// Raw PLTE payload: consecutive RGB triplets.
///
/// Only meaningful alongside the header it was checked against; the entry
/// bound depends on that header's bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette<'a> {
    index: usize,
    bytes: &'a [u8],
}

impl<'a> Palette<'a> {
    /// Position of the PLTE chunk in the chunk sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.bytes.len() / 3
    }

    /// RGB entries in palette order. A trailing partial entry is ignored.
    pub fn entries(&self) -> impl Iterator<Item = [u8; 3]> + 'a {
        self.bytes.chunks_exact(3).map(|e| [e[0], e[1], e[2]])
    }

    pub fn get(&self, i: usize) -> Option<[u8; 3]> {
        self.entries().nth(i)
    }
}

/// Most palette entries a header's bit depth can address: `2^bit_depth`,
/// capped at 256.
pub fn palette_capacity(header: &HeaderMetadata) -> usize {
    1usize
        .checked_shl(u32::from(header.bit_depth))
        .map_or(MAX_PALETTE_ENTRIES, |n| n.min(MAX_PALETTE_ENTRIES))
}

/// Locate the first PLTE chunk after the header and bound its length by
/// [`palette_capacity`].
///
/// Whether a palette is *required* is left to the caller; see
/// [`Decoder`](crate::Decoder) for the full container rules.
pub fn extract_palette<'a>(
    chunks: &[Chunk<'a>],
    header: &HeaderMetadata,
) -> Result<Option<Palette<'a>>> {
    let Some((index, chunk)) = chunks
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, c)| c.chunk_type == ChunkType::PLTE)
    else {
        return Ok(None);
    };

    let max = palette_capacity(header) * 3;
    if chunk.data.len() > max {
        return Err(Error::PaletteTooLarge {
            len: chunk.data.len(),
            max,
        });
    }

    Ok(Some(Palette {
        index,
        bytes: chunk.data,
    }))
}

/// A palette holds at least one entry and only whole RGB triplets.
pub fn validate_palette_len(len: usize) -> Result<()> {
    if len == 0 {
        return Err(Error::EmptyPalette);
    }
    if len % 3 != 0 {
        return Err(Error::MisalignedPalette(len));
    }
    Ok(())
}

// ── Compressed stream ──────────────────────────────────────────────────────

/// The IDAT payloads in stream order. Concatenated, they form one zlib
/// stream for the downstream decompressor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressedStream<'a> {
    segments: Vec<&'a [u8]>,
    first_index: Option<usize>,
}

impl<'a> CompressedStream<'a> {
    pub fn segments(&self) -> &[&'a [u8]] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Position of the first IDAT chunk in the chunk sequence.
    pub fn first_index(&self) -> Option<usize> {
        self.first_index
    }

    /// Total payload bytes across all segments.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    /// No IDAT chunk was found. A run of empty IDAT chunks is not empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn concat(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for segment in &self.segments {
            out.extend_from_slice(segment);
        }
        out
    }

    pub fn write_to<W: Write>(&self, mut dst: W) -> io::Result<()> {
        for segment in &self.segments {
            dst.write_all(segment)?;
        }
        Ok(())
    }
}

/// Collect every IDAT payload after the header, stopping at IEND.
///
/// The IDAT chunks must form one consecutive run: a chunk of any other type
/// between two IDAT chunks fails with [`Error::InterruptedStream`] naming
/// the first interrupting chunk.
pub fn aggregate_compressed<'a>(chunks: &[Chunk<'a>]) -> Result<CompressedStream<'a>> {
    let mut stream = CompressedStream::default();
    let mut interruption: Option<(usize, ChunkType)> = None;

    for (index, chunk) in chunks.iter().enumerate().skip(1) {
        match chunk.chunk_type {
            ChunkType::IDAT => {
                if let Some((index, chunk_type)) = interruption {
                    return Err(Error::InterruptedStream { index, chunk_type });
                }
                stream.first_index.get_or_insert(index);
                stream.segments.push(chunk.data);
            }
            ChunkType::IEND => break,
            other => {
                if !stream.is_empty() && interruption.is_none() {
                    interruption = Some((index, other));
                }
            }
        }
    }

    Ok(stream)
}
