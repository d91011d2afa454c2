use pngscan_codec::{read_u32, Endian};
use tracing::{debug, warn};

use crate::chunk::{Chunk, ChunkKind, ChunkType};
use crate::crc::Crc32;
use crate::error::{Error, Result};
use crate::extract::{
    aggregate_compressed, extract_header, extract_palette, validate_palette_len,
    CompressedStream, Palette,
};
use crate::format::{HeaderMetadata, CHUNK_ENVELOPE, SIGNATURE};
use crate::options::{ChecksumPolicy, DecodeOptions};

/// Check that `bytes` opens with the 8-byte [`SIGNATURE`].
///
/// Fails on the first differing offset; a buffer shorter than the signature
/// fails at its end.
pub fn validate_signature(bytes: &[u8]) -> Result<()> {
    for (offset, &expected) in SIGNATURE.iter().enumerate() {
        let found = bytes.get(offset).copied();
        if found != Some(expected) {
            return Err(Error::BadSignature {
                offset,
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// Iterator over the chunks that follow the signature.
///
/// Each chunk is `[length:u32][type:4][data:length][crc:u32]`, big-endian.
/// The CRC covers type and data but not the length field. Iteration stops
/// after the first error.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    bytes: &'a [u8],
    offset: usize,
    index: usize,
    max_chunk_len: u32,
    failed: bool,
}

impl<'a> ChunkIter<'a> {
    /// Start walking right after the signature. The signature itself is not
    /// re-checked; call [`validate_signature`] first.
    pub fn new(bytes: &'a [u8], options: &DecodeOptions) -> Self {
        Self {
            bytes,
            offset: SIGNATURE.len(),
            index: 0,
            max_chunk_len: options.max_chunk_len,
            failed: false,
        }
    }

    fn read_chunk(&self) -> Result<Chunk<'a>> {
        let offset = self.offset;
        let available = self.bytes.len() - offset;
        if available < CHUNK_ENVELOPE {
            return Err(Error::TruncatedChunk {
                index: self.index,
                offset,
                needed: CHUNK_ENVELOPE,
                available,
            });
        }

        let length = read_u32(self.bytes, offset, Endian::Big)?;
        if length > self.max_chunk_len {
            return Err(Error::ChunkTooLong {
                index: self.index,
                offset,
                length: u64::from(length),
                max: self.max_chunk_len,
            });
        }

        let data_len = length as usize;
        let needed = CHUNK_ENVELOPE + data_len;
        if available < needed {
            return Err(Error::TruncatedChunk {
                index: self.index,
                offset,
                needed,
                available,
            });
        }

        let type_start = offset + 4;
        let data_start = type_start + 4;
        let crc_start = data_start + data_len;

        let mut crc = Crc32::new();
        crc.update(&self.bytes[type_start..crc_start]);

        let code = &self.bytes[type_start..data_start];
        Ok(Chunk {
            offset,
            length,
            chunk_type: ChunkType([code[0], code[1], code[2], code[3]]),
            data: &self.bytes[data_start..crc_start],
            stored_crc: read_u32(self.bytes, crc_start, Endian::Big)?,
            computed_crc: crc.finalize(),
        })
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        match self.read_chunk() {
            Ok(chunk) => {
                self.offset = chunk.end_offset();
                self.index += 1;
                Some(Ok(chunk))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

fn log_chunk(index: usize, chunk: &Chunk<'_>) {
    let ty = chunk.chunk_type;
    debug!(index, offset = chunk.offset, chunk_type = %ty, length = chunk.length, "chunk");

    if chunk.is_corrupted() {
        warn!(
            index,
            chunk_type = %ty,
            "CRC mismatch: stored {:08x}, computed {:08x}",
            chunk.stored_crc,
            chunk.computed_crc
        );
    }
    if !ty.is_valid_code() {
        warn!(index, chunk_type = %ty, "type code is not four ASCII letters");
    }
    if !ty.is_reserved_bit_valid() {
        warn!(index, chunk_type = %ty, "reserved bit set in type code");
    }
    if ty.is_critical() && ty.kind() == ChunkKind::Unknown {
        warn!(index, chunk_type = %ty, "unrecognized critical chunk");
    }
}

/// Walk every chunk after the signature and require the last one, and only
/// the last one, to be IEND. IHDR may appear only at index 0.
///
/// Assumes [`validate_signature`] has already passed. Under
/// [`ChecksumPolicy::Report`] corrupted chunks are returned with
/// [`Chunk::is_corrupted`] set; under `Reject` the first one fails the walk.
pub fn decode_chunks<'a>(bytes: &'a [u8], options: &DecodeOptions) -> Result<Vec<Chunk<'a>>> {
    let mut chunks: Vec<Chunk<'a>> = Vec::new();

    for (index, chunk) in ChunkIter::new(bytes, options).enumerate() {
        let chunk = chunk?;
        log_chunk(index, &chunk);

        if chunks.last().is_some_and(|c| c.chunk_type == ChunkType::IEND) {
            return Err(Error::ChunkAfterTerminal {
                index,
                chunk_type: chunk.chunk_type,
            });
        }
        if index > 0 && chunk.chunk_type == ChunkType::IHDR {
            return Err(Error::MisplacedHeader { index });
        }

        if chunk.is_corrupted() && options.checksum_policy == ChecksumPolicy::Reject {
            return Err(Error::CorruptedChunk {
                index,
                chunk_type: chunk.chunk_type,
                stored: chunk.stored_crc,
                computed: chunk.computed_crc,
            });
        }
        chunks.push(chunk);
    }

    let last = chunks.last().map(|c| c.chunk_type);
    if last != Some(ChunkType::IEND) {
        return Err(Error::MissingTerminal { last });
    }
    Ok(chunks)
}

/// Everything one decode pass produces. Borrows from the input buffer.
#[derive(Debug, Clone)]
pub struct DecodedContainer<'a> {
    pub header: HeaderMetadata,
    pub palette: Option<Palette<'a>>,
    pub chunks: Vec<Chunk<'a>>,
    pub stream: CompressedStream<'a>,
}

impl<'a> DecodedContainer<'a> {
    /// Chunks whose stored CRC does not match, with their positions.
    pub fn corrupted_chunks(&self) -> impl Iterator<Item = (usize, &Chunk<'a>)> {
        self.chunks.iter().enumerate().filter(|(_, c)| c.is_corrupted())
    }

    pub fn is_intact(&self) -> bool {
        self.corrupted_chunks().next().is_none()
    }

    pub fn ancillary_chunks(&self) -> impl Iterator<Item = &Chunk<'a>> {
        self.chunks.iter().filter(|c| !c.is_critical())
    }

    /// The assembled zlib stream, ready for a decompressor.
    pub fn compressed_data(&self) -> Vec<u8> {
        self.stream.concat()
    }
}

/// Runs the full structural decode: signature, chunk walk, header, palette
/// and compressed stream, plus the container-level rules that tie them
/// together.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<DecodedContainer<'a>> {
        validate_signature(bytes)?;
        let chunks = decode_chunks(bytes, &self.options)?;
        let header = extract_header(&chunks)?;

        check_palette_placement(&chunks, &header)?;
        let palette = extract_palette(&chunks, &header)?;
        if let Some(palette) = &palette {
            validate_palette_len(palette.len())?;
        }

        let stream = aggregate_compressed(&chunks)?;
        if stream.is_empty() {
            return Err(Error::MissingImageData);
        }

        debug!(
            width = header.width,
            height = header.height,
            bit_depth = header.bit_depth,
            color_type = header.color_type.name(),
            chunks = chunks.len(),
            compressed_bytes = stream.len(),
            "decoded container"
        );

        Ok(DecodedContainer {
            header,
            palette,
            chunks,
            stream,
        })
    }
}

/// Decode `bytes` with `options`. Shorthand for [`Decoder::decode`].
pub fn decode<'a>(bytes: &'a [u8], options: &DecodeOptions) -> Result<DecodedContainer<'a>> {
    Decoder::new(options.clone()).decode(bytes)
}

/// At most one PLTE, before the first IDAT, present exactly when the color
/// type needs one and absent when it forbids one.
fn check_palette_placement(chunks: &[Chunk<'_>], header: &HeaderMetadata) -> Result<()> {
    let mut seen_palette = false;
    let mut seen_image_data = false;

    for (index, chunk) in chunks.iter().enumerate().skip(1) {
        match chunk.chunk_type {
            ChunkType::PLTE => {
                if !header.color_type.permits_palette() {
                    return Err(Error::UnexpectedPalette(header.color_type));
                }
                if seen_palette {
                    return Err(Error::DuplicatePalette { index });
                }
                if seen_image_data {
                    return Err(Error::PaletteAfterImageData { index });
                }
                seen_palette = true;
            }
            ChunkType::IDAT => seen_image_data = true,
            _ => {}
        }
    }

    if header.color_type.requires_palette() && !seen_palette {
        return Err(Error::MissingPalette(header.color_type));
    }
    Ok(())
}
