pub mod chunk;
pub mod crc;
pub mod error;
pub mod extract;
pub mod format;
pub mod options;
pub mod reader;
pub mod writer;

pub use chunk::{Chunk, ChunkKind, ChunkType, KnownAncillary};
pub use crc::{crc32, Crc32};
pub use error::{Error, ErrorKind, Result};
pub use extract::{
    aggregate_compressed, extract_header, extract_palette, palette_capacity,
    validate_palette_len, CompressedStream, Palette,
};
pub use format::{ColorType, HeaderMetadata, Interlace, SIGNATURE};
pub use options::{ChecksumPolicy, DecodeOptions};
pub use reader::{decode, decode_chunks, validate_signature, ChunkIter, DecodedContainer, Decoder};
pub use writer::Writer;
