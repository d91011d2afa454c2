use thiserror::Error;

use crate::chunk::ChunkType;
use crate::format::ColorType;

pub use pngscan_codec::ErrorKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a decode (or an encode).
///
/// Under the default [`ChecksumPolicy::Report`](crate::ChecksumPolicy) a CRC
/// mismatch is not an error; it is recorded on the chunk instead.
#[derive(Error, Debug)]
pub enum Error {
    // Container structure
    #[error("signature mismatch at offset {offset}: expected {expected:#04x}, found {}", display_byte(.found))]
    BadSignature {
        offset: usize,
        expected: u8,
        found: Option<u8>,
    },

    #[error("chunk {index} at offset {offset} is truncated: needs {needed} bytes, {available} available")]
    TruncatedChunk {
        index: usize,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("chunk {index} at offset {offset} declares {length} data bytes, limit is {max}")]
    ChunkTooLong {
        index: usize,
        offset: usize,
        length: u64,
        max: u32,
    },

    #[error("chunk {index} ({chunk_type}) is corrupted: stored CRC {stored:08x}, computed {computed:08x}")]
    CorruptedChunk {
        index: usize,
        chunk_type: ChunkType,
        stored: u32,
        computed: u32,
    },

    #[error("missing terminal IEND chunk (last chunk: {})", display_type(.last))]
    MissingTerminal { last: Option<ChunkType> },

    #[error("chunk {index} ({chunk_type}) follows the terminal IEND chunk")]
    ChunkAfterTerminal { index: usize, chunk_type: ChunkType },

    #[error("first chunk must be IHDR, found {}", display_type(.found))]
    MissingHeader { found: Option<ChunkType> },

    #[error("IHDR chunk at index {index}; it may only be the first chunk")]
    MisplacedHeader { index: usize },

    #[error("IHDR carries {0} data bytes, expected 13")]
    BadHeaderLength(usize),

    #[error("IDAT run interrupted by chunk {index} ({chunk_type})")]
    InterruptedStream { index: usize, chunk_type: ChunkType },

    #[error("no IDAT chunk present")]
    MissingImageData,

    #[error("color type {0} requires a PLTE chunk")]
    MissingPalette(ColorType),

    #[error("color type {0} must not carry a PLTE chunk")]
    UnexpectedPalette(ColorType),

    #[error("second PLTE chunk at index {index}")]
    DuplicatePalette { index: usize },

    #[error("PLTE chunk at index {index} follows image data")]
    PaletteAfterImageData { index: usize },

    #[error("PLTE length {0} is not a whole number of RGB entries")]
    MisalignedPalette(usize),

    #[error("PLTE chunk is empty")]
    EmptyPalette,

    // Value ranges
    #[error("PLTE holds {len} bytes, at most {max} allowed at this bit depth")]
    PaletteTooLarge { len: usize, max: usize },

    // Header field combinations
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("unrecognized color type {0}")]
    InvalidColorType(u8),

    #[error("invalid bit depth {0}")]
    InvalidBitDepth(u8),

    #[error("bit depth {bit_depth} is not allowed for color type {color_type}")]
    IllegalBitDepth { color_type: ColorType, bit_depth: u8 },

    #[error("unsupported compression method {0}")]
    InvalidCompressionMethod(u8),

    #[error("unsupported filter method {0}")]
    InvalidFilterMethod(u8),

    #[error("invalid interlace method {0}")]
    InvalidInterlaceMethod(u8),

    #[error(transparent)]
    Codec(#[from] pngscan_codec::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_byte(b: &Option<u8>) -> String {
    match b {
        Some(b) => format!("{:#04x}", b),
        None => "end of input".to_string(),
    }
}

fn display_type(t: &Option<ChunkType>) -> String {
    match t {
        Some(t) => t.to_string(),
        None => "none".to_string(),
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PaletteTooLarge { .. } => ErrorKind::Range,
            Error::ZeroDimension { .. }
            | Error::InvalidColorType(_)
            | Error::InvalidBitDepth(_)
            | Error::IllegalBitDepth { .. }
            | Error::InvalidCompressionMethod(_)
            | Error::InvalidFilterMethod(_)
            | Error::InvalidInterlaceMethod(_) => ErrorKind::Type,
            Error::Codec(e) => e.kind(),
            Error::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Format,
        }
    }
}
