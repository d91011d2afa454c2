use std::fmt;

use pngscan_codec::{read_u32, Endian};

use crate::error::{Error, Result};

/// Every container starts with these 8 bytes.
///
/// The high first byte catches 7-bit transports, `PNG` names the format, and
/// the CR-LF / SUB / LF tail detects newline conversion.
pub const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

/// Bytes of framing around each chunk's data:
///   length:u32 + type[4] + crc:u32 = 12
pub const CHUNK_ENVELOPE: usize = 12;

/// Largest data length a chunk may declare.
pub const MAX_CHUNK_LEN: u32 = (1 << 31) - 1;

/// Fixed size of the IHDR payload.
///   width:u32 + height:u32 + bit_depth + color_type + compression
///   + filter + interlace = 4 + 4 + 1 + 1 + 1 + 1 + 1 = 13
pub const HEADER_DATA_LEN: usize = 13;

/// A palette never holds more than 256 entries, whatever the bit depth.
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// The only defined compression method (zlib/deflate).
pub const COMPRESSION_DEFLATE: u8 = 0;

/// The only defined filter method (adaptive, five filter types).
pub const FILTER_ADAPTIVE: u8 = 0;

// ── Color types ────────────────────────────────────────────────────────────

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorType {
    Grayscale = 0,
    Rgb = 2,
    Indexed = 3,
    GrayscaleAlpha = 4,
    Rgba = 6,
}

impl ColorType {
    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(ColorType::Grayscale),
            2 => Some(ColorType::Rgb),
            3 => Some(ColorType::Indexed),
            4 => Some(ColorType::GrayscaleAlpha),
            6 => Some(ColorType::Rgba),
            _ => None,
        }
    }

    /// Bit depths the format allows for this color type.
    pub const fn legal_bit_depths(self) -> &'static [u8] {
        match self {
            ColorType::Grayscale => &[1, 2, 4, 8, 16],
            ColorType::Rgb => &[8, 16],
            ColorType::Indexed => &[1, 2, 4, 8],
            ColorType::GrayscaleAlpha => &[8, 16],
            ColorType::Rgba => &[8, 16],
        }
    }

    pub fn allows_bit_depth(self, bit_depth: u8) -> bool {
        self.legal_bit_depths().contains(&bit_depth)
    }

    /// Samples per pixel.
    pub const fn channel_count(self) -> u8 {
        match self {
            ColorType::Grayscale | ColorType::Indexed => 1,
            ColorType::GrayscaleAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
        }
    }

    pub const fn requires_palette(self) -> bool {
        matches!(self, ColorType::Indexed)
    }

    /// Indexed images need a palette; truecolor images may carry one as a
    /// quantization hint; grayscale images must not.
    pub const fn permits_palette(self) -> bool {
        matches!(self, ColorType::Indexed | ColorType::Rgb | ColorType::Rgba)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ColorType::Grayscale => "grayscale",
            ColorType::Rgb => "rgb",
            ColorType::Indexed => "indexed",
            ColorType::GrayscaleAlpha => "grayscale+alpha",
            ColorType::Rgba => "rgb+alpha",
        }
    }
}

impl fmt::Display for ColorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), *self as u8)
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interlace {
    None = 0,
    Adam7 = 1,
}

impl Interlace {
    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Interlace::None),
            1 => Some(Interlace::Adam7),
            _ => None,
        }
    }
}

// ── Header ─────────────────────────────────────────────────────────────────

/// Decoded representation of the 13-byte IHDR payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMetadata {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub compression_method: u8,
    pub filter_method: u8,
    pub interlace: Interlace,
}

impl HeaderMetadata {
    /// A non-interlaced header with the defined compression and filter methods.
    pub fn new(width: u32, height: u32, bit_depth: u8, color_type: ColorType) -> Self {
        Self {
            width,
            height,
            bit_depth,
            color_type,
            compression_method: COMPRESSION_DEFLATE,
            filter_method: FILTER_ADAPTIVE,
            interlace: Interlace::None,
        }
    }

    /// Serialize to exactly `HEADER_DATA_LEN` bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_DATA_LEN] {
        let mut buf = [0u8; HEADER_DATA_LEN];
        buf[0..4].copy_from_slice(&self.width.to_be_bytes());
        buf[4..8].copy_from_slice(&self.height.to_be_bytes());
        buf[8] = self.bit_depth;
        buf[9] = self.color_type as u8;
        buf[10] = self.compression_method;
        buf[11] = self.filter_method;
        buf[12] = self.interlace as u8;
        buf
    }

    /// Parse and validate an IHDR payload.
    ///
    /// Checks run in field order: dimensions, then color type and bit depth
    /// (shape first, then the legality table), then compression, filter and
    /// interlace methods.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != HEADER_DATA_LEN {
            return Err(Error::BadHeaderLength(data.len()));
        }

        let width = read_u32(data, 0, Endian::Big)?;
        let height = read_u32(data, 4, Endian::Big)?;
        if width == 0 || height == 0 {
            return Err(Error::ZeroDimension { width, height });
        }

        let bit_depth = data[8];
        let color_type = ColorType::from_u8(data[9]).ok_or(Error::InvalidColorType(data[9]))?;
        let well_formed_depth =
            (1..=16).contains(&bit_depth) && (bit_depth == 1 || bit_depth == 2 || bit_depth % 4 == 0);
        if !well_formed_depth {
            return Err(Error::InvalidBitDepth(bit_depth));
        }
        if !color_type.allows_bit_depth(bit_depth) {
            return Err(Error::IllegalBitDepth {
                color_type,
                bit_depth,
            });
        }

        let compression_method = data[10];
        if compression_method != COMPRESSION_DEFLATE {
            return Err(Error::InvalidCompressionMethod(compression_method));
        }
        let filter_method = data[11];
        if filter_method != FILTER_ADAPTIVE {
            return Err(Error::InvalidFilterMethod(filter_method));
        }
        let interlace = Interlace::from_u8(data[12]).ok_or(Error::InvalidInterlaceMethod(data[12]))?;

        Ok(Self {
            width,
            height,
            bit_depth,
            color_type,
            compression_method,
            filter_method,
            interlace,
        })
    }

    pub fn bits_per_pixel(&self) -> u32 {
        u32::from(self.color_type.channel_count()) * u32::from(self.bit_depth)
    }

    /// Bytes in one filtered scanline of the full image: the filter-type
    /// byte followed by `width` pixels rounded up to a whole byte.
    pub fn scanline_len(&self) -> u64 {
        1 + (u64::from(self.width) * u64::from(self.bits_per_pixel())).div_ceil(8)
    }

    /// Size of the decompressed stream for a non-interlaced image. Adam7
    /// images lay out seven reduced passes instead and return `None`.
    pub fn raw_stream_len(&self) -> Option<u64> {
        match self.interlace {
            Interlace::None => Some(self.scanline_len() * u64::from(self.height)),
            Interlace::Adam7 => None,
        }
    }
}
