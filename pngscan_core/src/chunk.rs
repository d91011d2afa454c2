use std::fmt;

/// Bit 5 of each type-code byte: the ASCII lowercase bit.
const PROPERTY_BIT: u8 = 1 << 5;

/// A four-byte chunk type code.
///
/// Bit 5 of each byte carries one property:
///
/// | byte | clear (uppercase) | set (lowercase) |
/// |------|-------------------|-----------------|
/// | 0    | critical          | ancillary       |
/// | 1    | public            | private         |
/// | 2    | valid             | reserved, must not be set |
/// | 3    | unsafe to copy    | safe to copy    |
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const PLTE: Self = Self(*b"PLTE");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn is_critical(self) -> bool {
        self.0[0] & PROPERTY_BIT == 0
    }

    pub fn is_public(self) -> bool {
        self.0[1] & PROPERTY_BIT == 0
    }

    pub fn is_reserved_bit_valid(self) -> bool {
        self.0[2] & PROPERTY_BIT == 0
    }

    /// Whether an editor that does not recognise this chunk may copy it
    /// into a modified file. Only meaningful for ancillary chunks.
    pub fn is_safe_to_copy(self) -> bool {
        self.0[3] & PROPERTY_BIT != 0
    }

    /// All four bytes are ASCII letters.
    pub fn is_valid_code(self) -> bool {
        self.0.iter().all(u8::is_ascii_alphabetic)
    }

    pub fn kind(self) -> ChunkKind {
        match self {
            ChunkType::IHDR => ChunkKind::Header,
            ChunkType::PLTE => ChunkKind::Palette,
            ChunkType::IDAT => ChunkKind::ImageData,
            ChunkType::IEND => ChunkKind::End,
            other => match KnownAncillary::from_type(other) {
                Some(known) => ChunkKind::Ancillary(known),
                None => ChunkKind::Unknown,
            },
        }
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

/// Role of a chunk within the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    Header,
    Palette,
    ImageData,
    End,
    Ancillary(KnownAncillary),
    /// Any type code this crate does not recognise, critical or not.
    Unknown,
}

impl ChunkKind {
    pub fn is_recognized(self) -> bool {
        !matches!(self, ChunkKind::Unknown)
    }
}

/// Ancillary chunk types defined by the format itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownAncillary {
    Transparency,
    Gamma,
    Chromaticities,
    StandardRgb,
    IccProfile,
    Text,
    CompressedText,
    InternationalText,
    Background,
    PhysicalDimensions,
    SignificantBits,
    SuggestedPalette,
    Histogram,
    ModificationTime,
}

impl KnownAncillary {
    const TABLE: [(&'static [u8; 4], KnownAncillary); 14] = [
        (b"tRNS", KnownAncillary::Transparency),
        (b"gAMA", KnownAncillary::Gamma),
        (b"cHRM", KnownAncillary::Chromaticities),
        (b"sRGB", KnownAncillary::StandardRgb),
        (b"iCCP", KnownAncillary::IccProfile),
        (b"tEXt", KnownAncillary::Text),
        (b"zTXt", KnownAncillary::CompressedText),
        (b"iTXt", KnownAncillary::InternationalText),
        (b"bKGD", KnownAncillary::Background),
        (b"pHYs", KnownAncillary::PhysicalDimensions),
        (b"sBIT", KnownAncillary::SignificantBits),
        (b"sPLT", KnownAncillary::SuggestedPalette),
        (b"hIST", KnownAncillary::Histogram),
        (b"tIME", KnownAncillary::ModificationTime),
    ];

    pub fn from_type(ty: ChunkType) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(code, _)| **code == ty.0)
            .map(|(_, known)| *known)
    }
}

/// One decoded chunk, borrowing its data from the input buffer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Offset of the chunk's length field from the start of the buffer.
    pub offset: usize,
    pub length: u32,
    pub chunk_type: ChunkType,
    pub data: &'a [u8],
    /// CRC as stored after the data.
    pub stored_crc: u32,
    /// CRC computed over `type ++ data`.
    pub computed_crc: u32,
}

impl Chunk<'_> {
    pub fn is_corrupted(&self) -> bool {
        self.stored_crc != self.computed_crc
    }

    pub fn is_critical(&self) -> bool {
        self.chunk_type.is_critical()
    }

    pub fn is_safe_to_copy(&self) -> bool {
        self.chunk_type.is_safe_to_copy()
    }

    pub fn kind(&self) -> ChunkKind {
        self.chunk_type.kind()
    }

    /// Offset one past this chunk's CRC field.
    pub fn end_offset(&self) -> usize {
        self.offset + crate::format::CHUNK_ENVELOPE + self.data.len()
    }
}

impl fmt::Debug for Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("offset", &self.offset)
            .field("type", &self.chunk_type)
            .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
            .field("stored_crc", &format_args!("{:08x}", self.stored_crc))
            .field("computed_crc", &format_args!("{:08x}", self.computed_crc))
            .finish()
    }
}
