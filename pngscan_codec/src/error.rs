use thiserror::Error;

use crate::number::{Number, NumberType};

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification shared by every error in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input is structurally malformed.
    Format,
    /// A value lies outside the range its slot permits.
    Range,
    /// A value of the wrong shape: not an integer, or an illegal field combination.
    Type,
    /// The input is well-formed but uses a capability this crate does not provide.
    Unsupported,
    /// The underlying reader or writer failed.
    Io,
}

/// Errors raised by classification and conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A byte argument is not an integer in `0..=255`.
    #[error("byte argument {0} is outside 0..=255")]
    ByteOutOfRange(Number),

    /// A value does not fit the requested integer category.
    #[error("{value} does not fit in {ty}")]
    ValueOutOfRange { value: Number, ty: NumberType },

    /// A value is larger than the widest supported category.
    #[error("{0} exceeds the 32-bit unsigned range")]
    ExceedsUint32(Number),

    /// A byte slice does not have the length its category needs.
    #[error("{ty} needs {expected} bytes, got {actual}")]
    ByteCountMismatch {
        ty: NumberType,
        expected: usize,
        actual: usize,
    },

    /// A fixed-width read runs past the end of the buffer.
    #[error("reading {len} bytes at offset {offset} overruns a {available}-byte buffer")]
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("{0} is not a finite number")]
    NotFinite(f64),

    #[error("{0} is not an integer")]
    NotAnInteger(f64),

    /// 64-bit (and wider) integer inputs are outside the codec's capability.
    #[error("64-bit integer {0} is not supported")]
    WideInteger(i128),

    /// An integer below the signed 32-bit minimum.
    #[error("{0} does not fit any supported integer width")]
    NoMatchingWidth(Number),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ByteOutOfRange(_)
            | Error::ValueOutOfRange { .. }
            | Error::ExceedsUint32(_)
            | Error::ByteCountMismatch { .. }
            | Error::OutOfBounds { .. } => ErrorKind::Range,
            Error::NotFinite(_) | Error::NotAnInteger(_) => ErrorKind::Type,
            Error::WideInteger(_) | Error::NoMatchingWidth(_) => ErrorKind::Unsupported,
        }
    }
}
