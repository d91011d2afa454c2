use std::fmt;

// ── Width limits ───────────────────────────────────────────────────────────

pub const MAX_UINT_8BIT: i64 = 0xff;
pub const MAX_UINT_16BIT: i64 = 0xffff;
pub const MAX_UINT_24BIT: i64 = 0xff_ffff;
pub const MAX_UINT_32BIT: i64 = 0xffff_ffff;
pub const MIN_INT_8BIT: i64 = -0x80;
pub const MIN_INT_16BIT: i64 = -0x8000;
pub const MIN_INT_24BIT: i64 = -0x80_0000;
pub const MIN_INT_32BIT: i64 = -0x8000_0000;
pub const MAX_INT_8BIT: i64 = 0x7f;
pub const MAX_INT_16BIT: i64 = 0x7fff;
pub const MAX_INT_24BIT: i64 = 0x7f_ffff;
pub const MAX_INT_32BIT: i64 = 0x7fff_ffff;

/// A numeric input to the codec.
///
/// Callers hand the codec values of many Rust types; everything up to 32
/// bits (and all floats) becomes `Float`, which can also carry `NaN`,
/// infinities and fractional values that the classifiers must reject.
/// 64-bit and wider integer types become `Wide`, which every width-dispatching
/// operation refuses with [`ErrorKind::Unsupported`](crate::ErrorKind).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Float(f64),
    Wide(i128),
}

impl Number {
    /// The exact integer value, if this is a finite integral `Float`
    /// representable as `i64`. `Wide` values always yield `None`.
    pub fn as_integer(self) -> Option<i64> {
        match self {
            Number::Float(v) => {
                // 2^63 is exactly representable; anything at or beyond it
                // would saturate in the cast below.
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 9_223_372_036_854_775_808.0 {
                    Some(v as i64)
                } else {
                    None
                }
            }
            Number::Wide(_) => None,
        }
    }

    /// The low 32 bits of the value as a two's-complement register, the
    /// way a 32-bit integer unit would see it. Non-finite values become 0.
    pub fn register(self) -> u32 {
        match self {
            Number::Float(v) if v.is_finite() => v.trunc().rem_euclid(4_294_967_296.0) as u32,
            Number::Float(_) => 0,
            Number::Wide(v) => v as u32,
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            Number::Float(v) => v.is_finite(),
            Number::Wide(_) => true,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Float(v) => write!(f, "{}", v),
            Number::Wide(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! number_from_narrow {
    ($($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(v: $t) -> Self {
                Number::Float(f64::from(v))
            }
        })*
    };
}

macro_rules! number_from_wide {
    ($($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(v: $t) -> Self {
                Number::Wide(i128::from(v))
            }
        })*
    };
}

number_from_narrow!(u8, i8, u16, i16, u32, i32, f32, f64);
number_from_wide!(u64, i64, i128);

// ── Byte order ─────────────────────────────────────────────────────────────

/// Byte order for multi-byte conversions. The container format itself is
/// big-endian throughout, hence the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Big,
    Little,
}

/// Whether a `*_to_bytes` conversion validates that the value fits the
/// target width first.
///
/// `Skip` is for values the caller has already classified; the low bits of
/// the value are then emitted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeCheck {
    #[default]
    Enforce,
    Skip,
}

// ── Integer categories ─────────────────────────────────────────────────────

/// Fixed bit-width integer categories, in the order [`number_type`] tries
/// them.
///
/// [`number_type`]: crate::number_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int24,
    Uint24,
    Int32,
    Uint32,
}

impl NumberType {
    pub const ALL: [NumberType; 8] = [
        NumberType::Int8,
        NumberType::Uint8,
        NumberType::Int16,
        NumberType::Uint16,
        NumberType::Int24,
        NumberType::Uint24,
        NumberType::Int32,
        NumberType::Uint32,
    ];

    /// Width in bits: 8, 16, 24 or 32.
    pub const fn width(self) -> u32 {
        match self {
            NumberType::Int8 | NumberType::Uint8 => 8,
            NumberType::Int16 | NumberType::Uint16 => 16,
            NumberType::Int24 | NumberType::Uint24 => 24,
            NumberType::Int32 | NumberType::Uint32 => 32,
        }
    }

    pub const fn byte_len(self) -> usize {
        (self.width() / 8) as usize
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            NumberType::Int8 | NumberType::Int16 | NumberType::Int24 | NumberType::Int32
        )
    }

    pub const fn min(self) -> i64 {
        match self {
            NumberType::Int8 => MIN_INT_8BIT,
            NumberType::Int16 => MIN_INT_16BIT,
            NumberType::Int24 => MIN_INT_24BIT,
            NumberType::Int32 => MIN_INT_32BIT,
            _ => 0,
        }
    }

    pub const fn max(self) -> i64 {
        match self {
            NumberType::Int8 => MAX_INT_8BIT,
            NumberType::Uint8 => MAX_UINT_8BIT,
            NumberType::Int16 => MAX_INT_16BIT,
            NumberType::Uint16 => MAX_UINT_16BIT,
            NumberType::Int24 => MAX_INT_24BIT,
            NumberType::Uint24 => MAX_UINT_24BIT,
            NumberType::Int32 => MAX_INT_32BIT,
            NumberType::Uint32 => MAX_UINT_32BIT,
        }
    }

    /// Whether `n` is a valid value of this category.
    pub fn contains(self, n: impl Into<Number>) -> bool {
        let n = n.into();
        match self {
            NumberType::Int8 => crate::is_signed_byte(n),
            NumberType::Uint8 => crate::is_unsigned_byte(n),
            NumberType::Int16 => crate::is_signed_short(n),
            NumberType::Uint16 => crate::is_unsigned_short(n),
            NumberType::Int24 => crate::is_signed_24bit(n),
            NumberType::Uint24 => crate::is_unsigned_24bit(n),
            NumberType::Int32 => crate::is_signed_int(n),
            NumberType::Uint32 => crate::is_unsigned_int(n),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            NumberType::Int8 => "int8",
            NumberType::Uint8 => "uint8",
            NumberType::Int16 => "int16",
            NumberType::Uint16 => "uint16",
            NumberType::Int24 => "int24",
            NumberType::Uint24 => "uint24",
            NumberType::Int32 => "int32",
            NumberType::Uint32 => "uint32",
        }
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
