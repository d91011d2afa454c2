//! Bit-width classification.
//!
//! A value is a signed `w`-bit integer iff sign-extending its low `w` bits
//! inside a 32-bit register reproduces it: shift left so bit `w - 1` lands
//! in the register's sign bit, then shift back arithmetically. Values whose
//! upper bits disagree with that sign bit come back changed.
//!
//! ```text
//!  -128 << 24 = 0x8000_0000   >> 24 = 0xffff_ff80 = -128   (int8)
//!  -129 << 24 = 0x7f00_0000   >> 24 = 0x0000_007f =  127   (not int8)
//! ```
//!
//! Unsigned membership masks with `2^w - 1` and compares. `NaN`, infinities,
//! fractional values and 64-bit inputs never classify as anything.

use crate::error::{Error, Result};
use crate::number::{Number, NumberType};

fn fits_signed(n: Number, width: u32) -> bool {
    let Some(v) = n.as_integer() else {
        return false;
    };
    let shift = 32 - width;
    let register = v as i32;
    i64::from((register << shift) >> shift) == v
}

fn fits_unsigned(n: Number, width: u32) -> bool {
    let Some(v) = n.as_integer() else {
        return false;
    };
    let mask = (1i64 << width) - 1;
    v & mask == v
}

pub fn is_signed_byte(n: impl Into<Number>) -> bool {
    fits_signed(n.into(), 8)
}

pub fn is_signed_short(n: impl Into<Number>) -> bool {
    fits_signed(n.into(), 16)
}

pub fn is_signed_24bit(n: impl Into<Number>) -> bool {
    fits_signed(n.into(), 24)
}

pub fn is_signed_int(n: impl Into<Number>) -> bool {
    fits_signed(n.into(), 32)
}

pub fn is_unsigned_byte(n: impl Into<Number>) -> bool {
    fits_unsigned(n.into(), 8)
}

pub fn is_unsigned_short(n: impl Into<Number>) -> bool {
    fits_unsigned(n.into(), 16)
}

pub fn is_unsigned_24bit(n: impl Into<Number>) -> bool {
    fits_unsigned(n.into(), 24)
}

pub fn is_unsigned_int(n: impl Into<Number>) -> bool {
    fits_unsigned(n.into(), 32)
}

/// Narrowest category that holds `n`, trying int8, uint8, int16, uint16,
/// int24, uint24, int32, uint32 in that order.
///
/// Fails with `Unsupported` for 64-bit inputs and for integers below the
/// int32 minimum, `Range` above the uint32 maximum, and `Type` for `NaN`,
/// infinities and fractional values.
pub fn number_type(n: impl Into<Number>) -> Result<NumberType> {
    let n = n.into();
    match n {
        Number::Wide(v) => return Err(Error::WideInteger(v)),
        Number::Float(v) if !v.is_finite() => return Err(Error::NotFinite(v)),
        Number::Float(v) if v.fract() != 0.0 => return Err(Error::NotAnInteger(v)),
        Number::Float(v) if v > NumberType::Uint32.max() as f64 => {
            return Err(Error::ExceedsUint32(n))
        }
        Number::Float(_) => {}
    }

    NumberType::ALL
        .into_iter()
        .find(|ty| ty.contains(n))
        .ok_or(Error::NoMatchingWidth(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn signed_byte_boundaries() {
        assert!(is_signed_byte(-128i32));
        assert!(is_signed_byte(127i32));
        assert!(is_signed_byte(0i32));
        assert!(!is_signed_byte(128i32));
        assert!(!is_signed_byte(-129i32));
    }

    #[test]
    fn signed_short_and_24bit_boundaries() {
        assert!(is_signed_short(-32_768i32));
        assert!(is_signed_short(32_767i32));
        assert!(!is_signed_short(32_768i32));
        assert!(!is_signed_short(-32_769i32));

        assert!(is_signed_24bit(-8_388_608i32));
        assert!(is_signed_24bit(8_388_607i32));
        assert!(!is_signed_24bit(8_388_608i32));
        assert!(!is_signed_24bit(-8_388_609i32));
    }

    #[test]
    fn signed_int_boundaries() {
        assert!(is_signed_int(i32::MIN));
        assert!(is_signed_int(i32::MAX));
        assert!(!is_signed_int(2_147_483_648.0f64));
        assert!(!is_signed_int(-2_147_483_649.0f64));
        // wraps to 0 inside a 32-bit register but is not itself 0
        assert!(!is_signed_int(4_294_967_296.0f64));
    }

    #[test]
    fn unsigned_boundaries() {
        assert!(is_unsigned_byte(0u8));
        assert!(is_unsigned_byte(255u8));
        assert!(!is_unsigned_byte(256i32));
        assert!(!is_unsigned_byte(-1i32));

        assert!(is_unsigned_short(65_535i32));
        assert!(!is_unsigned_short(65_536i32));
        assert!(is_unsigned_24bit(16_777_215i32));
        assert!(!is_unsigned_24bit(16_777_216i32));
        assert!(is_unsigned_int(u32::MAX));
        assert!(!is_unsigned_int(4_294_967_296.0f64));
        assert!(!is_unsigned_int(-1i32));
    }

    #[test]
    fn non_finite_and_fractional_values_never_classify() {
        for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.5, -1.25] {
            for ty in NumberType::ALL {
                assert!(!ty.contains(n), "{n} classified as {ty}");
            }
        }
    }

    #[test]
    fn wide_integers_never_classify() {
        for ty in NumberType::ALL {
            assert!(!ty.contains(0i64));
        }
    }

    #[test]
    fn number_type_picks_the_narrowest_category() {
        assert_eq!(number_type(-1i32).unwrap(), NumberType::Int8);
        assert_eq!(number_type(127i32).unwrap(), NumberType::Int8);
        assert_eq!(number_type(200i32).unwrap(), NumberType::Uint8);
        assert_eq!(number_type(-200i32).unwrap(), NumberType::Int16);
        assert_eq!(number_type(40_000i32).unwrap(), NumberType::Uint16);
        assert_eq!(number_type(-40_000i32).unwrap(), NumberType::Int24);
        assert_eq!(number_type(10_000_000i32).unwrap(), NumberType::Uint24);
        assert_eq!(number_type(-10_000_000i32).unwrap(), NumberType::Int32);
        assert_eq!(number_type(i32::MAX).unwrap(), NumberType::Int32);
        assert_eq!(number_type(u32::MAX).unwrap(), NumberType::Uint32);
    }

    #[test]
    fn number_type_failures_carry_their_kind() {
        assert_eq!(number_type(5i64).unwrap_err().kind(), ErrorKind::Unsupported);
        assert_eq!(number_type(f64::NAN).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(number_type(f64::INFINITY).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(number_type(2.5f64).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(number_type(4_294_967_296.0f64).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(number_type(-2_147_483_649.0f64).unwrap_err().kind(), ErrorKind::Unsupported);
    }
}
