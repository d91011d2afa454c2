//! Integer <-> byte-sequence conversion in either byte order.
//!
//! Reads take each byte as a separate argument so out-of-range inputs
//! (negative, > 255, `NaN`) are rejected with `Range` before anything is
//! combined. Byte arguments are given in stream order: for big-endian the
//! first is most significant, for little-endian the last is.

use crate::classify::number_type;
use crate::error::{Error, Result};
use crate::number::{Endian, Number, NumberType, RangeCheck};

fn checked_byte(n: impl Into<Number>) -> Result<u8> {
    let n = n.into();
    match n.as_integer() {
        Some(v) if (0..=0xff).contains(&v) => Ok(v as u8),
        _ => Err(Error::ByteOutOfRange(n)),
    }
}

/// OR the bytes together, most significant first.
fn combine(bytes: &[u8], endian: Endian) -> u32 {
    let fold = |acc: u32, b: &u8| (acc << 8) | u32::from(*b);
    match endian {
        Endian::Big => bytes.iter().fold(0, fold),
        Endian::Little => bytes.iter().rev().fold(0, fold),
    }
}

/// Sign-extend the low `width` bits of `raw`.
fn sign_extend(raw: u32, width: u32) -> i32 {
    let shift = 32 - width;
    ((raw as i32) << shift) >> shift
}

/// Split the low `N` bytes of `register` into stream order.
fn split<const N: usize>(register: u32, endian: Endian) -> [u8; N] {
    let mut out = [0u8; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = 8 * (N - 1 - i);
        *slot = ((register >> shift) & 0xff) as u8;
    }
    if endian == Endian::Little {
        out.reverse();
    }
    out
}

fn checked_register(n: Number, ty: NumberType, check: RangeCheck) -> Result<u32> {
    if check == RangeCheck::Enforce && !ty.contains(n) {
        return Err(Error::ValueOutOfRange { value: n, ty });
    }
    Ok(n.register())
}

// ── bytes → integer ────────────────────────────────────────────────────────

pub fn bytes_to_u16(b0: impl Into<Number>, b1: impl Into<Number>, endian: Endian) -> Result<u16> {
    let bytes = [checked_byte(b0)?, checked_byte(b1)?];
    Ok(combine(&bytes, endian) as u16)
}

pub fn bytes_to_u24(
    b0: impl Into<Number>,
    b1: impl Into<Number>,
    b2: impl Into<Number>,
    endian: Endian,
) -> Result<u32> {
    let bytes = [checked_byte(b0)?, checked_byte(b1)?, checked_byte(b2)?];
    Ok(combine(&bytes, endian))
}

pub fn bytes_to_u32(
    b0: impl Into<Number>,
    b1: impl Into<Number>,
    b2: impl Into<Number>,
    b3: impl Into<Number>,
    endian: Endian,
) -> Result<u32> {
    let bytes = [
        checked_byte(b0)?,
        checked_byte(b1)?,
        checked_byte(b2)?,
        checked_byte(b3)?,
    ];
    Ok(combine(&bytes, endian))
}

pub fn bytes_to_i16(b0: impl Into<Number>, b1: impl Into<Number>, endian: Endian) -> Result<i16> {
    Ok(bytes_to_u16(b0, b1, endian)? as i16)
}

pub fn bytes_to_i24(
    b0: impl Into<Number>,
    b1: impl Into<Number>,
    b2: impl Into<Number>,
    endian: Endian,
) -> Result<i32> {
    Ok(sign_extend(bytes_to_u24(b0, b1, b2, endian)?, 24))
}

pub fn bytes_to_i32(
    b0: impl Into<Number>,
    b1: impl Into<Number>,
    b2: impl Into<Number>,
    b3: impl Into<Number>,
    endian: Endian,
) -> Result<i32> {
    Ok(bytes_to_u32(b0, b1, b2, b3, endian)? as i32)
}

/// Interpret `bytes` as a value of category `ty`. The slice length must
/// match the category's width exactly.
pub fn bytes_to_int(bytes: &[u8], ty: NumberType, endian: Endian) -> Result<i64> {
    if bytes.len() != ty.byte_len() {
        return Err(Error::ByteCountMismatch {
            ty,
            expected: ty.byte_len(),
            actual: bytes.len(),
        });
    }
    let raw = combine(bytes, endian);
    Ok(if ty.is_signed() {
        i64::from(sign_extend(raw, ty.width()))
    } else {
        i64::from(raw)
    })
}

fn window(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(Error::OutOfBounds {
            offset,
            len,
            available: bytes.len(),
        })
}

/// Read an unsigned 16-bit value at `offset`.
pub fn read_u16(bytes: &[u8], offset: usize, endian: Endian) -> Result<u16> {
    let w = window(bytes, offset, 2)?;
    bytes_to_u16(w[0], w[1], endian)
}

/// Read an unsigned 32-bit value at `offset`.
pub fn read_u32(bytes: &[u8], offset: usize, endian: Endian) -> Result<u32> {
    let w = window(bytes, offset, 4)?;
    bytes_to_u32(w[0], w[1], w[2], w[3], endian)
}

// ── integer → bytes ────────────────────────────────────────────────────────

pub fn u8_to_bytes(n: impl Into<Number>, check: RangeCheck) -> Result<[u8; 1]> {
    let register = checked_register(n.into(), NumberType::Uint8, check)?;
    Ok(split(register, Endian::Big))
}

pub fn i8_to_bytes(n: impl Into<Number>, check: RangeCheck) -> Result<[u8; 1]> {
    let register = checked_register(n.into(), NumberType::Int8, check)?;
    Ok(split(register, Endian::Big))
}

pub fn u16_to_bytes(n: impl Into<Number>, check: RangeCheck, endian: Endian) -> Result<[u8; 2]> {
    let register = checked_register(n.into(), NumberType::Uint16, check)?;
    Ok(split(register, endian))
}

pub fn i16_to_bytes(n: impl Into<Number>, check: RangeCheck, endian: Endian) -> Result<[u8; 2]> {
    let register = checked_register(n.into(), NumberType::Int16, check)?;
    Ok(split(register, endian))
}

pub fn u24_to_bytes(n: impl Into<Number>, check: RangeCheck, endian: Endian) -> Result<[u8; 3]> {
    let register = checked_register(n.into(), NumberType::Uint24, check)?;
    Ok(split(register, endian))
}

pub fn i24_to_bytes(n: impl Into<Number>, check: RangeCheck, endian: Endian) -> Result<[u8; 3]> {
    let register = checked_register(n.into(), NumberType::Int24, check)?;
    Ok(split(register, endian))
}

pub fn u32_to_bytes(n: impl Into<Number>, check: RangeCheck, endian: Endian) -> Result<[u8; 4]> {
    let register = checked_register(n.into(), NumberType::Uint32, check)?;
    Ok(split(register, endian))
}

pub fn i32_to_bytes(n: impl Into<Number>, check: RangeCheck, endian: Endian) -> Result<[u8; 4]> {
    let register = checked_register(n.into(), NumberType::Int32, check)?;
    Ok(split(register, endian))
}

/// Encode `n` as a value of category `ty`.
pub fn int_to_bytes(
    n: impl Into<Number>,
    ty: NumberType,
    endian: Endian,
    check: RangeCheck,
) -> Result<Vec<u8>> {
    let n = n.into();
    Ok(match ty {
        NumberType::Uint8 => u8_to_bytes(n, check)?.to_vec(),
        NumberType::Int8 => i8_to_bytes(n, check)?.to_vec(),
        NumberType::Uint16 => u16_to_bytes(n, check, endian)?.to_vec(),
        NumberType::Int16 => i16_to_bytes(n, check, endian)?.to_vec(),
        NumberType::Uint24 => u24_to_bytes(n, check, endian)?.to_vec(),
        NumberType::Int24 => i24_to_bytes(n, check, endian)?.to_vec(),
        NumberType::Uint32 => u32_to_bytes(n, check, endian)?.to_vec(),
        NumberType::Int32 => i32_to_bytes(n, check, endian)?.to_vec(),
    })
}

/// Encode `n` in the narrowest category [`number_type`] finds for it.
pub fn num_to_bytes(n: impl Into<Number>, endian: Endian) -> Result<Vec<u8>> {
    let n = n.into();
    let ty = number_type(n)?;
    int_to_bytes(n, ty, endian, RangeCheck::Skip)
}
