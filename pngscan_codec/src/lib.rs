pub mod classify;
pub mod convert;
pub mod error;
pub mod number;

pub use classify::{
    is_signed_byte, is_signed_int, is_signed_short, is_signed_24bit, is_unsigned_byte,
    is_unsigned_int, is_unsigned_short, is_unsigned_24bit, number_type,
};
pub use convert::{
    bytes_to_i16, bytes_to_i24, bytes_to_i32, bytes_to_int, bytes_to_u16, bytes_to_u24,
    bytes_to_u32, i16_to_bytes, i24_to_bytes, i32_to_bytes, i8_to_bytes, int_to_bytes,
    num_to_bytes, read_u16, read_u32, u16_to_bytes, u24_to_bytes, u32_to_bytes, u8_to_bytes,
};
pub use error::{Error, ErrorKind, Result};
pub use number::{Endian, Number, NumberType, RangeCheck};
