//! Property-based tests for the byte codec.
//!
//! - Every in-range value survives int -> bytes -> int in both byte orders
//! - The narrowest-width encoder always produces something that decodes back
//! - Classification agrees with plain range comparisons

use pngscan_codec::{
    bytes_to_int, bytes_to_u16, bytes_to_u32, int_to_bytes, num_to_bytes, number_type, Endian,
    NumberType, RangeCheck,
};
use proptest::prelude::*;

fn number_type_strategy() -> impl Strategy<Value = NumberType> {
    prop::sample::select(NumberType::ALL.to_vec())
}

fn endian_strategy() -> impl Strategy<Value = Endian> {
    prop_oneof![Just(Endian::Big), Just(Endian::Little)]
}

// A type together with a value inside its range.
fn typed_value_strategy() -> impl Strategy<Value = (NumberType, i64)> {
    number_type_strategy().prop_flat_map(|ty| (Just(ty), ty.min()..=ty.max()))
}

#[test]
fn prop_round_trip_every_width() {
    proptest!(|((ty, n) in typed_value_strategy(), endian in endian_strategy())| {
        let bytes = int_to_bytes(n as f64, ty, endian, RangeCheck::Enforce).unwrap();
        prop_assert_eq!(bytes.len(), ty.byte_len());
        prop_assert_eq!(bytes_to_int(&bytes, ty, endian).unwrap(), n);
    });
}

#[test]
fn prop_num_to_bytes_decodes_back() {
    proptest!(|(n in i32::MIN..=i32::MAX, endian in endian_strategy())| {
        let ty = number_type(n).unwrap();
        let bytes = num_to_bytes(n, endian).unwrap();
        prop_assert_eq!(bytes.len(), ty.byte_len());
        prop_assert_eq!(bytes_to_int(&bytes, ty, endian).unwrap(), i64::from(n));
    });
}

#[test]
fn prop_classification_matches_range_comparison() {
    proptest!(|(ty in number_type_strategy(), n in -5_000_000_000i64..5_000_000_000i64)| {
        let expected = ty.min() <= n && n <= ty.max();
        prop_assert_eq!(ty.contains(n as f64), expected);
    });
}

#[test]
fn prop_endianness_mirrors_byte_order() {
    proptest!(|(a in any::<u8>(), b in any::<u8>(), c in any::<u8>(), d in any::<u8>())| {
        prop_assert_eq!(
            bytes_to_u16(a, b, Endian::Big).unwrap(),
            bytes_to_u16(b, a, Endian::Little).unwrap()
        );
        prop_assert_eq!(
            bytes_to_u32(a, b, c, d, Endian::Big).unwrap(),
            u32::from_be_bytes([a, b, c, d])
        );
        prop_assert_eq!(
            bytes_to_u32(a, b, c, d, Endian::Little).unwrap(),
            u32::from_le_bytes([a, b, c, d])
        );
    });
}
