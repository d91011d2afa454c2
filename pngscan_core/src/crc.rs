//! CRC-32 (IEEE 802.3, reflected polynomial `0xEDB88320`), the checksum
//! every chunk stores over its type code and data.
//!
//! The 256-entry lookup table is built by a `const fn` at compile time, so
//! there is no first-use initialization and concurrent readers share it
//! freely.

const POLYNOMIAL: u32 = 0xedb8_8320;

/// Seed for the running register; also the final XOR mask.
const SEED: u32 = 0xffff_ffff;

static TABLE: [u32; 256] = make_table();

const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { POLYNOMIAL ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// The shared lookup table.
pub fn table() -> &'static [u32; 256] {
    &TABLE
}

/// Running CRC-32 over any number of byte slices.
///
/// ```
/// use pngscan_core::{crc32, Crc32};
///
/// let mut crc = Crc32::new();
/// crc.update(b"IE");
/// crc.update(b"ND");
/// assert_eq!(crc.finalize(), crc32(b"IEND"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    pub const fn new() -> Self {
        Self { state: SEED }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        let mut c = self.state;
        for &b in bytes {
            let index = ((c ^ u32::from(b)) & 0xff) as usize;
            c = TABLE[index] ^ (c >> 8);
        }
        self.state = c;
    }

    pub fn finalize(&self) -> u32 {
        self.state ^ SEED
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot CRC-32 of `bytes`.
pub fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(bytes);
    crc.finalize()
}
