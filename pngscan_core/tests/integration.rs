/// Integration tests: build complete containers with `Writer` around real
/// zlib data from flate2, then decode them back.
///
/// The compressed stream handed out by the decoder must inflate to exactly
/// the scanlines that went in, and each structural defect must surface as
/// its own error.
use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use pngscan_core::{
    decode, ChunkKind, ChunkType, ColorType, DecodeOptions, Decoder, Error, ErrorKind,
    HeaderMetadata, KnownAncillary, Writer,
};

// ── helpers ───────────────────────────────────────────────────────────────

/// Filtered scanlines for `header`: filter type 0 then deterministic bytes.
fn scanlines(header: &HeaderMetadata, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    let row = header.scanline_len() as usize;
    let mut out = Vec::with_capacity(row * header.height as usize);
    for _ in 0..header.height {
        out.push(0);
        for _ in 1..row {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            out.push((rng >> 56) as u8);
        }
    }
    out
}

fn deflate(raw: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(raw).unwrap();
    enc.finish().unwrap()
}

fn inflate(compressed: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    ZlibDecoder::new(compressed).read_to_end(&mut out).unwrap();
    out
}

/// A valid 16x8 RGB container with metadata around a split IDAT run.
fn rgb_container() -> (HeaderMetadata, Vec<u8>, Vec<u8>) {
    let header = HeaderMetadata::new(16, 8, 8, ColorType::Rgb);
    let raw = scanlines(&header, 7);

    let mut w = Writer::new(Vec::new()).unwrap();
    w.write_header(&header).unwrap();
    w.write_chunk(ChunkType(*b"gAMA"), &45455u32.to_be_bytes()).unwrap();
    w.write_chunk(ChunkType(*b"tEXt"), b"Comment\0generated").unwrap();
    w.write_image_data(&deflate(&raw), 64).unwrap();
    w.write_chunk(ChunkType(*b"tIME"), &[0x07, 0xea, 10, 17, 12, 0, 0]).unwrap();
    let bytes = w.finish().unwrap();

    (header, raw, bytes)
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("pngscan_test_{}.png", name))
}

// ── tests ──────────────────────────────────────────────────────────────────

#[test]
fn test_rgb_round_trip_through_deflate() {
    let (header, raw, bytes) = rgb_container();
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();

    assert_eq!(decoded.header, header);
    assert!(decoded.palette.is_none());
    assert!(decoded.is_intact());
    assert!(decoded.stream.segment_count() > 1, "stream should be split");
    assert_eq!(decoded.stream.first_index(), Some(3));

    let inflated = inflate(&decoded.compressed_data());
    assert_eq!(inflated, raw);
    assert_eq!(Some(inflated.len() as u64), header.raw_stream_len());
}

#[test]
fn test_ancillary_chunks_are_classified() {
    let (_, _, bytes) = rgb_container();
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();

    let kinds: Vec<_> = decoded.ancillary_chunks().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        [
            ChunkKind::Ancillary(KnownAncillary::Gamma),
            ChunkKind::Ancillary(KnownAncillary::Text),
            ChunkKind::Ancillary(KnownAncillary::ModificationTime),
        ]
    );
    assert_eq!(decoded.chunks.last().map(|c| c.chunk_type), Some(ChunkType::IEND));
}

#[test]
fn test_decode_from_file() {
    let (header, raw, bytes) = rgb_container();
    let path = temp_path("from_file");
    std::fs::write(&path, &bytes).unwrap();

    let loaded = std::fs::read(&path).unwrap();
    let decoded = Decoder::default().decode(&loaded).unwrap();
    assert_eq!(decoded.header, header);
    assert_eq!(inflate(&decoded.compressed_data()), raw);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_indexed_image_with_palette() {
    let header = HeaderMetadata::new(8, 4, 4, ColorType::Indexed);
    let raw = scanlines(&header, 3);
    let palette: Vec<u8> = (0..16u8).flat_map(|i| [i * 16, 255 - i * 16, i]).collect();

    let mut w = Writer::new(Vec::new()).unwrap();
    w.write_header(&header).unwrap();
    w.write_palette(&palette).unwrap();
    w.write_image_data(&deflate(&raw), 0).unwrap();
    let bytes = w.finish().unwrap();

    let decoded = decode(&bytes, &DecodeOptions::strict()).unwrap();
    let plte = decoded.palette.unwrap();
    assert_eq!(plte.index(), 1);
    assert_eq!(plte.entry_count(), 16);
    assert_eq!(plte.get(15), Some([240, 15, 15]));
    assert_eq!(inflate(&decoded.compressed_data()), raw);
}

#[test]
fn test_palette_over_bit_depth_bound() {
    // 4-bit indices address 16 entries; 17 do not fit.
    let header = HeaderMetadata::new(8, 4, 4, ColorType::Indexed);
    let mut w = Writer::new(Vec::new()).unwrap();
    w.write_header(&header).unwrap();
    w.write_palette(&[0; 51]).unwrap();
    w.write_image_data(&deflate(&scanlines(&header, 1)), 0).unwrap();
    let bytes = w.finish().unwrap();

    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::PaletteTooLarge { len: 51, max: 48 }), "{err}");
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn test_bad_signature() {
    let (_, _, mut bytes) = rgb_container();
    bytes[0] = 0x88;
    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::BadSignature { offset: 0, expected: 0x89, .. }));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_missing_iend() {
    let header = HeaderMetadata::new(4, 4, 8, ColorType::Grayscale);
    let mut w = Writer::new(Vec::new()).unwrap();
    w.write_header(&header).unwrap();
    w.write_image_data(&deflate(&scanlines(&header, 9)), 0).unwrap();
    let bytes = w.into_inner();

    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MissingTerminal { last: Some(ChunkType::IDAT) }));
}

#[test]
fn test_image_data_after_iend_is_not_dropped() {
    let header = HeaderMetadata::new(4, 4, 8, ColorType::Grayscale);
    let mut w = Writer::new(Vec::new()).unwrap();
    w.write_header(&header).unwrap();
    w.write_chunk(ChunkType::IDAT, b"first").unwrap();
    w.write_chunk(ChunkType::IEND, b"").unwrap();
    w.write_chunk(ChunkType::IDAT, b"second").unwrap();
    w.write_header(&header).unwrap();
    let bytes = w.finish().unwrap();

    for options in [DecodeOptions::default(), DecodeOptions::strict()] {
        let err = decode(&bytes, &options).unwrap_err();
        assert!(
            matches!(err, Error::ChunkAfterTerminal { index: 3, chunk_type: ChunkType::IDAT }),
            "{err}"
        );
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}

#[test]
fn test_second_header_is_rejected() {
    let header = HeaderMetadata::new(4, 4, 8, ColorType::Grayscale);
    let mut w = Writer::new(Vec::new()).unwrap();
    w.write_header(&header).unwrap();
    w.write_image_data(&deflate(&scanlines(&header, 2)), 0).unwrap();
    w.write_header(&HeaderMetadata::new(8, 8, 8, ColorType::Rgb)).unwrap();
    let bytes = w.finish().unwrap();

    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MisplacedHeader { index: 2 }), "{err}");
}

#[test]
fn test_idat_run_split_by_critical_chunk() {
    let header = HeaderMetadata::new(4, 4, 8, ColorType::Grayscale);
    let compressed = deflate(&scanlines(&header, 5));
    let (a, b) = compressed.split_at(compressed.len() / 2);

    let mut w = Writer::new(Vec::new()).unwrap();
    w.write_header(&header).unwrap();
    w.write_chunk(ChunkType::IDAT, a).unwrap();
    w.write_chunk(ChunkType(*b"ZZZZ"), b"").unwrap();
    w.write_chunk(ChunkType::IDAT, b).unwrap();
    let bytes = w.finish().unwrap();

    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::InterruptedStream { index: 2, chunk_type: ChunkType([b'Z', b'Z', b'Z', b'Z']) }
    ));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_idat_run_split_by_ancillary_chunk() {
    let header = HeaderMetadata::new(4, 4, 8, ColorType::Grayscale);
    let mut w = Writer::new(Vec::new()).unwrap();
    w.write_header(&header).unwrap();
    w.write_chunk(ChunkType::IDAT, b"ab").unwrap();
    w.write_chunk(ChunkType(*b"tEXt"), b"k\0v").unwrap();
    w.write_chunk(ChunkType(*b"zTXt"), b"k\0\0x").unwrap();
    w.write_chunk(ChunkType::IDAT, b"cd").unwrap();
    let bytes = w.finish().unwrap();

    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InterruptedStream { index: 2, .. }), "{err}");
}

#[test]
fn test_corrupted_crc_reported_then_rejected() {
    let (_, _, mut bytes) = rgb_container();
    let idat_data = {
        let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
        let idat = decoded.chunks[3];
        assert_eq!(idat.chunk_type, ChunkType::IDAT);
        idat.offset + 8
    };
    bytes[idat_data] ^= 0x40;

    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap();
    assert!(!decoded.is_intact());
    let corrupted: Vec<_> = decoded.corrupted_chunks().map(|(i, _)| i).collect();
    assert_eq!(corrupted, [3]);

    let err = decode(&bytes, &DecodeOptions::strict()).unwrap_err();
    assert!(matches!(
        err,
        Error::CorruptedChunk { index: 3, chunk_type: ChunkType::IDAT, .. }
    ));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_every_truncation_fails_cleanly() {
    let (_, _, bytes) = rgb_container();
    for cut in 0..bytes.len() {
        let result = decode(&bytes[..cut], &DecodeOptions::default());
        assert!(result.is_err(), "prefix of {cut} bytes decoded");
    }

    let err = decode(&bytes[..bytes.len() - 1], &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::TruncatedChunk { needed: 12, available: 11, .. }));
}

#[test]
fn test_illegal_header_combination() {
    let mut header = HeaderMetadata::new(4, 4, 8, ColorType::Rgb);
    header.bit_depth = 4;

    let mut w = Writer::new(Vec::new()).unwrap();
    w.write_header(&header).unwrap();
    w.write_image_data(b"not inspected", 0).unwrap();
    let bytes = w.finish().unwrap();

    let err = decode(&bytes, &DecodeOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::IllegalBitDepth { color_type: ColorType::Rgb, bit_depth: 4 }
    ));
    assert_eq!(err.kind(), ErrorKind::Type);
}

#[test]
fn test_chunk_length_limit_from_options() {
    let (_, _, bytes) = rgb_container();
    let options = DecodeOptions::default().with_max_chunk_len(16);
    let err = decode(&bytes, &options).unwrap_err();
    // The 17-byte tEXt chunk is the first to exceed the limit.
    assert!(matches!(err, Error::ChunkTooLong { index: 2, length: 17, max: 16, .. }), "{err}");
}
