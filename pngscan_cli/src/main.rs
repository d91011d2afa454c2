use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::{info, Level};

use pngscan_codec::{u16_to_bytes, Endian, RangeCheck};
use pngscan_core::{
    crc32, decode, palette_capacity, ChunkType, ColorType, DecodeOptions, DecodedContainer,
    HeaderMetadata, Writer,
};

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "pngscan",
    about = "PNG chunk-stream decoder: inspect, verify, and extract the structural layer of PNG files",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Explicit log level (error, warn, info, debug, trace); overrides -v
    #[arg(long, global = true)]
    log_level: Option<Level>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print header metadata, palette and compressed-stream statistics
    Inspect {
        /// PNG file to inspect
        file: PathBuf,
        /// Print per-chunk details
        #[arg(long)]
        chunks: bool,
    },
    /// Decode a file and fail on any structural error
    Verify {
        /// PNG file to verify
        file: PathBuf,
        /// Also fail on the first chunk whose CRC does not match
        #[arg(long)]
        strict: bool,
    },
    /// Write the concatenated IDAT payload (one zlib stream) to a file
    Extract {
        /// Source PNG file
        file: PathBuf,
        /// Destination file ("-" writes to stdout)
        output: PathBuf,
    },
    /// Compute the CRC-32 of a byte range of a file
    Crc {
        /// Input file
        file: PathBuf,
        /// First byte of the range
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Range length in bytes (default: to end of file)
        #[arg(long)]
        len: Option<usize>,
    },
    /// Write a small valid gradient image
    Synth {
        /// Destination PNG file
        output: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// Color type: gray | gray-alpha | rgb | rgba | indexed
        #[arg(short, long, default_value = "rgb")]
        color_type: String,
        /// Bits per sample (or per palette index)
        #[arg(short, long, default_value_t = 8)]
        bit_depth: u8,
        /// Largest IDAT payload; the zlib stream is split across chunks of this size
        #[arg(long, default_value_t = 8192)]
        segment: usize,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn init_logging(verbose: u8, log_level: Option<Level>) {
    let level = log_level.unwrap_or(match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    });
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn color_type_from_name(name: &str) -> anyhow::Result<ColorType> {
    match name {
        "gray" | "grayscale" | "0" => Ok(ColorType::Grayscale),
        "rgb" | "2" => Ok(ColorType::Rgb),
        "indexed" | "palette" | "3" => Ok(ColorType::Indexed),
        "gray-alpha" | "4" => Ok(ColorType::GrayscaleAlpha),
        "rgba" | "6" => Ok(ColorType::Rgba),
        other => anyhow::bail!(
            "unknown color type '{}'. Valid options: gray, gray-alpha, rgb, rgba, indexed",
            other
        ),
    }
}

fn human_bytes(n: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if n < 1024 {
        return format!("{} B", n);
    }
    let mut v = n as f64 / 1024.0;
    let mut unit = UNITS[0];
    for &next in &UNITS[1..] {
        if v < 1024.0 {
            break;
        }
        v /= 1024.0;
        unit = next;
    }
    format!("{:.2} {}", v, unit)
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {:?}", path))
}

fn decode_file<'a>(
    path: &Path,
    bytes: &'a [u8],
    options: &DecodeOptions,
) -> anyhow::Result<DecodedContainer<'a>> {
    decode(bytes, options).map_err(|e| {
        let kind = e.kind();
        anyhow::Error::new(e).context(format!("{:?} error decoding {:?}", kind, path))
    })
}

fn chunk_flags(ty: ChunkType) -> String {
    let mut flags = String::with_capacity(4);
    flags.push(if ty.is_critical() { 'C' } else { 'a' });
    flags.push(if ty.is_public() { 'P' } else { 'p' });
    flags.push(if ty.is_reserved_bit_valid() { '-' } else { 'R' });
    flags.push(if ty.is_safe_to_copy() { 's' } else { '-' });
    flags
}

/// Pack one row of samples at `bit_depth`, most significant bits first.
fn pack_samples(samples: &[u32], bit_depth: u8, out: &mut Vec<u8>) -> anyhow::Result<()> {
    match bit_depth {
        16 => {
            for &s in samples {
                out.extend_from_slice(&u16_to_bytes(s, RangeCheck::Enforce, Endian::Big)?);
            }
        }
        8 => out.extend(samples.iter().map(|&s| s as u8)),
        _ => {
            let depth = bit_depth as usize;
            for group in samples.chunks(8 / depth) {
                let mut byte = 0u8;
                for (i, &s) in group.iter().enumerate() {
                    byte |= (s as u8) << (8 - depth * (i + 1));
                }
                out.push(byte);
            }
        }
    }
    Ok(())
}

/// Unfiltered scanlines of a diagonal gradient.
fn gradient_scanlines(header: &HeaderMetadata) -> anyhow::Result<Vec<u8>> {
    let max = (1u64 << header.bit_depth) - 1;
    let channels = u32::from(header.color_type.channel_count());
    let span = (u64::from(header.width) + u64::from(header.height)).saturating_sub(2).max(1);
    let entries = palette_capacity(header) as u64;
    let capacity = header.raw_stream_len().unwrap_or(0) as usize;

    let mut out = Vec::with_capacity(capacity);
    let mut row = Vec::with_capacity(header.width as usize * channels as usize);
    for y in 0..header.height {
        row.clear();
        for x in 0..header.width {
            let diagonal = u64::from(x) + u64::from(y);
            if header.color_type == ColorType::Indexed {
                row.push((diagonal % entries) as u32);
                continue;
            }
            let v = diagonal * max / span;
            for c in 0..channels {
                let sample = match c {
                    0 => v,
                    1 => max - v,
                    2 => u64::from(x) * max / u64::from(header.width.max(2) - 1),
                    _ => max,
                };
                row.push(sample.min(max) as u32);
            }
        }
        out.push(0); // filter type: none
        pack_samples(&row, header.bit_depth, &mut out)?;
    }
    Ok(out)
}

fn gradient_palette(entries: usize) -> Vec<u8> {
    let last = entries.saturating_sub(1).max(1);
    (0..entries)
        .flat_map(|i| {
            let v = (i * 255 / last) as u8;
            [v, 128, 255 - v]
        })
        .collect()
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_inspect(file: PathBuf, show_chunks: bool) -> anyhow::Result<()> {
    let bytes = read_file(&file)?;
    let decoded = decode_file(&file, &bytes, &DecodeOptions::default())?;
    let h = &decoded.header;

    println!("=== PNG File: {:?} ===", file);
    println!();
    println!("  dimensions     : {} x {}", h.width, h.height);
    println!("  color type     : {}", h.color_type);
    println!("  bit depth      : {}", h.bit_depth);
    println!("  bits per pixel : {}", h.bits_per_pixel());
    println!("  interlace      : {:?}", h.interlace);
    match &decoded.palette {
        Some(p) => println!("  palette        : {} entries", p.entry_count()),
        None => println!("  palette        : none"),
    }
    println!("  chunks         : {}", decoded.chunks.len());
    println!("  IDAT chunks    : {}", decoded.stream.segment_count());
    println!("  compressed     : {}", human_bytes(decoded.stream.len() as u64));
    if let Some(raw) = h.raw_stream_len() {
        println!("  raw stream     : {}", human_bytes(raw));
        if !decoded.stream.is_empty() {
            println!("  ratio          : {:.2}x", raw as f64 / decoded.stream.len() as f64);
        }
    }
    println!("  file on disk   : {}", human_bytes(bytes.len() as u64));
    let corrupted = decoded.corrupted_chunks().count();
    if corrupted > 0 {
        println!("  corrupted      : {} chunk(s)", corrupted);
    }

    if show_chunks {
        println!();
        println!(
            "  {:>5}  {:>10}  {:<6}  {:>10}  {:>8}  {:<5}  {:<4}  kind",
            "index", "offset", "type", "length", "crc", "ok", "flag"
        );
        println!("  {}", "-".repeat(72));
        for (i, c) in decoded.chunks.iter().enumerate() {
            println!(
                "  {:>5}  {:>10}  {:<6}  {:>10}  {:08x}  {:<5}  {:<4}  {:?}",
                i,
                c.offset,
                c.chunk_type.to_string(),
                c.length,
                c.stored_crc,
                if c.is_corrupted() { "BAD" } else { "ok" },
                chunk_flags(c.chunk_type),
                c.kind()
            );
        }
    }

    Ok(())
}

fn run_verify(file: PathBuf, strict: bool) -> anyhow::Result<()> {
    let bytes = read_file(&file)?;
    let options = if strict {
        DecodeOptions::strict()
    } else {
        DecodeOptions::default()
    };

    let t0 = Instant::now();
    let decoded = decode_file(&file, &bytes, &options)?;
    let elapsed = t0.elapsed();

    for (i, c) in decoded.corrupted_chunks() {
        eprintln!(
            "  warning: chunk {} ({}) CRC mismatch: stored {:08x}, computed {:08x}",
            i, c.chunk_type, c.stored_crc, c.computed_crc
        );
    }
    println!(
        "{:?}: ok ({} chunks, {}x{} {}, {:.3}ms)",
        file,
        decoded.chunks.len(),
        decoded.header.width,
        decoded.header.height,
        decoded.header.color_type.name(),
        elapsed.as_secs_f64() * 1000.0
    );
    Ok(())
}

fn run_extract(file: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let bytes = read_file(&file)?;
    let decoded = decode_file(&file, &bytes, &DecodeOptions::default())?;

    let is_stdout = output.to_str() == Some("-");
    let mut dst: Box<dyn Write> = if is_stdout {
        Box::new(io::stdout())
    } else {
        Box::new(BufWriter::new(
            File::create(&output).with_context(|| format!("creating output file {:?}", output))?,
        ))
    };
    decoded.stream.write_to(&mut dst)?;
    dst.flush()?;

    eprintln!("  IDAT chunks : {}", decoded.stream.segment_count());
    eprintln!("  written     : {}", human_bytes(decoded.stream.len() as u64));
    Ok(())
}

fn run_crc(file: PathBuf, offset: usize, len: Option<usize>) -> anyhow::Result<()> {
    let bytes = read_file(&file)?;
    if offset > bytes.len() {
        anyhow::bail!("offset {} is past the end of a {}-byte file", offset, bytes.len());
    }
    let len = len.unwrap_or(bytes.len() - offset);
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .with_context(|| {
            format!("range {}+{} runs past the end of a {}-byte file", offset, len, bytes.len())
        })?;

    println!("{:08x}", crc32(&bytes[offset..end]));
    Ok(())
}

fn run_synth(
    output: PathBuf,
    width: u32,
    height: u32,
    color_type: &str,
    bit_depth: u8,
    segment: usize,
) -> anyhow::Result<()> {
    let header = HeaderMetadata::new(width, height, bit_depth, color_type_from_name(color_type)?);
    // Round-trip through the IHDR parser so bad combinations fail the same way a decode would.
    let header = HeaderMetadata::from_bytes(&header.to_bytes())?;

    let t0 = Instant::now();
    let raw = gradient_scanlines(&header)?;
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&raw)?;
    let compressed = enc.finish()?;

    let file =
        File::create(&output).with_context(|| format!("creating output file {:?}", output))?;
    let mut w = Writer::new(BufWriter::new(file))?;
    w.write_header(&header)?;
    if header.color_type == ColorType::Indexed {
        w.write_palette(&gradient_palette(palette_capacity(&header)))?;
    }
    w.write_chunk(ChunkType(*b"tEXt"), b"Software\0pngscan")?;
    w.write_image_data(&compressed, segment)?;
    let chunk_count = w.chunk_count() + 1;
    w.finish()?;
    let elapsed = t0.elapsed();

    info!(path = ?output, chunks = chunk_count, "wrote container");
    eprintln!("  image       : {}x{} {} @ {} bit", width, height, header.color_type.name(), bit_depth);
    eprintln!("  chunks      : {}", chunk_count);
    eprintln!("  raw stream  : {}", human_bytes(raw.len() as u64));
    eprintln!("  compressed  : {}", human_bytes(compressed.len() as u64));
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_level);
    match cli.command {
        Commands::Inspect { file, chunks } => run_inspect(file, chunks),
        Commands::Verify { file, strict } => run_verify(file, strict),
        Commands::Extract { file, output } => run_extract(file, output),
        Commands::Crc { file, offset, len } => run_crc(file, offset, len),
        Commands::Synth {
            output,
            width,
            height,
            color_type,
            bit_depth,
            segment,
        } => run_synth(output, width, height, &color_type, bit_depth, segment),
    }
}
