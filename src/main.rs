use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn, Level};

use redactor::{
    AudioRedactionFilter, Frame, PixelFormat, RedactorConfig, SampleBlock, VideoRedactionFilter,
};

#[derive(Parser)]
#[command(
    name = "redactor",
    version,
    about = "Redact video and audio streams from a time-indexed track file",
    long_about = "Redactor obscures rectangular regions of a raw video stream (solid fill, \
pixellation, or seeded blur) and mutes or noises segments of an audio stream, driven by a \
line-oriented track descriptor file."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Redact a raw planar YUV stream
    Video(VideoArgs),
    /// Redact a WAV file
    Audio(AudioArgs),
}

#[derive(Args)]
struct VideoArgs {
    /// Raw planar YUV input file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the redacted stream
    #[arg(short, long)]
    output: PathBuf,

    /// Track descriptor file
    #[arg(short, long)]
    tracks: Option<PathBuf>,

    /// Frame size as WIDTHxHEIGHT
    #[arg(short, long)]
    size: String,

    /// Pixel format of the input (yuv420p, yuv422p, yuv444p, ...)
    #[arg(short, long, default_value = "yuv420p")]
    format: String,

    /// Frame rate used to derive presentation timestamps
    #[arg(long, default_value_t = 25.0)]
    fps: f64,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for PNG previews of each redacted frame
    #[arg(long)]
    preview_dir: Option<PathBuf>,
}

#[derive(Args)]
struct AudioArgs {
    /// Input WAV file
    #[arg(short, long)]
    input: PathBuf,

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Track descriptor file
    #[arg(short, long)]
    tracks: Option<PathBuf>,

    /// Samples per channel fed through the filter at a time
    #[arg(short, long, default_value_t = 1024)]
    block_size: usize,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("Starting redactor v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Video(args) => run_video(args),
        Command::Audio(args) => run_audio(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RedactorConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            RedactorConfig::from_file(path)?
        }
        None => RedactorConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run_video(args: VideoArgs) -> Result<()> {
    let (width, height) = parse_size(&args.size)?;
    let format: PixelFormat = args.format.parse()?;
    let config = load_config(args.config.as_ref())?;

    let mut filter = VideoRedactionFilter::open(args.tracks.as_deref(), &config)?;

    info!("Video: {:?} -> {:?}", args.input, args.output);
    info!("   {}x{} {} @ {} fps", width, height, args.format, args.fps);

    if let Some(dir) = &args.preview_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating preview directory {:?}", dir))?;
    }

    let mut reader = BufReader::new(
        File::open(&args.input).with_context(|| format!("opening {:?}", args.input))?,
    );
    let mut writer = BufWriter::new(
        File::create(&args.output).with_context(|| format!("creating {:?}", args.output))?,
    );

    let frame_bytes = format.frame_bytes(width, height);
    let (chroma_w, chroma_h) = format.chroma_dims(width, height);
    let luma_len = width * height;
    let chroma_len = chroma_w * chroma_h;

    let mut buf = vec![0u8; frame_bytes];
    let mut index = 0u64;
    loop {
        let filled = read_up_to(&mut reader, &mut buf)?;
        if filled == 0 {
            break;
        }
        if filled < frame_bytes {
            warn!(
                "input ends with {} trailing bytes (not a whole frame), ignoring them",
                filled
            );
            break;
        }

        let y = buf[..luma_len].to_vec();
        let u = buf[luma_len..luma_len + chroma_len].to_vec();
        let v = buf[luma_len + chroma_len..].to_vec();
        let frame = Frame::from_planes(format, width, height, y, u, v)?;

        let pts = index as f64 / args.fps;
        let redacted = filter.redact_frame(&frame, pts);

        for plane in 0..3 {
            writer.write_all(redacted.plane(plane))?;
        }

        if let Some(dir) = &args.preview_dir {
            let path = dir.join(format!("frame_{:06}.png", index));
            redacted
                .to_rgb_image()
                .save(&path)
                .with_context(|| format!("saving preview {:?}", path))?;
        }

        index += 1;
    }
    writer.flush()?;

    info!(
        "Done: {} frames redacted, {} tracks still pending",
        index,
        filter.remaining_tracks()
    );
    Ok(())
}

fn run_audio(args: AudioArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;

    let mut reader = hound::WavReader::open(&args.input)
        .with_context(|| format!("opening {:?}", args.input))?;
    let spec = reader.spec();

    let mut filter = AudioRedactionFilter::open(
        args.tracks.as_deref(),
        &config,
        spec.sample_rate,
        spec.channels,
    )?;

    info!("Audio: {:?} -> {:?}", args.input, args.output);
    info!(
        "   {} Hz, {} channels, {} bit {:?}",
        spec.sample_rate, spec.channels, spec.bits_per_sample, spec.sample_format
    );

    let block = args.block_size.max(1) * usize::from(spec.channels);
    let mut writer = hound::WavWriter::create(&args.output, spec)
        .with_context(|| format!("creating {:?}", args.output))?;

    match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => {
            let mut samples: Vec<i16> = reader
                .samples::<i16>()
                .collect::<std::result::Result<_, _>>()?;
            for_each_block(&mut samples, block, &spec, |chunk, pts| {
                filter.redact_block(&mut SampleBlock::I16(chunk), pts);
            });
            for s in samples {
                writer.write_sample(s)?;
            }
        }
        (hound::SampleFormat::Int, 32) => {
            let mut samples: Vec<i32> = reader
                .samples::<i32>()
                .collect::<std::result::Result<_, _>>()?;
            for_each_block(&mut samples, block, &spec, |chunk, pts| {
                filter.redact_block(&mut SampleBlock::I32(chunk), pts);
            });
            for s in samples {
                writer.write_sample(s)?;
            }
        }
        (hound::SampleFormat::Float, 32) => {
            let mut samples: Vec<f32> = reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()?;
            for_each_block(&mut samples, block, &spec, |chunk, pts| {
                filter.redact_block(&mut SampleBlock::F32(chunk), pts);
            });
            for s in samples {
                writer.write_sample(s)?;
            }
        }
        (format, bits) => bail!("unsupported WAV format: {} bit {:?}", bits, format),
    }

    writer.finalize()?;
    info!("Done: {} tracks still pending", filter.remaining_tracks());
    Ok(())
}

/// Feed a sample buffer to `redact` block by block, stamping each block with
/// its position-derived timestamp.
fn for_each_block<T>(
    samples: &mut [T],
    block: usize,
    spec: &hound::WavSpec,
    mut redact: impl FnMut(&mut [T], f64),
) {
    let mut frames_done = 0u64;
    for chunk in samples.chunks_mut(block) {
        let frames = chunk.len() / usize::from(spec.channels.max(1));
        let pts = frames_done as f64 / f64::from(spec.sample_rate);
        redact(chunk, pts);
        frames_done += frames as u64;
    }
}

/// Read until the buffer is full or the input ends; returns the bytes read.
fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

fn parse_size(size: &str) -> Result<(usize, usize)> {
    let Some((w, h)) = size.split_once('x') else {
        bail!("size must be WIDTHxHEIGHT, got '{}'", size);
    };
    let width: usize = w.parse().with_context(|| format!("bad width '{}'", w))?;
    let height: usize = h.parse().with_context(|| format!("bad height '{}'", h))?;
    if width == 0 || height == 0 {
        bail!("frame dimensions must be non-zero");
    }
    Ok((width, height))
}
