// Parameter resolution: turn a request plus probed metadata into a
// concrete encoder plan.

use std::path::{Path, PathBuf};

use super::error::EncodeError;
use super::probe::SourceProbe;

/// Target file size for the size-target mode, in (decimal) megabytes.
pub const TARGET_SIZE_MB: f64 = 9.2;

/// Fixed audio bitrate in bits per second, used both for the ffmpeg audio
/// arguments and for the size-target budget arithmetic.
pub const AUDIO_BITRATE_BPS: f64 = 128_000.0;

/// Fixed quality value shared by both encoders (CRF for libx264, -cq for
/// h264_nvenc). Deliberately not computed.
pub const QUALITY: u32 = 23;

pub const AUDIO_CODEC: &str = "aac";
pub const AUDIO_SAMPLE_RATE_HZ: u32 = 44_100;

/// Output mode. Parsing from the user-facing token is total: any token we
/// don't recognize falls through to `Default`, which keeps the source
/// resolution and encodes at the fixed quality with no bitrate constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    P360,
    P480,
    P720,
    SizeTarget,
    Default,
}

impl Mode {
    pub fn parse(token: &str) -> Self {
        match token {
            "360p" => Mode::P360,
            "480p" => Mode::P480,
            "720p" => Mode::P720,
            "9.5MB" => Mode::SizeTarget,
            _ => Mode::Default,
        }
    }

    /// Token used in output filenames.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::P360 => "360p",
            Mode::P480 => "480p",
            Mode::P720 => "720p",
            Mode::SizeTarget => "9.5MB",
            Mode::Default => "default",
        }
    }
}

/// One encode request, collected by the CLI shell.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub source_path: PathBuf,
    pub output_dir: PathBuf,
    pub mode: Mode,
    pub use_nvenc: bool,
}

/// Rate-control strategy. A target bitrate exists exactly when the mode
/// asked for a target file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateControl {
    ConstantQuality { quality: u32 },
    TargetBitrate { bitrate_kbps: u32 },
}

/// Concrete encoder invocation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodePlan {
    pub scale_filter: Option<String>,
    pub rate_control: RateControl,
    pub video_codec: &'static str,
    pub preset: &'static str,
    pub output_path: PathBuf,
}

/// Input validation, run before any external process is spawned.
pub fn validate_request(request: &EncodeRequest) -> Result<(), EncodeError> {
    if !request.source_path.is_file() {
        return Err(EncodeError::SourceNotFound(request.source_path.clone()));
    }
    if !request.output_dir.is_dir() {
        return Err(EncodeError::OutputDirectoryMissing(
            request.output_dir.clone(),
        ));
    }
    Ok(())
}

/// Resolve a request against the probed source metadata. Pure: filesystem
/// checks happen in [`validate_request`], process spawning in `ffmpeg_cmd`.
pub fn resolve(request: &EncodeRequest, probe: &SourceProbe) -> Result<EncodePlan, EncodeError> {
    let vertical = probe.is_vertical();

    let rate_control = match request.mode {
        Mode::SizeTarget => RateControl::TargetBitrate {
            bitrate_kbps: target_bitrate_kbps(probe.duration_s)?,
        },
        _ => RateControl::ConstantQuality { quality: QUALITY },
    };

    Ok(EncodePlan {
        scale_filter: scale_filter(request.mode, vertical),
        rate_control,
        video_codec: video_codec(request.use_nvenc),
        preset: "slow",
        output_path: derive_output_path(&request.source_path, &request.output_dir, request.mode),
    })
}

/// Scale filter for a (mode, orientation) pair. Vertical sources pin the
/// short edge and let ffmpeg pick the other dimension (`-1`); landscape
/// sources get the fixed 16:9 presets. `Default` leaves the source alone.
fn scale_filter(mode: Mode, vertical: bool) -> Option<String> {
    let preset = match (mode, vertical) {
        (Mode::P360, true) => "360:-1",
        (Mode::P360, false) => "640:360",
        (Mode::P480, true) | (Mode::SizeTarget, true) => "480:-1",
        (Mode::P480, false) | (Mode::SizeTarget, false) => "854:480",
        (Mode::P720, true) => "720:-1",
        (Mode::P720, false) => "1280:720",
        (Mode::Default, _) => return None,
    };
    Some(format!("scale={preset}"))
}

/// Video bitrate that fits the target size once the fixed audio overhead
/// is subtracted.
fn target_bitrate_kbps(duration_s: f64) -> Result<u32, EncodeError> {
    let target_bits = TARGET_SIZE_MB * 1_000_000.0 * 8.0;
    let audio_bits = AUDIO_BITRATE_BPS * duration_s;
    let video_bits = target_bits - audio_bits;
    if video_bits <= 0.0 {
        return Err(EncodeError::InsufficientBudget { duration_s });
    }

    let kbps = (video_bits / duration_s / 1000.0).floor() as i64;
    if kbps <= 0 {
        return Err(EncodeError::InvalidBitrate { kbps });
    }
    Ok(kbps as u32)
}

/// Static codec mapping. This does not verify NVENC is actually present;
/// ffmpeg reports that failure at encode time.
fn video_codec(use_nvenc: bool) -> &'static str {
    if use_nvenc { "h264_nvenc" } else { "libx264" }
}

/// `<output_dir>/<stem>_<label>.mp4`. No collision check; an existing file
/// is overwritten by the encoder invocation.
pub fn derive_output_path(source_path: &Path, output_dir: &Path, mode: Mode) -> PathBuf {
    let stem = source_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output_dir.join(format!("{}_{}.mp4", stem, mode.label()))
}
