use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Everything that can stop an encode request. All variants are terminal
/// for the request; nothing is retried.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("output directory does not exist: {0}")]
    OutputDirectoryMissing(PathBuf),

    #[error("probe failed: {0}")]
    ProbeFailed(String),

    #[error(
        "video is too long for the target size: {duration_s:.1}s of audio \
         overhead leaves no room for video"
    )]
    InsufficientBudget { duration_s: f64 },

    #[error("computed video bitrate is not positive ({kbps} kbps)")]
    InvalidBitrate { kbps: i64 },

    #[error("failed to run ffmpeg (is it installed and in PATH?): {0}")]
    Spawn(#[from] std::io::Error),

    #[error("ffmpeg failed ({status}): {diagnostics}")]
    EncoderFailed {
        status: ExitStatus,
        diagnostics: String,
    },
}
