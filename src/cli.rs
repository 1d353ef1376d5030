use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidshrink")]
#[command(about = "Shrink a video to a target resolution or a 9.2 MB file size", long_about = None)]
pub struct Cli {
    /// Video file to encode
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output mode: 360p, 480p, 720p or 9.5MB. Any other token keeps the
    /// source resolution and encodes at the default quality.
    #[arg(long, default_value = "360p")]
    pub mode: String,

    /// Output directory (defaults to the last used directory, then ~/Desktop)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Encode with NVENC hardware acceleration (remembered for later runs)
    #[arg(long, conflicts_with = "no_nvenc")]
    pub nvenc: bool,

    /// Encode with libx264 in software (remembered for later runs)
    #[arg(long, conflicts_with = "nvenc")]
    pub no_nvenc: bool,

    /// Print the ffmpeg command without running it
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check if ffmpeg and ffprobe are installed
    CheckFfmpeg,

    /// Probe a video file for its duration and resolution
    Probe {
        /// Path to the video file
        file: PathBuf,
    },

    /// Show the settings file location, creating it with defaults if missing
    InitSettings,
}

pub fn parse() -> Cli {
    Cli::parse()
}
