// Encode planning and external tool plumbing - independent of the CLI shell

pub mod error;
pub mod ffmpeg_cmd;
pub mod ffmpeg_info;
pub mod plan;
pub mod probe;

pub use error::EncodeError;
pub use ffmpeg_cmd::{build_ffmpeg_cmd, format_cmd, run_encode};
pub use ffmpeg_info::{ffmpeg_version, ffprobe_version};
pub use plan::{
    derive_output_path, resolve, validate_request, EncodePlan, EncodeRequest, Mode, RateControl,
};
pub use probe::{probe_source, SourceProbe};
