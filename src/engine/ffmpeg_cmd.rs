// FFmpeg command assembly and synchronous invocation

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::info;

use super::error::EncodeError;
use super::plan::{EncodePlan, RateControl, AUDIO_BITRATE_BPS, AUDIO_CODEC, AUDIO_SAMPLE_RATE_HZ};

/// Build the full ffmpeg invocation for a plan. Argument order: input,
/// optional scale filter, rate-control block, fixed audio block, output.
pub fn build_ffmpeg_cmd(plan: &EncodePlan, input: &Path) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-hide_banner");
    // An existing output file is overwritten without prompting.
    cmd.arg("-y");
    cmd.arg("-i").arg(input);

    if let Some(filter) = &plan.scale_filter {
        cmd.arg("-vf").arg(filter);
    }

    match plan.rate_control {
        RateControl::TargetBitrate { bitrate_kbps } => {
            cmd.arg("-b:v").arg(format!("{bitrate_kbps}k"));
            cmd.arg("-c:v").arg(plan.video_codec);
            cmd.arg("-preset").arg(plan.preset);
        }
        RateControl::ConstantQuality { quality } => {
            cmd.arg("-c:v").arg(plan.video_codec);
            cmd.arg("-preset").arg(plan.preset);
            cmd.arg(quality_flag(plan.video_codec))
                .arg(quality.to_string());
        }
    }

    cmd.args(["-c:a", AUDIO_CODEC, "-b:a"]);
    cmd.arg(format!("{}k", (AUDIO_BITRATE_BPS / 1000.0) as u32));
    cmd.arg("-ar");
    cmd.arg(AUDIO_SAMPLE_RATE_HZ.to_string());
    cmd.arg(&plan.output_path);

    cmd
}

// NVENC has no CRF; it takes a constant-quality level via -cq.
fn quality_flag(video_codec: &str) -> &'static str {
    if video_codec == "h264_nvenc" {
        "-cq"
    } else {
        "-crf"
    }
}

/// Render a command as a copy-pastable shell line (for dry runs and logs).
pub fn format_cmd(cmd: &Command) -> String {
    let parts: Vec<String> = std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    shlex::try_join(parts.iter().map(|s| s.as_str())).unwrap_or_else(|_| parts.join(" "))
}

/// Run ffmpeg to completion, blocking the caller. Both output streams are
/// captured and surfaced on failure (ffmpeg writes its diagnostics to
/// stderr); a truncated output file may remain on disk.
pub fn run_encode(mut cmd: Command) -> Result<(), EncodeError> {
    info!(command = %format_cmd(&cmd), "spawning ffmpeg");

    let output = cmd.stdin(Stdio::null()).output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let diagnostics = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };
        return Err(EncodeError::EncoderFailed {
            status: output.status,
            diagnostics,
        });
    }
    Ok(())
}
