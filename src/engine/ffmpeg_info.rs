use anyhow::{Context, Result};
use std::process::Command;

/// Check that ffmpeg is available and return its version line.
pub fn ffmpeg_version() -> Result<String> {
    tool_version("ffmpeg")
}

/// Check that ffprobe is available and return its version line.
pub fn ffprobe_version() -> Result<String> {
    tool_version("ffprobe")
}

fn tool_version(tool: &str) -> Result<String> {
    let output = Command::new(tool)
        .arg("-version")
        .output()
        .with_context(|| format!("Failed to execute {tool}. Is {tool} installed and in PATH?"))?;

    if !output.status.success() {
        anyhow::bail!("{tool} command failed with status: {}", output.status);
    }

    let version_output = String::from_utf8_lossy(&output.stdout);
    let first_line = version_output.lines().next().unwrap_or("Unknown version");

    Ok(first_line.to_string())
}
