// Source probing via ffprobe

use std::path::Path;
use std::process::Command;

use super::error::EncodeError;

/// Metadata probed from the source file. Immutable once obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceProbe {
    pub duration_s: f64,
    pub width: u32,
    pub height: u32,
}

impl SourceProbe {
    /// Portrait orientation: width strictly smaller than height.
    pub fn is_vertical(&self) -> bool {
        self.width < self.height
    }
}

/// Probe duration and resolution of the first video stream. Two ffprobe
/// invocations: one for the container duration as a bare float, one for
/// the stream dimensions as `WIDTHxHEIGHT`.
pub fn probe_source(path: &Path) -> Result<SourceProbe, EncodeError> {
    let duration_out = run_ffprobe(
        path,
        &[
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ],
    )?;
    let duration_s = parse_duration(&duration_out)?;

    let resolution_out = run_ffprobe(
        path,
        &["-show_entries", "stream=width,height", "-of", "csv=p=0:s=x"],
    )?;
    let (width, height) = parse_resolution(&resolution_out)?;

    Ok(SourceProbe {
        duration_s,
        width,
        height,
    })
}

fn run_ffprobe(path: &Path, entries: &[&str]) -> Result<String, EncodeError> {
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-select_streams", "v:0"])
        .args(entries)
        .arg(path)
        .output()
        .map_err(|e| EncodeError::ProbeFailed(format!("failed to execute ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(EncodeError::ProbeFailed(format!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Parse ffprobe's bare duration output, e.g. "123.456".
pub fn parse_duration(s: &str) -> Result<f64, EncodeError> {
    let duration = s
        .trim()
        .parse::<f64>()
        .map_err(|_| EncodeError::ProbeFailed(format!("unparsable duration {s:?}")))?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(EncodeError::ProbeFailed(format!(
            "non-positive duration {duration}"
        )));
    }
    Ok(duration)
}

/// Parse ffprobe's `WIDTHxHEIGHT` output, e.g. "1920x1080".
pub fn parse_resolution(s: &str) -> Result<(u32, u32), EncodeError> {
    let bad = || EncodeError::ProbeFailed(format!("unparsable resolution {s:?}"));

    let (w, h) = s.trim().split_once('x').ok_or_else(bad)?;
    let width = w.trim().parse::<u32>().map_err(|_| bad())?;
    let height = h.trim().parse::<u32>().map_err(|_| bad())?;
    if width == 0 || height == 0 {
        return Err(bad());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("123.456").unwrap(), 123.456);
        assert_eq!(parse_duration("60\n").unwrap(), 60.0);

        assert!(parse_duration("").is_err());
        assert!(parse_duration("N/A").is_err());
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("-3.5").is_err());
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("1920x1080").unwrap(), (1920, 1080));
        assert_eq!(parse_resolution("1080x1920\n").unwrap(), (1080, 1920));

        assert!(parse_resolution("1920").is_err());
        assert!(parse_resolution("x1080").is_err());
        assert!(parse_resolution("0x1080").is_err());
        assert!(parse_resolution("unknown").is_err());
    }

    #[test]
    fn test_orientation() {
        let landscape = SourceProbe {
            duration_s: 1.0,
            width: 1920,
            height: 1080,
        };
        let portrait = SourceProbe {
            duration_s: 1.0,
            width: 1080,
            height: 1920,
        };
        let square = SourceProbe {
            duration_s: 1.0,
            width: 720,
            height: 720,
        };
        assert!(!landscape.is_vertical());
        assert!(portrait.is_vertical());
        assert!(!square.is_vertical());
    }
}
