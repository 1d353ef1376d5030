/// Property tests for the parameter resolver.
use proptest::prelude::*;
use std::path::PathBuf;

use vidshrink::engine::plan::{AUDIO_BITRATE_BPS, TARGET_SIZE_MB};
use vidshrink::engine::{resolve, EncodeRequest, Mode, RateControl, SourceProbe};

fn request(mode: Mode, use_nvenc: bool) -> EncodeRequest {
    EncodeRequest {
        source_path: PathBuf::from("/videos/clip.mp4"),
        output_dir: PathBuf::from("/out"),
        mode,
        use_nvenc,
    }
}

proptest! {
    // Up to 570s the budget leaves at least 1 kbps for video, so resolution
    // must succeed and match the arithmetic exactly.
    #[test]
    fn size_target_matches_budget_formula(duration_s in 1.0f64..=570.0) {
        let probe = SourceProbe { duration_s, width: 1920, height: 1080 };
        let plan = resolve(&request(Mode::SizeTarget, false), &probe).unwrap();

        let RateControl::TargetBitrate { bitrate_kbps } = plan.rate_control else {
            panic!("size target must use a target bitrate");
        };

        let target_bits = TARGET_SIZE_MB * 1_000_000.0 * 8.0;
        let video_bits = target_bits - AUDIO_BITRATE_BPS * duration_s;
        let expected = (video_bits / duration_s / 1000.0).floor() as u32;
        prop_assert_eq!(bitrate_kbps, expected);
        prop_assert!(bitrate_kbps >= 1);

        // Flooring never overshoots the size budget.
        let total_bits = (bitrate_kbps as f64 * 1000.0 + AUDIO_BITRATE_BPS) * duration_s;
        prop_assert!(total_bits <= target_bits);
    }

    // Past the point where audio alone exceeds the budget, resolution must
    // fail rather than hand ffmpeg a nonsense bitrate.
    #[test]
    fn size_target_always_fails_past_audio_overflow(duration_s in 576.0f64..100_000.0) {
        let probe = SourceProbe { duration_s, width: 1920, height: 1080 };
        prop_assert!(resolve(&request(Mode::SizeTarget, false), &probe).is_err());
    }

    // Mode parsing is total and the label always round-trips into the
    // output filename.
    #[test]
    fn mode_parsing_never_panics(token in ".*") {
        let mode = Mode::parse(&token);
        let probe = SourceProbe { duration_s: 60.0, width: 1920, height: 1080 };
        let plan = resolve(&request(mode, false), &probe).unwrap();
        let name = plan.output_path.file_name().unwrap().to_string_lossy().into_owned();
        prop_assert_eq!(name, format!("clip_{}.mp4", mode.label()));
    }

    // The scale filter of every resolution mode pins the short edge for
    // vertical sources.
    #[test]
    fn vertical_sources_get_auto_width(
        width in 1u32..=4096,
        height in 1u32..=4096,
    ) {
        let probe = SourceProbe { duration_s: 60.0, width, height };
        for mode in [Mode::P360, Mode::P480, Mode::P720] {
            let plan = resolve(&request(mode, false), &probe).unwrap();
            let filter = plan.scale_filter.unwrap();
            prop_assert!(filter.starts_with("scale="));
            if width < height {
                prop_assert!(filter.ends_with(":-1"), "{}", filter);
            } else {
                prop_assert!(!filter.contains("-1"), "{}", filter);
            }
        }
    }
}
