use crate::cli::{Cli, Commands};
use std::path::PathBuf;
use std::process;
use tracing::warn;
use vidshrink::engine::{self, EncodeError, EncodeRequest, Mode};
use vidshrink::settings::Settings;

pub fn run(cli: Cli) {
    // Handle subcommands first
    if let Some(command) = cli.command {
        match command {
            Commands::CheckFfmpeg => handle_check_ffmpeg(),
            Commands::Probe { file } => handle_probe(file),
            Commands::InitSettings => handle_init_settings(),
        }
        return;
    }

    let Some(input) = cli.input else {
        eprintln!("Error: no input file given (see --help)");
        process::exit(2);
    };

    let mut settings = Settings::load();

    let use_nvenc = if cli.nvenc {
        true
    } else if cli.no_nvenc {
        false
    } else {
        settings.use_nvenc
    };

    let Some(output_dir) = resolve_output_dir(cli.output_dir.as_deref(), &settings) else {
        eprintln!("Error: no output directory given and no home directory to fall back to");
        process::exit(1);
    };

    // Persist explicit choices, like the directory picker and the encoder
    // checkbox did. Failure to save is logged and ignored.
    let mut settings_changed = false;
    if (cli.nvenc || cli.no_nvenc) && settings.use_nvenc != use_nvenc {
        settings.use_nvenc = use_nvenc;
        settings_changed = true;
    }
    if cli.output_dir.is_some() {
        let dir = output_dir.display().to_string();
        if settings.last_output_dir != dir {
            settings.last_output_dir = dir;
            settings_changed = true;
        }
    }
    if settings_changed {
        if let Err(e) = settings.save() {
            warn!("settings not saved: {e:#}");
        }
    }

    let request = EncodeRequest {
        source_path: input,
        output_dir,
        mode: Mode::parse(&cli.mode),
        use_nvenc,
    };

    match run_request(&request, cli.dry_run) {
        Ok(output_path) => {
            if !cli.dry_run {
                println!("Done. Output file: {}", output_path.display());
            }
        }
        Err(e) => {
            report_error(&e);
            process::exit(1);
        }
    }
}

/// Flag > remembered directory > ~/Desktop.
fn resolve_output_dir(flag: Option<&std::path::Path>, settings: &Settings) -> Option<PathBuf> {
    if let Some(dir) = flag {
        return Some(dir.to_path_buf());
    }
    if !settings.last_output_dir.is_empty() {
        return Some(PathBuf::from(&settings.last_output_dir));
    }
    dirs::home_dir().map(|home| home.join("Desktop"))
}

fn run_request(request: &EncodeRequest, dry_run: bool) -> Result<PathBuf, EncodeError> {
    engine::validate_request(request)?;

    let probe = engine::probe_source(&request.source_path)?;
    let plan = engine::resolve(request, &probe)?;
    let cmd = engine::build_ffmpeg_cmd(&plan, &request.source_path);

    if dry_run {
        println!("{}", engine::format_cmd(&cmd));
    } else {
        engine::run_encode(cmd)?;
    }

    Ok(plan.output_path)
}

/// Map error kinds to user-visible messages at the boundary.
fn report_error(e: &EncodeError) {
    match e {
        EncodeError::EncoderFailed {
            status,
            diagnostics,
        } => {
            eprintln!("Error: ffmpeg failed ({status})");
            if !diagnostics.is_empty() {
                eprintln!("{diagnostics}");
            }
        }
        other => eprintln!("Error: {other}"),
    }
}

fn handle_check_ffmpeg() {
    match engine::ffmpeg_version() {
        Ok(version) => {
            println!("ffmpeg found: {}", version);
            match engine::ffprobe_version() {
                Ok(probe_version) => {
                    println!("ffprobe found: {}", probe_version);
                }
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn handle_probe(file: PathBuf) {
    match engine::probe_source(&file) {
        Ok(probe) => {
            println!("duration: {:.3}s", probe.duration_s);
            println!(
                "resolution: {}x{} ({})",
                probe.width,
                probe.height,
                if probe.is_vertical() {
                    "vertical"
                } else {
                    "landscape"
                }
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn handle_init_settings() {
    let path = match Settings::settings_path() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    if Settings::exists() {
        println!("Settings file exists: {}", path.display());
        return;
    }

    match Settings::default().save() {
        Ok(()) => println!("Created default settings file: {}", path.display()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
