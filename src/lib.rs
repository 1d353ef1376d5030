// vidshrink - derive ffmpeg parameters for resolution or file-size targets

pub mod engine;
pub mod settings;
