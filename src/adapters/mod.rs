// Adapters - External system implementations

pub mod http_processing;
pub mod playback_clock;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use http_processing::HttpProcessingAdapter;
pub use playback_clock::{PlaybackClock, DEFAULT_TICK};
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::{ClientConfig, TomlConfigAdapter};
pub use tracing_log::{LogLevel, TracingLogAdapter};
