use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const DEFAULT_LOG_FILTER: &str = "warn,clai=info";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

fn parse_log_format(raw: Option<&str>) -> LogFormat {
    match raw.unwrap_or("pretty").trim().to_ascii_lowercase().as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

fn env_filter_from_env() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn file_writer(path: &Path) -> std::io::Result<BoxMakeWriter> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| std::ffi::OsStr::new("clai.log"));

    fs::create_dir_all(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(
        dir, file_name,
    ));
    let _ = LOG_GUARD.set(guard);
    Ok(BoxMakeWriter::new(writer))
}

fn try_init(format: LogFormat, writer: BoxMakeWriter) -> bool {
    let result = match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(env_filter_from_env())
            .with_writer(writer)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter_from_env())
            .with_writer(writer)
            .try_init(),
    };
    result.is_ok()
}

/// Installs the global tracing subscriber. Logs go to stderr, or to a
/// daily-rotated file when `LOG_FILE` is set; `LOG_FORMAT=json` switches
/// to JSON lines. An unwritable log file falls back to stderr.
pub fn init() {
    let format = parse_log_format(env::var("LOG_FORMAT").ok().as_deref());

    if let Some(raw_path) = env::var("LOG_FILE").ok().filter(|raw| !raw.trim().is_empty()) {
        let path = Path::new(raw_path.trim());
        match file_writer(path) {
            Ok(writer) => {
                let _ = try_init(format, writer);
                return;
            }
            Err(err) => {
                eprintln!(
                    "clai: failed to open LOG_FILE '{}': {}; using stderr instead",
                    path.display(),
                    err
                );
            }
        }
    }

    let _ = try_init(format, BoxMakeWriter::new(std::io::stderr));
}
