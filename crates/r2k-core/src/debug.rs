use core::fmt;
use std::fs::OpenOptions;
use std::sync::Once;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, fmt as tracingfmt};

struct AlignedFormatter;

impl<S, N> FormatEvent<S, N> for AlignedFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: format::Writer<'_>, event: &tracing::Event<'_>) -> fmt::Result {
        let metadata = event.metadata();

        let (color_level, color_reset) = match *metadata.level() {
            tracing::Level::ERROR => ("\x1b[31m", "\x1b[0m"),
            tracing::Level::WARN => ("\x1b[33m", "\x1b[0m"),
            tracing::Level::INFO => ("\x1b[32m", "\x1b[0m"),
            tracing::Level::DEBUG => ("\x1b[34m", "\x1b[0m"),
            tracing::Level::TRACE => ("\x1b[35m", "\x1b[0m"),
        };

        let formatted_path = short_source_path(metadata.file().unwrap_or("unknown"));

        let location = format!(
            "{}{:<5}{} {}:{}:",
            color_level,
            metadata.level(),
            color_reset,
            formatted_path,
            metadata.line().unwrap_or(0)
        );

        let mut message_buf = String::new();
        let message_writer = format::Writer::new(&mut message_buf);
        ctx.field_format().format_fields(message_writer, event)?;

        // Frames going out ("->") or coming in ("<-") are pulled left a bit
        let mut padding = 56;
        if message_buf.starts_with("->") || message_buf.starts_with("<-") {
            padding -= 3;
        }

        write!(writer, "{:<width$} {}", location, message_buf, width = padding)?;
        writeln!(writer)
    }
}

/// "crates/r2k-entities/src/channel/pool.rs" becomes "[entities/channel] pool.rs"
fn short_source_path(file_path: &str) -> String {
    let Some(src_idx) = file_path.find("/src/") else {
        return file_path.to_string();
    };
    let before_src = &file_path[..src_idx];
    let after_src = &file_path[src_idx + 5..];
    let crate_name = match before_src.rfind("r2k-") {
        Some(idx) => &before_src[idx + 4..],
        None => before_src.rsplit('/').next().unwrap_or("unknown"),
    };
    match after_src.split_once('/') {
        Some((module, rest)) => {
            let filename = rest.rsplit('/').next().unwrap_or(rest);
            format!("[{}/{}] {}", crate_name, module, filename)
        }
        None => format!("[{}] {}", crate_name, after_src),
    }
}

static INIT_LOG: Once = Once::new();

/// Sets up logging with maximum verbosity (trace level)
/// Mainly for unit tests
pub fn setup_logging_verbose() {
    setup_logging(EnvFilter::new("trace"), None);
}

/// Sets up default logging to stdout and optionally, a verbose log file
/// Returns a guard, that needs to be kept alive for logging to file to work
pub fn setup_logging_default(verbose_logfile: Option<String>) -> Option<WorkerGuard> {
    let logfile_and_filter = verbose_logfile.map(|file| (file, get_default_logfile_filter()));
    setup_logging(get_default_stdout_filter(), logfile_and_filter)
}

pub fn get_default_stdout_filter() -> EnvFilter {
    EnvFilter::new("info")
        // Bit-level layers log every frame
        .add_directive("r2k_core::bitbuffer=warn".parse().unwrap())
        .add_directive("r2k_entities::phy=info".parse().unwrap())
        .add_directive("r2k_frames=info".parse().unwrap())
        // Call control
        .add_directive("r2k_entities::channel=debug".parse().unwrap())
}

fn get_default_logfile_filter() -> EnvFilter {
    EnvFilter::new("trace")
}

/// Sets up logging to stdout and optionally, a verbose log file
/// If an output file is requested, returns Some<WorkerGuard>. Keep this value alive
/// or logging to file may cease working. If no output file is provided, returns None.
fn setup_logging(stdout_filter: EnvFilter, outfile: Option<(String, EnvFilter)>) -> Option<WorkerGuard> {
    let (file_layer, guard) = match outfile {
        Some((path, filter)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .expect("Failed to open log file");
            let (file_writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracingfmt::layer()
                .event_format(AlignedFormatter)
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(filter);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    INIT_LOG.call_once(|| {
        let stdout_layer = tracingfmt::layer().event_format(AlignedFormatter).with_filter(stdout_filter);
        tracing_subscriber::registry().with(file_layer).with(stdout_layer).init();
    });

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_source_path() {
        assert_eq!(short_source_path("crates/r2k-entities/src/channel/pool.rs"), "[entities/channel] pool.rs");
        assert_eq!(short_source_path("crates/r2k-core/src/timer.rs"), "[core] timer.rs");
        assert_eq!(short_source_path("bins/r2k-bs/src/main.rs"), "[bs] main.rs");
        assert_eq!(short_source_path("build.rs"), "build.rs");
    }
}
