use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use tracing::level_filters::LevelFilter;
use tracing_appender::{
    non_blocking,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

const QUIET_TARGETS: [&str; 6] = ["hyper", "opentelemetry", "tonic", "h2", "tower", "sqlx"];

fn quiet_filter(base: &str) -> EnvFilter {
    QUIET_TARGETS
        .iter()
        .filter_map(|target| format!("{target}=off").parse().ok())
        .fold(EnvFilter::new(base), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Installs console, optional rolling-file, and OTLP log layers.
///
/// Console output honours `RUST_LOG` and falls back to `info` in dev mode.
pub fn init_logger(
    sdk_logger_provider: SdkLoggerProvider,
    component: &str,
    is_dev: bool,
    enable_file: bool,
) {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_dev {
            EnvFilter::new("info")
        } else {
            EnvFilter::default().add_directive(LevelFilter::WARN.into())
        }
    });

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_ansi(is_dev)
        .with_filter(console_filter)
        .boxed();

    let file_layer = if enable_file {
        let log_dir = if is_dev { "./logs" } else { "/var/log/app" };
        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, log_dir, format!("{component}.log"));
        let (file_writer, guard) = non_blocking(file_appender);

        // The guard must outlive the subscriber, which lives for the whole process.
        std::mem::forget(guard);

        Some(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .json()
                .with_filter(EnvFilter::new("info"))
                .boxed(),
        )
    } else {
        None
    };

    let otel_layer =
        OpenTelemetryTracingBridge::new(&sdk_logger_provider).with_filter(quiet_filter("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(otel_layer)
        .init();
}
