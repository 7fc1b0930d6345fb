use slog::{o, Discard, Drain, Level, LevelFilter, Logger};
use slog_async::Async;
use slog_term::{FullFormat, TermDecorator};

pub fn create_logger(for_module: &str, level: Level) -> Logger {
    let decorator = TermDecorator::new().build();
    let drain = FullFormat::new(decorator)
        .use_utc_timestamp()  // Use UTC timestamp
        .use_original_order() // Maintain the order of log fields as declared
        .build()
        .fuse();
    let drain = LevelFilter::new(drain, level).fuse();
    let async_drain = Async::new(drain).build().fuse();
    Logger::root(async_drain, o!("component" => "ECGCore", "module" => for_module.to_string()))
}

pub fn discard_logger() -> Logger {
    Logger::root(Discard, o!())
}
