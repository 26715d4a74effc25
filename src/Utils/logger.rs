// tiny module to set up logging: terminal + timestamped file

use chrono::Local;
use log::info;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;

/// Initializes the log facade with a terminal logger and a file logger
/// writing into `log_<date>_<time>.txt`. The level is chosen from an
/// optional loglevel string; `None` means Info. A second initialization
/// (or a failure to create the file) is tolerated: the program just runs
/// with whatever logger is already installed.
pub fn init_logging(loglevel: Option<String>) {
    let log_option = if let Some(level) = loglevel {
        match level.as_str() {
            "debug" => LevelFilter::Info,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => panic!("loglevel must be debug, info, warn or error"),
        }
    } else {
        LevelFilter::Info
    };
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let name = format!("log_{}.txt", date_and_time);

    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Ok(file) = File::create(&name) {
        loggers.push(WriteLogger::new(log_option, Config::default(), file));
    }

    match CombinedLogger::init(loggers) {
        Ok(()) => info!("logging into {}", name),
        Err(_) => {} // already initialized, keep the existing logger
    }
}
