use chrono::offset::Local;
use colored::*;
use core::fmt::Arguments;
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Metadata, Record};

pub struct Logger;

fn level_name(level: Level) -> ColoredString {
    let name = level.to_string();
    match level {
        Level::Error => name.red(),
        Level::Warn => name.yellow(),
        Level::Info => name.green(),
        Level::Debug | Level::Trace => name.white(),
    }
    .bold()
}

impl Logger {
    // Records are written to stdout by `convert`, keep the log on stderr.
    pub fn println(level: Level, args: &Arguments) {
        let time = Local::now().format("%T").to_string();
        eprintln!(
            "{open}{}{close} {open}{}{close} {}",
            level_name(level),
            time.magenta(),
            args,
            open = "[".blue().bold(),
            close = "]".blue().bold(),
        );
    }

    pub fn error(msg: &str) {
        Self::println(Level::Error, &format_args!("{}", msg));
    }

    // Debug output is only shown when running verbosely.
    pub fn level(verbose: bool) -> LevelFilter {
        if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            Logger::println(record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn progress_bar(total: u64) -> ProgressBar {
    let progress_bar = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} ({eta})",
        )
        .progress_chars("#>-");
    progress_bar.set_style(style);
    progress_bar
}
