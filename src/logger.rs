use crate::VERSION;
use chrono::Local;
use colored::*;
use env_logger::{Builder, Env};
use log::info;
use std::{env as stdenv, io::Write, path::Path};

pub fn program_name() -> String {
    Path::new(&stdenv::args().next().unwrap_or_default())
        .file_name()
        .unwrap_or_default()
        .to_str()
        .unwrap_or_default()
        .to_owned()
}

/// Coloured `env_logger` output, `info` unless `RUST_LOG` says otherwise.
/// `RUST_LOG=trace` drops the name/timestamp prefix for a `file:line` one.
pub fn setup_logger() {
    let compact = matches!(stdenv::var("RUST_LOG"), Ok(val) if val.to_lowercase() == "trace");
    let name_with_version = format!("{}_{}", program_name(), VERSION);

    let result = Builder::from_env(Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let level = match record.level() {
                log::Level::Error => format!("{}", record.level()).red(),
                log::Level::Warn => format!(" {}", record.level()).yellow(),
                log::Level::Info => format!(" {}", record.level()).green(),
                log::Level::Debug => format!("{}", record.level()).blue(),
                log::Level::Trace => format!("{}", record.level()).purple(),
            };
            let file = record.file().unwrap_or("unknown");
            let line = record.line().unwrap_or(0);

            if compact {
                writeln!(buf, "{}:{} {}: {}", file, line, level, record.args())
            } else {
                writeln!(
                    buf,
                    "[{} {}]{}: {}",
                    name_with_version.dimmed(),
                    Local::now().format("%Y%m%d %H:%M:%S").to_string().purple(),
                    level,
                    record.args()
                )
            }
        })
        .try_init();

    if result.is_ok() {
        info!("Logger initialized");
    }
}
