//! Panic hook that leaves a crash report behind.
//!
//! The shell runs in a terminal the user may close right after a crash, so
//! the report is appended to `crash.log` in the data directory as well as
//! printed to stderr.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::panic::{self, PanicHookInfo};
use std::path::PathBuf;

use crate::config::Config;

/// Install the crash report hook. Call before anything else in `main`.
pub fn install() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        write_report(info);
        default_hook(info);
    }));
}

fn crash_report_path() -> Option<PathBuf> {
    Config::data_dir().ok().map(|dir| dir.join("crash.log"))
}

fn write_report(info: &PanicHookInfo) {
    let report = format_crash_report(info);
    eprintln!("{}", report);

    let Some(path) = crash_report_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = file.write_all(report.as_bytes());
        let _ = file.write_all(b"\n");
        let _ = file.flush();
        eprintln!("Crash report appended to: {}", path.display());
    }
}

fn panic_message(info: &PanicHookInfo) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

fn format_crash_report(info: &PanicHookInfo) -> String {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "busnav {} crashed at {}\nLocation: {}\nMessage:  {}\n\nBacktrace:\n{}",
        env!("CARGO_PKG_VERSION"),
        timestamp,
        location,
        panic_message(info),
        std::backtrace::Backtrace::force_capture(),
    )
}
