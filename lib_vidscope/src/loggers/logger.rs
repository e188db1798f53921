use anyhow::Result;
use colored::{ColoredString, Colorize};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of every log file this crate writes.
pub const LOG_FILE_PREFIX: &str = "vidscope";

/// Maps a textual level to a filter; unknown names fall back to `Info`.
pub fn parse_level(log_level: &str) -> log::LevelFilter {
    match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    }
}

fn paint(level: log::Level) -> ColoredString {
    let tag = level.to_string();
    match level {
        log::Level::Error => tag.red().bold(),
        log::Level::Warn => tag.yellow(),
        log::Level::Info => tag.green(),
        log::Level::Debug => tag.blue(),
        log::Level::Trace => tag.dimmed(),
    }
}

/// Installs the global logger: colored lines on stderr plus a plain log file.
///
/// Older `.log` files in `log_dir` are pruned first so only the newest one
/// remains next to the file opened by this call. stderr keeps stdout free for
/// the HTML page.
///
/// # Arguments
/// * `log_dir` - Directory for the log file. Created if missing.
/// * `log_level` - `trace`, `debug`, `info`, `warn` or `error`.
///
/// # Returns
/// The path of the new log file.
pub fn setup_logging(log_dir: &Path, log_level: &str) -> Result<PathBuf> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)?;
    }

    cleanup_old_logs(log_dir)?;

    let log_file_name = format!(
        "{}_{}.log",
        LOG_FILE_PREFIX,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = log_dir.join(log_file_name);

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                paint(record.level()),
                message
            ))
        })
        .chain(std::io::stderr());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(fern::log_file(&log_path)?);

    fern::Dispatch::new()
        .level(parse_level(log_level))
        .chain(console)
        .chain(file)
        .apply()?;

    Ok(log_path)
}

/// Deletes every `.log` file in `log_dir` except the most recently modified.
pub fn cleanup_old_logs(log_dir: &Path) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(log_dir)?
        .filter_map(|res| res.ok())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "log"))
        .filter_map(|e| {
            let modified = e.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, e.path()))
        })
        .collect();

    // Newest first
    entries.sort_by(|a, b| b.0.cmp(&a.0));

    for (_, path) in entries.iter().skip(1) {
        if let Err(e) = fs::remove_file(path) {
            eprintln!("Failed to delete old log file {:?}: {}", path, e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn keeps_only_newest_log() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("vidscope_old.log");
        let new = dir.path().join("vidscope_new.log");
        let other = dir.path().join("notes.txt");
        fs::write(&old, "old").unwrap();
        fs::write(&new, "new").unwrap();
        fs::write(&other, "keep").unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(past)
            .unwrap();

        cleanup_old_logs(dir.path()).unwrap();
        assert!(!old.exists());
        assert!(new.exists());
        assert!(other.exists());
    }

    #[test]
    fn level_names() {
        assert_eq!(parse_level("DEBUG"), log::LevelFilter::Debug);
        assert_eq!(parse_level("trace"), log::LevelFilter::Trace);
        assert_eq!(parse_level("fatal"), log::LevelFilter::Info);
    }
}
