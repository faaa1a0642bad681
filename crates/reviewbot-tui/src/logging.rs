use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "reviewbot=info,reviewbot_core=info";

/// Send logs to `<data_local_dir>/reviewbot/reviewbot.log`; stdout and stderr
/// belong to the TUI. The file is truncated so it only holds the current
/// session. Returns the log path, or `None` if logging is off.
pub fn init() -> Option<PathBuf> {
    let dir = dirs::data_local_dir()?.join("reviewbot");
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join("reviewbot.log");

    let file = open_log_file(&path).ok()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .ok()?;

    Some(path)
}

/// Open the log for this session, discarding whatever the last one wrote
fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_file_starts_empty_each_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviewbot.log");

        let mut first = open_log_file(&path).unwrap();
        writeln!(first, "previous session").unwrap();
        drop(first);
        assert!(fs::metadata(&path).unwrap().len() > 0);

        let mut second = open_log_file(&path).unwrap();
        writeln!(second, "new").unwrap();
        drop(second);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }
}
