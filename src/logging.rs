//! Logging setup: timestamped lines to stderr and the session log file.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub const LOG_FILE_NAME: &str = "dko_tracker.log";

/// Writes every line to the console and, when it could be opened, the log file.
struct TeeWriter {
    console: Box<dyn Write + Send>,
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        if let Some(file) = &mut self.file {
            // Losing the file copy must not take down the console log
            let _ = file.write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        if let Some(file) = &mut self.file {
            let _ = file.flush();
        }
        Ok(())
    }
}

/// Installs the global logger.
///
/// Level is info, or debug when `debug` is set; `RUST_LOG` overrides both.
pub fn init(logs_dir: &Path, debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(logs_dir.join(LOG_FILE_NAME))
        .ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} {}",
                Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(TeeWriter {
            console: Box::new(io::stderr()),
            file,
        })))
        .init();
}
