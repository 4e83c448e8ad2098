use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Writes the run report next to the input file, mirroring every line on
/// stdout; the log doubles as progress output on long runs, so each line is
/// flushed as soon as it is written.
pub struct RunLog {
    file: File,
}

impl RunLog {
    /// Path of the `.log` sibling of `fnmr`.
    pub fn path_for(fnmr: &Path) -> PathBuf {
        fnmr.with_extension("log")
    }

    pub fn create(fnmr: &Path) -> io::Result<Self> {
        let mut log = Self {
            file: File::create(Self::path_for(fnmr))?,
        };
        log.line(&format!("fnmr {}", fnmr.display()))?;
        log.line(&format!("date {}", Local::now().format("%Y-%m-%d %H:%M:%S")))?;
        Ok(log)
    }

    /// Writes one `> key ... value` line.
    pub fn field(&mut self, key: &str, value: impl fmt::Display) -> io::Result<()> {
        let mut head = format!("{} ", key);
        while head.len() < 20 {
            head.push('.');
        }
        self.line(&format!("{} {}", head, value))
    }

    fn line(&mut self, content: &str) -> io::Result<()> {
        println!("> {}", content);
        writeln!(self.file, "> {}", content)?;
        self.file.flush()
    }
}
