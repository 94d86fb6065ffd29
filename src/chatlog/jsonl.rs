//! Append-only JSONL file layer for the durable chat log.
//!
//! Records are written one per line. The handle is only ever opened in
//! append mode, so a crash between appends cannot corrupt previously flushed
//! content; [`JsonlFile::clear`] is the single truncation point, used by the
//! clear-and-rewrite contract.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Append-only JSONL record writer.
#[derive(Debug)]
pub(crate) struct JsonlFile {
    path: PathBuf,
    file: File,
    records_written: u64,
}

impl JsonlFile {
    /// Open or create the JSONL file at the given path.
    pub(crate) fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let records_written = count_lines(path);

        Ok(Self {
            path: path.to_path_buf(),
            file,
            records_written,
        })
    }

    /// Append one record to the file.
    pub(crate) fn append<T: Serialize>(&mut self, record: &T) -> io::Result<()> {
        let json = serde_json::to_string(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.file.write_all(json.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush buffered writes to disk.
    pub(crate) fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    /// Truncate the file. The append handle stays valid; subsequent writes
    /// start from a fresh file.
    pub(crate) fn clear(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.set_len(0)?;
        self.records_written = 0;
        Ok(())
    }

    /// Number of records written (including pre-existing lines).
    pub(crate) fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Underlying file path.
    #[allow(dead_code)]
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

/// Read every record from a JSONL file, skipping malformed lines so one bad
/// entry never blocks a restore.
pub(crate) fn read_all<T: DeserializeOwned>(path: &Path) -> io::Result<Vec<T>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(trimmed) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed chat log line");
            }
        }
    }
    Ok(records)
}

fn count_lines(path: &Path) -> u64 {
    let Ok(file) = File::open(path) else {
        return 0;
    };
    let reader = BufReader::new(file);
    reader.lines().count() as u64
}
