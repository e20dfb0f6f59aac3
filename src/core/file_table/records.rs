//! Record-level disk I/O for file tables
//!
//! A record is one CSV row of the file. Records end at `\n`, except that a
//! `\n` inside an open quote belongs to the record (a quoted field may span
//! lines). The file is only ever rewritten whole, through a sibling
//! temporary file that replaces it by rename.

use crate::encoding;
use crate::error::{CsvError, Result};
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads quote-aware records from a buffered source
///
/// A record whose quote is never closed before end of input is cut back to
/// its first line, and the lines after it are read again as records of their
/// own. Such a record still fails to parse, but only when it is loaded.
pub struct RecordReader<R> {
    inner: R,
    line: Vec<u8>,
    replay: VecDeque<String>,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        RecordReader {
            inner,
            line: Vec::new(),
            replay: VecDeque::new(),
        }
    }

    /// Next physical line without its `\n`, or `None` at end of input
    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.replay.pop_front() {
            return Ok(Some(line));
        }

        self.line.clear();
        if self.inner.read_until(b'\n', &mut self.line)? == 0 {
            return Ok(None);
        }
        if self.line.last() == Some(&b'\n') {
            self.line.pop();
        }
        Ok(Some(encoding::from_utf8(&self.line)?.to_string()))
    }

    /// Read the next record into `record`, without its terminating `\n`
    ///
    /// Returns `false` at end of input.
    pub fn read_record(&mut self, record: &mut String) -> Result<bool> {
        record.clear();
        let Some(first) = self.next_line()? else {
            return Ok(false);
        };
        record.push_str(&first);
        if !toggles_quote(&first) {
            return Ok(true);
        }

        let mut continuation = Vec::new();
        while let Some(line) = self.next_line()? {
            let closes = toggles_quote(&line);
            continuation.push(line);
            if closes {
                for line in &continuation {
                    record.push('\n');
                    record.push_str(line);
                }
                return Ok(true);
            }
        }

        debug!(
            "Unterminated quote in record {:?}, rereading {} lines",
            first,
            continuation.len()
        );
        for line in continuation.into_iter().rev() {
            self.replay.push_front(line);
        }
        Ok(true)
    }

    /// Skip up to `count` records; returns how many were skipped
    pub fn skip_records(&mut self, count: u64) -> Result<u64> {
        let mut scratch = String::new();
        for skipped in 0..count {
            if !self.read_record(&mut scratch)? {
                return Ok(skipped);
            }
        }
        Ok(count)
    }

    /// Count the remaining records
    pub fn count_records(&mut self) -> Result<u64> {
        let mut scratch = String::new();
        let mut count = 0;
        while self.read_record(&mut scratch)? {
            count += 1;
        }
        Ok(count)
    }
}

/// An odd number of quotes opens or closes a quoted span
fn toggles_quote(line: &str) -> bool {
    line.bytes().filter(|&b| b == b'"').count() % 2 == 1
}

/// Create `path` empty if it does not exist yet
pub fn ensure_exists(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CsvError::file_operation(path, e))?;
    Ok(())
}

/// Truncate `path` to zero length
pub fn truncate(path: &Path) -> Result<()> {
    File::create(path).map_err(|e| CsvError::file_operation(path, e))?;
    Ok(())
}

/// Open a record reader positioned at the start of `path`
pub fn open_reader(path: &Path) -> Result<RecordReader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| CsvError::file_operation(path, e))?;
    Ok(RecordReader::new(BufReader::new(file)))
}

/// Number of records stored in `path`
pub fn count_records(path: &Path) -> Result<u64> {
    open_reader(path)?.count_records()
}

/// Record `index` of `path`, or `None` past the last record
pub fn read_record_at(path: &Path, index: u64) -> Result<Option<String>> {
    let mut reader = open_reader(path)?;
    if reader.skip_records(index)? < index {
        return Ok(None);
    }

    let mut record = String::new();
    if reader.read_record(&mut record)? {
        Ok(Some(record))
    } else {
        Ok(None)
    }
}

/// Sibling path used while rewriting `path`
pub fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replaces a file with new records, all at once
///
/// Records are written to a temporary sibling. Only [`commit`](Self::commit)
/// moves it over the target; dropping the rewrite without committing leaves
/// the target untouched.
pub struct AtomicRewrite {
    target: PathBuf,
    temporary: PathBuf,
    writer: BufWriter<File>,
    written: u64,
}

impl AtomicRewrite {
    pub fn create(target: &Path) -> Result<Self> {
        let temporary = temporary_path(target);
        let file = File::create(&temporary).map_err(|e| CsvError::file_operation(&temporary, e))?;

        Ok(AtomicRewrite {
            target: target.to_path_buf(),
            temporary,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append one record; records are joined by `\n` with no final newline
    pub fn write_record(&mut self, record: &str) -> Result<()> {
        if self.written > 0 {
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(record.as_bytes())?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Sync the temporary file and move it over the target
    ///
    /// Returns the number of records written.
    pub fn commit(mut self) -> Result<u64> {
        self.writer.flush()?;
        self.writer
            .get_ref()
            .sync_all()
            .map_err(|e| CsvError::file_operation(&self.temporary, e))?;

        fs::rename(&self.temporary, &self.target)
            .map_err(|e| CsvError::file_operation(&self.target, e))?;

        debug!(
            "Replaced {:?} with {} records",
            self.target, self.written
        );
        Ok(self.written)
    }
}

impl Drop for AtomicRewrite {
    fn drop(&mut self) {
        // After a successful commit the temporary file is gone already
        match fs::remove_file(&self.temporary) {
            Ok(()) => debug!("Discarded unfinished rewrite {:?}", self.temporary),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => debug!("Could not remove {:?}: {}", self.temporary, e),
        }
    }
}
