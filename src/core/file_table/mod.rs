//! Disk-backed CSV tables with a write-back row cache
//!
//! A [`FileTable`] exposes the rows of a CSV file by logical index without
//! loading the whole file. Rows that are written go into an in-memory cache
//! keyed by physical position; erased rows are only marked. Both are applied
//! to the file in one atomic rewrite when the table is flushed, either
//! explicitly, when `cached + pending deletions` reaches `max_cached`, or on
//! drop.
//!
//! Between flushes, logical indices skip the rows marked for deletion, so a
//! table always reads as if every pending change had already been written.

pub mod cursor;
pub mod deletion;
pub mod records;

pub use cursor::{Cursor, Rows};
pub use deletion::DeleteSet;

use crate::cell::{Cell, ToCell};
use crate::document::Document;
use crate::error::{CsvError, Result};
use crate::escape::DEFAULT_SEPARATOR;
use crate::row::Row;
use records::AtomicRewrite;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Cache threshold used when none is configured
pub const DEFAULT_MAX_CACHED: usize = 100;

/// Where the current content of a live row comes from during a scan
enum Stored<'a, const SEP: char> {
    Cached(&'a Row<SEP>),
    Disk(&'a str),
    Blank,
}

/// A CSV file accessed row by row
///
/// # Examples
///
/// ```no_run
/// use csv_table::{FileTable, Result};
///
/// # fn main() -> Result<()> {
/// let mut table = FileTable::<';'>::open("people.csv", 100)?;
/// table.push("ada")?.push(36)?.endline()?;
/// table.at(0)?.at(2).set("london");
///
/// let row = table.get(0)?;
/// assert_eq!(row.cell(0)?.get::<String>()?, "ada");
///
/// table.erase(0)?;
/// table.flush()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileTable<const SEP: char = DEFAULT_SEPARATOR> {
    path: PathBuf,
    max_cached: usize,
    /// Modified rows by physical index
    cache: BTreeMap<u64, Row<SEP>>,
    deletes: DeleteSet,
    /// Records currently stored in the file
    file_rows: u64,
    /// Physical rows including those that only exist in the cache
    line_count: u64,
}

impl<const SEP: char> FileTable<SEP> {
    /// Open the table stored at `path`, creating an empty file if needed
    pub fn open(path: impl AsRef<Path>, max_cached: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        records::ensure_exists(&path)?;
        let file_rows = records::count_records(&path)?;

        info!(
            "Opened table {:?} with {} rows (max_cached={})",
            path, file_rows, max_cached
        );

        Ok(FileTable {
            path,
            max_cached,
            cache: BTreeMap::new(),
            deletes: DeleteSet::new(),
            file_rows,
            line_count: file_rows,
        })
    }

    pub fn builder() -> FileTableBuilder {
        FileTableBuilder::new()
    }

    /// Number of logical rows, pending changes included
    pub fn len(&self) -> u64 {
        self.line_count - self.deletes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_cached(&self) -> usize {
        self.max_cached
    }

    pub fn set_max_cached(&mut self, max_cached: usize) {
        self.max_cached = max_cached;
    }

    /// Rows currently held in the cache
    pub fn cached_rows(&self) -> usize {
        self.cache.len()
    }

    /// Erased rows not yet removed from the file
    pub fn pending_deletes(&self) -> usize {
        self.deletes.len()
    }

    /// Records in the file as of the last flush
    pub fn persisted_rows(&self) -> u64 {
        self.file_rows
    }

    fn translate(&self, index: u64) -> u64 {
        self.deletes.translate(index)
    }

    fn check_index(&self, index: u64) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(CsvError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn is_full(&self) -> bool {
        let pending = self.cache.len() + self.deletes.len();
        pending > 0 && pending >= self.max_cached
    }

    fn flush_if_full(&mut self) -> Result<()> {
        if self.is_full() {
            debug!(
                "Cache threshold reached ({} cached, {} deletes), flushing",
                self.cache.len(),
                self.deletes.len()
            );
            self.write_back()?;
        }
        Ok(())
    }

    /// Parse a stored record; trailing padding is stripped
    fn parse_stored(record: &str) -> Result<Row<SEP>> {
        let mut row = Row::parse(record)?;
        row.strip();
        Ok(row)
    }

    /// Read one stored row
    fn load_from_disk(path: &Path, physical: u64) -> Result<Row<SEP>> {
        debug!("Reading row {} from {:?}", physical, path);
        match records::read_record_at(path, physical)? {
            Some(record) => Self::parse_stored(&record),
            None => Ok(Row::new()),
        }
    }

    /// Copy of row `index`
    ///
    /// Does not touch the cache.
    pub fn get(&self, index: u64) -> Result<Row<SEP>> {
        self.check_index(index)?;
        let physical = self.translate(index);

        match self.cache.get(&physical) {
            Some(row) => Ok(row.clone()),
            None if physical < self.file_rows => Self::load_from_disk(&self.path, physical),
            None => Ok(Row::new()),
        }
    }

    /// Row `index` for writing
    ///
    /// The row is loaded into the cache. An index past the end grows the
    /// table with empty rows up to and including `index`.
    pub fn at(&mut self, index: u64) -> Result<&mut Row<SEP>> {
        if !self.cache.contains_key(&self.translate(index)) && self.is_full() {
            debug!("Cache full before loading row {}, flushing", index);
            self.write_back()?;
        }

        let physical = self.translate(index);
        if index >= self.len() {
            self.line_count = physical + 1;
        }

        let row = match self.cache.entry(physical) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let row = if physical < self.file_rows {
                    Self::load_from_disk(&self.path, physical)?
                } else {
                    Row::new()
                };
                entry.insert(row)
            }
        };
        Ok(row)
    }

    /// A cursor at row `index`
    pub fn cursor(&mut self, index: u64) -> Cursor<'_, SEP> {
        Cursor::new(self, index)
    }

    pub fn iter(&self) -> Rows<'_, SEP> {
        Rows::new(self)
    }

    /// Append a value to the last row, creating it if the table is empty
    pub fn push<T: ToCell>(&mut self, value: T) -> Result<&mut Self> {
        let current = self.len().saturating_sub(1);
        self.at(current)?.push(value);
        self.flush_if_full()?;
        Ok(self)
    }

    pub fn push_cell(&mut self, cell: Cell<SEP>) -> Result<&mut Self> {
        let current = self.len().saturating_sub(1);
        self.at(current)?.push_cell(cell);
        self.flush_if_full()?;
        Ok(self)
    }

    /// Append a whole row after the last one
    pub fn push_row(&mut self, row: Row<SEP>) -> Result<&mut Self> {
        let next = self.len();
        *self.at(next)? = row;
        self.flush_if_full()?;
        Ok(self)
    }

    /// Start a new, empty last row
    pub fn endline(&mut self) -> Result<&mut Self> {
        let next = self.len();
        self.at(next)?;
        self.flush_if_full()?;
        Ok(self)
    }

    /// Append the rows of `document`
    ///
    /// A last row without data is replaced by the first appended row, the
    /// same way [`Document::append`] does it.
    pub fn append_document(&mut self, document: &Document<SEP>) -> Result<()> {
        if document.is_empty() {
            return Ok(());
        }

        let mut next = self.len();
        if next > 0 && self.get(next - 1)?.min_size() == 0 {
            next -= 1;
        }

        for row in document {
            *self.at(next)? = row.clone();
            next += 1;
            self.flush_if_full()?;
        }
        Ok(())
    }

    /// Replace the whole content with `document`
    pub fn assign(&mut self, document: &Document<SEP>) -> Result<()> {
        self.clear()?;
        self.append_document(document)
    }

    /// Mark row `index` for deletion
    ///
    /// Returns a cursor at the row that now has index `index`.
    pub fn erase(&mut self, index: u64) -> Result<Cursor<'_, SEP>> {
        self.check_index(index)?;
        let physical = self.translate(index);

        self.cache.remove(&physical);
        self.deletes.insert(physical);
        debug!("Marked row {} (physical {}) for deletion", index, physical);

        self.flush_if_full()?;
        Ok(Cursor::new(self, index))
    }

    /// Drop all rows and truncate the file
    pub fn clear(&mut self) -> Result<()> {
        records::truncate(&self.path)?;
        self.cache.clear();
        self.deletes.clear();
        self.file_rows = 0;
        self.line_count = 0;
        info!("Cleared table {:?}", self.path);
        Ok(())
    }

    /// Width of the widest live row, ignoring trailing empty cells
    pub fn max_row_length(&self) -> Result<usize> {
        let mut width = 0;
        self.for_each_live_row(|stored| {
            let size = match stored {
                Stored::Cached(row) => row.min_size(),
                Stored::Disk(record) => Row::<SEP>::parse(record)?.min_size(),
                Stored::Blank => 0,
            };
            width = width.max(size);
            Ok(())
        })?;
        Ok(width)
    }

    /// Write pending changes to the file
    ///
    /// Does nothing if there are none. On failure the pending changes are
    /// kept and the file is left as it was.
    pub fn flush(&mut self) -> Result<()> {
        if self.cache.is_empty() && self.deletes.is_empty() && self.line_count == self.file_rows {
            return Ok(());
        }
        self.write_back()
    }

    /// Flush, then load the whole table into a document
    pub fn to_document(&mut self) -> Result<Document<SEP>> {
        self.flush()?;

        let text = fs::read_to_string(&self.path)
            .map_err(|e| CsvError::file_operation(&self.path, e))?;
        let mut document = Document::parse(&text)?;
        while (document.len() as u64) < self.file_rows {
            document.push_row(Row::new());
        }
        Ok(document)
    }

    /// Append the whole table to `document`
    pub fn read_into(&mut self, document: &mut Document<SEP>) -> Result<()> {
        let loaded = self.to_document()?;
        document.append(&loaded);
        Ok(())
    }

    /// Visit every live row in physical order
    fn for_each_live_row<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(Stored<'_, SEP>) -> Result<()>,
    {
        let mut reader = records::open_reader(&self.path)?;
        let mut record = String::new();

        for physical in 0..self.line_count {
            let on_disk = physical < self.file_rows && reader.read_record(&mut record)?;
            if self.deletes.contains(physical) {
                continue;
            }

            let stored = match self.cache.get(&physical) {
                Some(row) => Stored::Cached(row),
                None if on_disk => Stored::Disk(&record),
                None => Stored::Blank,
            };
            visit(stored)?;
        }
        Ok(())
    }

    /// Rewrite the file with every live row padded to the widest one
    fn write_back(&mut self) -> Result<()> {
        let width = self.max_row_length()?;
        let mut rewrite = AtomicRewrite::create(&self.path)?;

        self.for_each_live_row(|stored| {
            let rendered = match stored {
                Stored::Cached(row) => row.to_string_padded(width),
                Stored::Disk(record) => Row::<SEP>::parse(record)?.to_string_padded(width),
                Stored::Blank => Row::<SEP>::new().to_string_padded(width),
            };
            rewrite.write_record(&rendered)
        })?;

        let written = rewrite.commit()?;
        info!(
            "Flushed table {:?}: {} rows written ({} cached, {} deleted)",
            self.path,
            written,
            self.cache.len(),
            self.deletes.len()
        );

        self.cache.clear();
        self.deletes.clear();
        self.file_rows = written;
        self.line_count = written;
        Ok(())
    }
}

impl<const SEP: char> Drop for FileTable<SEP> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("Failed to flush table {:?} on drop: {}", self.path, e);
        }
    }
}

impl<'a, const SEP: char> IntoIterator for &'a FileTable<SEP> {
    type Item = Result<Row<SEP>>;
    type IntoIter = Rows<'a, SEP>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder for opening a [`FileTable`]
///
/// # Examples
///
/// ```no_run
/// use csv_table::{FileTable, FileTableBuilder};
///
/// # fn main() -> csv_table::Result<()> {
/// let table: FileTable = FileTableBuilder::new()
///     .path("data/table.csv")
///     .max_cached(500)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileTableBuilder {
    path: Option<PathBuf>,
    max_cached: usize,
}

impl FileTableBuilder {
    pub fn new() -> Self {
        FileTableBuilder {
            path: None,
            max_cached: DEFAULT_MAX_CACHED,
        }
    }

    /// Set the backing file
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the flush threshold
    pub fn max_cached(mut self, max_cached: usize) -> Self {
        self.max_cached = max_cached;
        self
    }

    pub fn build<const SEP: char>(self) -> Result<FileTable<SEP>> {
        let path = self
            .path
            .ok_or_else(|| CsvError::Config("path must be set".to_string()))?;
        FileTable::open(path, self.max_cached)
    }
}

impl Default for FileTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    type T = FileTable<';'>;

    fn table_in(dir: &TempDir, max_cached: usize) -> Result<T> {
        T::open(dir.path().join("table.csv"), max_cached)
    }

    #[test]
    fn test_open_creates_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let table = table_in(&dir, 10)?;
        assert!(table.path().exists());
        assert!(table.is_empty());
        Ok(())
    }

    #[test]
    fn test_open_counts_existing_rows() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        fs::write(&path, "a;b\n\"x\ny\";z\nc")?;

        let table = T::open(&path, 10)?;
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.get(1)?.cell(0)?.get::<String>()?,
            "x\ny"
        );
        Ok(())
    }

    #[test]
    fn test_get_out_of_range() -> Result<()> {
        let dir = TempDir::new()?;
        let table = table_in(&dir, 10)?;
        assert!(matches!(
            table.get(0),
            Err(CsvError::IndexOutOfRange { index: 0, len: 0 })
        ));
        Ok(())
    }

    #[test]
    fn test_at_grows_table() -> Result<()> {
        let dir = TempDir::new()?;
        let mut table = table_in(&dir, 10)?;
        table.at(3)?.at(1).set("x");
        assert_eq!(table.len(), 4);
        assert!(table.get(0)?.is_empty());
        assert_eq!(table.get(3)?.to_string(), ";x");
        Ok(())
    }

    #[test]
    fn test_flush_writes_padded_rows() -> Result<()> {
        let dir = TempDir::new()?;
        let mut table = table_in(&dir, 10)?;
        table.push("a")?.push("b")?.push("c")?.endline()?;
        table.push(1)?;
        table.flush()?;

        assert_eq!(fs::read_to_string(table.path())?, "a;b;c\n1;;");
        assert_eq!(table.cached_rows(), 0);
        assert_eq!(table.persisted_rows(), 2);
        Ok(())
    }

    #[test]
    fn test_flush_without_changes_is_noop() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        fs::write(&path, "a;b\nc")?;

        let mut table = T::open(&path, 10)?;
        let _ = table.get(0)?;
        table.flush()?;
        assert_eq!(fs::read_to_string(&path)?, "a;b\nc");
        Ok(())
    }

    #[test]
    fn test_erase_shifts_indices() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        fs::write(&path, "0\n1\n2\n3\n4")?;

        let mut table = T::open(&path, 100)?;
        let cursor = table.erase(1)?;
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.row()?.to_string(), "2");

        table.erase(2)?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.pending_deletes(), 2);
        let remaining: Vec<String> = table
            .iter()
            .map(|row| row.map(|r| r.to_string()))
            .collect::<Result<_>>()?;
        assert_eq!(remaining, vec!["0", "2", "4"]);

        table.flush()?;
        assert_eq!(fs::read_to_string(&path)?, "0\n2\n4");
        Ok(())
    }

    #[test]
    fn test_erase_out_of_range() -> Result<()> {
        let dir = TempDir::new()?;
        let mut table = table_in(&dir, 10)?;
        table.push("a")?;
        assert!(table.erase(1).is_err());
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn test_write_after_erase_targets_live_row() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        fs::write(&path, "a\nb\nc")?;

        let mut table = T::open(&path, 100)?;
        table.erase(0)?;
        table.at(0)?.at(1).set("B");
        table.at(2)?.push("d");
        table.flush()?;

        assert_eq!(fs::read_to_string(&path)?, "b;B\nc;\nd;");
        Ok(())
    }

    #[test]
    fn test_auto_flush_at_threshold() -> Result<()> {
        let dir = TempDir::new()?;
        let mut table = table_in(&dir, 3)?;
        for i in 0..5 {
            table.at(i)?.push(i);
        }
        assert!(table.persisted_rows() >= 3);
        assert!(table.cached_rows() < 3);
        assert_eq!(table.len(), 5);
        Ok(())
    }

    #[test]
    fn test_drop_flushes() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        {
            let mut table = T::open(&path, 100)?;
            table.push("x")?.push("y")?;
        }
        assert_eq!(fs::read_to_string(&path)?, "x;y");
        Ok(())
    }

    #[test]
    fn test_append_document_reuses_blank_row() -> Result<()> {
        let dir = TempDir::new()?;
        let mut table = table_in(&dir, 100)?;
        table.push("head")?.endline()?;

        let doc = Document::<';'>::parse("a;b\nc")?;
        table.append_document(&doc)?;
        assert_eq!(table.len(), 3);

        let loaded = table.to_document()?;
        assert_eq!(loaded.to_string(), "head;\na;b\nc;");
        Ok(())
    }

    #[test]
    fn test_assign_replaces_content() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        fs::write(&path, "old\nrows")?;

        let mut table = T::open(&path, 100)?;
        table.assign(&Document::parse("new")?)?;
        table.flush()?;
        assert_eq!(fs::read_to_string(&path)?, "new");
        Ok(())
    }

    #[test]
    fn test_clear_truncates() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        fs::write(&path, "a\nb")?;

        let mut table = T::open(&path, 100)?;
        table.push("c")?;
        table.clear()?;
        assert!(table.is_empty());
        assert_eq!(fs::read_to_string(&path)?, "");
        Ok(())
    }

    #[test]
    fn test_max_row_length_sees_cache_and_disk() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        fs::write(&path, "a;b\nc;;")?;

        let mut table = T::open(&path, 100)?;
        assert_eq!(table.max_row_length()?, 2);
        table.at(1)?.at(4).set("e");
        assert_eq!(table.max_row_length()?, 5);
        table.erase(1)?;
        assert_eq!(table.max_row_length()?, 2);
        Ok(())
    }

    #[test]
    fn test_read_into_appends() -> Result<()> {
        let dir = TempDir::new()?;
        let mut table = table_in(&dir, 100)?;
        table.push("x")?;

        let mut doc = Document::<';'>::parse("first")?;
        table.read_into(&mut doc)?;
        assert_eq!(doc.to_string(), "first\nx");
        Ok(())
    }

    #[test]
    fn test_cursor_walk_and_edit() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        fs::write(&path, "a\nb\nc")?;

        let mut table = T::open(&path, 100)?;
        let mut cursor = table.cursor(0);
        cursor.row_mut()?.push(1);
        assert!(cursor.advance());
        let cursor = cursor.erase()?;
        assert_eq!(cursor.row()?.to_string(), "c");

        let table = cursor.into_table();
        table.flush()?;
        assert_eq!(fs::read_to_string(&path)?, "a;1\nc;");
        Ok(())
    }

    #[test]
    fn test_builder_requires_path() {
        let err = FileTableBuilder::new().build::<';'>().err();
        assert!(matches!(err, Some(CsvError::Config(_))));
    }

    #[test]
    fn test_builder_opens_table() -> Result<()> {
        let dir = TempDir::new()?;
        let table: FileTable = FileTableBuilder::new()
            .path(dir.path().join("built.csv"))
            .max_cached(7)
            .build()?;
        assert_eq!(table.max_cached(), 7);
        Ok(())
    }

    #[test]
    fn test_unbalanced_row_fails_only_when_loaded() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        fs::write(&path, "ok\n\"bad\nok2")?;

        let mut table = T::open(&path, 10)?;
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0)?.to_string(), "ok");
        assert_eq!(table.get(2)?.to_string(), "ok2");
        assert_eq!(table.get(1).unwrap_err().kind(), "ParseError");
        assert_eq!(table.at(1).unwrap_err().kind(), "ParseError");
        assert_eq!(table.cached_rows(), 0);

        table.at(0)?.push("x");
        assert_eq!(table.flush().unwrap_err().kind(), "ParseError");
        assert_eq!(fs::read_to_string(&path)?, "ok\n\"bad\nok2");

        table.erase(1)?;
        table.flush()?;
        assert_eq!(fs::read_to_string(&path)?, "ok;x\nok2;");
        assert_eq!(table.len(), 2);
        Ok(())
    }

    #[test]
    fn test_iter_streams_pending_state() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        fs::write(&path, "a;;\n\"x\ny\";b\nc\n\"bad\nd")?;

        let mut table = T::open(&path, 100)?;
        assert_eq!(table.len(), 5);
        table.at(2)?.push("edited");
        table.erase(0)?;
        table.at(6)?.push("tail");

        let rows: Vec<_> = table.iter().collect();
        assert_eq!(rows.len(), table.len() as usize);
        assert_eq!(table.iter().len(), 7);
        for (index, row) in rows.iter().enumerate() {
            match table.get(index as u64) {
                Ok(expected) => assert_eq!(row.as_ref().ok(), Some(&expected)),
                Err(e) => assert_eq!(row.as_ref().unwrap_err().kind(), e.kind()),
            }
        }

        assert_eq!(rows[1].as_ref().unwrap().to_string(), "c;edited");
        assert_eq!(rows[2].as_ref().unwrap_err().kind(), "ParseError");
        assert_eq!(rows[3].as_ref().unwrap().to_string(), "d");
        assert_eq!(rows[0].as_ref().unwrap().to_string(), "\"x\ny\";b");
        assert_eq!(rows[4].as_ref().unwrap().len(), 0);
        assert_eq!(rows[5].as_ref().unwrap().len(), 0);
        assert_eq!(rows[6].as_ref().unwrap().to_string(), "tail");
        Ok(())
    }

    #[test]
    fn test_failed_flush_keeps_pending_rows() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.csv");
        let mut table = T::open(&path, 100)?;
        table.push("kept")?;

        // A directory in place of the temporary file makes the rewrite fail
        fs::create_dir(records::temporary_path(&path))?;
        assert!(table.flush().is_err());
        assert_eq!(table.cached_rows(), 1);
        assert_eq!(fs::read_to_string(&path)?, "");

        fs::remove_dir(records::temporary_path(&path))?;
        table.flush()?;
        assert_eq!(fs::read_to_string(&path)?, "kept");
        Ok(())
    }
}
