//! Positional access into a [`FileTable`]

use super::records::{self, RecordReader};
use super::FileTable;
use crate::error::{CsvError, Result};
use crate::row::Row;
use std::fs::File;
use std::io::BufReader;
use tracing::debug;

/// A mutable position within a file table
///
/// Returned by [`FileTable::erase`], pointing at the row that took the
/// erased row's place.
pub struct Cursor<'a, const SEP: char> {
    table: &'a mut FileTable<SEP>,
    index: u64,
}

impl<'a, const SEP: char> Cursor<'a, SEP> {
    pub(crate) fn new(table: &'a mut FileTable<SEP>, index: u64) -> Self {
        Cursor { table, index }
    }

    /// Logical row index the cursor points at
    pub fn index(&self) -> u64 {
        self.index
    }

    /// True once the cursor is past the last row
    pub fn is_end(&self) -> bool {
        self.index >= self.table.len()
    }

    /// Copy of the row under the cursor
    pub fn row(&self) -> Result<Row<SEP>> {
        self.table.get(self.index)
    }

    /// The row under the cursor, loaded into the cache for writing
    pub fn row_mut(&mut self) -> Result<&mut Row<SEP>> {
        if self.is_end() {
            return Err(CsvError::IndexOutOfRange {
                index: self.index,
                len: self.table.len(),
            });
        }
        self.table.at(self.index)
    }

    /// Move to the next row; returns false once past the end
    pub fn advance(&mut self) -> bool {
        if !self.is_end() {
            self.index += 1;
        }
        !self.is_end()
    }

    /// Erase the row under the cursor, returning a cursor at its successor
    pub fn erase(self) -> Result<Cursor<'a, SEP>> {
        let Cursor { table, index } = self;
        table.erase(index)
    }

    pub fn into_table(self) -> &'a mut FileTable<SEP> {
        self.table
    }
}

/// Iterator over the rows of a [`FileTable`], front to back
///
/// Stored rows are streamed from a single pass over the file. A row that
/// fails to parse yields its error and iteration moves on; a read error
/// ends it.
pub struct Rows<'a, const SEP: char> {
    table: &'a FileTable<SEP>,
    reader: Option<RecordReader<BufReader<File>>>,
    record: String,
    physical: u64,
    remaining: u64,
}

impl<'a, const SEP: char> Rows<'a, SEP> {
    pub(crate) fn new(table: &'a FileTable<SEP>) -> Self {
        Rows {
            table,
            reader: None,
            record: String::new(),
            physical: 0,
            remaining: table.len(),
        }
    }

    /// Read the record at the current physical position, if the file has one
    fn read_stored(&mut self) -> Result<bool> {
        if self.physical >= self.table.file_rows {
            return Ok(false);
        }

        if self.reader.is_none() {
            debug!("Streaming rows from {:?}", self.table.path);
            self.reader = Some(records::open_reader(&self.table.path)?);
        }
        match &mut self.reader {
            Some(reader) => reader.read_record(&mut self.record),
            None => Ok(false),
        }
    }
}

impl<const SEP: char> Iterator for Rows<'_, SEP> {
    type Item = Result<Row<SEP>>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            let on_disk = match self.read_stored() {
                Ok(on_disk) => on_disk,
                Err(e) => {
                    self.remaining = 0;
                    return Some(Err(e));
                }
            };
            let physical = self.physical;
            self.physical += 1;

            if self.table.deletes.contains(physical) {
                continue;
            }
            self.remaining -= 1;

            let row = match self.table.cache.get(&physical) {
                Some(row) => Ok(row.clone()),
                None if on_disk => FileTable::<SEP>::parse_stored(&self.record),
                None => Ok(Row::new()),
            };
            return Some(row);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl<const SEP: char> ExactSizeIterator for Rows<'_, SEP> {}
