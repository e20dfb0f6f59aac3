//! # csv-table - RFC 4180 CSV values and disk-backed tables
//!
//! `csv-table` provides a small value model for semicolon (or otherwise)
//! separated files and a table type that edits such files in place:
//!
//! - **Cells, rows and documents** with RFC 4180 quoting and typed access
//! - **Numeric-aware comparison** of cells holding integers or floats
//! - **`FileTable`**: row access by index into a file on disk, with a
//!   write-back cache and deferred deletions flushed in one atomic rewrite
//!
//! The field separator is a const generic parameter (`;` by default), so
//! cells and rows of different dialects cannot be mixed by accident.
//!
//! ## Quick Start
//!
//! ```rust
//! use csv_table::{Document, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::<';'>::new();
//! doc.push("city").push("population").endline();
//! doc.push("Zürich; CH").push(421_878);
//!
//! let text = doc.to_string();
//! assert_eq!(text, "city;population\n\"Zürich; CH\";421878");
//!
//! let parsed = Document::<';'>::parse(&text)?;
//! assert_eq!(parsed.row(1)?.cell(1)?.get::<u32>()?, 421_878);
//! # Ok(())
//! # }
//! ```
//!
//! ## Tables on disk
//!
//! ```rust,no_run
//! use csv_table::{FileTableBuilder, FileTable, Result};
//!
//! # fn main() -> Result<()> {
//! let mut table: FileTable = FileTableBuilder::new()
//!     .path("data/cities.csv")
//!     .max_cached(500)
//!     .build()?;
//!
//! table.at(0)?.at(1).set(421_879);
//! table.erase(3)?;
//!
//! // Pending changes are written on flush, at the cache threshold and on drop
//! table.flush()?;
//! # Ok(())
//! # }
//! ```

pub mod core;

// Re-export core modules internally so crate:: paths in core work
#[allow(unused_imports)]
pub(crate) use crate::core::{cell, config, document, encoding, error, escape, file_table, row};

pub use crate::core::{
    cell::{Cell, FromCell, NumberClass, ToCell},
    config::TableConfig,
    document::Document,
    error::{CsvError, Result},
    escape::{EscapeCodec, DEFAULT_SEPARATOR},
    file_table::{Cursor, FileTable, FileTableBuilder, Rows, DEFAULT_MAX_CACHED},
    row::Row,
};

/// A document using the default `;` separator
pub type Csv = Document<DEFAULT_SEPARATOR>;

/// Row-level access shared by in-memory documents and file tables
///
/// # Examples
///
/// ```rust
/// use csv_table::{Document, Result, Row, Table};
///
/// fn header<T: Table<';'>>(table: &T) -> Result<Row<';'>> {
///     table.read_row(0)
/// }
///
/// # fn main() -> Result<()> {
/// let doc = Document::<';'>::parse("a;b\n1;2")?;
/// assert_eq!(header(&doc)?.to_string(), "a;b");
/// # Ok(())
/// # }
/// ```
pub trait Table<const SEP: char> {
    /// Number of rows
    fn row_count(&self) -> u64;

    /// Copy of row `index`
    fn read_row(&self, index: u64) -> Result<Row<SEP>>;

    /// Replace row `index`, growing the table if it is past the end
    fn write_row(&mut self, index: u64, row: Row<SEP>) -> Result<()>;

    /// Remove row `index`; later rows move up by one
    fn remove_row(&mut self, index: u64) -> Result<()>;

    /// Append all rows of `document`
    fn append_rows(&mut self, document: &Document<SEP>) -> Result<()>;
}

/// `index` as a document position, if the platform can address it
fn document_index<const SEP: char>(document: &Document<SEP>, index: u64) -> Result<usize> {
    usize::try_from(index).map_err(|_| CsvError::IndexOutOfRange {
        index,
        len: document.len() as u64,
    })
}

impl<const SEP: char> Table<SEP> for Document<SEP> {
    fn row_count(&self) -> u64 {
        self.len() as u64
    }

    fn read_row(&self, index: u64) -> Result<Row<SEP>> {
        self.row(document_index(self, index)?).cloned()
    }

    fn write_row(&mut self, index: u64, row: Row<SEP>) -> Result<()> {
        let index = document_index(self, index)?;
        *self.at(index) = row;
        Ok(())
    }

    fn remove_row(&mut self, index: u64) -> Result<()> {
        let index = document_index(self, index)?;
        self.remove(index).map(|_| ())
    }

    fn append_rows(&mut self, document: &Document<SEP>) -> Result<()> {
        self.append(document);
        Ok(())
    }
}

impl<const SEP: char> Table<SEP> for FileTable<SEP> {
    fn row_count(&self) -> u64 {
        self.len()
    }

    fn read_row(&self, index: u64) -> Result<Row<SEP>> {
        self.get(index)
    }

    fn write_row(&mut self, index: u64, row: Row<SEP>) -> Result<()> {
        *self.at(index)? = row;
        Ok(())
    }

    fn remove_row(&mut self, index: u64) -> Result<()> {
        self.erase(index).map(|_| ())
    }

    fn append_rows(&mut self, document: &Document<SEP>) -> Result<()> {
        self.append_document(document)
    }
}
