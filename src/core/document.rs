//! In-memory CSV documents
//!
//! A [`Document`] is a list of [`Row`]s. Its text form joins records with
//! `\n` and pads every record to the widest row, so the output is
//! rectangular.

use crate::cell::{Cell, ToCell};
use crate::encoding;
use crate::error::{CsvError, Result};
use crate::escape::{EscapeCodec, DEFAULT_SEPARATOR, LINE_SEPARATOR};
use crate::row::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use tracing::debug;

/// A table of rows held fully in memory
///
/// Building a document works line by line: [`push`](Document::push) adds a
/// value to the last row (creating it if the document is empty) and
/// [`endline`](Document::endline) starts a new one.
///
/// # Examples
///
/// ```
/// use csv_table::Document;
///
/// let mut doc = Document::<';'>::new();
/// doc.push("name").push("age").endline();
/// doc.push("ada").push(36);
/// assert_eq!(doc.to_string(), "name;age\nada;36");
///
/// let parsed = Document::<';'>::parse("name;age\nada;36").unwrap();
/// assert_eq!(parsed, doc);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document<const SEP: char = DEFAULT_SEPARATOR> {
    rows: Vec<Row<SEP>>,
}

impl<const SEP: char> Document<SEP> {
    pub fn new() -> Self {
        Document { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<Row<SEP>>) -> Self {
        Document { rows }
    }

    /// Parse CSV text
    ///
    /// Records are separated by `\n` outside quoted fields. Empty text gives
    /// an empty document; a final `\n` does not open another record.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Ok(Document::new());
        }

        let codec = EscapeCodec::<SEP>::new();
        let rows = codec
            .split(text, LINE_SEPARATOR)?
            .into_iter()
            .map(Row::parse)
            .collect::<Result<Vec<_>>>()?;

        debug!("Parsed document with {} rows", rows.len());
        Ok(Document { rows })
    }

    /// Parse UTF-16 encoded CSV text
    pub fn parse_utf16(units: &[u16]) -> Result<Self> {
        Self::parse(&encoding::from_utf16(units)?)
    }

    /// Render as UTF-16 code units
    pub fn to_utf16(&self) -> Vec<u16> {
        encoding::to_utf16(&self.to_string())
    }

    /// Row `index`, growing the document with empty rows if needed
    pub fn at(&mut self, index: usize) -> &mut Row<SEP> {
        if index >= self.rows.len() {
            self.rows.resize_with(index + 1, Row::default);
        }
        &mut self.rows[index]
    }

    pub fn get(&self, index: usize) -> Option<&Row<SEP>> {
        self.rows.get(index)
    }

    /// Row `index`, or `IndexOutOfRange`
    pub fn row(&self, index: usize) -> Result<&Row<SEP>> {
        self.rows.get(index).ok_or(CsvError::IndexOutOfRange {
            index: index as u64,
            len: self.rows.len() as u64,
        })
    }

    /// The row `push` writes into, created if the document is empty
    pub fn current_row(&mut self) -> &mut Row<SEP> {
        let last = self.rows.len().saturating_sub(1);
        self.at(last)
    }

    /// Append a value to the current row
    pub fn push<T: ToCell>(&mut self, value: T) -> &mut Self {
        self.current_row().push(value);
        self
    }

    pub fn push_cell(&mut self, cell: Cell<SEP>) -> &mut Self {
        self.current_row().push_cell(cell);
        self
    }

    /// Append a whole row after the last one
    pub fn push_row(&mut self, row: Row<SEP>) -> &mut Self {
        self.rows.push(row);
        self
    }

    /// Start a new, empty current row
    pub fn endline(&mut self) -> &mut Self {
        self.rows.push(Row::new());
        self
    }

    /// Append the rows of `other`
    ///
    /// A last row without data is replaced by the first appended row
    /// instead of being kept as a blank line.
    pub fn append(&mut self, other: &Document<SEP>) -> &mut Self {
        if self.rows.last().is_some_and(|row| row.min_size() == 0) && !other.is_empty() {
            self.rows.pop();
        }
        self.rows.extend(other.rows.iter().cloned());
        self
    }

    pub fn remove(&mut self, index: usize) -> Result<Row<SEP>> {
        if index >= self.rows.len() {
            return Err(CsvError::IndexOutOfRange {
                index: index as u64,
                len: self.rows.len() as u64,
            });
        }
        Ok(self.rows.remove(index))
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Strip every row, then drop trailing rows without data
    pub fn strip(&mut self) -> &mut Self {
        for row in &mut self.rows {
            row.strip();
        }
        let keep = self
            .rows
            .iter()
            .rposition(|row| !row.is_empty())
            .map_or(0, |last| last + 1);
        self.rows.truncate(keep);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the widest row, ignoring trailing empty cells
    pub fn max_row_length(&self) -> usize {
        self.rows.iter().map(Row::min_size).max().unwrap_or(0)
    }

    /// Total number of cells holding data, summed per row up to `min_size`
    pub fn num_elements(&self) -> usize {
        self.rows.iter().map(Row::min_size).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row<SEP>> {
        self.rows.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Row<SEP>> {
        self.rows.iter_mut()
    }

    pub fn rows(&self) -> &[Row<SEP>] {
        &self.rows
    }

    /// Write the text form to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(self.to_string().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Read all of `reader` and append the parsed rows
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.append(&Document::parse(&text)?);
        Ok(())
    }
}

impl<const SEP: char> PartialEq for Document<SEP> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl<const SEP: char> Eq for Document<SEP> {}

impl<const SEP: char> fmt::Display for Document<SEP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_row_length();
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                write!(f, "{}", LINE_SEPARATOR)?;
            }
            f.write_str(&row.to_string_padded(width))?;
        }
        Ok(())
    }
}

impl<const SEP: char> std::str::FromStr for Document<SEP> {
    type Err = CsvError;

    fn from_str(s: &str) -> Result<Self> {
        Document::parse(s)
    }
}

impl<const SEP: char> FromIterator<Row<SEP>> for Document<SEP> {
    fn from_iter<I: IntoIterator<Item = Row<SEP>>>(iter: I) -> Self {
        Document {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<const SEP: char> IntoIterator for Document<SEP> {
    type Item = Row<SEP>;
    type IntoIter = std::vec::IntoIter<Row<SEP>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a, const SEP: char> IntoIterator for &'a Document<SEP> {
    type Item = &'a Row<SEP>;
    type IntoIter = std::slice::Iter<'a, Row<SEP>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
