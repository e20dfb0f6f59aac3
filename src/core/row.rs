//! One record of a document

use crate::cell::{Cell, ToCell};
use crate::error::{CsvError, Result};
use crate::escape::{EscapeCodec, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of cells
///
/// Trailing empty cells carry no data: [`min_size`](Row::min_size) ignores
/// them, equality ignores them, and rendering drops them unless the row is
/// padded to a wider table.
///
/// # Examples
///
/// ```
/// use csv_table::Row;
///
/// let mut row = Row::<';'>::new();
/// row.push("a").push(1).push("");
/// assert_eq!(row.len(), 3);
/// assert_eq!(row.min_size(), 2);
/// assert_eq!(row.to_string(), "a;1");
/// assert_eq!(row.to_string_padded(4), "a;1;;");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row<const SEP: char = DEFAULT_SEPARATOR> {
    cells: Vec<Cell<SEP>>,
}

impl<const SEP: char> Row<SEP> {
    pub fn new() -> Self {
        Row { cells: Vec::new() }
    }

    /// Parse one record into cells
    ///
    /// An empty record gives a row without cells.
    pub fn parse(record: &str) -> Result<Self> {
        if record.is_empty() {
            return Ok(Row::new());
        }

        let codec = EscapeCodec::<SEP>::new();
        let cells = codec
            .split_fields(record)?
            .into_iter()
            .map(Cell::from_raw)
            .collect();

        Ok(Row { cells })
    }

    /// Build a row from typed values
    pub fn from_values<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToCell,
    {
        values.into_iter().map(Cell::new).collect()
    }

    /// Cell `index`, growing the row with empty cells if needed
    pub fn at(&mut self, index: usize) -> &mut Cell<SEP> {
        if index >= self.cells.len() {
            self.cells.resize_with(index + 1, Cell::default);
        }
        &mut self.cells[index]
    }

    pub fn get(&self, index: usize) -> Option<&Cell<SEP>> {
        self.cells.get(index)
    }

    /// Cell `index`, or `IndexOutOfRange`
    pub fn cell(&self, index: usize) -> Result<&Cell<SEP>> {
        self.cells.get(index).ok_or(CsvError::IndexOutOfRange {
            index: index as u64,
            len: self.cells.len() as u64,
        })
    }

    /// Append a typed value as a new cell
    pub fn push<T: ToCell>(&mut self, value: T) -> &mut Self {
        self.cells.push(Cell::new(value));
        self
    }

    pub fn push_cell(&mut self, cell: Cell<SEP>) -> &mut Self {
        self.cells.push(cell);
        self
    }

    /// Append an empty cell and hand it out for writing
    pub fn next_cell(&mut self) -> &mut Cell<SEP> {
        let index = self.cells.len();
        self.at(index)
    }

    /// Append all cells of `other`
    pub fn extend_from_row(&mut self, other: &Row<SEP>) -> &mut Self {
        self.cells.extend(other.cells.iter().cloned());
        self
    }

    /// A new row holding the cells of `self` followed by those of `other`
    pub fn concat(&self, other: &Row<SEP>) -> Row<SEP> {
        let mut joined = self.clone();
        joined.extend_from_row(other);
        joined
    }

    pub fn remove(&mut self, index: usize) -> Result<Cell<SEP>> {
        if index >= self.cells.len() {
            return Err(CsvError::IndexOutOfRange {
                index: index as u64,
                len: self.cells.len() as u64,
            });
        }
        Ok(self.cells.remove(index))
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Drop trailing empty cells
    pub fn strip(&mut self) -> &mut Self {
        let keep = self.min_size();
        self.cells.truncate(keep);
        self
    }

    /// Number of cells, including trailing empty ones
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the row has no cells at all
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells up to and including the last non-empty one
    pub fn min_size(&self) -> usize {
        self.cells
            .iter()
            .rposition(|cell| !cell.is_empty())
            .map_or(0, |last| last + 1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell<SEP>> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Cell<SEP>> {
        self.cells.iter_mut()
    }

    pub fn cells(&self) -> &[Cell<SEP>] {
        &self.cells
    }

    /// Render with at least `pad` fields
    ///
    /// Fields are joined by the separator, never followed by one.
    pub fn to_string_padded(&self, pad: usize) -> String {
        let width = self.min_size().max(pad);
        let mut out = String::new();
        for index in 0..width {
            if index > 0 {
                out.push(SEP);
            }
            if let Some(cell) = self.cells.get(index) {
                out.push_str(cell.raw_value());
            }
        }
        out
    }
}

impl<const SEP: char> PartialEq for Row<SEP> {
    fn eq(&self, other: &Self) -> bool {
        let size = self.min_size();
        size == other.min_size() && self.cells[..size] == other.cells[..size]
    }
}

impl<const SEP: char> Eq for Row<SEP> {}

impl<const SEP: char> fmt::Display for Row<SEP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_padded(0))
    }
}

impl<const SEP: char> std::str::FromStr for Row<SEP> {
    type Err = CsvError;

    fn from_str(s: &str) -> Result<Self> {
        Row::parse(s)
    }
}

impl<const SEP: char> FromIterator<Cell<SEP>> for Row<SEP> {
    fn from_iter<I: IntoIterator<Item = Cell<SEP>>>(iter: I) -> Self {
        Row {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<const SEP: char> IntoIterator for Row<SEP> {
    type Item = Cell<SEP>;
    type IntoIter = std::vec::IntoIter<Cell<SEP>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a, const SEP: char> IntoIterator for &'a Row<SEP> {
    type Item = &'a Cell<SEP>;
    type IntoIter = std::slice::Iter<'a, Cell<SEP>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type R = Row<';'>;

    #[test]
    fn test_parse_fields() {
        let row = R::parse("a;\"b;c\";1").unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row.cell(1).unwrap().get::<String>().unwrap(), "b;c");
        assert_eq!(row.cell(2).unwrap().get::<i32>().unwrap(), 1);
    }

    #[test]
    fn test_parse_empty_record() {
        assert!(R::parse("").unwrap().is_empty());
        assert_eq!(R::parse(";").unwrap().len(), 2);
    }

    #[test]
    fn test_parse_trailing_separator() {
        let row = R::parse("a;b;").unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row.min_size(), 2);
    }

    #[test]
    fn test_parse_unbalanced_quote() {
        assert_eq!(R::parse("a;\"b").unwrap_err().kind(), "ParseError");
    }

    #[test]
    fn test_at_grows() {
        let mut row = R::new();
        row.at(3).set("x");
        assert_eq!(row.len(), 4);
        assert_eq!(row.to_string(), ";;;x");
        assert!(row.get(0).unwrap().is_empty());
    }

    #[test]
    fn test_cell_out_of_range() {
        let row = R::from_values(["a"]);
        assert!(matches!(
            row.cell(5),
            Err(CsvError::IndexOutOfRange { index: 5, len: 1 })
        ));
    }

    #[test]
    fn test_min_size_ignores_trailing_empties() {
        let mut row = R::from_values(["a", "", "b", "", ""]);
        assert_eq!(row.len(), 5);
        assert_eq!(row.min_size(), 3);
        row.strip();
        assert_eq!(row.len(), 3);
        assert_eq!(R::from_values(["", ""]).min_size(), 0);
    }

    #[test]
    fn test_equality_ignores_trailing_empties() {
        assert_eq!(R::from_values(["a", ""]), R::from_values(["a"]));
        assert_eq!(R::parse("a;\"\"").unwrap(), R::from_values(["a"]));
        assert_ne!(R::from_values(["a", "b"]), R::from_values(["a"]));
        assert_ne!(R::from_values(["", "a"]), R::from_values(["a"]));
    }

    #[test]
    fn test_render_padding() {
        let row = R::from_values(["a", "b"]);
        assert_eq!(row.to_string_padded(0), "a;b");
        assert_eq!(row.to_string_padded(1), "a;b");
        assert_eq!(row.to_string_padded(4), "a;b;;");
        assert_eq!(R::new().to_string_padded(3), ";;");
        assert_eq!(R::new().to_string(), "");
    }

    #[test]
    fn test_render_escapes() {
        let mut row = R::new();
        row.push("x;y").push("q\"").push(2.5);
        assert_eq!(row.to_string(), "\"x;y\";\"q\"\"\";2.5");
        assert_eq!(R::parse(&row.to_string()).unwrap(), row);
    }

    #[test]
    fn test_concat_and_extend() {
        let left = R::from_values(["a"]);
        let right = R::from_values(["b", "c"]);
        let joined = left.concat(&right);
        assert_eq!(joined.to_string(), "a;b;c");
        assert_eq!(left.len(), 1);

        let mut grown = left.clone();
        grown.extend_from_row(&right).push("d");
        assert_eq!(grown.to_string(), "a;b;c;d");
    }

    #[test]
    fn test_next_cell_and_remove() {
        let mut row = R::new();
        row.next_cell().set(1);
        row.next_cell().set(2);
        assert_eq!(row.to_string(), "1;2");

        let removed = row.remove(0).unwrap();
        assert_eq!(removed.get::<i32>().unwrap(), 1);
        assert_eq!(row.to_string(), "2");
        assert!(row.remove(4).is_err());
    }

    #[test]
    fn test_iteration() {
        let row = R::from_values([1, 2, 3]);
        let total: i32 = row.iter().map(|c| c.get::<i32>().unwrap()).sum();
        assert_eq!(total, 6);
        assert_eq!((&row).into_iter().count(), 3);
    }

    #[test]
    fn test_comma_separator() {
        let row = Row::<','>::parse("a;b,c").unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row.cell(0).unwrap().get::<String>().unwrap(), "a;b");
    }
}
