//! A single CSV field
//!
//! A [`Cell`] stores the escaped text of one field, the way it appears in
//! the file. Values go in through [`ToCell`] and come out through
//! [`FromCell`]; both sides apply the escape rules of
//! [`EscapeCodec`](crate::escape::EscapeCodec).
//!
//! Numeric and boolean classification works on the text with one wrapping
//! quote pair removed, so `"12"` and `12` are both integers.

use crate::error::{CsvError, Result};
use crate::escape::{strip_wrapping_quotes, EscapeCodec, DEFAULT_SEPARATOR};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const INTEGER_PATTERN: &str = r"^-?[0-9]+$";
const FLOAT_PATTERN: &str = r"^-?[0-9]+\.[0-9]+$";

fn integer_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(INTEGER_PATTERN).unwrap())
}

fn float_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(FLOAT_PATTERN).unwrap())
}

/// Numeric shape of a cell's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberClass {
    /// Optional minus followed by digits
    Integer,
    /// Optional minus, digits, a dot and more digits
    Float,
    NotANumber,
}

impl NumberClass {
    pub fn of(text: &str) -> Self {
        if integer_regex().is_match(text) {
            NumberClass::Integer
        } else if float_regex().is_match(text) {
            NumberClass::Float
        } else {
            NumberClass::NotANumber
        }
    }

    pub fn is_number(self) -> bool {
        self != NumberClass::NotANumber
    }
}

/// One field of a row, stored escaped
///
/// # Examples
///
/// ```
/// use csv_table::Cell;
///
/// let mut cell = Cell::<';'>::new("a;b");
/// assert_eq!(cell.raw_value(), "\"a;b\"");
/// assert_eq!(cell.get::<String>().unwrap(), "a;b");
///
/// cell.set(42);
/// assert!(cell.is_decimal());
/// assert_eq!(cell.get::<i32>().unwrap(), 42);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cell<const SEP: char = DEFAULT_SEPARATOR> {
    value: String,
}

impl<const SEP: char> Cell<SEP> {
    const CODEC: EscapeCodec<SEP> = EscapeCodec::new();

    /// Create a cell from a typed value, escaping it
    pub fn new<T: ToCell>(value: T) -> Self {
        let mut cell = Cell::default();
        cell.set(value);
        cell
    }

    /// Create a cell from text that is already escaped
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Cell { value: raw.into() }
    }

    /// Replace the value with a typed one, escaping it
    pub fn set<T: ToCell>(&mut self, value: T) -> &mut Self {
        let text = value.to_cell_text();
        self.value = Self::CODEC.escape_string(&text).into_owned();
        self
    }

    /// Read the value as `T`
    pub fn get<T: FromCell>(&self) -> Result<T> {
        T::from_cell(self)
    }

    /// The stored, escaped text
    pub fn raw_value(&self) -> &str {
        &self.value
    }

    /// Replace the stored text verbatim
    pub fn set_raw_value(&mut self, raw: impl Into<String>) {
        self.value = raw.into();
    }

    /// Fully unescaped text
    pub fn text(&self) -> Cow<'_, str> {
        Self::CODEC.unescape_string(&self.value, false)
    }

    /// Text with only the wrapping quotes removed; used for classification
    fn stripped(&self) -> &str {
        strip_wrapping_quotes(&self.value)
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Length in bytes of the unescaped text
    pub fn len(&self) -> usize {
        self.text().len()
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    pub fn number_class(&self) -> NumberClass {
        NumberClass::of(self.stripped())
    }

    pub fn is_number(&self) -> bool {
        self.number_class().is_number()
    }

    pub fn is_decimal(&self) -> bool {
        self.number_class() == NumberClass::Integer
    }

    pub fn is_floating_point(&self) -> bool {
        self.number_class() == NumberClass::Float
    }

    /// True if the unescaped text is exactly one character
    pub fn is_char(&self) -> bool {
        self.text().chars().count() == 1
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.stripped(), "true" | "false")
    }

    /// Order two cells, numerically when both hold numbers
    ///
    /// Two integers compare as `i64`, any other numeric pair as `f64`.
    /// Everything else compares by unescaped text.
    pub fn compare(&self, other: &Self) -> Ordering {
        let (lhs, rhs) = (self.number_class(), other.number_class());
        if lhs == NumberClass::Integer && rhs == NumberClass::Integer {
            if let (Ok(a), Ok(b)) = (self.get::<i64>(), other.get::<i64>()) {
                return a.cmp(&b);
            }
        }
        if lhs.is_number() && rhs.is_number() {
            if let (Ok(a), Ok(b)) = (self.get::<f64>(), other.get::<f64>()) {
                return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            }
        }
        self.text().cmp(&other.text())
    }

    /// Typed equality against a plain value
    ///
    /// The cell is converted to `T` first; a failed conversion never matches.
    pub fn matches<T: FromCell + PartialEq>(&self, value: &T) -> bool {
        self.get::<T>().map(|v| v == *value).unwrap_or(false)
    }
}

impl<const SEP: char> PartialEq for Cell<SEP> {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text()
    }
}

impl<const SEP: char> Eq for Cell<SEP> {}

impl<const SEP: char> fmt::Display for Cell<SEP> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Values that can be stored in a [`Cell`]
pub trait ToCell {
    /// Unescaped text written into the cell
    fn to_cell_text(&self) -> String;
}

/// Values that can be read back out of a [`Cell`]
pub trait FromCell: Sized {
    fn from_cell<const SEP: char>(cell: &Cell<SEP>) -> Result<Self>;
}

impl ToCell for str {
    fn to_cell_text(&self) -> String {
        self.to_string()
    }
}

impl ToCell for String {
    fn to_cell_text(&self) -> String {
        self.clone()
    }
}

impl<T: ToCell + ?Sized> ToCell for &T {
    fn to_cell_text(&self) -> String {
        (**self).to_cell_text()
    }
}

/// `None` stores an empty cell
impl<T: ToCell> ToCell for Option<T> {
    fn to_cell_text(&self) -> String {
        self.as_ref().map(|v| v.to_cell_text()).unwrap_or_default()
    }
}

impl ToCell for char {
    fn to_cell_text(&self) -> String {
        self.to_string()
    }
}

impl ToCell for bool {
    fn to_cell_text(&self) -> String {
        self.to_string()
    }
}

impl FromCell for String {
    fn from_cell<const SEP: char>(cell: &Cell<SEP>) -> Result<Self> {
        Ok(cell.text().into_owned())
    }
}

impl FromCell for char {
    fn from_cell<const SEP: char>(cell: &Cell<SEP>) -> Result<Self> {
        let text = cell.text();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CsvError::Conversion(format!(
                "Cannot convert {:?} to a single character",
                text
            ))),
        }
    }
}

impl FromCell for bool {
    fn from_cell<const SEP: char>(cell: &Cell<SEP>) -> Result<Self> {
        match cell.stripped() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(CsvError::Conversion(format!(
                "Cannot convert {:?} to a boolean",
                other
            ))),
        }
    }
}

fn parse_integer<T, const SEP: char>(cell: &Cell<SEP>) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let text = cell.stripped();
    let digits = match NumberClass::of(text) {
        NumberClass::Integer => text,
        // Float text truncates toward zero at the decimal point
        NumberClass::Float => text.split('.').next().unwrap_or(text),
        NumberClass::NotANumber => {
            return Err(CsvError::Conversion(format!(
                "The value {:?} is not a number",
                text
            )))
        }
    };
    digits.parse::<T>().map_err(|e| {
        CsvError::Conversion(format!(
            "Cannot convert {:?} to {}: {}",
            text,
            std::any::type_name::<T>(),
            e
        ))
    })
}

fn parse_float<T, const SEP: char>(cell: &Cell<SEP>) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let text = cell.stripped();
    if !NumberClass::of(text).is_number() {
        return Err(CsvError::Conversion(format!(
            "The value {:?} is not a number",
            text
        )));
    }
    text.parse::<T>().map_err(|e| {
        CsvError::Conversion(format!(
            "Cannot convert {:?} to {}: {}",
            text,
            std::any::type_name::<T>(),
            e
        ))
    })
}

macro_rules! impl_cell_integer {
    ($($ty:ty),*) => {
        $(
            impl ToCell for $ty {
                fn to_cell_text(&self) -> String {
                    self.to_string()
                }
            }

            impl FromCell for $ty {
                fn from_cell<const SEP: char>(cell: &Cell<SEP>) -> Result<Self> {
                    parse_integer::<$ty, SEP>(cell)
                }
            }
        )*
    };
}

macro_rules! impl_cell_float {
    ($($ty:ty),*) => {
        $(
            impl ToCell for $ty {
                fn to_cell_text(&self) -> String {
                    self.to_string()
                }
            }

            impl FromCell for $ty {
                fn from_cell<const SEP: char>(cell: &Cell<SEP>) -> Result<Self> {
                    parse_float::<$ty, SEP>(cell)
                }
            }
        )*
    };
}

impl_cell_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_cell_float!(f32, f64);
