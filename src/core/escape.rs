//! Field-level escaping and quote-aware splitting
//!
//! Implements the quoting rules of RFC 4180:
//! - A field containing the separator, a line break or a double quote is
//!   enclosed in double quotes (section 2.6)
//! - A double quote inside such a field is escaped by doubling it (section 2.7)
//! - A record never ends with a separator; a trailing separator implies one
//!   more empty field behind it (section 2.4)
//!
//! Every other component goes through [`EscapeCodec`] for these rules.

use crate::error::{CsvError, Result};
use std::borrow::Cow;

/// Separator used when none is given explicitly
pub const DEFAULT_SEPARATOR: char = ';';

/// The quote character
pub const QUOTE: char = '"';

/// Record separator of the text format
pub const LINE_SEPARATOR: char = '\n';

/// Escapes, unescapes and tokenizes fields for the separator `SEP`
///
/// # Examples
///
/// ```
/// use csv_table::EscapeCodec;
///
/// let codec = EscapeCodec::<';'>::new();
/// assert_eq!(codec.escape_string("a;b"), "\"a;b\"");
/// assert_eq!(codec.unescape_string("\"say \"\"hi\"\"\"", false), "say \"hi\"");
/// assert_eq!(codec.split("\"a;b\";c", ';').unwrap(), vec!["\"a;b\"", "c"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EscapeCodec<const SEP: char = DEFAULT_SEPARATOR>;

impl<const SEP: char> EscapeCodec<SEP> {
    pub const fn new() -> Self {
        EscapeCodec
    }

    /// The field separator this codec escapes for
    pub const fn separator(&self) -> char {
        SEP
    }

    /// Escape a single character (`"` becomes `""`)
    pub fn escape_character(&self, character: char) -> String {
        let mut out = String::with_capacity(2);
        push_escaped(character, &mut out);
        out
    }

    /// Whether a value must be quoted to survive as one field
    pub fn needs_escaping(&self, value: &str) -> bool {
        value
            .chars()
            .any(|c| c == LINE_SEPARATOR || c == QUOTE || c == SEP)
    }

    /// Escape a whole field value
    ///
    /// Values without a line break, quote or separator are returned as-is.
    pub fn escape_string<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if !self.needs_escaping(value) {
            return Cow::Borrowed(value);
        }

        let mut out = String::with_capacity(value.len() + 2);
        out.push(QUOTE);
        for character in value.chars() {
            push_escaped(character, &mut out);
        }
        out.push(QUOTE);

        Cow::Owned(out)
    }

    /// Un-escape the character following a quote
    ///
    /// Returns `Some` only if the quote and `character` form an escape pair.
    pub fn unescape_character(&self, character: char) -> Option<char> {
        match character {
            QUOTE => Some(QUOTE),
            _ => None,
        }
    }

    /// Un-escape a field value
    ///
    /// With `quotes_only` set, only a wrapping quote pair is removed and the
    /// interior is returned untouched. Otherwise every `""` pair of the
    /// interior is collapsed into a single `"` as well.
    pub fn unescape_string<'a>(&self, value: &'a str, quotes_only: bool) -> Cow<'a, str> {
        let inner = strip_wrapping_quotes(value);
        if quotes_only || !inner.contains(QUOTE) {
            return Cow::Borrowed(inner);
        }

        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars().peekable();
        while let Some(character) = chars.next() {
            if character == QUOTE {
                if let Some(unescaped) = chars.peek().and_then(|&n| self.unescape_character(n)) {
                    out.push(unescaped);
                    chars.next();
                    continue;
                }
            }
            out.push(character);
        }

        Cow::Owned(out)
    }

    /// Find the next `delimiter` outside a quoted span, starting at byte `offset`
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the delimiter is not found and the scanned text
    /// ends inside an open quote.
    pub fn find(&self, value: &str, offset: usize, delimiter: char) -> Result<Option<usize>> {
        let Some(rest) = value.get(offset..) else {
            return Ok(None);
        };

        let mut in_quotes = false;
        for (pos, character) in rest.char_indices() {
            if character == QUOTE {
                in_quotes = !in_quotes;
            } else if character == delimiter && !in_quotes {
                return Ok(Some(offset + pos));
            }
        }

        if in_quotes {
            Err(CsvError::Parse(
                "Missing quotation mark at the end of the string".to_string(),
            ))
        } else {
            Ok(None)
        }
    }

    /// Split `value` on `delimiter`, keeping quoted spans intact
    ///
    /// Tokens are returned still escaped. A non-empty value ending with the
    /// delimiter yields one extra empty token, except when splitting on line
    /// breaks (a final line break does not open another record).
    pub fn split<'a>(&self, value: &'a str, delimiter: char) -> Result<Vec<&'a str>> {
        let mut tokens = Vec::new();
        let mut prev = 0;

        loop {
            let pos = self.find(value, prev, delimiter)?.unwrap_or(value.len());
            tokens.push(&value[prev..pos]);
            prev = pos + delimiter.len_utf8();

            if pos >= value.len() || prev >= value.len() {
                break;
            }
        }

        if !value.is_empty() && value.ends_with(delimiter) && delimiter != LINE_SEPARATOR {
            tokens.push("");
        }

        Ok(tokens)
    }

    /// Split a record into its (escaped) fields
    pub fn split_fields<'a>(&self, record: &'a str) -> Result<Vec<&'a str>> {
        self.split(record, SEP)
    }
}

fn push_escaped(character: char, out: &mut String) {
    if character == QUOTE {
        out.push(QUOTE);
        out.push(QUOTE);
    } else {
        out.push(character);
    }
}

/// Remove one wrapping quote pair, if present
pub(crate) fn strip_wrapping_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with(QUOTE) && value.ends_with(QUOTE) {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
