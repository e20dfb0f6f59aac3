//! Conversions between UTF-8 text and UTF-16 code units

use crate::error::{CsvError, Result};

/// Encode UTF-8 text as UTF-16 code units
pub fn to_utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

/// Decode UTF-16 code units
///
/// # Errors
///
/// Returns `Conversion` on unpaired surrogates.
pub fn from_utf16(units: &[u16]) -> Result<String> {
    String::from_utf16(units)
        .map_err(|e| CsvError::Conversion(format!("Invalid UTF-16 input: {}", e)))
}

/// Decode UTF-8 bytes
pub fn from_utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| CsvError::Conversion(format!("Invalid UTF-8 input: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_roundtrip() {
        let text = "straße;𝄞\n\"x\"";
        let units = to_utf16(text);
        // the clef needs a surrogate pair
        assert_eq!(units.len(), text.chars().count() + 1);
        assert_eq!(from_utf16(&units).unwrap(), text);
    }

    #[test]
    fn test_unpaired_surrogate() {
        let err = from_utf16(&[0x61, 0xDC00]).unwrap_err();
        assert_eq!(err.kind(), "ConversionError");
    }

    #[test]
    fn test_invalid_utf8() {
        assert_eq!(from_utf8(b"ok").unwrap(), "ok");
        assert!(from_utf8(&[0xFF, 0xFE]).is_err());
    }
}
