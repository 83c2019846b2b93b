//! Hex loading utilities for world-call

use std::{fs, io::Read};

use alloy_primitives::{hex, Bytes};

use super::{CliError, Result};

/// Load hex-encoded bytes from an argument or a file. If the file is a dash (-), read from stdin.
/// Priority: arg > file. Returns `None` if neither is provided.
pub fn load_hex(arg: Option<&str>, file: Option<&str>) -> Result<Option<Bytes>> {
    let hex_string = if let Some(arg) = arg {
        arg.to_string()
    } else if let Some(file) = file {
        if file == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            fs::read_to_string(file)?
        }
    } else {
        return Ok(None);
    };

    decode_hex(&hex_string).map(|bytes| Some(Bytes::from(bytes)))
}

/// Decode hex string, handling optional 0x prefix
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();

    if s.is_empty() {
        return Ok(Vec::new());
    }

    let hex_str = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);

    if hex_str.len() % 2 != 0 {
        return Err(CliError::InvalidInput(format!(
            "Invalid hex string length: {} (must be even)",
            hex_str.len()
        )));
    }

    Ok(hex::decode(hex_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::prefixed("0xd09de08a", &[0xd0, 0x9d, 0xe0, 0x8a])]
    #[case::upper_prefix("0XD09DE08A", &[0xd0, 0x9d, 0xe0, 0x8a])]
    #[case::bare(" d09de08a\n", &[0xd0, 0x9d, 0xe0, 0x8a])]
    #[case::empty("", &[])]
    fn test_decode_hex(#[case] input: &str, #[case] expected: &[u8]) {
        assert_eq!(decode_hex(input).unwrap(), expected);
    }

    #[test]
    fn test_decode_hex_odd_length() {
        assert!(matches!(decode_hex("0xabc"), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_load_hex_prefers_argument() {
        let bytes = load_hex(Some("0x01"), Some("does-not-exist")).unwrap();
        assert_eq!(bytes, Some(Bytes::from_static(&[1])));
        assert_eq!(load_hex(None, None).unwrap(), None);
    }
}
