//! Lowercase hex encoding for fixed-width primitives.

use crate::error::CodecError;

/// Render bytes as a lowercase hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// First four bytes as hex, for `Debug` output.
pub fn hex_prefix(bytes: &[u8]) -> String {
    to_hex(&bytes[..bytes.len().min(4)])
}

/// Decode a hex string into a fixed-width byte array.
///
/// Leading/trailing whitespace and an optional `0x` prefix are ignored;
/// upper- and lowercase digits are both accepted.
pub fn from_hex_array<const N: usize>(hex: &str) -> Result<[u8; N], CodecError> {
    let bytes = from_hex(hex)?;
    if bytes.len() != N {
        return Err(CodecError::InvalidLength {
            expected: N * 2,
            actual: bytes.len() * 2,
        });
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// Decode a variable-length hex string.
pub fn from_hex(hex: &str) -> Result<Vec<u8>, CodecError> {
    let hex = hex.trim();
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    if hex.len() % 2 != 0 {
        return Err(CodecError::InvalidLength {
            expected: hex.len() + 1,
            actual: hex.len(),
        });
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or(CodecError::InvalidHex { position: i })
        })
        .collect()
}
