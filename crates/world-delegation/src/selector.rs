//! Function selector slicing and calldata reassembly.
//!
//! Every payload handled here is an ABI-encoded call, so it starts with a 4-byte function
//! selector followed by the encoded arguments.

use alloy_primitives::{Bytes, Selector};

/// The length of a function selector in bytes.
pub const SELECTOR_LEN: usize = 4;

/// Returns the leading function selector of an ABI-encoded call.
///
/// # Panics
///
/// Panics if `payload` is shorter than [`SELECTOR_LEN`]. Such a payload is not an encoded call.
pub fn selector(payload: &[u8]) -> Selector {
    assert!(
        payload.len() >= SELECTOR_LEN,
        "calldata of {} bytes has no function selector",
        payload.len()
    );
    Selector::from_slice(&payload[..SELECTOR_LEN])
}

/// Returns the encoded arguments of an ABI-encoded call, i.e. everything after the selector.
///
/// A call without arguments yields an empty slice.
pub fn arguments(payload: &[u8]) -> &[u8] {
    payload.get(SELECTOR_LEN..).unwrap_or_default()
}

/// Builds the calldata of a call to `selector` with already encoded `arguments`.
pub fn rewrite(selector: Selector, arguments: &[u8]) -> Bytes {
    let mut calldata = Vec::with_capacity(SELECTOR_LEN + arguments.len());
    calldata.extend_from_slice(selector.as_slice());
    calldata.extend_from_slice(arguments);
    calldata.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{bytes, fixed_bytes};

    #[test]
    fn test_selector_of_call_with_arguments() {
        let payload = bytes!("a9059cbb000000000000000000000000000000000000000000000000000000000000002a");
        assert_eq!(selector(&payload), fixed_bytes!("a9059cbb"));
        assert_eq!(arguments(&payload).len(), 32);
    }

    #[test]
    fn test_rewrite_restores_payload() {
        let payload = bytes!("a9059cbb0000000000000000000000001111111111111111111111111111111111111111000000000000000000000000000000000000000000000000000000000000002a");
        assert_eq!(rewrite(selector(&payload), arguments(&payload)), payload);
    }

    #[test]
    fn test_zero_argument_call() {
        let payload = bytes!("7cf5dab0");
        assert!(arguments(&payload).is_empty());

        let rewritten = rewrite(fixed_bytes!("1234abcd"), arguments(&payload));
        assert_eq!(rewritten.len(), SELECTOR_LEN);
        assert_eq!(rewritten, bytes!("1234abcd"));
    }

    #[test]
    fn test_rewrite_keeps_arguments() {
        let payload = bytes!("7cf5dab0deadbeef");
        let rewritten = rewrite(fixed_bytes!("1234abcd"), arguments(&payload));
        assert_eq!(rewritten, bytes!("1234abcddeadbeef"));
    }

    #[test]
    fn test_arguments_of_empty_payload() {
        assert!(arguments(&[]).is_empty());
    }

    #[test]
    #[should_panic(expected = "has no function selector")]
    fn test_selector_of_short_payload_panics() {
        let _ = selector(&[0x7c, 0xf5]);
    }
}
