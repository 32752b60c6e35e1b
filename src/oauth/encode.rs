//! RFC 3986 percent-encoding used for base strings, signing keys, and header values.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except the RFC 3986 unreserved characters (`A-Z a-z 0-9 - . _ ~`).
///
/// The header-value encoding uses the same set, so `~` passes through literally in both
/// the signature base string and the `Authorization` header.
pub const RFC3986_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes `value` over its UTF-8 bytes with uppercase hex digits.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, RFC3986_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
	// crates.io
	use percent_encoding::percent_decode_str;
	// self
	use super::*;

	#[test]
	fn unreserved_characters_pass_through() {
		assert_eq!(percent_encode("AZaz09-._~"), "AZaz09-._~");
	}

	#[test]
	fn reserved_characters_use_uppercase_hex() {
		assert_eq!(percent_encode("a b"), "a%20b");
		assert_eq!(percent_encode("foo=bar&baz"), "foo%3Dbar%26baz");
		assert_eq!(percent_encode("100%"), "100%25");
		assert_eq!(
			percent_encode("+/:?#[]@!$'()*,;"),
			"%2B%2F%3A%3F%23%5B%5D%40%21%24%27%28%29%2A%2C%3B"
		);
		assert_eq!(percent_encode("é"), "%C3%A9");
	}

	#[test]
	fn decoding_restores_reserved_values() {
		for value in ["a&b=c d", "100% sure", "~tilde~", "Zürich ✈ 東京", "", "=&=&"] {
			let encoded = percent_encode(value);
			let decoded = percent_decode_str(&encoded)
				.decode_utf8()
				.expect("Percent-encoded UTF-8 should decode.");

			assert_eq!(decoded, value);
		}
	}
}
