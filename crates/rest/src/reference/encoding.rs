use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Every character outside the RFC 3986 unreserved set gets encoded.
const RESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes every character that is not unreserved, using UTF-8 for non ASCII ones.
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, RESERVED).to_string()
}

/// Decodes percent-encoded triplets. Invalid UTF-8 sequences become U+FFFD and malformed
/// triplets are kept verbatim.
pub fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_reserved() {
        assert_eq!(encode("a b/c?d=e&f"), "a%20b%2Fc%3Fd%3De%26f");
        assert_eq!(encode("unreserved-._~"), "unreserved-._~");
        assert_eq!(encode("été"), "%C3%A9t%C3%A9");
    }

    #[test]
    fn decode_triplets() {
        assert_eq!(decode("a%20b%2Fc"), "a b/c");
        assert_eq!(decode("%C3%A9t%C3%A9"), "été");
        assert_eq!(decode("100%"), "100%");
        assert_eq!(decode("%zz"), "%zz");
    }
}
