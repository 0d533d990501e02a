//! BLAKE3 digests used to correlate uploads in logs without logging their contents.

/// Full BLAKE3 digest of `data` as 64 lowercase hex characters.
#[inline]
pub fn content_digest(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// First 16 hex characters of [`content_digest`], short enough for log lines.
#[inline]
pub fn short_digest(data: &[u8]) -> String {
    let mut digest = content_digest(data);
    digest.truncate(16);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_digest_determinism() {
        let image = b"\x89PNG\r\n\x1a\nfake image body";
        assert_eq!(content_digest(image), content_digest(image));
    }

    #[test]
    fn test_content_digest_uniqueness() {
        assert_ne!(content_digest(b"page one"), content_digest(b"page two"));
    }

    #[test]
    fn test_content_digest_format() {
        let digest = content_digest(b"");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(
            digest,
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn test_short_digest_is_prefix() {
        let data = b"student answer sheet";
        let short = short_digest(data);
        assert_eq!(short.len(), 16);
        assert!(content_digest(data).starts_with(&short));
    }
}
