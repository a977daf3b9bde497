//! Utility functions.

/// Returns the offset of the first occurrence of `needle` in `haystack`.
///
/// An empty needle matches at offset 0.
pub fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Decodes a NUL-terminated ASCII string starting at `offset`.
///
/// Returns `None` if `offset` is outside `data`. A missing terminator reads to the end.
pub fn cstring_at(data: &[u8], offset: usize) -> Option<String> {
    let tail = data.get(offset..)?;
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    Some(String::from_utf8_lossy(&tail[..end]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_occurrence() {
        assert_eq!(find_bytes(b"abcabc", b"bc"), Some(1));
        assert_eq!(find_bytes(b"abcabc", b"cb"), None);
        assert_eq!(find_bytes(b"ab", b"abc"), None);
        assert_eq!(find_bytes(b"ab", b""), Some(0));
    }

    #[test]
    fn reads_cstrings() {
        assert_eq!(cstring_at(b"..text\0data", 2).as_deref(), Some("text"));
        assert_eq!(cstring_at(b"abc", 1).as_deref(), Some("bc"));
        assert_eq!(cstring_at(b"abc", 4), None);
    }
}
