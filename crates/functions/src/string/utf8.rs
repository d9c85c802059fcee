//! Translation of 1-based character positions into byte spans of a UTF-8 row.

/// Byte length of the character whose lead byte is `lead`.
#[inline]
pub fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0xFC..=0xFF => 6,
        0xF8..=0xFB => 5,
        0xF0..=0xF7 => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}

/// Number of characters in `raw`, counted by lead bytes only.
pub fn char_length(raw: &[u8]) -> usize {
    let mut count = 0;
    let mut offset = 0;
    while offset < raw.len() {
        offset += utf8_char_len(raw[offset]);
        count += 1;
    }
    count
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstringSpan {
    Null,
    Empty,
    Bytes { start: usize, len: usize },
}

impl SubstringSpan {
    pub fn slice<'a>(&self, raw: &'a [u8]) -> Option<&'a [u8]> {
        match *self {
            SubstringSpan::Null => None,
            SubstringSpan::Empty => Some(&[]),
            SubstringSpan::Bytes { start, len } => Some(&raw[start..start + len]),
        }
    }
}

/// Resolves `(pos, len)` against one row.
///
/// `index` is scratch space for character start offsets and is reused
/// across rows. The checks run in a fixed order: the byte-length bound on
/// `pos` comes first, so a position past the end of the bytes is NULL even
/// when `len <= 0`.
pub fn resolve_substring(raw: &[u8], pos: i32, len: i32, index: &mut Vec<usize>) -> SubstringSpan {
    let size = raw.len() as i64;
    let pos = pos as i64;
    let len = len as i64;

    if pos > size {
        return SubstringSpan::Null;
    }
    if len <= 0 || size == 0 || pos == 0 {
        return SubstringSpan::Empty;
    }

    index.clear();
    let mut offset = 0usize;
    while offset < raw.len() {
        index.push(offset);
        if pos > 0 && index.len() as i64 > pos + len {
            break;
        }
        offset += utf8_char_len(raw[offset]);
    }

    let count = index.len() as i64;
    let fixed_pos = if pos < 0 { count + pos + 1 } else { pos };
    if fixed_pos > count {
        return SubstringSpan::Null;
    }
    if fixed_pos < 1 {
        return SubstringSpan::Empty;
    }

    let start = index[(fixed_pos - 1) as usize];
    let end = if fixed_pos + len <= count {
        index[(fixed_pos + len - 1) as usize]
    } else {
        raw.len()
    };
    // A truncated trailing character can put `start` past the end.
    if end <= start {
        return SubstringSpan::Empty;
    }
    SubstringSpan::Bytes {
        start,
        len: end - start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substring<'a>(raw: &'a str, pos: i32, len: i32) -> Option<&'a str> {
        let mut index = Vec::new();
        resolve_substring(raw.as_bytes(), pos, len, &mut index)
            .slice(raw.as_bytes())
            .map(|b| std::str::from_utf8(b).unwrap())
    }

    #[test]
    fn lead_byte_table() {
        assert_eq!(utf8_char_len(b'a'), 1);
        assert_eq!(utf8_char_len(0x80), 1);
        assert_eq!(utf8_char_len(0xC3), 2);
        assert_eq!(utf8_char_len(0xE4), 3);
        assert_eq!(utf8_char_len(0xF0), 4);
        assert_eq!(utf8_char_len(0xF8), 5);
        assert_eq!(utf8_char_len(0xFC), 6);
    }

    #[test]
    fn counts_multibyte_characters() {
        assert_eq!(char_length("héllo".as_bytes()), 5);
        assert_eq!(char_length("日本語".as_bytes()), 3);
        assert_eq!(char_length(b""), 0);
    }

    #[test]
    fn positive_positions() {
        assert_eq!(substring("hello", 1, 5), Some("hello"));
        assert_eq!(substring("hello", 2, 3), Some("ell"));
        assert_eq!(substring("hello", 4, 100), Some("lo"));
        assert_eq!(substring("hello", 5, 1), Some("o"));
    }

    #[test]
    fn negative_positions_count_from_the_end() {
        assert_eq!(substring("hello", -3, 2), Some("ll"));
        assert_eq!(substring("hello", -1, 5), Some("o"));
        assert_eq!(substring("hello", -5, 5), Some("hello"));
        assert_eq!(substring("hello", -6, 2), Some(""));
    }

    #[test]
    fn empty_and_null_decisions() {
        assert_eq!(substring("hello", 6, 1), None);
        assert_eq!(substring("hello", 6, 0), None);
        assert_eq!(substring("hello", 0, 3), Some(""));
        assert_eq!(substring("hello", 2, 0), Some(""));
        assert_eq!(substring("hello", 2, -1), Some(""));
        assert_eq!(substring("", 1, 1), None);
        assert_eq!(substring("", 0, 1), Some(""));
        assert_eq!(substring("", -1, 1), Some(""));
    }

    #[test]
    fn byte_bound_passes_but_character_count_fails() {
        // 6 bytes, 2 characters: pos 4 is within the byte length only.
        assert_eq!(substring("日本", 4, 1), None);
        assert_eq!(substring("日本", 3, 1), None);
        assert_eq!(substring("日本", 2, 1), Some("本"));
    }

    #[test]
    fn three_byte_characters() {
        let s = "日本語";
        assert_eq!(substring(s, 2, 1), Some("本"));
        assert_eq!(substring(s, 1, 2), Some("日本"));
        assert_eq!(substring(s, -1, 1), Some("語"));
    }

    #[test]
    fn extreme_arguments_do_not_overflow() {
        assert_eq!(substring("abc", 1, i32::MAX), Some("abc"));
        assert_eq!(substring("abc", i32::MAX, i32::MAX), None);
        assert_eq!(substring("abc", i32::MIN, 1), Some(""));
    }

    #[test]
    fn truncated_trailing_character() {
        let raw = [b'a', 0xE4, 0xB8];
        let mut index = Vec::new();
        assert_eq!(
            resolve_substring(&raw, 2, 1, &mut index),
            SubstringSpan::Bytes { start: 1, len: 2 }
        );
    }
}
