use strand_common::error::{Error, Result};

/// Byte arena plus cumulative end offsets for N variable-length strings.
///
/// Row `i` occupies `chars[offsets[i - 1]..offsets[i]]` (with
/// `offsets[-1] == 0`); the last byte of every span is a `0` terminator
/// that is not part of the logical value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringColumn {
    chars: Vec<u8>,
    offsets: Vec<usize>,
}

impl StringColumn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the arena for `payload_bytes` of values plus one
    /// terminator per row.
    pub fn with_capacity(rows: usize, payload_bytes: usize) -> Self {
        Self {
            chars: Vec::with_capacity(payload_bytes.saturating_add(rows)),
            offsets: Vec::with_capacity(rows),
        }
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut column = Self::new();
        for value in values {
            column.push_value(value.as_ref());
        }
        column
    }

    /// Validates raw parts: non-decreasing offsets ending at `chars.len()`
    /// with a terminator closing each span.
    pub fn from_raw_parts(chars: Vec<u8>, offsets: Vec<usize>) -> Result<Self> {
        let mut prev = 0usize;
        for (row, &end) in offsets.iter().enumerate() {
            if end <= prev || end > chars.len() {
                return Err(Error::internal(format!(
                    "string offsets not increasing at row {}: {} after {}",
                    row, end, prev
                )));
            }
            if chars[end - 1] != 0 {
                return Err(Error::internal(format!(
                    "string row {} is missing its terminator",
                    row
                )));
            }
            prev = end;
        }
        if prev != chars.len() {
            return Err(Error::internal(format!(
                "string arena has {} bytes but offsets end at {}",
                chars.len(),
                prev
            )));
        }
        Ok(Self { chars, offsets })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    #[inline]
    fn start_of(&self, row: usize) -> usize {
        if row == 0 { 0 } else { self.offsets[row - 1] }
    }

    #[inline]
    pub fn value(&self, row: usize) -> &[u8] {
        let start = self.start_of(row);
        &self.chars[start..self.offsets[row] - 1]
    }

    #[inline]
    pub fn value_len(&self, row: usize) -> usize {
        self.offsets[row] - self.start_of(row) - 1
    }

    pub fn str_value(&self, row: usize) -> Option<&str> {
        std::str::from_utf8(self.value(row)).ok()
    }

    /// Sum of all row lengths, terminators excluded.
    pub fn payload_bytes(&self) -> usize {
        self.chars.len() - self.offsets.len()
    }

    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.len()).map(move |row| self.value(row))
    }

    pub fn reserve(&mut self, rows: usize, payload_bytes: usize) {
        self.offsets.reserve(rows);
        self.chars.reserve(payload_bytes.saturating_add(rows));
    }

    #[inline]
    fn close_row(&mut self) {
        self.chars.push(0);
        self.offsets.push(self.chars.len());
    }

    #[inline]
    pub fn push_empty(&mut self) {
        self.close_row();
    }

    #[inline]
    pub fn push_value(&mut self, value: &[u8]) {
        self.chars.extend_from_slice(value);
        self.close_row();
    }

    /// Writes the parts back to back as a single row.
    pub fn push_concat<'a, I>(&mut self, parts: I)
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        for part in parts {
            self.chars.extend_from_slice(part);
        }
        self.close_row();
    }

    /// Writes the parts as a single row with `sep` between neighbours.
    pub fn push_joined<'a, I>(&mut self, sep: &[u8], parts: I)
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                self.chars.extend_from_slice(sep);
            }
            self.chars.extend_from_slice(part);
        }
        self.close_row();
    }

    pub fn push_repeated(&mut self, value: &[u8], times: usize) {
        self.chars.reserve(value.len() * times + 1);
        for _ in 0..times {
            self.chars.extend_from_slice(value);
        }
        self.close_row();
    }

    /// A new column holding row `row` copied `n` times.
    pub fn replicate_row(&self, row: usize, n: usize) -> StringColumn {
        let value = self.value(row);
        let mut out = StringColumn::with_capacity(n, value.len() * n);
        for _ in 0..n {
            out.push_value(value);
        }
        out
    }
}
