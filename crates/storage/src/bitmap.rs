/// Per-row null overlay. A set bit means the row is logically NULL; the
/// wrapped column still holds a well-formed value at that position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullBitmap {
    data: Vec<u64>,
    len: usize,
}

impl NullBitmap {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(rows: usize) -> Self {
        Self {
            data: Vec::with_capacity(rows.div_ceil(64)),
            len: 0,
        }
    }

    pub fn new_valid(len: usize) -> Self {
        let num_words = len.div_ceil(64);
        Self {
            data: vec![0; num_words],
            len,
        }
    }

    pub fn new_null(len: usize) -> Self {
        let num_words = len.div_ceil(64);
        let mut bitmap = Self {
            data: vec![u64::MAX; num_words],
            len,
        };
        bitmap.clear_tail();
        bitmap
    }

    pub fn from_bools(flags: &[bool]) -> Self {
        let mut bitmap = Self::with_capacity(flags.len());
        for &is_null in flags {
            bitmap.push(is_null);
        }
        bitmap
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        if index >= self.len {
            return true;
        }
        let word = index / 64;
        let bit = index % 64;
        (self.data[word] >> bit) & 1 == 1
    }

    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        !self.is_null(index)
    }

    #[inline]
    pub fn set(&mut self, index: usize, is_null: bool) {
        if index >= self.len {
            return;
        }
        let word = index / 64;
        let bit = index % 64;
        if is_null {
            self.data[word] |= 1 << bit;
        } else {
            self.data[word] &= !(1 << bit);
        }
    }

    #[inline]
    pub fn set_null(&mut self, index: usize) {
        self.set(index, true);
    }

    pub fn push(&mut self, is_null: bool) {
        let word = self.len / 64;
        let bit = self.len % 64;
        if word >= self.data.len() {
            self.data.push(0);
        }
        if is_null {
            self.data[word] |= 1 << bit;
        }
        self.len += 1;
    }

    /// ORs `other` into `self` word by word. Both bitmaps must cover the
    /// same number of rows.
    pub fn merge(&mut self, other: &NullBitmap) {
        debug_assert_eq!(self.len, other.len);
        for (dst, src) in self.data.iter_mut().zip(other.data.iter()) {
            *dst |= *src;
        }
    }

    pub fn has_nulls(&self) -> bool {
        self.data.iter().any(|w| *w != 0)
    }

    pub fn count_null(&self) -> usize {
        if self.len == 0 {
            return 0;
        }
        let full_words = self.len / 64;
        let remaining_bits = self.len % 64;
        let mut count: usize = self.data[..full_words]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();
        if remaining_bits > 0 && full_words < self.data.len() {
            let mask = (1u64 << remaining_bits) - 1;
            count += (self.data[full_words] & mask).count_ones() as usize;
        }
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.is_null(i))
    }

    fn clear_tail(&mut self) {
        let remaining_bits = self.len % 64;
        if remaining_bits > 0 {
            if let Some(last) = self.data.last_mut() {
                *last &= (1u64 << remaining_bits) - 1;
            }
        }
    }
}

impl Default for NullBitmap {
    fn default() -> Self {
        Self::new()
    }
}
