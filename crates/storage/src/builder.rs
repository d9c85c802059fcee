use std::sync::Arc;

use crate::NullBitmap;
use crate::column::Column;
use crate::string_column::StringColumn;

/// Row-at-a-time writer for a nullable string result.
///
/// Rows are pushed in increasing order. The null map may be pre-seeded with
/// the merged input nulls; `push_null` only ever adds to it.
#[derive(Debug)]
pub struct NullableStringBuilder {
    values: StringColumn,
    nulls: NullBitmap,
}

impl NullableStringBuilder {
    pub fn new(rows: usize, payload_bytes: usize) -> Self {
        Self::with_null_map(NullBitmap::new_valid(rows), payload_bytes)
    }

    pub fn with_null_map(nulls: NullBitmap, payload_bytes: usize) -> Self {
        Self {
            values: StringColumn::with_capacity(nulls.len(), payload_bytes),
            nulls,
        }
    }

    /// Index of the row the next push writes.
    #[inline]
    pub fn row(&self) -> usize {
        self.values.len()
    }

    /// Whether the row about to be written is already marked NULL.
    #[inline]
    pub fn is_current_null(&self) -> bool {
        self.nulls.is_null(self.row())
    }

    #[inline]
    pub fn push_empty(&mut self) {
        self.values.push_empty();
    }

    #[inline]
    pub fn push_null(&mut self) {
        let row = self.row();
        self.nulls.set_null(row);
        self.values.push_empty();
    }

    #[inline]
    pub fn push_value(&mut self, value: &[u8]) {
        self.values.push_value(value);
    }

    pub fn values_mut(&mut self) -> &mut StringColumn {
        &mut self.values
    }

    pub fn finish(self) -> Column {
        debug_assert_eq!(self.values.len(), self.nulls.len());
        Column::Nullable {
            nested: Arc::new(Column::String(self.values)),
            nulls: self.nulls,
        }
    }
}
