use strand_common::error::{Error, Result};
use strand_common::types::DataType;

use crate::column::{Column, ColumnPtr};

#[derive(Debug, Clone)]
pub struct ColumnWithTypeAndName {
    pub column: Option<ColumnPtr>,
    pub data_type: DataType,
    pub name: String,
}

/// An ordered set of equally sized columns addressed by position.
///
/// A slot may be reserved without data (see [`Block::insert_result_slot`])
/// so a function can later write its output there.
#[derive(Debug, Clone, Default)]
pub struct Block {
    data: Vec<ColumnWithTypeAndName>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        let mut block = Self::new();
        for (name, column) in columns {
            block.insert(name, column)?;
        }
        Ok(block)
    }

    /// Number of entries, including unfilled result slots.
    pub fn columns(&self) -> usize {
        self.data.len()
    }

    /// Row count shared by every filled column; 0 for an empty block.
    pub fn rows(&self) -> usize {
        self.data
            .iter()
            .find_map(|entry| entry.column.as_ref().map(|c| c.len()))
            .unwrap_or(0)
    }

    fn check_rows(&self, skip: Option<usize>, column: &Column) -> Result<()> {
        let existing = self
            .data
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .find_map(|(_, entry)| entry.column.as_ref().map(|c| c.len()));
        match existing {
            Some(rows) if rows != column.len() => Err(Error::schema_mismatch(format!(
                "column has {} rows, block has {}",
                column.len(),
                rows
            ))),
            _ => Ok(()),
        }
    }

    /// Appends a column and returns its position.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> Result<usize> {
        self.insert_ptr(name, ColumnPtr::new(column))
    }

    pub fn insert_ptr(&mut self, name: impl Into<String>, column: ColumnPtr) -> Result<usize> {
        self.check_rows(None, &column)?;
        self.data.push(ColumnWithTypeAndName {
            data_type: column.data_type(),
            column: Some(column),
            name: name.into(),
        });
        Ok(self.data.len() - 1)
    }

    /// Reserves an empty output slot and returns its position.
    pub fn insert_result_slot(&mut self, name: impl Into<String>, data_type: DataType) -> usize {
        self.data.push(ColumnWithTypeAndName {
            column: None,
            data_type,
            name: name.into(),
        });
        self.data.len() - 1
    }

    pub fn get_by_position(&self, position: usize) -> Result<&ColumnWithTypeAndName> {
        self.data.get(position).ok_or_else(|| {
            Error::column_not_found(format!(
                "position {} out of bounds ({} columns)",
                position,
                self.data.len()
            ))
        })
    }

    /// The column at `position`; an unfilled result slot is an error.
    pub fn column(&self, position: usize) -> Result<&ColumnPtr> {
        let entry = self.get_by_position(position)?;
        entry.column.as_ref().ok_or_else(|| {
            Error::column_not_found(format!(
                "column '{}' at position {} has no data",
                entry.name, position
            ))
        })
    }

    pub fn set_column(&mut self, position: usize, column: Column) -> Result<()> {
        self.set_column_ptr(position, ColumnPtr::new(column))
    }

    pub fn set_column_ptr(&mut self, position: usize, column: ColumnPtr) -> Result<()> {
        if position >= self.data.len() {
            return Err(Error::column_not_found(format!(
                "position {} out of bounds ({} columns)",
                position,
                self.data.len()
            )));
        }
        self.check_rows(Some(position), &column)?;
        let entry = &mut self.data[position];
        entry.data_type = column.data_type();
        entry.column = Some(column);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnWithTypeAndName> {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn test_insert_and_result_slot() {
        let mut block = Block::new();
        let s = block.insert("s", Column::string(["a", "b"])).unwrap();
        let out = block.insert_result_slot("out", DataType::String);
        assert_eq!((s, out), (0, 1));
        assert_eq!(block.rows(), 2);
        assert!(block.column(out).is_err());

        block.set_column(out, Column::string(["x", "y"])).unwrap();
        assert_eq!(block.column(out).unwrap().len(), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_rejects_row_count_mismatch() {
        let mut block = Block::new();
        block.insert("a", Column::int32([1, 2, 3])).unwrap();
        assert!(block.insert("b", Column::int32([1])).is_err());
        let out = block.insert_result_slot("out", DataType::Int32);
        assert!(block.set_column(out, Column::int32([1, 2])).is_err());
        assert!(block.set_column(7, Column::int32([1, 2, 3])).is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_const_column_counts_logical_rows() {
        let block = Block::from_columns([
            ("s", Column::string(["a", "b"])),
            ("c", Column::const_int32(1, 2)),
        ])
        .unwrap();
        assert_eq!(block.rows(), 2);
        assert_eq!(block.get_by_position(1).unwrap().data_type, DataType::Int32);
    }
}
