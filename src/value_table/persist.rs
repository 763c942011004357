//! Headerless binary persistence for value tables.
//!
//! The format is a flat run of big-endian IEEE-754 doubles ordered
//! objective → action → state. There is no header: a file can only be read
//! back into a table of the shape it was written from.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::{TableError, TableShape, ValueTable};

impl ValueTable {
    /// Writes every value in objective → action → state order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), TableError> {
        for v in self.iter_ordered() {
            writer.write_all(&v.to_be_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Reads a table of the given shape.
    ///
    /// A stream holding fewer values than the shape requires fails with
    /// [`TableError::Io`]; one holding more fails with
    /// [`TableError::TrailingData`].
    pub fn read_from<R: Read>(reader: &mut R, shape: TableShape) -> Result<ValueTable, TableError> {
        let (objectives, actions, states) = shape;
        let expected = objectives * actions * states;
        let mut values = Vec::with_capacity(expected);
        let mut buf = [0u8; 8];
        for _ in 0..expected {
            reader.read_exact(&mut buf)?;
            values.push(f64::from_be_bytes(buf));
        }
        let mut probe = [0u8; 1];
        if reader.read(&mut probe)? != 0 {
            return Err(TableError::TrailingData { expected });
        }

        let mut table = ValueTable::new(objectives, actions, states, 0.0);
        table.fill_ordered(values);
        Ok(table)
    }

    /// Replaces this table's contents from a stream of the same shape.
    ///
    /// The table is left untouched if the stream cannot be read completely.
    pub fn load_into<R: Read>(&mut self, reader: &mut R) -> Result<(), TableError> {
        let loaded = Self::read_from(reader, self.shape())?;
        *self = loaded;
        Ok(())
    }

    /// Saves the table to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
    }

    /// Loads a table of the given shape from `path`.
    pub fn load(path: impl AsRef<Path>, shape: TableShape) -> Result<ValueTable, TableError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, shape)
    }

    /// Replaces this table's contents from the file at `path`.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let loaded = Self::load(path, self.shape())?;
        *self = loaded;
        Ok(())
    }
}
