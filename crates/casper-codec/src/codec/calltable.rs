//! The calltable envelope: a field-indexed, length-prefixed binary container.
//!
//! ```text
//! calltable = count:i32le { index:u16le length:u32le bytes }*count
//! ```
//!
//! Fields are always written in ascending index order, whatever order they
//! were added in, so the same field set always produces the same bytes.

use crate::codec::primitives::{Reader, Writer};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{MAX_CALLTABLE_FIELDS, MAX_PREFIXED_LEN};

/// One `(index, value)` entry of a calltable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalltableField {
    pub index: u16,
    pub value: Vec<u8>,
}

/// Consuming builder for a [`Calltable`].
///
/// ```
/// use casper_codec::codec::CalltableBuilder;
///
/// let table = CalltableBuilder::new()
///     .add_field(1, vec![0xBB])?
///     .add_field(0, vec![0xAA])?
///     .build();
/// assert_eq!(table.indices().collect::<Vec<_>>(), vec![0, 1]);
/// # Ok::<(), casper_codec::EncodeError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CalltableBuilder {
    fields: Vec<CalltableField>,
}

impl CalltableBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, rejecting an index that is already present.
    pub fn add_field(mut self, index: u16, value: impl Into<Vec<u8>>) -> Result<Self, EncodeError> {
        let value = value.into();
        if value.len() > MAX_PREFIXED_LEN {
            return Err(EncodeError::LengthExceedsLimit {
                field: "calltable field",
                len: value.len(),
                max: MAX_PREFIXED_LEN,
            });
        }
        match self.fields.binary_search_by_key(&index, |f| f.index) {
            Ok(_) => Err(EncodeError::DuplicateField { index }),
            Err(pos) => {
                self.fields.insert(pos, CalltableField { index, value });
                Ok(self)
            }
        }
    }

    /// Adds a field whose value is produced by a [`Writer`].
    pub fn add_written<F>(self, index: u16, f: F) -> Result<Self, EncodeError>
    where
        F: FnOnce(&mut Writer) -> Result<(), EncodeError>,
    {
        let mut writer = Writer::new();
        f(&mut writer)?;
        self.add_field(index, writer.into_bytes())
    }

    /// Freezes the field set.
    pub fn build(self) -> Calltable {
        Calltable {
            fields: self.fields,
        }
    }
}

/// An immutable set of calltable fields, ordered by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Calltable {
    fields: Vec<CalltableField>,
}

impl Calltable {
    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the table has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the value stored at `index`.
    pub fn get(&self, index: u16) -> Option<&[u8]> {
        self.fields
            .binary_search_by_key(&index, |f| f.index)
            .ok()
            .map(|pos| self.fields[pos].value.as_slice())
    }

    /// Returns true if a field with `index` is present.
    pub fn contains(&self, index: u16) -> bool {
        self.get(index).is_some()
    }

    /// Iterates the fields in ascending index order.
    pub fn fields(&self) -> impl Iterator<Item = &CalltableField> {
        self.fields.iter()
    }

    /// Iterates the field indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = u16> + '_ {
        self.fields.iter().map(|f| f.index)
    }

    /// Writes the envelope into `writer`.
    pub fn write_to(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        // Indices are u16, so at most 65536 fields: always fits in an i32.
        writer.write_i32(self.fields.len() as i32);
        for field in &self.fields {
            writer.write_u16(field.index);
            writer.write_bytes_prefixed(&field.value)?;
        }
        Ok(())
    }

    /// Serializes the envelope.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let capacity = 4 + self.fields.iter().map(|f| 6 + f.value.len()).sum::<usize>();
        let mut writer = Writer::with_capacity(capacity);
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }

    /// Reads one envelope from `reader`, leaving any following bytes unread.
    pub fn read_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let count = reader.read_i32("calltable.count")?;
        let count = usize::try_from(count).map_err(|_| DecodeError::LengthExceedsLimit {
            field: "calltable.count",
            len: 0,
            max: MAX_CALLTABLE_FIELDS,
        })?;
        if count > MAX_CALLTABLE_FIELDS {
            return Err(DecodeError::LengthExceedsLimit {
                field: "calltable.count",
                len: count,
                max: MAX_CALLTABLE_FIELDS,
            });
        }

        // Each field needs at least 6 bytes, which bounds the allocation.
        let mut fields: Vec<CalltableField> =
            Vec::with_capacity(count.min(reader.remaining_len() / 6));
        for _ in 0..count {
            let index = reader.read_u16("calltable.index")?;
            let value = reader.read_bytes_prefixed(MAX_PREFIXED_LEN, "calltable.value")?;
            match fields.binary_search_by_key(&index, |f| f.index) {
                Ok(_) => return Err(DecodeError::DuplicateField { index }),
                Err(pos) => fields.insert(
                    pos,
                    CalltableField {
                        index,
                        value: value.to_vec(),
                    },
                ),
            }
        }
        Ok(Calltable { fields })
    }

    /// Decodes a complete envelope; trailing bytes are an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(bytes);
        let table = Self::read_from(&mut reader)?;
        reader.finish("calltable")?;
        Ok(table)
    }
}

impl From<Calltable> for CalltableBuilder {
    fn from(table: Calltable) -> Self {
        CalltableBuilder {
            fields: table.fields,
        }
    }
}
