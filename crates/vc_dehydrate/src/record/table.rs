use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::{Record, RecordId, RecordKind};
use crate::error::HydrateError;

/// Index-addressed records of one walk.
///
/// This is the only data that must travel with a serialized tree for the
/// tree to be hydrated later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatTable {
    records: Vec<Record>,
}

impl FlatTable {
    #[inline]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.as_usize())
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Record> {
        self.records.iter()
    }

    /// Returns the number of slots holding a record of kind `T`.
    pub fn count<T: RecordKind>(&self) -> usize {
        self.records
            .iter()
            .filter(|record| T::from_record(record).is_some())
            .count()
    }

    /// Resolves `id` to a record of kind `T`.
    pub fn resolve<T: RecordKind>(&self, id: RecordId) -> Result<&T, HydrateError> {
        let record = self.get(id).ok_or(HydrateError::MissingIndex(id))?;
        if record.is_placeholder() {
            return Err(HydrateError::UnfilledPlaceholder(id));
        }
        T::from_record(record).ok_or(HydrateError::KindMismatch {
            index: id,
            expected: T::KIND,
            found: record.kind_name(),
        })
    }

    /// Resolves `id` to an interned string.
    pub fn string(&self, id: RecordId) -> Result<&str, HydrateError> {
        match self.get(id) {
            Some(Record::Str(value)) => Ok(value),
            Some(_) => Err(HydrateError::MissingString(id)),
            None => Err(HydrateError::MissingIndex(id)),
        }
    }

    // -------------------------------------------------------------------------
    // Construction

    pub(crate) fn push(&mut self, record: Record) -> RecordId {
        let id = RecordId::from_raw(self.records.len() as u32);
        self.records.push(record);
        id
    }

    pub(crate) fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.records.get_mut(id.as_usize())
    }
}
