use alloc::borrow::ToOwned;

use vc_introspect::hash::HashMap;
use vc_introspect::hash::hashbrown::hash_map::Entry;

use crate::error::DehydrateError;
use crate::key::DehydrationKey;
use crate::record::{FlatTable, Index, Record, RecordId, RecordKind};

// -----------------------------------------------------------------------------
// IdentityRegistry

/// Maps dehydration keys to flat-table slots.
///
/// A slot is claimed before its record is built and filled afterwards, so a
/// value that transitively contains itself resolves to its own slot.
///
/// # Examples
///
/// ```
/// use vc_dehydrate::{DehydrateError, DehydrationKey, IdentityRegistry};
/// use vc_introspect::builtin;
///
/// let mut registry = IdentityRegistry::new();
/// let key = DehydrationKey::Type(builtin::INT);
///
/// let id = registry.claim(key.clone()).unwrap();
/// assert!(registry.contains(&key));
/// assert!(registry.table().get(id).unwrap().is_placeholder());
///
/// assert!(matches!(registry.claim(key), Err(DehydrateError::DuplicateKey(_))));
/// ```
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    keys: HashMap<DehydrationKey, RecordId>,
    table: FlatTable,
}

impl IdentityRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, key: &DehydrationKey) -> bool {
        self.keys.contains_key(key)
    }

    /// Returns the slot claimed for `key`.
    #[inline]
    pub fn get(&self, key: &DehydrationKey) -> Option<RecordId> {
        self.keys.get(key).copied()
    }

    /// Reserves a slot for `key`, holding a placeholder until
    /// [`update_claim`](Self::update_claim).
    ///
    /// Claiming a key twice is an invariant violation and fails.
    pub fn claim(&mut self, key: DehydrationKey) -> Result<RecordId, DehydrateError> {
        match self.keys.entry(key) {
            Entry::Occupied(entry) => Err(DehydrateError::DuplicateKey(entry.key().clone())),
            Entry::Vacant(entry) => {
                let id = self.table.push(Record::Placeholder);
                log::trace!("claimed {id} for {:?}", entry.key());
                entry.insert(id);
                Ok(id)
            }
        }
    }

    /// Overwrites the slot claimed for `key` with `record`.
    ///
    /// `record` must carry the index of that slot.
    pub fn update_claim<T: RecordKind>(
        &mut self,
        record: T,
        key: &DehydrationKey,
    ) -> Result<RecordId, DehydrateError> {
        let index = record.index();
        let Some(id) = index.record_id() else {
            return Err(DehydrateError::InvalidState(index));
        };
        let claimed = self
            .keys
            .get(key)
            .copied()
            .ok_or_else(|| DehydrateError::KeyNotFound(key.clone()))?;
        if claimed != id {
            return Err(DehydrateError::InvalidState(index));
        }
        match self.table.get_mut(id) {
            Some(slot) => {
                *slot = record.into_record();
                Ok(id)
            }
            None => Err(DehydrateError::InvalidState(index)),
        }
    }

    /// Returns the index claimed for `key`, [`Index::LOCAL`] for `None`.
    pub fn get_index(&self, key: Option<&DehydrationKey>) -> Result<Index, DehydrateError> {
        let Some(key) = key else {
            return Ok(Index::LOCAL);
        };
        self.get(key)
            .map(Index::from)
            .ok_or_else(|| DehydrateError::KeyNotFound(key.clone()))
    }

    /// Returns the slot holding `value`, adding it on first use.
    pub fn intern_str(&mut self, value: &str) -> RecordId {
        let key = DehydrationKey::Str(value.to_owned());
        if let Some(id) = self.get(&key) {
            return id;
        }
        let id = self.table.push(Record::Str(value.to_owned()));
        self.keys.insert(key, id);
        id
    }

    /// Returns the number of claimed slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[inline]
    pub fn table(&self) -> &FlatTable {
        &self.table
    }

    #[inline]
    pub fn into_table(self) -> FlatTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::IdentityRegistry;
    use crate::error::DehydrateError;
    use crate::key::DehydrationKey;
    use crate::record::{Index, MemberDescriptor, Record};
    use vc_introspect::{MemberHandle, builtin};

    #[test]
    fn claim_then_update() {
        let mut registry = IdentityRegistry::new();
        let key = DehydrationKey::Member(MemberHandle::from_raw(3));
        let id = registry.claim(key.clone()).unwrap();

        let mut member = MemberDescriptor::local("title");
        member.index = Index::from(id);
        assert_eq!(registry.update_claim(member, &key), Ok(id));
        assert!(matches!(registry.table().get(id), Some(Record::Member(m)) if m.name == "title"));
        assert_eq!(registry.get_index(Some(&key)), Ok(Index::from(id)));
    }

    #[test]
    fn update_claim_rejects_bad_input() {
        let mut registry = IdentityRegistry::new();
        let key = DehydrationKey::Type(builtin::BOOL);

        let local = MemberDescriptor::local("x");
        assert_eq!(
            registry.update_claim(local, &key),
            Err(DehydrateError::InvalidState(Index::LOCAL))
        );

        let mut unclaimed = MemberDescriptor::local("x");
        unclaimed.index = Index::new(0);
        assert_eq!(
            registry.update_claim(unclaimed, &key),
            Err(DehydrateError::KeyNotFound(key.clone()))
        );

        assert_eq!(registry.get_index(None), Ok(Index::LOCAL));
        assert_eq!(
            registry.get_index(Some(&key)),
            Err(DehydrateError::KeyNotFound(key))
        );
    }

    #[test]
    fn strings_are_interned_by_value() {
        let mut registry = IdentityRegistry::new();
        let a = registry.intern_str("a");
        let b = registry.intern_str("b");
        assert_ne!(a, b);
        assert_eq!(registry.intern_str("a"), a);
        assert_eq!(registry.table().string(b), Ok("b"));
        assert_eq!(registry.len(), 2);
    }
}
