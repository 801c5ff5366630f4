//! # Identity Store
//!
//! The [`IdentityStore`] trait is the contract the token validator and the
//! API layer consume. [`InMemoryIdentityStore`] is the bundled
//! implementation.
//!
//! All operations are synchronous. The in-memory store guards its data with
//! a `parking_lot::RwLock`, which is never held across an `.await`, so async
//! handlers can call it directly. Reads take the shared lock and proceed in
//! parallel; only `create` and `update` take the exclusive lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::identity::{Email, Identity, IdentityChanges, IdentityId, NewIdentity};

/// Storage contract for identities.
///
/// Implementations must be safe for concurrent reads without any locking on
/// the caller's side, and must enforce email uniqueness.
pub trait IdentityStore: Send + Sync + std::fmt::Debug {
    /// Look up an identity by id.
    fn find_by_id(&self, id: IdentityId) -> Option<Identity>;

    /// Look up an identity by (normalized) email.
    fn find_by_email(&self, email: &Email) -> Option<Identity>;

    /// All identities, ordered by id.
    fn list(&self) -> Vec<Identity>;

    /// Store a new identity and assign it an id.
    fn create(&self, new: NewIdentity) -> Result<Identity, StoreError>;

    /// Apply a partial update and bump `updated_at`. An empty change set
    /// returns the stored record unchanged.
    fn update(&self, id: IdentityId, changes: IdentityChanges) -> Result<Identity, StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    last_id: u64,
    records: BTreeMap<IdentityId, Identity>,
}

impl Inner {
    fn email_taken(&self, email: &Email, except: Option<IdentityId>) -> bool {
        self.records
            .values()
            .any(|r| &r.email == email && Some(r.id) != except)
    }
}

/// Thread-safe, cloneable in-memory identity store.
///
/// Ids are assigned sequentially starting at 1. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryIdentityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored identities.
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn find_by_id(&self, id: IdentityId) -> Option<Identity> {
        self.inner.read().records.get(&id).cloned()
    }

    fn find_by_email(&self, email: &Email) -> Option<Identity> {
        self.inner
            .read()
            .records
            .values()
            .find(|r| &r.email == email)
            .cloned()
    }

    fn list(&self) -> Vec<Identity> {
        self.inner.read().records.values().cloned().collect()
    }

    fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let mut guard = self.inner.write();
        if guard.email_taken(&new.email, None) {
            return Err(StoreError::DuplicateEmail(new.email));
        }
        guard.last_id += 1;
        let now = Utc::now();
        let identity = Identity {
            id: IdentityId::new(guard.last_id),
            name: new.name,
            email: new.email,
            password_digest: new.password_digest,
            created_at: now,
            updated_at: now,
        };
        guard.records.insert(identity.id, identity.clone());
        tracing::debug!(identity_id = %identity.id, "identity created");
        Ok(identity)
    }

    fn update(&self, id: IdentityId, changes: IdentityChanges) -> Result<Identity, StoreError> {
        // Uniqueness check and write happen under one lock.
        let mut guard = self.inner.write();
        if let Some(email) = &changes.email {
            if guard.email_taken(email, Some(id)) {
                return Err(StoreError::DuplicateEmail(email.clone()));
            }
        }
        let record = guard.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if changes.is_empty() {
            return Ok(record.clone());
        }
        if let Some(name) = changes.name {
            record.name = name;
        }
        if let Some(email) = changes.email {
            record.email = email;
        }
        if let Some(digest) = changes.password_digest {
            record.password_digest = digest;
        }
        record.updated_at = Utc::now();
        tracing::debug!(identity_id = %id, "identity updated");
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::{PasswordDigest, MIN_COST};

    fn new_identity(name: &str, email: &str) -> NewIdentity {
        NewIdentity::new(
            name,
            Email::parse(email).unwrap(),
            PasswordDigest::hash("password123", MIN_COST).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let store = InMemoryIdentityStore::new();
        let a = store.create(new_identity("A", "a@x.com")).unwrap();
        let b = store.create(new_identity("B", "b@x.com")).unwrap();
        assert_eq!(a.id, IdentityId::new(1));
        assert_eq!(b.id, IdentityId::new(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn find_by_id_and_email() {
        let store = InMemoryIdentityStore::new();
        let a = store.create(new_identity("A", "a@x.com")).unwrap();
        assert_eq!(store.find_by_id(a.id), Some(a.clone()));
        assert_eq!(
            store.find_by_email(&Email::parse("A@X.COM").unwrap()),
            Some(a)
        );
        assert!(store.find_by_id(IdentityId::new(99)).is_none());
    }

    #[test]
    fn duplicate_email_rejected_on_create() {
        let store = InMemoryIdentityStore::new();
        store.create(new_identity("A", "a@x.com")).unwrap();
        let err = store.create(new_identity("A2", "A@x.com")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_email_rejected_on_update() {
        let store = InMemoryIdentityStore::new();
        store.create(new_identity("A", "a@x.com")).unwrap();
        let b = store.create(new_identity("B", "b@x.com")).unwrap();
        let changes = IdentityChanges {
            email: Some(Email::parse("a@x.com").unwrap()),
            ..Default::default()
        };
        assert!(matches!(
            store.update(b.id, changes),
            Err(StoreError::DuplicateEmail(_))
        ));
    }

    #[test]
    fn update_to_own_email_is_allowed() {
        let store = InMemoryIdentityStore::new();
        let a = store.create(new_identity("A", "a@x.com")).unwrap();
        let changes = IdentityChanges {
            email: Some(Email::parse("a@x.com").unwrap()),
            name: Some("Alice".into()),
            ..Default::default()
        };
        let updated = store.update(a.id, changes).unwrap();
        assert_eq!(updated.name, "Alice");
        assert!(updated.updated_at >= a.updated_at);
    }

    #[test]
    fn empty_update_leaves_record_untouched() {
        let store = InMemoryIdentityStore::new();
        let a = store.create(new_identity("A", "a@x.com")).unwrap();
        let unchanged = store.update(a.id, IdentityChanges::default()).unwrap();
        assert_eq!(unchanged, a);
    }

    #[test]
    fn update_missing_identity() {
        let store = InMemoryIdentityStore::new();
        let err = store
            .update(IdentityId::new(5), IdentityChanges::default())
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(IdentityId::new(5)));
    }

    #[test]
    fn list_is_ordered_by_id() {
        let store = InMemoryIdentityStore::new();
        for i in 0..5 {
            store
                .create(new_identity("n", &format!("u{i}@x.com")))
                .unwrap();
        }
        let ids: Vec<u64> = store.list().iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn concurrent_reads_see_same_record() {
        let store = InMemoryIdentityStore::new();
        let a = store.create(new_identity("A", "a@x.com")).unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.find_by_id(a.id).map(|i| i.email))
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), Some(a.email.clone()));
        }
    }
}
