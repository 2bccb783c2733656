//! Core types for ACL editing.

use std::collections::BTreeSet;

use crate::{Flag, Right};

/// Whether an ACE grants or denies its rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AceType {
    /// The ACE grants its rights to the trustee.
    Allowed,
    /// The ACE denies its rights to the trustee.
    Denied,
}

/// One access control entry: a trustee, a grant/deny type, a rights set,
/// and propagation flags.
///
/// Constructed from a remote read (or from parsed user input), mutated in
/// memory through the dialect adapter, and written back whole. Holds no
/// resources.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ace {
    /// The identity the entry applies to. Opaque to this crate: the remote
    /// service interprets it (a name, a SID, an auth id).
    pub trustee: String,
    /// Grant or deny.
    pub kind: AceType,
    /// The elementary rights the entry grants or denies.
    pub rights: BTreeSet<Right>,
    /// Propagation and provenance flags.
    pub flags: BTreeSet<Flag>,
}

impl Ace {
    /// Returns `true` if this entry was propagated from a parent rather than
    /// set explicitly on the object.
    #[inline]
    pub fn is_inherited(&self) -> bool {
        self.flags.contains(&Flag::Inherited)
    }
}

/// An ordered sequence of ACEs.
///
/// Canonical order — explicit denies, explicit allows, then inherited
/// entries grouped by inheritance source — is a convention maintained by
/// insertion (see
/// [`AceDialect::find_grant_position`](crate::AceDialect::find_grant_position)),
/// never enforced by re-sorting.
pub type Acl = Vec<Ace>;

/// Type of a held file lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LockType {
    /// Shared lock - multiple readers allowed.
    Shared,
    /// Exclusive lock - single writer only.
    Exclusive,
}
