//! The dialect adapter a generic ACL editor plugs into.
//!
//! An ACL editor is polymorphic over rights dialects: it knows how to grant,
//! deny, remove, and modify entries in an ordered ACL, but everything
//! dialect-specific — what the rights are, how they parse and print, where a
//! new grant belongs — comes through the [`AceDialect`] trait defined here.
//! [`FileAceDialect`] is the implementation for this crate's file-rights
//! dialect.
//!
//! # Example
//!
//! ```rust
//! use fsadmin_core::{Ace, AceDialect, AceType, AdminError, FileAceDialect};
//! use std::collections::BTreeSet;
//!
//! fn grant(
//!     dialect: &dyn AceDialect,
//!     acl: &mut Vec<Ace>,
//!     trustee: &str,
//!     spec: &[String],
//! ) -> Result<(), AdminError> {
//!     let rights = dialect.parse_rights(spec, AceType::Allowed)?;
//!     let ace = Ace {
//!         trustee: trustee.into(),
//!         kind: AceType::Allowed,
//!         rights,
//!         flags: BTreeSet::new(),
//!     };
//!     let pos = dialect.find_grant_position(acl);
//!     acl.insert(pos, ace);
//!     Ok(())
//! }
//!
//! let mut acl = Vec::new();
//! let spec = vec!["read".to_string(), "execute".to_string()];
//! grant(&FileAceDialect, &mut acl, "ops", &spec).unwrap();
//! assert_eq!(FileAceDialect.render_rights(&acl[0]), "Execute/Traverse, Read");
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use crate::tokenizer::{Unmatched, normalize};
use crate::{Ace, AceType, AdminError, Flag, Right, Shorthand};

/// What a rights-vocabulary name stands for.
#[derive(Debug, Clone, Copy)]
enum RightsName {
    /// A named bundle that expands to several rights.
    Bundle(Shorthand),
    /// A single elementary right.
    Single(Right),
}

/// Lowercase rights vocabulary: bundle names, elementary labels, and input
/// aliases for the slash-joined execute label.
static RIGHTS_VOCAB: LazyLock<HashMap<String, RightsName>> = LazyLock::new(|| {
    let mut vocab = HashMap::new();
    for bundle in Shorthand::ALL {
        vocab.insert(bundle.label().to_lowercase(), RightsName::Bundle(bundle));
    }
    for right in Right::ALL {
        vocab.insert(right.label().to_lowercase(), RightsName::Single(right));
    }
    vocab.insert("execute".to_string(), RightsName::Single(Right::Execute));
    vocab.insert("traverse".to_string(), RightsName::Single(Right::Execute));
    vocab
});

/// Lowercase flag vocabulary. No bundles, no aliases.
static FLAGS_VOCAB: LazyLock<HashMap<String, Flag>> = LazyLock::new(|| {
    Flag::ALL
        .into_iter()
        .map(|flag| (flag.label().to_lowercase(), flag))
        .collect()
});

/// Everything a generic ACL editor needs from a rights dialect.
///
/// Parsing is tolerant (case-insensitive, comma/whitespace noise, shorthand
/// bundles) and rendering is stable: output fed back through parsing yields
/// the same rights. Equality checks parse their token argument through the
/// same grammar so the editor can match existing entries by value.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`; the dialect is pure and
/// stateless, so this is free.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn AceDialect`, enabling
/// one editor to operate on several dialects at runtime.
pub trait AceDialect: Send + Sync {
    /// Parse a free-text rights specification into a rights set.
    ///
    /// Shorthand bundle names expand to their members (union).
    ///
    /// For `AceType::Allowed` the synchronize right is added whether or not
    /// it was requested: leaving it off an allow ACE silently breaks remote
    /// access for the trustee even though every requested right is granted.
    /// It is never added for `AceType::Denied`, where it would deny more
    /// broadly than asked.
    ///
    /// # Errors
    ///
    /// - [`AdminError::BadRights`] naming the first unrecognized word
    fn parse_rights(
        &self,
        tokens: &[String],
        kind: AceType,
    ) -> Result<BTreeSet<Right>, AdminError>;

    /// Render an ACE's rights set as stable human-readable text.
    ///
    /// Every shorthand bundle that is a subset of the rights is reported —
    /// overlapping bundles all appear — and rights not covered by any bundle
    /// are appended individually, the whole list sorted and comma-joined.
    /// The full rights set renders as the single literal `All`.
    ///
    /// On allow ACEs holding more than one right the synchronize right is
    /// suppressed from output: requesting it is implicit, so showing it is
    /// noise. It stays visible on deny ACEs, where its presence is anomalous
    /// and probably breaking things.
    fn render_rights(&self, ace: &Ace) -> String;

    /// Compare an ACE's rights against a parsed token specification, as sets.
    ///
    /// Tokens go through the same grammar as [`parse_rights`]
    /// (shorthand expansion included) but without the implicit-synchronize
    /// policy, so a deny ACE can be matched exactly as written.
    ///
    /// # Errors
    ///
    /// - [`AdminError::BadRights`] if the tokens do not parse; a malformed
    ///   matcher is a caller bug and is never swallowed
    ///
    /// [`parse_rights`]: Self::parse_rights
    fn rights_equal(&self, ace: &Ace, tokens: &[String]) -> Result<bool, AdminError>;

    /// Parse a free-text flags specification into a flag set.
    ///
    /// Same normalization as rights, over the flag vocabulary; no bundles,
    /// no implicit additions.
    ///
    /// # Errors
    ///
    /// - [`AdminError::BadFlags`] naming the first unrecognized word
    fn parse_flags(&self, tokens: &[String]) -> Result<BTreeSet<Flag>, AdminError>;

    /// Render an ACE's flags as comma-joined labels. Nothing is suppressed.
    fn render_flags(&self, ace: &Ace) -> String;

    /// Compare an ACE's flags against a parsed token specification, as sets.
    ///
    /// # Errors
    ///
    /// - [`AdminError::BadFlags`] if the tokens do not parse
    fn flags_equal(&self, ace: &Ace, tokens: &[String]) -> Result<bool, AdminError>;

    /// Choose the canonical position for a new explicit grant.
    ///
    /// Canonical ACL order is explicit (non-inherited) denies, explicit
    /// allows, then denies inherited from the parent, allows inherited from
    /// the parent, denies from the grandparent, and so on. Any position
    /// between the last explicit entry and the first inherited one is
    /// correct; this method returns the index of the first entry carrying
    /// [`Flag::Inherited`], or `acl.len()` when there is none.
    ///
    /// No deny-before-allow ordering is attempted among consecutive explicit
    /// entries; callers inserting several new entries insert denies first.
    /// Total: returns a valid index for any input, including an empty ACL.
    fn find_grant_position(&self, acl: &[Ace]) -> usize;
}

/// The file-rights dialect: POSIX-flavored elementary rights with
/// Windows-style presets and inheritance flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileAceDialect;

impl FileAceDialect {
    /// Tokenize and expand a rights specification without any type policy.
    ///
    /// Shared by parsing and by equality checks, which must not pick up the
    /// implicit synchronize right.
    fn expand_rights(&self, tokens: &[String]) -> Result<BTreeSet<Right>, AdminError> {
        let names = normalize(tokens, &RIGHTS_VOCAB).map_err(bad_rights)?;
        let mut rights = BTreeSet::new();
        for name in names {
            match name {
                RightsName::Bundle(bundle) => rights.extend(bundle.members().iter().copied()),
                RightsName::Single(right) => {
                    rights.insert(right);
                }
            }
        }
        Ok(rights)
    }
}

fn bad_rights(err: Unmatched) -> AdminError {
    AdminError::BadRights {
        token: err.token,
        input: err.input,
    }
}

fn bad_flags(err: Unmatched) -> AdminError {
    AdminError::BadFlags {
        token: err.token,
        input: err.input,
    }
}

impl AceDialect for FileAceDialect {
    fn parse_rights(
        &self,
        tokens: &[String],
        kind: AceType,
    ) -> Result<BTreeSet<Right>, AdminError> {
        let mut rights = self.expand_rights(tokens)?;
        if kind == AceType::Allowed {
            rights.insert(Right::Synchronize);
        }
        Ok(rights)
    }

    fn render_rights(&self, ace: &Ace) -> String {
        let all: BTreeSet<Right> = Right::ALL.into_iter().collect();
        if ace.rights == all {
            // No need to print anything else if every right is present.
            return Shorthand::All.label().to_string();
        }

        let mut names: Vec<&str> = Vec::new();
        let mut consumed: BTreeSet<Right> = BTreeSet::new();
        for bundle in Shorthand::ALL {
            let members: BTreeSet<Right> = bundle.members().iter().copied().collect();
            if members.is_subset(&ace.rights) {
                names.push(bundle.label());
                consumed.extend(members);
            }
        }

        // Hide the implicitly granted synchronize right on allow ACEs; keep
        // it visible on deny ACEs, where it should not be.
        if ace.kind == AceType::Allowed && ace.rights.len() > 1 {
            consumed.insert(Right::Synchronize);
        }

        for right in &ace.rights {
            if !consumed.contains(right) {
                names.push(right.label());
            }
        }

        names.sort_unstable();
        names.join(", ")
    }

    fn rights_equal(&self, ace: &Ace, tokens: &[String]) -> Result<bool, AdminError> {
        Ok(ace.rights == self.expand_rights(tokens)?)
    }

    fn parse_flags(&self, tokens: &[String]) -> Result<BTreeSet<Flag>, AdminError> {
        let flags = normalize(tokens, &FLAGS_VOCAB).map_err(bad_flags)?;
        Ok(flags.into_iter().collect())
    }

    fn render_flags(&self, ace: &Ace) -> String {
        ace.flags
            .iter()
            .map(|flag| flag.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn flags_equal(&self, ace: &Ace, tokens: &[String]) -> Result<bool, AdminError> {
        Ok(ace.flags == self.parse_flags(tokens)?)
    }

    fn find_grant_position(&self, acl: &[Ace]) -> usize {
        acl.iter()
            .position(Ace::is_inherited)
            .unwrap_or(acl.len())
    }
}
