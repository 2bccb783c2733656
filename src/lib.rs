//! # fsadmin-core
//!
//! Rights grammar, ACL editing contract, and paged lock enumeration for
//! **remote filesystem administration**.
//!
//! This crate is the dialect-specific core an administrative client builds
//! on: it parses free-form rights specifications into unambiguous rights
//! sets, renders them back as stable text, decides where a new grant belongs
//! in a canonically ordered ACL, and streams large server-paged lock
//! listings while lazily resolving file ids to paths and addresses to
//! hostnames. Transport, authentication, and the generic ACL editor itself
//! are external collaborators reached through the traits defined here.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use fsadmin_core::{Ace, AceDialect, AceType, FileAceDialect};
//! use std::collections::BTreeSet;
//!
//! # fn main() -> Result<(), fsadmin_core::AdminError> {
//! let dialect = FileAceDialect;
//!
//! // Free text in — commas, case, and shorthand bundles are all tolerated.
//! let spec = vec!["Read,".to_string(), "take Ownership".to_string()];
//! let rights = dialect.parse_rights(&spec, AceType::Allowed)?;
//!
//! let ace = Ace {
//!     trustee: "ops".into(),
//!     kind: AceType::Allowed,
//!     rights,
//!     flags: BTreeSet::new(),
//! };
//!
//! // Stable text out; parse(render(x)) recovers x.
//! assert_eq!(dialect.render_rights(&ace), "Read, Take ownership");
//! # Ok(())
//! # }
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Right`] / [`Flag`] | The closed elementary-rights and ACE-flag vocabularies |
//! | [`Shorthand`] | Named bundles of rights commonly granted together |
//! | [`Ace`] / [`Acl`] | One permission entry, and the ordered entry list |
//! | [`AceDialect`] | The contract a generic ACL editor needs from a dialect |
//! | [`FileAceDialect`] | The file-rights dialect implementation |
//! | [`LockApi`] | The remote lock listing and resolution surface |
//! | [`LockStream`] | Forward-only paging iterator over annotated lock holders |
//! | [`AdminError`] | Parse and page-fetch errors with full context |
//!
//! ---
//!
//! ## The Synchronize Policy
//!
//! The synchronize right means nothing to the server, but SMB clients
//! routinely request it and are denied access when an allow ACE lacks it.
//! [`AceDialect::parse_rights`] therefore adds it to every *allow* parse and
//! [`AceDialect::render_rights`] hides it from allow output; deny ACEs get
//! neither treatment, because implicitly denying it would cut access more
//! broadly than requested and its presence on a deny is worth seeing.
//!
//! ---
//!
//! ## Lock Enumeration
//!
//! [`LockStream`] pulls one bounded page of lock holders at a time through a
//! [`LockApi`] implementation and annotates entries with resolved paths and
//! hostnames — at most one batched resolver call per resolver per page,
//! cached per stream. A page shorter than the page limit ends the stream;
//! the continuation reference is deliberately *not* used for termination,
//! because it is not guaranteed to empty out while clients keep taking new
//! locks. Per-id resolution failures become explicit `None`s rather than
//! errors; page-fetch failures end the stream with
//! [`AdminError::PageFetch`].
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Enable serialization for [`Ace`], [`Right`], [`Flag`], [`LockEntry`], etc. |
//!
//! ---
//!
//! ## Thread Safety
//!
//! [`AceDialect`] implementations are pure, stateless, and reentrant.
//! [`LockStream`] is a single-consumer pull iterator; its resolution caches
//! are private to one stream and never shared.

// Private modules
mod dialect;
mod error;
mod locks;
mod rights;
mod tokenizer;
mod types;

// Public re-exports - error types
pub use error::AdminError;

// Public re-exports - vocabulary
pub use rights::{Flag, Right, Shorthand};

// Public re-exports - ACL model
pub use types::{Ace, AceType, Acl, LockType};

// Public re-exports - dialect adapter
pub use dialect::{AceDialect, FileAceDialect};

// Public re-exports - lock enumeration
pub use locks::{LockApi, LockEntry, LockHolder, LockPage, LockStream, LockStreamOptions, Resolution};
