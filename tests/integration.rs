//! Integration tests driving the public API end-to-end.
//!
//! These tests verify that:
//! 1. Free-text rights specifications flow through parse → ACE → insert →
//!    render against a realistic ACL
//! 2. The dialect works behind `dyn AceDialect`, like a generic editor uses it
//! 3. Rendered output survives a copy+paste round trip, noise included
//! 4. A lock listing with both resolvers behaves correctly across pages,
//!    including failure handling

use fsadmin_core::*;
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// ACL editing flow
// =============================================================================

fn ace(trustee: &str, kind: AceType, rights: &[Right], flags: &[Flag]) -> Ace {
    Ace {
        trustee: trustee.into(),
        kind,
        rights: rights.iter().copied().collect(),
        flags: flags.iter().copied().collect(),
    }
}

/// What a generic editor's `grant` operation does with the dialect: parse
/// the spec, build the ACE, insert at the canonical position.
fn grant(
    dialect: &dyn AceDialect,
    acl: &mut Acl,
    trustee: &str,
    spec: &[&str],
) -> Result<usize, AdminError> {
    let tokens: Vec<String> = spec.iter().map(|s| s.to_string()).collect();
    let rights = dialect.parse_rights(&tokens, AceType::Allowed)?;
    let position = dialect.find_grant_position(acl);
    acl.insert(
        position,
        Ace {
            trustee: trustee.into(),
            kind: AceType::Allowed,
            rights,
            flags: BTreeSet::new(),
        },
    );
    Ok(position)
}

/// An ACL in canonical order: explicit deny, explicit allow, inherited
/// entries from two ancestors.
fn sample_acl() -> Acl {
    vec![
        ace("guest", AceType::Denied, &[Right::Delete], &[]),
        ace(
            "ops",
            AceType::Allowed,
            Shorthand::Read.members(),
            &[Flag::ObjectInherit],
        ),
        ace(
            "guest",
            AceType::Denied,
            &[Right::WriteAcl],
            &[Flag::Inherited],
        ),
        ace(
            "everyone",
            AceType::Allowed,
            Shorthand::Read.members(),
            &[Flag::Inherited, Flag::ContainerInherit],
        ),
    ]
}

#[test]
fn grant_lands_between_explicit_and_inherited_entries() {
    let mut acl = sample_acl();
    let position = grant(&FileAceDialect, &mut acl, "backup", &["write", "file"]).unwrap();
    assert_eq!(position, 2);
    assert_eq!(acl.len(), 5);
    assert_eq!(acl[2].trustee, "backup");
    assert!(!acl[2].is_inherited());
    assert!(acl[3].is_inherited());
}

#[test]
fn grant_appends_to_acl_with_no_inherited_entries() {
    let mut acl = vec![ace("guest", AceType::Denied, &[Right::Delete], &[])];
    let position = grant(&FileAceDialect, &mut acl, "backup", &["read"]).unwrap();
    assert_eq!(position, 1);
}

#[test]
fn granted_rights_carry_implicit_synchronize() {
    let mut acl = Acl::new();
    grant(&FileAceDialect, &mut acl, "backup", &["read"]).unwrap();
    assert!(acl[0].rights.contains(&Right::Synchronize));
    // ...which rendering then hides again.
    assert_eq!(FileAceDialect.render_rights(&acl[0]), "Read");
}

#[test]
fn bad_grant_spec_is_rejected_before_the_acl_changes() {
    let mut acl = sample_acl();
    let err = grant(&FileAceDialect, &mut acl, "backup", &["red", "contents"]).unwrap_err();
    match err {
        AdminError::BadRights { token, input } => {
            assert_eq!(token, "red");
            assert_eq!(input, "red contents");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(acl, sample_acl());
}

#[test]
fn editor_matches_entries_by_parsed_value() {
    // A "modify" operation locates the target entry by re-parsing the user's
    // rights/flags description and comparing as sets.
    let dialect = FileAceDialect;
    let acl = sample_acl();
    let spec: Vec<String> = vec!["READ_ACL".into()];
    let matches: Vec<&Ace> = acl
        .iter()
        .filter(|a| dialect.rights_equal(a, &[String::from("write acl")]).unwrap())
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].trustee, "guest");
    assert!(matches[0].is_inherited());
    // No entry holds exactly {ReadAcl}.
    assert!(!acl.iter().any(|a| dialect.rights_equal(a, &spec).unwrap()));
}

#[test]
fn pretty_printed_acl_feeds_back_in_unmodified() {
    let dialect = FileAceDialect;
    for entry in &sample_acl() {
        let rights_text = dialect.render_rights(entry);
        let flags_text = dialect.render_flags(entry);
        // Paste the printed text straight back in, commas intact, then mangle
        // the casing for good measure: the parse must not change.
        let clean = dialect.parse_rights(&[rights_text.clone()], entry.kind).unwrap();
        let noisy = dialect
            .parse_rights(&[rights_text.to_uppercase()], entry.kind)
            .unwrap();
        assert_eq!(clean, noisy);
        assert!(clean.is_superset(&entry.rights));
        assert!(
            dialect
                .flags_equal(entry, &[flags_text.to_lowercase()])
                .unwrap()
        );
    }
}

#[test]
fn render_and_reparse_fixed_point() {
    // After one parse, render and re-parse reproduce the set exactly.
    let dialect = FileAceDialect;
    for kind in [AceType::Allowed, AceType::Denied] {
        let spec: Vec<String> = vec!["read".into(), "execute".into(), "delete child".into()];
        let first = dialect.parse_rights(&spec, kind).unwrap();
        let printed = dialect.render_rights(&ace(
            "ops",
            kind,
            &first.iter().copied().collect::<Vec<_>>(),
            &[],
        ));
        let second = dialect.parse_rights(&[printed], kind).unwrap();
        assert_eq!(first, second);
    }
}

// =============================================================================
// Lock listing flow
// =============================================================================

/// Mock lock server: three pages of two entries, two distinct files locked
/// from two client addresses, one address that never resolves.
struct MockServer {
    advances: AtomicUsize,
    path_batches: Mutex<Vec<Vec<String>>>,
    host_batches: Mutex<Vec<Vec<String>>>,
}

const PAGE_LIMIT: usize = 2;

impl MockServer {
    fn new() -> Self {
        Self {
            advances: AtomicUsize::new(0),
            path_batches: Mutex::new(Vec::new()),
            host_batches: Mutex::new(Vec::new()),
        }
    }

    fn page(&self, index: usize) -> LockPage {
        // Pages 0 and 1 are full; page 2 is short, which ends the stream.
        let sizes = [PAGE_LIMIT, PAGE_LIMIT, 1];
        let entries = (0..sizes[index])
            .map(|n| LockEntry {
                // Both files appear on every page.
                file_id: format!("file-{n}"),
                owner_name: format!("client-{index}-{n}"),
                owner_address: if n == 0 {
                    "10.0.0.1".to_string()
                } else {
                    "10.0.0.66".to_string()
                },
                lock_type: LockType::Exclusive,
            })
            .collect();
        LockPage {
            entries,
            next: format!("cursor:{}", index + 1),
        }
    }
}

impl LockApi for MockServer {
    fn locks_by_file(&self, _file_id: &str, _limit: usize) -> Result<LockPage, AdminError> {
        Ok(self.page(0))
    }

    fn locks_by_owner(
        &self,
        _owner_name: Option<&str>,
        _owner_address: Option<&str>,
        _limit: usize,
    ) -> Result<LockPage, AdminError> {
        Ok(self.page(0))
    }

    fn next_page(&self, reference: &str) -> Result<LockPage, AdminError> {
        let index: usize = reference.strip_prefix("cursor:").unwrap().parse().unwrap();
        self.advances.fetch_add(1, Ordering::SeqCst);
        Ok(self.page(index))
    }

    fn resolve_paths(&self, file_ids: &[String]) -> Vec<Resolution> {
        self.path_batches.lock().unwrap().push(file_ids.to_vec());
        file_ids
            .iter()
            .map(|id| Resolution {
                id: id.clone(),
                value: Some(format!("/exports/{id}")),
            })
            .collect()
    }

    fn resolve_hostnames(&self, addresses: &[String]) -> Vec<Resolution> {
        self.host_batches.lock().unwrap().push(addresses.to_vec());
        addresses
            .iter()
            .map(|addr| Resolution {
                id: addr.clone(),
                value: if addr == "10.0.0.66" {
                    None // reverse lookup fails for this client
                } else {
                    Some(format!("host-{addr}"))
                },
            })
            .collect()
    }
}

fn full_options() -> LockStreamOptions {
    LockStreamOptions {
        page_limit: PAGE_LIMIT,
        resolve_paths: true,
        resolve_hostnames: true,
    }
}

#[test]
fn lock_listing_streams_every_page_with_annotations() {
    let server = MockServer::new();
    let stream = LockStream::by_file(&server, "file-0", full_options()).unwrap();
    let holders: Vec<LockHolder> = stream.map(|h| h.unwrap()).collect();

    assert_eq!(holders.len(), 5);
    assert_eq!(server.advances.load(Ordering::SeqCst), 2);

    // Every entry got a path; only the resolvable address got a hostname.
    assert!(holders.iter().all(|h| h.path.is_some()));
    assert_eq!(holders[0].path.as_deref(), Some("/exports/file-0"));
    assert_eq!(holders[0].hostname.as_deref(), Some("host-10.0.0.1"));
    assert_eq!(holders[1].hostname, None);
    assert_eq!(holders[1].entry.owner_address, "10.0.0.66");
}

#[test]
fn resolution_happens_once_per_id_for_the_whole_stream() {
    let server = MockServer::new();
    let stream = LockStream::by_owner(&server, Some("client-0-0"), None, full_options()).unwrap();
    assert_eq!(stream.count(), 5);

    // Both files and both addresses recur on every page; each id was
    // resolved exactly once, in a single first-page batch.
    assert_eq!(
        *server.path_batches.lock().unwrap(),
        vec![vec!["file-0", "file-1"]]
    );
    assert_eq!(
        *server.host_batches.lock().unwrap(),
        vec![vec!["10.0.0.1", "10.0.0.66"]]
    );
    // The failed reverse lookup was cached too, not retried per page.
}

#[test]
fn display_falls_back_to_raw_ids() {
    // How the CLI layer consumes the stream: friendly name when resolved,
    // raw id otherwise.
    let server = MockServer::new();
    let stream = LockStream::by_file(&server, "file-0", full_options()).unwrap();
    let lines: Vec<String> = stream
        .map(|h| {
            let h = h.unwrap();
            format!(
                "{} {}",
                h.hostname.as_deref().unwrap_or(&h.entry.owner_address),
                h.path.as_deref().unwrap_or(&h.entry.file_id),
            )
        })
        .collect();
    assert_eq!(lines[0], "host-10.0.0.1 /exports/file-0");
    assert_eq!(lines[1], "10.0.0.66 /exports/file-1");
}

// =============================================================================
// Serde round trips (feature = "serde")
// =============================================================================

#[cfg(feature = "serde")]
mod serde_tests {
    use super::*;

    #[test]
    fn ace_round_trips_through_json() {
        let original = ace(
            "ops",
            AceType::Allowed,
            Shorthand::Read.members(),
            &[Flag::ObjectInherit, Flag::ContainerInherit],
        );
        let json = serde_json::to_string(&original).unwrap();
        let back: Ace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn lock_holder_round_trips_through_json() {
        let original = LockHolder {
            entry: LockEntry {
                file_id: "file-0".into(),
                owner_name: "client".into(),
                owner_address: "10.0.0.1".into(),
                lock_type: LockType::Shared,
            },
            path: Some("/exports/file-0".into()),
            hostname: None,
        };
        let json = serde_json::to_string(&original).unwrap();
        let back: LockHolder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }
}
