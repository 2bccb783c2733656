//! Streaming enumeration of lock holders.
//!
//! The server reports held locks one bounded page at a time, and the raw
//! entries carry foreign ids — file ids and client addresses — that are only
//! meaningful to a human after a secondary lookup. [`LockStream`] presents
//! the whole result set as a single forward-only iterator: it fetches pages
//! as needed without loading the full list into memory, and annotates each
//! entry with a resolved path and hostname using one batched lookup per
//! resolver per page, cached for the life of the stream.
//!
//! # Example
//!
//! ```rust,ignore
//! use fsadmin_core::{LockStream, LockStreamOptions};
//!
//! let options = LockStreamOptions {
//!     resolve_paths: true,
//!     resolve_hostnames: true,
//!     ..Default::default()
//! };
//! for holder in LockStream::by_file(&api, "4242", options)? {
//!     let holder = holder?;
//!     println!(
//!         "{} {}",
//!         holder.entry.owner_name,
//!         holder.path.as_deref().unwrap_or(&holder.entry.file_id),
//!     );
//! }
//! ```

use std::collections::HashMap;

use crate::{AdminError, LockType};

/// One held lock as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockEntry {
    /// Id of the locked file. Resolvable to a path.
    pub file_id: String,
    /// Name of the client or principal holding the lock.
    pub owner_name: String,
    /// Address of the client holding the lock. Resolvable to a hostname.
    pub owner_address: String,
    /// Shared or exclusive.
    pub lock_type: LockType,
}

/// One server page of lock entries plus its continuation reference.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockPage {
    /// The entries on this page. At most the requested page limit.
    pub entries: Vec<LockEntry>,
    /// Opaque reference for fetching the following page. Not guaranteed to
    /// be empty at true end of data, so it is never used to detect
    /// termination.
    pub next: String,
}

/// A lock entry annotated with resolved display fields.
///
/// `None` is the explicit "no value" for a lookup that failed or was not
/// requested; callers display the raw id instead of a friendly name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockHolder {
    /// The raw entry from the server.
    pub entry: LockEntry,
    /// Full path of the locked file, when path resolution was requested and
    /// succeeded for this file id.
    pub path: Option<String>,
    /// Hostname of the holding client, when hostname resolution was
    /// requested and succeeded for this address.
    pub hostname: Option<String>,
}

/// Outcome of a batched resolution for a single id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The raw id that was looked up.
    pub id: String,
    /// The resolved display value, or `None` when the lookup failed.
    pub value: Option<String>,
}

/// The remote lock listing surface [`LockStream`] drives.
///
/// The two `locks_by_*` methods are first-page factories: they choose the
/// initial query and the stream's machinery is identical from there on.
///
/// Resolver methods are infallible at this boundary by design:
/// implementations fold any per-id or transport failure into a `None` value
/// for the affected ids, because a garbled name is preferable to aborting an
/// in-progress listing. Page fetches stay fallible — a transport failure
/// there means the sequence itself cannot continue.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. The stream itself holds a shared
/// reference and never requires mutation of the API object.
pub trait LockApi: Send + Sync {
    /// First page of lock holders for one file.
    ///
    /// # Errors
    ///
    /// - [`AdminError::PageFetch`] if the request fails
    fn locks_by_file(&self, file_id: &str, limit: usize) -> Result<LockPage, AdminError>;

    /// First page of lock holders matching an owner name and/or address,
    /// across files. Filtering is server-side; `None` leaves a field
    /// unconstrained.
    ///
    /// # Errors
    ///
    /// - [`AdminError::PageFetch`] if the request fails
    fn locks_by_owner(
        &self,
        owner_name: Option<&str>,
        owner_address: Option<&str>,
        limit: usize,
    ) -> Result<LockPage, AdminError>;

    /// Fetch the page behind a continuation reference.
    ///
    /// # Errors
    ///
    /// - [`AdminError::PageFetch`] if the request fails
    fn next_page(&self, reference: &str) -> Result<LockPage, AdminError>;

    /// Resolve a batch of distinct file ids to full paths.
    fn resolve_paths(&self, file_ids: &[String]) -> Vec<Resolution>;

    /// Resolve a batch of distinct client addresses to hostnames.
    fn resolve_hostnames(&self, addresses: &[String]) -> Vec<Resolution>;
}

/// Options for constructing a [`LockStream`].
#[derive(Debug, Clone, Copy)]
pub struct LockStreamOptions {
    /// Entries requested per page. Must be at least 1. A page shorter than
    /// this is what terminates the stream.
    pub page_limit: usize,
    /// Whether file ids should be resolved to full paths.
    pub resolve_paths: bool,
    /// Whether client addresses should be resolved to hostnames.
    pub resolve_hostnames: bool,
}

impl Default for LockStreamOptions {
    fn default() -> Self {
        Self {
            page_limit: 1000,
            resolve_paths: false,
            resolve_hostnames: false,
        }
    }
}

/// Forward-only, lazily paging iterator over annotated lock holders.
///
/// Single-pass and non-restartable. The only blocking points are the page
/// fetch on advance and the batched resolver calls after each fetch, both of
/// which happen strictly between yielded items; there is no prefetch.
/// Stopping iteration at any point is safe — no request or lock is held
/// between pulls.
///
/// Resolution is batched per page but cached per stream, so an id seen on an
/// earlier page is never resolved again on a later one.
pub struct LockStream<'a> {
    api: &'a dyn LockApi,
    options: LockStreamOptions,
    resolved_paths: HashMap<String, Option<String>>,
    resolved_hostnames: HashMap<String, Option<String>>,
    current: std::vec::IntoIter<LockHolder>,
    current_len: usize,
    next_ref: String,
    done: bool,
}

impl<'a> LockStream<'a> {
    /// Stream all lock holders for one file.
    ///
    /// # Errors
    ///
    /// - [`AdminError::PageFetch`] if the initial query fails
    pub fn by_file(
        api: &'a dyn LockApi,
        file_id: &str,
        options: LockStreamOptions,
    ) -> Result<Self, AdminError> {
        let first = api.locks_by_file(file_id, options.page_limit)?;
        Ok(Self::primed(api, options, first))
    }

    /// Stream all lock holders matching an owner name and/or address.
    ///
    /// # Errors
    ///
    /// - [`AdminError::PageFetch`] if the initial query fails
    pub fn by_owner(
        api: &'a dyn LockApi,
        owner_name: Option<&str>,
        owner_address: Option<&str>,
        options: LockStreamOptions,
    ) -> Result<Self, AdminError> {
        let first = api.locks_by_owner(owner_name, owner_address, options.page_limit)?;
        Ok(Self::primed(api, options, first))
    }

    fn primed(api: &'a dyn LockApi, options: LockStreamOptions, first_page: LockPage) -> Self {
        let mut stream = Self {
            api,
            options,
            resolved_paths: HashMap::new(),
            resolved_hostnames: HashMap::new(),
            current: Vec::new().into_iter(),
            current_len: 0,
            next_ref: String::new(),
            done: false,
        };
        stream.serve(first_page);
        stream
    }

    /// Make `page` the current page: resolve ids not yet in the caches and
    /// annotate every entry.
    fn serve(&mut self, page: LockPage) {
        self.current_len = page.entries.len();
        self.next_ref = page.next;
        let api = self.api;

        if self.options.resolve_paths {
            let ids: Vec<&str> = page.entries.iter().map(|e| e.file_id.as_str()).collect();
            let batch = fill_cache(&mut self.resolved_paths, &ids, |new_ids| {
                api.resolve_paths(new_ids)
            });
            tracing::debug!(entries = ids.len(), resolved = batch, "annotated paths");
        }
        if self.options.resolve_hostnames {
            let ids: Vec<&str> = page.entries.iter().map(|e| e.owner_address.as_str()).collect();
            let batch = fill_cache(&mut self.resolved_hostnames, &ids, |new_ids| {
                api.resolve_hostnames(new_ids)
            });
            tracing::debug!(entries = ids.len(), resolved = batch, "annotated hostnames");
        }

        let holders: Vec<LockHolder> = page
            .entries
            .into_iter()
            .map(|entry| {
                let path = self.resolved_paths.get(&entry.file_id).cloned().flatten();
                let hostname = self
                    .resolved_hostnames
                    .get(&entry.owner_address)
                    .cloned()
                    .flatten();
                LockHolder {
                    entry,
                    path,
                    hostname,
                }
            })
            .collect();
        self.current = holders.into_iter();
    }
}

/// Resolve the ids in `ids` that are absent from `cache`, with at most one
/// batched call, and record every outcome. Returns the batch size.
///
/// Ids the resolver does not answer for are cached as unresolved so they are
/// not retried on later pages.
fn fill_cache(
    cache: &mut HashMap<String, Option<String>>,
    ids: &[&str],
    resolve: impl FnOnce(&[String]) -> Vec<Resolution>,
) -> usize {
    let mut new_ids: Vec<String> = Vec::new();
    for id in ids {
        if !cache.contains_key(*id) && !new_ids.iter().any(|n| n == id) {
            new_ids.push((*id).to_string());
        }
    }
    if new_ids.is_empty() {
        return 0;
    }
    for resolution in resolve(&new_ids) {
        cache.insert(resolution.id, resolution.value);
    }
    let batch = new_ids.len();
    for id in new_ids {
        cache.entry(id).or_insert(None);
    }
    batch
}

impl Iterator for LockStream<'_> {
    type Item = Result<LockHolder, AdminError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(holder) = self.current.next() {
                return Some(Ok(holder));
            }
            if self.done {
                return None;
            }
            // Termination is page fullness, not an empty continuation
            // reference: when clients are frequently taking new locks the
            // server is not guaranteed to ever hand back an empty reference.
            if self.current_len != self.options.page_limit {
                self.done = true;
                return None;
            }
            tracing::debug!(reference = %self.next_ref, "advancing lock stream");
            match self.api.next_page(&self.next_ref) {
                Ok(page) => self.serve(page),
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
