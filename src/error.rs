//! Error types for the fsadmin core.

/// Error type for rights parsing and paged enumeration.
///
/// Parse variants carry the offending token *and* the full original input so
/// the CLI boundary can echo exactly what the user typed. Uses
/// `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use fsadmin_core::AdminError;
///
/// let err = AdminError::BadRights {
///     token: "wirte".into(),
///     input: "read, wirte file".into(),
/// };
/// assert!(err.to_string().contains("wirte"));
/// assert!(err.to_string().contains("read, wirte file"));
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// A rights specification contained a word that matches no elementary
    /// right, shorthand, or alias.
    #[error("bad rights, error near \"{token}\": {input}")]
    BadRights {
        /// The first word that could not be matched.
        token: String,
        /// The original input, echoed for diagnostics.
        input: String,
    },

    /// A flags specification contained a word that matches no flag name.
    #[error("bad flags, error near \"{token}\": {input}")]
    BadFlags {
        /// The first word that could not be matched.
        token: String,
        /// The original input, echoed for diagnostics.
        input: String,
    },

    /// Fetching the next page of a paged result set failed.
    ///
    /// Unlike per-id resolution failures (which are normalized to "no value"
    /// and never surface as errors), a page-fetch failure means the sequence
    /// itself cannot continue and is propagated to the consumer.
    #[error("page fetch failed at {reference:?}: {source}")]
    PageFetch {
        /// The continuation reference that was being followed.
        reference: String,
        /// The underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
