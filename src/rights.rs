//! Rights and flag vocabulary for the ACL dialect.
//!
//! The dialect is a hybrid of POSIX permission semantics and Windows-style
//! ACE presets: a closed set of elementary [`Right`]s, a closed set of ACE
//! propagation [`Flag`]s, and a handful of named [`Shorthand`] bundles that
//! group rights commonly granted together. Everything here is static data;
//! parsing and rendering live in the dialect adapter.

/// One elementary permission in the dialect.
///
/// The set is closed: these are exactly the values the remote API produces
/// and accepts. Display names come from [`Right::label`] and are stable —
/// pretty-printed output can be fed back in as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Right {
    /// Read file contents, or list a directory.
    Read,
    /// Read extended attributes.
    ReadEa,
    /// Read basic attributes.
    ReadAttr,
    /// Read the ACL itself.
    ReadAcl,
    /// Write extended attributes.
    WriteEa,
    /// Write basic attributes.
    WriteAttr,
    /// Replace the ACL.
    WriteAcl,
    /// Take ownership of the object.
    ChangeOwner,
    /// Change the owning group.
    WriteGroup,
    /// Delete the object.
    Delete,
    /// Execute a file, or traverse a directory.
    Execute,
    /// Overwrite existing file data.
    Modify,
    /// Extend a file (append / grow).
    Extend,
    /// Create a file inside a directory.
    AddFile,
    /// Create a subdirectory inside a directory.
    AddSubdir,
    /// Delete a child of a directory.
    DeleteChild,
    /// The synchronize right. Means nothing to the server, but SMB clients
    /// routinely request it and are denied access when it is absent, so it is
    /// implicitly granted on every allow ACE.
    Synchronize,
}

impl Right {
    /// Every elementary right, in canonical declaration order.
    pub const ALL: [Right; 17] = [
        Right::Read,
        Right::ReadEa,
        Right::ReadAttr,
        Right::ReadAcl,
        Right::WriteEa,
        Right::WriteAttr,
        Right::WriteAcl,
        Right::ChangeOwner,
        Right::WriteGroup,
        Right::Delete,
        Right::Execute,
        Right::Modify,
        Right::Extend,
        Right::AddFile,
        Right::AddSubdir,
        Right::DeleteChild,
        Right::Synchronize,
    ];

    /// The stable human-readable name for this right.
    ///
    /// A few names deliberately diverge from the API enum spelling: "Modify"
    /// gets confused with the Windows preset of the same name and "Read"
    /// suggests a much broader set of rights, so those print as "Write data"
    /// and "Read contents".
    pub const fn label(self) -> &'static str {
        match self {
            Right::Read => "Read contents",
            Right::ReadEa => "Read EA",
            Right::ReadAttr => "Read attr",
            Right::ReadAcl => "Read ACL",
            Right::WriteEa => "Write EA",
            Right::WriteAttr => "Write attr",
            Right::WriteAcl => "Write ACL",
            Right::ChangeOwner => "Change owner",
            Right::WriteGroup => "Write group",
            Right::Delete => "Delete",
            Right::Execute => "Execute/Traverse",
            Right::Modify => "Write data",
            Right::Extend => "Extend file",
            Right::AddFile => "Add file",
            Right::AddSubdir => "Add subdir",
            Right::DeleteChild => "Delete child",
            Right::Synchronize => "Synchronize",
        }
    }
}

/// ACE propagation and provenance metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Flag {
    /// Propagate to child files.
    ObjectInherit,
    /// Propagate to child directories.
    ContainerInherit,
    /// Children receive the ACE but do not propagate it further.
    NoPropagateInherit,
    /// The ACE exists only to be inherited; it does not apply to the object
    /// it is set on.
    InheritOnly,
    /// The ACE was propagated from a parent rather than set explicitly.
    /// Canonical ACL order places all explicit entries before any entry
    /// carrying this flag.
    Inherited,
}

impl Flag {
    /// Every flag, in canonical declaration order.
    pub const ALL: [Flag; 5] = [
        Flag::ObjectInherit,
        Flag::ContainerInherit,
        Flag::NoPropagateInherit,
        Flag::InheritOnly,
        Flag::Inherited,
    ];

    /// The stable human-readable name for this flag.
    pub const fn label(self) -> &'static str {
        match self {
            Flag::ObjectInherit => "Object inherit",
            Flag::ContainerInherit => "Container inherit",
            Flag::NoPropagateInherit => "No propagate inherit",
            Flag::InheritOnly => "Inherit only",
            Flag::Inherited => "Inherited",
        }
    }
}

/// A named bundle of rights commonly granted together.
///
/// Bundles may overlap: a rights set holding the union of two bundles
/// satisfies both, and rendering reports both names. `Read` and `WriteFile`
/// correspond to the POSIX mode bits (and the server's default ACLs);
/// `TakeOwnership` and `WriteDirectory` correspond to Windows presets.
///
/// There is no "write directory" POSIX bundle distinct from
/// [`Shorthand::WriteDirectory`] because distinguishing the two sets makes
/// for confusion; [`Right::DeleteChild`] is input and output individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shorthand {
    /// Every elementary right.
    All,
    /// POSIX read: contents, EA, attributes, and the ACL.
    Read,
    /// POSIX write on a file: attributes, EA, extend, and data.
    WriteFile,
    /// The Windows take-ownership preset: owner and owning group.
    TakeOwnership,
    /// The Windows modify preset as it applies to a directory: attributes,
    /// EA, and child creation. Applied to a file it does *not* mean the same
    /// thing as the Windows preset, which is why there is no plain "Write"
    /// bundle.
    WriteDirectory,
}

impl Shorthand {
    /// Every shorthand bundle.
    pub const ALL: [Shorthand; 5] = [
        Shorthand::All,
        Shorthand::Read,
        Shorthand::WriteFile,
        Shorthand::TakeOwnership,
        Shorthand::WriteDirectory,
    ];

    /// The stable human-readable name for this bundle.
    pub const fn label(self) -> &'static str {
        match self {
            Shorthand::All => "All",
            Shorthand::Read => "Read",
            Shorthand::WriteFile => "Write file",
            Shorthand::TakeOwnership => "Take ownership",
            Shorthand::WriteDirectory => "Write directory",
        }
    }

    /// The rights this bundle expands to.
    pub const fn members(self) -> &'static [Right] {
        match self {
            Shorthand::All => &Right::ALL,
            Shorthand::Read => &[Right::Read, Right::ReadEa, Right::ReadAttr, Right::ReadAcl],
            Shorthand::WriteFile => &[
                Right::WriteAttr,
                Right::WriteEa,
                Right::Extend,
                Right::Modify,
            ],
            Shorthand::TakeOwnership => &[Right::ChangeOwner, Right::WriteGroup],
            Shorthand::WriteDirectory => &[
                Right::WriteAttr,
                Right::WriteEa,
                Right::AddFile,
                Right::AddSubdir,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn all_rights_are_distinct() {
        let set: BTreeSet<Right> = Right::ALL.into_iter().collect();
        assert_eq!(set.len(), 17);
    }

    #[test]
    fn labels_are_distinct() {
        let labels: BTreeSet<&str> = Right::ALL.iter().map(|r| r.label()).collect();
        assert_eq!(labels.len(), 17);
    }

    #[test]
    fn all_shorthand_covers_every_right() {
        let members: BTreeSet<Right> = Shorthand::All.members().iter().copied().collect();
        assert_eq!(members.len(), Right::ALL.len());
    }

    #[test]
    fn shorthand_members_are_subsets_of_all() {
        let all: BTreeSet<Right> = Right::ALL.into_iter().collect();
        for shorthand in Shorthand::ALL {
            for right in shorthand.members() {
                assert!(all.contains(right), "{:?} not a known right", right);
            }
        }
    }

    #[test]
    fn write_bundles_overlap() {
        let file: BTreeSet<Right> = Shorthand::WriteFile.members().iter().copied().collect();
        let dir: BTreeSet<Right> = Shorthand::WriteDirectory.members().iter().copied().collect();
        let shared: Vec<&Right> = file.intersection(&dir).collect();
        assert_eq!(shared, [&Right::WriteEa, &Right::WriteAttr]);
    }

    #[test]
    fn no_bundle_except_all_includes_synchronize() {
        for shorthand in [
            Shorthand::Read,
            Shorthand::WriteFile,
            Shorthand::TakeOwnership,
            Shorthand::WriteDirectory,
        ] {
            assert!(!shorthand.members().contains(&Right::Synchronize));
        }
    }

    #[test]
    fn flag_labels_round_out_the_vocabulary() {
        assert_eq!(Flag::NoPropagateInherit.label(), "No propagate inherit");
        assert_eq!(Flag::Inherited.label(), "Inherited");
    }

    #[test]
    fn vocabulary_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Right>();
        assert_send_sync::<Flag>();
        assert_send_sync::<Shorthand>();
    }
}
