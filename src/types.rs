// Shared types used by both the applier and the remote tree implementations.

/// Version guard for an ACL write.
///
/// The coordination service keeps an ACL version per node. `Any` overwrites
/// unconditionally (last writer wins); `Exact` makes the write fail with
/// [`TreeError::BadVersion`](crate::error::TreeError::BadVersion) when the node's
/// ACL version has moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AclVersion {
    #[default]
    Any,
    Exact(i32),
}

impl AclVersion {
    /// Version as understood by client libraries: `None` means "any".
    pub fn as_option(self) -> Option<i32> {
        match self {
            AclVersion::Any => None,
            AclVersion::Exact(v) => Some(v),
        }
    }
}

/// What to do below a node that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingNodePolicy {
    /// Report the node as missing and do not look for children.
    #[default]
    Skip,
    /// Report the node as missing and still list its children. The listing
    /// normally fails against a missing node, which aborts the walk.
    Descend,
}

/// Joins a child name onto its parent path.
///
/// Plain `parent + "/" + child` concatenation. The root `/` is the only parent that
/// already ends in a separator, so it joins as `/child`.
pub fn child_path(parent: &str, child: &str) -> String {
    if parent == "/" {
        format!("/{}", child)
    } else {
        format!("{}/{}", parent, child)
    }
}
