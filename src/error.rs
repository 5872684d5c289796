//!
//! Defines error types for ACL parsing, remote tree access and subtree application.

use std::fmt;
use std::path::PathBuf;

/// Errors raised while parsing ACL tokens from the command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclError {
    /// The token does not contain the two separators of `scheme:id:perms`.
    #[error("Invalid ACL. Expected format: scheme:id:perms. Found: {token}")]
    Malformed { token: String },
}

/// Errors surfaced by a [`RemoteTree`](crate::tree::RemoteTree) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node does not exist (or was deleted between two calls).
    #[error("node {0} does not exist")]
    NoNode(String),
    /// The session lacks the permission required for the operation.
    #[error("not authorized")]
    NoAuth,
    /// The node version did not match a version-checked write.
    #[error("version mismatch")]
    BadVersion,
    /// The ACL sent to the server was rejected.
    #[error("invalid ACL")]
    InvalidAcl,
    /// The connection or session to the ensemble was lost.
    #[error("connection lost: {0}")]
    Connection(String),
    /// Any other failure reported by the client library.
    #[error("{0}")]
    Other(String),
}

/// Remote operation that failed during a subtree walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeOp {
    Exists,
    GetAcl,
    SetAcl,
    ListChildren,
}

impl fmt::Display for TreeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TreeOp::Exists => "exists",
            TreeOp::GetAcl => "get-acl",
            TreeOp::SetAcl => "set-acl",
            TreeOp::ListChildren => "list-children",
        })
    }
}

/// Errors that abort [`Applier::apply`](crate::applier::Applier::apply).
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// A remote call failed. Mutations on nodes visited earlier stay applied.
    #[error("{op} failed for {path}: {source}")]
    Remote {
        op: TreeOp,
        path: String,
        #[source]
        source: TreeError,
    },
    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

/// Errors raised while loading the properties file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot open properties file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed properties file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}
