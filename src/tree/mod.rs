//! Remote tree abstraction.
//!
//! A `RemoteTree` is the component responsible for the four data operations the
//! applier issues against the coordination service: existence checks, ACL reads,
//! ACL writes and child listing. Session establishment and authentication belong
//! to the concrete implementation and happen before it is handed to the applier.
//!
//! `MemoryTree` keeps the whole tree in process and is what tests and fuzz targets
//! run against. `ZkTree` (feature `zookeeper`) talks to a real ensemble.

use crate::acl::AclEntry;
use crate::error::TreeError;
use crate::types::AclVersion;

pub mod memory;
#[cfg(feature = "zookeeper")]
pub mod zk;

pub use memory::MemoryTree;
#[cfg(feature = "zookeeper")]
pub use zk::ZkTree;

/// Trait implemented by remote tree backends.
///
/// Every call is blocking and independent: nothing guarantees that a node seen by
/// `exists` is still there for the following `get_acl` or `set_acl`.
pub trait RemoteTree {
    /// Returns whether a node exists at `path`.
    fn exists(&mut self, path: &str) -> Result<bool, TreeError>;

    /// Returns the ACL attached to `path`, in the order the server keeps it.
    fn get_acl(&mut self, path: &str) -> Result<Vec<AclEntry>, TreeError>;

    /// Replaces the ACL attached to `path` with `acl`.
    fn set_acl(&mut self, path: &str, acl: &[AclEntry], version: AclVersion) -> Result<(), TreeError>;

    /// Returns the names (not paths) of the immediate children of `path`.
    fn list_children(&mut self, path: &str) -> Result<Vec<String>, TreeError>;
}

impl<T: RemoteTree + ?Sized> RemoteTree for &mut T {
    fn exists(&mut self, path: &str) -> Result<bool, TreeError> {
        (**self).exists(path)
    }

    fn get_acl(&mut self, path: &str) -> Result<Vec<AclEntry>, TreeError> {
        (**self).get_acl(path)
    }

    fn set_acl(&mut self, path: &str, acl: &[AclEntry], version: AclVersion) -> Result<(), TreeError> {
        (**self).set_acl(path, acl, version)
    }

    fn list_children(&mut self, path: &str) -> Result<Vec<String>, TreeError> {
        (**self).list_children(path)
    }
}
