//! ZooKeeper-backed [`RemoteTree`].

use std::time::Duration;

use zookeeper::{Acl, Permission, WatchedEvent, Watcher, ZkError, ZooKeeper};

use crate::acl::AclEntry;
use crate::error::TreeError;
use crate::rights::Perms;
use crate::tree::RemoteTree;
use crate::types::AclVersion;

/// Pairs our flags with the client library's; both use the server's bit values.
const PERMISSION_MAP: [(Perms, Permission); 5] = [
    (Perms::READ, Permission::READ),
    (Perms::WRITE, Permission::WRITE),
    (Perms::CREATE, Permission::CREATE),
    (Perms::DELETE, Permission::DELETE),
    (Perms::ADMIN, Permission::ADMIN),
];

/// Session watcher. The tool sets no watches, so only state changes arrive here.
struct SessionWatcher;

impl Watcher for SessionWatcher {
    fn handle(&self, event: WatchedEvent) {
        tracing::debug!(?event, "zookeeper session event");
    }
}

/// A live session against a ZooKeeper ensemble.
pub struct ZkTree {
    zk: ZooKeeper,
}

impl ZkTree {
    /// Connects to `hosts` and, when a digest credential is given, authenticates the
    /// session with it before any other call is made.
    pub fn connect(
        hosts: &str,
        session_timeout: Duration,
        digest: Option<&str>,
    ) -> Result<Self, TreeError> {
        tracing::debug!(hosts, ?session_timeout, "connecting to zookeeper");
        let zk = ZooKeeper::connect(hosts, session_timeout, SessionWatcher)
            .map_err(|e| map_zk_error(e, hosts))?;
        if let Some(digest) = digest {
            tracing::debug!("adding digest auth to session");
            zk.add_auth("digest", digest.as_bytes().to_vec()).map_err(|e| map_zk_error(e, hosts))?;
        }
        Ok(ZkTree { zk })
    }
}

impl Drop for ZkTree {
    fn drop(&mut self) {
        if let Err(e) = self.zk.close() {
            tracing::warn!(error = ?e, "failed to close zookeeper session");
        }
    }
}

impl RemoteTree for ZkTree {
    fn exists(&mut self, path: &str) -> Result<bool, TreeError> {
        Ok(self.zk.exists(path, false).map_err(|e| map_zk_error(e, path))?.is_some())
    }

    fn get_acl(&mut self, path: &str) -> Result<Vec<AclEntry>, TreeError> {
        let (acl, _stat) = self.zk.get_acl(path).map_err(|e| map_zk_error(e, path))?;
        Ok(acl.into_iter().map(from_zk_acl).collect())
    }

    fn set_acl(
        &mut self,
        path: &str,
        acl: &[AclEntry],
        version: AclVersion,
    ) -> Result<(), TreeError> {
        let acl = acl.iter().map(to_zk_acl).collect();
        self.zk.set_acl(path, acl, version.as_option()).map_err(|e| map_zk_error(e, path))?;
        Ok(())
    }

    fn list_children(&mut self, path: &str) -> Result<Vec<String>, TreeError> {
        self.zk.get_children(path, false).map_err(|e| map_zk_error(e, path))
    }
}

fn to_zk_acl(entry: &AclEntry) -> Acl {
    let perms = PERMISSION_MAP
        .iter()
        .filter(|(ours, _)| entry.perms.contains(*ours))
        .fold(Permission::NONE, |acc, (_, theirs)| acc | *theirs);
    Acl { perms, scheme: entry.scheme.clone(), id: entry.id.clone() }
}

fn from_zk_acl(acl: Acl) -> AclEntry {
    let perms = PERMISSION_MAP
        .iter()
        .filter(|(_, theirs)| acl.perms.can(*theirs))
        .fold(Perms::empty(), |acc, (ours, _)| acc | *ours);
    AclEntry::new(acl.scheme, acl.id, perms)
}

fn map_zk_error(err: ZkError, path: &str) -> TreeError {
    match err {
        ZkError::NoNode => TreeError::NoNode(path.to_string()),
        ZkError::NoAuth | ZkError::AuthFailed => TreeError::NoAuth,
        ZkError::BadVersion => TreeError::BadVersion,
        ZkError::InvalidACL => TreeError::InvalidAcl,
        ZkError::ConnectionLoss | ZkError::SessionExpired | ZkError::OperationTimeout => {
            TreeError::Connection(format!("{:?}", err))
        }
        other => TreeError::Other(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_perm_set_survives_conversion() {
        for bits in 0u32..32 {
            let perms = Perms::from_bits_truncate(bits);
            let entry = AclEntry::new("digest", "ops:Zx9=", perms);
            assert_eq!(from_zk_acl(to_zk_acl(&entry)), entry, "bits {:#07b}", bits);
        }
    }

    #[test]
    fn test_single_flags_map_to_client_flags() {
        for (ours, theirs) in PERMISSION_MAP {
            let acl = to_zk_acl(&AclEntry::new("world", "anyone", ours));
            assert_eq!(acl.perms, theirs);
            assert_eq!(acl.scheme, "world");
            assert_eq!(acl.id, "anyone");
        }
        let none = to_zk_acl(&AclEntry::new("world", "anyone", Perms::empty()));
        assert_eq!(none.perms, Permission::NONE);
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(map_zk_error(ZkError::NoNode, "/a"), TreeError::NoNode("/a".into()));
        assert_eq!(map_zk_error(ZkError::NoAuth, "/a"), TreeError::NoAuth);
        assert_eq!(map_zk_error(ZkError::AuthFailed, "/a"), TreeError::NoAuth);
        assert_eq!(map_zk_error(ZkError::BadVersion, "/a"), TreeError::BadVersion);
        assert_eq!(map_zk_error(ZkError::InvalidACL, "/a"), TreeError::InvalidAcl);
        assert!(matches!(map_zk_error(ZkError::ConnectionLoss, "/a"), TreeError::Connection(_)));
        assert!(matches!(map_zk_error(ZkError::SessionExpired, "/a"), TreeError::Connection(_)));
        assert!(matches!(map_zk_error(ZkError::NodeExists, "/a"), TreeError::Other(_)));
    }
}
