//! In-process tree used by tests, benches and fuzz targets.

use std::collections::BTreeMap;

use crate::acl::AclEntry;
use crate::error::{TreeError, TreeOp};
use crate::rights::Perms;
use crate::tree::RemoteTree;
use crate::types::{child_path, AclVersion};

/// One remote call as seen by a [`MemoryTree`], in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeCall {
    Exists(String),
    GetAcl(String),
    SetAcl(String, Vec<AclEntry>),
    ListChildren(String),
}

impl TreeCall {
    pub fn op(&self) -> TreeOp {
        match self {
            TreeCall::Exists(_) => TreeOp::Exists,
            TreeCall::GetAcl(_) => TreeOp::GetAcl,
            TreeCall::SetAcl(..) => TreeOp::SetAcl,
            TreeCall::ListChildren(_) => TreeOp::ListChildren,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            TreeCall::Exists(p) | TreeCall::GetAcl(p) | TreeCall::SetAcl(p, _) | TreeCall::ListChildren(p) => p,
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryNode {
    acl: Vec<AclEntry>,
    acl_version: i32,
    /// Child names in creation order; this is the order `list_children` reports.
    children: Vec<String>,
}

impl MemoryNode {
    fn new(acl: Vec<AclEntry>) -> Self {
        MemoryNode { acl, acl_version: 0, children: Vec::new() }
    }
}

/// A [`RemoteTree`] held entirely in memory.
///
/// Starts with a root node `/` open to everyone, like a fresh ensemble. Every call
/// is recorded and can be inspected with [`MemoryTree::calls`].
#[derive(Debug, Clone)]
pub struct MemoryTree {
    nodes: BTreeMap<String, MemoryNode>,
    calls: Vec<TreeCall>,
    failures: Vec<(TreeOp, String, TreeError)>,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), MemoryNode::new(vec![Self::open_acl()]));
        MemoryTree { nodes, calls: Vec::new(), failures: Vec::new() }
    }

    /// `world:anyone:cdrwa`, the ACL of an unprotected node.
    pub fn open_acl() -> AclEntry {
        AclEntry::new("world", "anyone", Perms::all())
    }

    /// Creates a node under an existing parent.
    pub fn create(&mut self, path: &str, acl: Vec<AclEntry>) -> Result<(), TreeError> {
        let (parent, name) = split_path(path).ok_or_else(|| TreeError::Other(format!("invalid path {}", path)))?;
        if self.nodes.contains_key(path) {
            return Err(TreeError::Other(format!("node {} already exists", path)));
        }
        let parent_node = self
            .nodes
            .get_mut(parent)
            .ok_or_else(|| TreeError::NoNode(parent.to_string()))?;
        parent_node.children.push(name.to_string());
        self.nodes.insert(path.to_string(), MemoryNode::new(acl));
        Ok(())
    }

    /// Removes a node and everything below it.
    pub fn delete(&mut self, path: &str) -> Result<(), TreeError> {
        let node = self.nodes.remove(path).ok_or_else(|| TreeError::NoNode(path.to_string()))?;
        for child in node.children {
            self.delete(&child_path(path, &child))?;
        }
        if let Some((parent, name)) = split_path(path) {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|c| c != name);
            }
        }
        Ok(())
    }

    /// The ACL currently stored at `path`, read without recording a call.
    pub fn acl(&self, path: &str) -> Option<&[AclEntry]> {
        self.nodes.get(path).map(|n| n.acl.as_slice())
    }

    /// ACL version of `path`; bumped on every successful `set_acl`.
    pub fn acl_version(&self, path: &str) -> Option<i32> {
        self.nodes.get(path).map(|n| n.acl_version)
    }

    /// Calls issued so far, oldest first.
    pub fn calls(&self) -> &[TreeCall] {
        &self.calls
    }

    /// Makes the next and every later `op` on `path` fail with `err`.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn fail_on(&mut self, op: TreeOp, path: &str, err: TreeError) {
        self.failures.push((op, path.to_string(), err));
    }

    fn record(&mut self, call: TreeCall) -> Result<(), TreeError> {
        let injected = self
            .failures
            .iter()
            .find(|(op, path, _)| *op == call.op() && path == call.path())
            .map(|(_, _, err)| err.clone());
        self.calls.push(call);
        match injected {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn node_mut(&mut self, path: &str) -> Result<&mut MemoryNode, TreeError> {
        self.nodes.get_mut(path).ok_or_else(|| TreeError::NoNode(path.to_string()))
    }
}

impl RemoteTree for MemoryTree {
    fn exists(&mut self, path: &str) -> Result<bool, TreeError> {
        self.record(TreeCall::Exists(path.to_string()))?;
        Ok(self.nodes.contains_key(path))
    }

    fn get_acl(&mut self, path: &str) -> Result<Vec<AclEntry>, TreeError> {
        self.record(TreeCall::GetAcl(path.to_string()))?;
        Ok(self.node_mut(path)?.acl.clone())
    }

    fn set_acl(&mut self, path: &str, acl: &[AclEntry], version: AclVersion) -> Result<(), TreeError> {
        self.record(TreeCall::SetAcl(path.to_string(), acl.to_vec()))?;
        if acl.is_empty() {
            return Err(TreeError::InvalidAcl);
        }
        let node = self.node_mut(path)?;
        if let AclVersion::Exact(expected) = version {
            if expected != node.acl_version {
                return Err(TreeError::BadVersion);
            }
        }
        node.acl = acl.to_vec();
        node.acl_version += 1;
        Ok(())
    }

    fn list_children(&mut self, path: &str) -> Result<Vec<String>, TreeError> {
        self.record(TreeCall::ListChildren(path.to_string()))?;
        Ok(self.node_mut(path)?.children.clone())
    }
}

/// Splits `/a/b` into (`/a`, `b`) and `/a` into (`/`, `a`). The root has no parent.
fn split_path(path: &str) -> Option<(&str, &str)> {
    let idx = path.rfind('/')?;
    let name = &path[idx + 1..];
    if name.is_empty() {
        return None;
    }
    let parent = if idx == 0 { "/" } else { &path[..idx] };
    Some((parent, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_list_in_creation_order() {
        let mut tree = MemoryTree::new();
        tree.create("/b", vec![]).unwrap();
        tree.create("/a", vec![]).unwrap();
        tree.create("/a/x", vec![]).unwrap();
        assert_eq!(tree.list_children("/").unwrap(), vec!["b", "a"]);
        assert_eq!(tree.list_children("/a").unwrap(), vec!["x"]);
    }

    #[test]
    fn test_create_requires_parent() {
        let mut tree = MemoryTree::new();
        assert_eq!(tree.create("/a/b", vec![]), Err(TreeError::NoNode("/a".into())));
    }

    #[test]
    fn test_missing_node_calls() {
        let mut tree = MemoryTree::new();
        assert!(!tree.exists("/nope").unwrap());
        assert_eq!(tree.list_children("/nope"), Err(TreeError::NoNode("/nope".into())));
        assert_eq!(tree.get_acl("/nope"), Err(TreeError::NoNode("/nope".into())));
    }

    #[test]
    fn test_set_acl_bumps_version_and_checks_it() {
        let mut tree = MemoryTree::new();
        tree.create("/a", vec![MemoryTree::open_acl()]).unwrap();
        let acl = vec![AclEntry::new("digest", "u:h", Perms::READ)];
        tree.set_acl("/a", &acl, AclVersion::Any).unwrap();
        assert_eq!(tree.acl_version("/a"), Some(1));
        assert_eq!(tree.set_acl("/a", &acl, AclVersion::Exact(0)), Err(TreeError::BadVersion));
        tree.set_acl("/a", &acl, AclVersion::Exact(1)).unwrap();
        assert_eq!(tree.acl("/a"), Some(acl.as_slice()));
    }

    #[test]
    fn test_delete_removes_subtree() {
        let mut tree = MemoryTree::new();
        tree.create("/a", vec![]).unwrap();
        tree.create("/a/b", vec![]).unwrap();
        tree.delete("/a").unwrap();
        assert!(tree.acl("/a/b").is_none());
        assert!(tree.list_children("/").unwrap().is_empty());
    }

    #[test]
    fn test_injected_failure_is_recorded() {
        let mut tree = MemoryTree::new();
        tree.fail_on(TreeOp::Exists, "/", TreeError::NoAuth);
        assert_eq!(tree.exists("/"), Err(TreeError::NoAuth));
        assert_eq!(tree.calls(), &[TreeCall::Exists("/".into())]);
    }
}
