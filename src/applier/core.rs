//!
//! Subtree walk that reads or replaces ACLs node by node.
//!
//! The walk is depth-first pre-order: a node is fully processed (existence check,
//! then get or set) before any of its children are listed. It runs off an explicit
//! worklist so tree depth never turns into call-stack depth, and it stops at the
//! first remote failure with no rollback of nodes already written.

use crate::acl::AclEntry;
use crate::error::{ApplyError, TreeError, TreeOp};
use crate::report::{NodeOutcome, Reporter};
use crate::tree::RemoteTree;
use crate::types::{child_path, AclVersion, MissingNodePolicy};

/// Knobs for a single [`Applier::apply`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyOptions {
    /// Visit the whole subtree instead of just the root.
    pub recursive: bool,
    /// Report nodes whose ACL was replaced. Reads are always reported.
    pub verbose: bool,
    /// Version guard passed with every write.
    pub version: AclVersion,
    pub missing: MissingNodePolicy,
}

/// Whether a run reads or writes. Decided once per run by whether any entries were given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    Retrieve,
    Set,
}

impl ApplyMode {
    pub fn for_entries(entries: &[AclEntry]) -> Self {
        if entries.is_empty() {
            ApplyMode::Retrieve
        } else {
            ApplyMode::Set
        }
    }
}

/// Counts for a completed walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplySummary {
    pub visited: usize,
    pub missing: usize,
    pub updated: usize,
    pub retrieved: usize,
}

/// Applies a get-or-set ACL operation across a subtree of a [`RemoteTree`].
#[derive(Debug)]
pub struct Applier<T: RemoteTree> {
    tree: T,
    options: ApplyOptions,
}

impl<T: RemoteTree> Applier<T> {
    pub fn new(tree: T, options: ApplyOptions) -> Self {
        Applier { tree, options }
    }

    /// Walks the tree from `root`.
    ///
    /// With empty `entries` every existing node's ACL is read and reported. With
    /// entries, every existing node's ACL is replaced by exactly `entries`. Any remote
    /// failure aborts the walk and names the operation and path that failed.
    pub fn apply<R: Reporter + ?Sized>(
        &mut self,
        root: &str,
        entries: &[AclEntry],
        reporter: &mut R,
    ) -> Result<ApplySummary, ApplyError> {
        let mode = ApplyMode::for_entries(entries);
        tracing::debug!(root, ?mode, options = ?self.options, "starting acl walk");

        let mut summary = ApplySummary::default();
        let mut worklist = vec![root.to_string()];

        while let Some(path) = worklist.pop() {
            summary.visited += 1;
            let exists = self.tree.exists(&path).map_err(|e| remote(TreeOp::Exists, &path, e))?;

            if !exists {
                summary.missing += 1;
                tracing::debug!(path = %path, "node does not exist");
                reporter.record(&NodeOutcome::Missing { path: path.clone() })?;
                if self.options.missing == MissingNodePolicy::Skip {
                    continue;
                }
            } else {
                match mode {
                    ApplyMode::Set => {
                        self.tree
                            .set_acl(&path, entries, self.options.version)
                            .map_err(|e| remote(TreeOp::SetAcl, &path, e))?;
                        summary.updated += 1;
                        tracing::debug!(path = %path, "acl replaced");
                        if self.options.verbose {
                            reporter.record(&NodeOutcome::Updated {
                                path: path.clone(),
                                acl: entries.to_vec(),
                            })?;
                        }
                    }
                    ApplyMode::Retrieve => {
                        let acl = self
                            .tree
                            .get_acl(&path)
                            .map_err(|e| remote(TreeOp::GetAcl, &path, e))?;
                        summary.retrieved += 1;
                        reporter.record(&NodeOutcome::Retrieved { path: path.clone(), acl })?;
                    }
                }
            }

            if self.options.recursive {
                let children = self
                    .tree
                    .list_children(&path)
                    .map_err(|e| remote(TreeOp::ListChildren, &path, e))?;
                // Reversed so the first child is popped first.
                worklist.extend(children.iter().rev().map(|child| child_path(&path, child)));
            }
        }

        tracing::debug!(?summary, "acl walk finished");
        Ok(summary)
    }
}

fn remote(op: TreeOp, path: &str, source: TreeError) -> ApplyError {
    ApplyError::Remote { op, path: path.to_string(), source }
}
