//! Node outcomes and the sinks that render them.

use std::io::Write;

use crate::acl::AclEntry;

/// What happened at one visited node.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NodeOutcome {
    /// The node does not exist; nothing was read or written there.
    Missing { path: String },
    /// The node's ACL was replaced with `acl`.
    Updated { path: String, acl: Vec<AclEntry> },
    /// The node's ACL was read.
    Retrieved { path: String, acl: Vec<AclEntry> },
}

impl NodeOutcome {
    pub fn path(&self) -> &str {
        match self {
            NodeOutcome::Missing { path } | NodeOutcome::Updated { path, .. } | NodeOutcome::Retrieved { path, .. } => {
                path
            }
        }
    }
}

/// Receives node outcomes as the walk produces them.
///
/// Outcomes arrive in visit order and are handed over before the next remote
/// call, so a walk that aborts half way has still reported everything before
/// the failure.
pub trait Reporter {
    fn record(&mut self, outcome: &NodeOutcome) -> std::io::Result<()>;
}

/// Collects outcomes in memory.
impl Reporter for Vec<NodeOutcome> {
    fn record(&mut self, outcome: &NodeOutcome) -> std::io::Result<()> {
        self.push(outcome.clone());
        Ok(())
    }
}

/// Human-readable layout: the node path on its own line, then one line per entry.
#[derive(Debug)]
pub struct TextReporter<W> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        TextReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn record(&mut self, outcome: &NodeOutcome) -> std::io::Result<()> {
        match outcome {
            NodeOutcome::Missing { path } => writeln!(self.out, "ZNode {} doesn't exist", path)?,
            NodeOutcome::Updated { path, acl } | NodeOutcome::Retrieved { path, acl } => {
                writeln!(self.out, "{}", path)?;
                for entry in acl {
                    writeln!(self.out, "{}", entry)?;
                }
            }
        }
        self.out.flush()
    }
}

/// One JSON object per line.
#[derive(Debug)]
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        JsonReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn record(&mut self, outcome: &NodeOutcome) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, outcome)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
