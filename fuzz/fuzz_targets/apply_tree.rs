#![no_main]

// Harness: subtree walk over an arbitrary in-memory tree with an optional injected
// failure. The walk must never panic, must report nodes in pre-order, and must stop
// at the injected failure without touching anything after it.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use zkacl::applier::{Applier, ApplyOptions};
use zkacl::error::{TreeError, TreeOp};
use zkacl::report::NodeOutcome;
use zkacl::rights::Perms;
use zkacl::tree::memory::MemoryTree;
use zkacl::AclEntry;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Each entry creates a child under the node with index `parent % created`.
    shape: Vec<u8>,
    set_mode: bool,
    perms: u8,
    fail_at: Option<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let mut tree = MemoryTree::new();
    tree.create("/f", vec![MemoryTree::open_acl()]).unwrap();
    let mut paths = vec!["/f".to_string()];
    for (i, parent) in input.shape.iter().take(64).enumerate() {
        let parent = paths[*parent as usize % paths.len()].clone();
        let path = format!("{}/n{}", parent, i);
        tree.create(&path, vec![MemoryTree::open_acl()]).unwrap();
        paths.push(path);
    }

    let op = if input.set_mode { TreeOp::SetAcl } else { TreeOp::GetAcl };
    if let Some(idx) = input.fail_at {
        let path = &paths[idx as usize % paths.len()];
        tree.fail_on(op, path, TreeError::NoAuth);
    }

    let acl = if input.set_mode {
        vec![AclEntry::new("world", "anyone", Perms::from_bits_truncate(input.perms as u32) | Perms::READ)]
    } else {
        Vec::new()
    };
    let options = ApplyOptions { recursive: true, verbose: true, ..ApplyOptions::default() };
    let mut out: Vec<NodeOutcome> = Vec::new();
    let result = Applier::new(&mut tree, options).apply("/f", &acl, &mut out);

    // Pre-order: every reported node's parent was reported before it.
    for (i, outcome) in out.iter().enumerate() {
        let path = outcome.path();
        if path != "/f" {
            let parent = &path[..path.rfind('/').unwrap()];
            assert!(out[..i].iter().any(|o| o.path() == parent));
        }
    }
    match result {
        Ok(summary) => {
            assert!(input.fail_at.is_none());
            assert_eq!(summary.visited, paths.len());
        }
        Err(_) => {
            let last = tree.calls().last().unwrap();
            assert_eq!(last.op(), op);
        }
    }
});
