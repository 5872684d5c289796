#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! zkacl sets or retrieves ACLs for znodes in ZooKeeper.
//!
//! The crate provides the ACL token grammar and permission encoding, a remote tree
//! abstraction with in-memory and ZooKeeper backends, and the subtree walk that
//! applies a get-or-set ACL operation from a root node downwards.

// Module for shared types (ACL versions, missing-node policy, path joining).
pub mod types;

// Module for the permission bit flags and their character encoding.
pub mod rights;

// Module for ACL entries and the `scheme:id:perms` token grammar.
pub mod acl;

pub use acl::{parse_acls, AclEntry};
pub use rights::Perms;

// Module for error types.
pub mod error;

// Module for remote tree backends.
pub mod tree;

// Module for node outcomes and report rendering.
pub mod report;

// Module for the subtree walk.
pub mod applier;

// Module for properties-file configuration.
pub mod config;
