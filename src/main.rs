//! zkacl command-line entry point.
//!
//! Sets or retrieves ACLs for a znode and, optionally, everything below it.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use zkacl::applier::{Applier, ApplyMode, ApplyOptions};
use zkacl::config::ToolConfig;
use zkacl::report::{JsonReporter, TextReporter};
use zkacl::tree::ZkTree;
use zkacl::types::{AclVersion, MissingNodePolicy};

#[derive(Parser, Debug)]
#[command(
    name = "zkacl",
    version,
    about = "Sets or retrieves ACLs for ZNodes in ZooKeeper.",
    long_about = None
)]
struct Cli {
    /// ZooKeeper address (host:port).
    #[arg(short = 'z', long, value_name = "HOST:PORT")]
    zookeeper: String,

    /// Path of the properties file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Znode path.
    #[arg(short = 'n', long)]
    znode: String,

    /// Executes the command recursively through the znode tree.
    #[arg(short, long)]
    recursive: bool,

    /// Lists znodes during a set operation.
    #[arg(short, long)]
    verbose: bool,

    /// Session timeout in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 3000)]
    session_timeout: u64,

    /// Only set ACLs on nodes whose ACL version matches.
    #[arg(long, value_name = "VERSION")]
    version_check: Option<i32>,

    /// Still list the children of nodes that do not exist.
    #[arg(long)]
    descend_missing: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// ACLs to set, as scheme:id:perms. ACLs are retrieved when none are given.
    #[arg(value_name = "ACL")]
    acls: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

impl Cli {
    fn apply_options(&self) -> ApplyOptions {
        ApplyOptions {
            recursive: self.recursive,
            verbose: self.verbose,
            version: self.version_check.map_or(AclVersion::Any, AclVersion::Exact),
            missing: if self.descend_missing {
                MissingNodePolicy::Descend
            } else {
                MissingNodePolicy::Skip
            },
        }
    }
}

fn main() -> ExitCode {
    // Usage errors exit with clap's status code (2) before anything else runs.
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Everything that can fail locally is checked before the first remote call.
    let acls = zkacl::parse_acls(&cli.acls)?;
    let config = match &cli.config {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::default(),
    };

    let tree = ZkTree::connect(
        &cli.zookeeper,
        Duration::from_millis(cli.session_timeout),
        config.digest.as_deref(),
    )
    .with_context(|| format!("cannot establish session with {}", cli.zookeeper))?;

    let mode = ApplyMode::for_entries(&acls);
    let header = match mode {
        ApplyMode::Set => "Setting ACLs...",
        ApplyMode::Retrieve => "Retrieving ACLs...",
    };

    // JSON output stays one object per line, so the header only goes to the log there.
    match cli.format {
        Format::Text => println!("{}", header),
        Format::Json => tracing::info!("{}", header),
    }

    let mut applier = Applier::new(tree, cli.apply_options());
    let stdout = io::stdout().lock();
    let summary = match cli.format {
        Format::Text => applier.apply(&cli.znode, &acls, &mut TextReporter::new(stdout))?,
        Format::Json => applier.apply(&cli.znode, &acls, &mut JsonReporter::new(stdout))?,
    };

    tracing::info!(
        visited = summary.visited,
        missing = summary.missing,
        updated = summary.updated,
        retrieved = summary.retrieved,
        "done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use zkacl::error::AclError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_trailing_tokens_are_acls() {
        let cli = parse(&[
            "zkacl",
            "-z",
            "h:2181",
            "-n",
            "/a",
            "-r",
            "-v",
            "world:anyone:r",
            "x509:CN=a:b:rw",
        ]);
        assert_eq!(cli.zookeeper, "h:2181");
        assert_eq!(cli.znode, "/a");
        assert!(cli.recursive && cli.verbose);
        assert_eq!(cli.acls, vec!["world:anyone:r", "x509:CN=a:b:rw"]);

        let acls = zkacl::parse_acls(&cli.acls).unwrap();
        assert_eq!(ApplyMode::for_entries(&acls), ApplyMode::Set);
    }

    #[test]
    fn test_no_tokens_means_retrieve() {
        let cli = parse(&["zkacl", "-z", "h:2181", "-n", "/a"]);
        assert!(cli.acls.is_empty());
        assert_eq!(cli.session_timeout, 3000);
        assert_eq!(cli.format, Format::Text);
        let acls = zkacl::parse_acls(&cli.acls).unwrap();
        assert_eq!(ApplyMode::for_entries(&acls), ApplyMode::Retrieve);
    }

    #[test]
    fn test_missing_required_flags_are_usage_errors() {
        let err = Cli::try_parse_from(["zkacl", "-n", "/a"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);

        let err = Cli::try_parse_from(["zkacl", "-z", "h:2181"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_apply_options_defaults() {
        let options = parse(&["zkacl", "-z", "h:2181", "-n", "/a"]).apply_options();
        assert_eq!(options, ApplyOptions::default());
        assert_eq!(options.version, AclVersion::Any);
        assert_eq!(options.missing, MissingNodePolicy::Skip);
    }

    #[test]
    fn test_apply_options_from_flags() {
        let cli = parse(&[
            "zkacl",
            "-z",
            "h:2181",
            "-n",
            "/a",
            "-r",
            "--version-check",
            "7",
            "--descend-missing",
            "--format",
            "json",
        ]);
        assert_eq!(cli.format, Format::Json);
        let options = cli.apply_options();
        assert!(options.recursive);
        assert!(!options.verbose);
        assert_eq!(options.version, AclVersion::Exact(7));
        assert_eq!(options.missing, MissingNodePolicy::Descend);
    }

    // Both failures happen before any session is opened, so the unreachable host is never
    // contacted; main turns the error into exit status 1.
    #[test]
    fn test_malformed_token_fails_before_connecting() {
        let cli = parse(&["zkacl", "-z", "unreachable:1", "-n", "/a", "world:anyone"]);
        let err = run(cli).unwrap_err();
        assert!(matches!(err.downcast_ref::<AclError>(), Some(AclError::Malformed { .. })));
    }

    #[test]
    fn test_unreadable_config_fails_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.properties");
        let config = path.to_str().unwrap();
        let cli = parse(&["zkacl", "-z", "unreachable:1", "-n", "/a", "-c", config]);
        let err = run(cli).unwrap_err();
        assert!(err.downcast_ref::<zkacl::error::ConfigError>().is_some());
    }
}
