use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use smartsearch::model::{FilterKind, Operation, TargetRef};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "smartsearch",
    bin_name = "smartsearch",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Edit the Smart Search filters that target tasks and campaigns", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding stored targets (overrides config)
    #[arg(long, global = true, help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Settings file to read instead of the default location
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub config_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the filter kinds and their config fields
    Kinds,

    /// Show the filters stored for a target
    Show {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Append a filter to a target
    Add {
        #[command(flatten)]
        target: TargetArgs,

        /// Filter kind, e.g. most_active
        #[arg(value_parser = parse_kind)]
        kind: FilterKind,

        /// Operator (add, sub, limit); defaults to add
        #[arg(long)]
        op: Option<Operation>,

        /// Config as JSON; defaults to the kind's default config
        #[arg(long)]
        config: Option<String>,
    },

    /// Re-configure a filter in place
    Edit {
        #[command(flatten)]
        target: TargetArgs,

        /// 1-based position, as printed by `show`
        position: usize,

        /// New operator
        #[arg(long)]
        op: Option<Operation>,

        /// New config as JSON
        #[arg(long)]
        config: Option<String>,
    },

    /// Remove a filter
    #[command(alias = "rm")]
    Delete {
        #[command(flatten)]
        target: TargetArgs,

        /// 1-based position, as printed by `show`
        position: usize,
    },

    /// Validate a specification file and print it in canonical form
    Compile {
        /// JSON file holding an array of {type, op, config}
        file: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct TargetArgs {
    /// Organization id
    #[arg(long)]
    pub org: u64,

    /// Task whose target to use
    #[arg(long, conflicts_with = "campaign", required_unless_present = "campaign")]
    pub task: Option<u64>,

    /// Campaign whose target to use
    #[arg(long)]
    pub campaign: Option<u64>,
}

impl TargetArgs {
    pub fn target(&self) -> Result<TargetRef> {
        match (self.task, self.campaign) {
            (Some(task), None) => Ok(TargetRef::task(self.org, task)),
            (None, Some(campaign)) => Ok(TargetRef::campaign(self.org, campaign)),
            _ => bail!("exactly one of --task or --campaign is required"),
        }
    }
}

fn parse_kind(s: &str) -> std::result::Result<FilterKind, String> {
    s.parse::<FilterKind>().map_err(|_| {
        let known: Vec<_> = FilterKind::ALL_KINDS.iter().map(|k| k.as_str()).collect();
        format!("unknown filter kind `{s}` (expected one of: {})", known.join(", "))
    })
}
