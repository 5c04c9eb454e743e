use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "molset",
    about = "Deduplicate and combine molecule libraries by canonical key",
    version,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Remove duplicate molecules from one or more SDF files
    #[command(visible_alias = "d")]
    Dedup(DedupArgs),

    /// Combine two SDF libraries with a set operation
    #[command(visible_alias = "c")]
    Combine(CombineArgs),
}

impl Command {
    pub fn common(&self) -> &CommonOptions {
        match self {
            Command::Dedup(args) => &args.common,
            Command::Combine(args) => &args.common,
        }
    }
}

/// Options shared by all commands.
#[derive(Args)]
pub struct CommonOptions {
    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Canonical key options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Canonical Key")]
pub struct KeyOptions {
    /// Data item holding the canonical key [default: SMILES]
    #[arg(long = "key", value_name = "TAG")]
    pub property: Option<String>,

    /// Data item holding the stereo-free key, used with --ignore-chirality
    #[arg(long = "achiral-key", value_name = "TAG")]
    pub achiral_property: Option<String>,

    /// Treat stereoisomers as the same molecule
    #[arg(long)]
    pub ignore_chirality: bool,
}

#[derive(Args)]
pub struct DedupArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    /// Input SDF file(s), read in order (stdin if omitted; @NAME reads from the data directory)
    #[arg(short, long, value_name = "FILE", action = clap::ArgAction::Append)]
    pub input: Vec<String>,

    /// Output SDF file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub key: KeyOptions,

    #[command(flatten)]
    pub merge: MergeOptions,
}

/// Duplicate handling options.
#[derive(Args)]
#[command(next_help_heading = "Duplicate Handling")]
pub struct MergeOptions {
    /// Copy data items of duplicates onto the first occurrence
    #[arg(long = "merge-properties")]
    pub enabled: bool,

    /// When merging, drop data items the duplicate does not carry
    #[arg(long = "strict-merge", requires = "enabled")]
    pub strict: bool,

    /// When merging, never copy these data items (comma-separated)
    #[arg(long = "merge-exclude", value_name = "TAG", value_delimiter = ',')]
    pub exclude: Vec<String>,
}

#[derive(Args)]
pub struct CombineArgs {
    #[command(flatten)]
    pub common: CommonOptions,

    /// Set operation to apply
    #[arg(long, value_name = "OP", default_value = "union")]
    pub op: SetOp,

    /// Left-hand library (SDF file or @NAME)
    #[arg(value_name = "LEFT")]
    pub left: String,

    /// Right-hand library (SDF file or @NAME)
    #[arg(value_name = "RIGHT")]
    pub right: String,

    /// Output SDF file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub key: KeyOptions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum SetOp {
    /// Molecules found in either library
    #[default]
    Union,
    /// Molecules found in both libraries
    #[value(alias = "and")]
    Intersection,
    /// Molecules of LEFT not found in RIGHT
    #[value(alias = "not")]
    Difference,
}

impl SetOp {
    pub fn label(self) -> &'static str {
        match self {
            SetOp::Union => "union",
            SetOp::Intersection => "intersection",
            SetOp::Difference => "difference",
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_accepts_repeated_inputs_and_key_options() {
        let cli = Cli::try_parse_from([
            "molset", "dedup", "-i", "a.sdf", "-i", "@known.sdf", "-o", "out.sdf", "--key",
            "InChIKey", "--ignore-chirality", "-vv",
        ])
        .unwrap();
        let Command::Dedup(args) = cli.command else {
            panic!("expected dedup");
        };
        assert_eq!(args.input, vec!["a.sdf", "@known.sdf"]);
        assert_eq!(args.key.property.as_deref(), Some("InChIKey"));
        assert!(args.key.ignore_chirality);
        assert_eq!(args.common.verbose, 2);
    }

    #[test]
    fn strict_merge_requires_merge() {
        assert!(Cli::try_parse_from(["molset", "dedup", "--strict-merge"]).is_err());
        assert!(
            Cli::try_parse_from(["molset", "dedup", "--merge-properties", "--strict-merge"])
                .is_ok()
        );
    }

    #[test]
    fn combine_parses_operation_aliases() {
        let cli =
            Cli::try_parse_from(["molset", "c", "--op", "not", "left.sdf", "right.sdf"]).unwrap();
        let Command::Combine(args) = cli.command else {
            panic!("expected combine");
        };
        assert_eq!(args.op, SetOp::Difference);
        assert_eq!(args.left, "left.sdf");
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
