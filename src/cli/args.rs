//! Command line argument parsing for the lexicore CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::query::QueryOp;
use crate::storage::layout::KeyLayout;

/// lexicore - term tables and query trees for full-text search
#[derive(Parser, Debug, Clone)]
#[command(name = "lexicore")]
#[command(about = "Inspect term tables and build query trees")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LexicoreArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LexicoreArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a table file from a JSON object of term statistics
    #[command(name = "build-table")]
    BuildTable(BuildTableArgs),

    /// List the terms of a table
    Terms(TermsArgs),

    /// Suggest spelling corrections from the terms of a table
    Suggest(SuggestArgs),

    /// Build a query and print its serialised form
    Query(QueryArgs),

    /// Parse a serialised query
    Decode(DecodeArgs),
}

/// Key layout as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutArg {
    #[default]
    Chunked,
    Flat,
}

impl From<LayoutArg> for KeyLayout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Chunked => KeyLayout::Chunked,
            LayoutArg::Flat => KeyLayout::Flat,
        }
    }
}

/// Arguments for building a table
#[derive(Parser, Debug, Clone)]
pub struct BuildTableArgs {
    /// JSON file mapping each term to `[doc_freq, coll_freq]`
    #[arg(value_name = "TERMS_FILE")]
    pub terms_file: PathBuf,

    /// Table file to write
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Key layout of the table
    #[arg(short, long, default_value = "chunked")]
    pub layout: LayoutArg,
}

/// Arguments for listing terms
#[derive(Parser, Debug, Clone)]
pub struct TermsArgs {
    /// Table file to read
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Only list terms starting with this prefix
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Key layout of the table
    #[arg(short, long, default_value = "chunked")]
    pub layout: LayoutArg,

    /// Include document and collection frequencies
    #[arg(long)]
    pub stats: bool,

    /// JSON database configuration; overrides --layout
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for spelling suggestions
#[derive(Parser, Debug, Clone)]
pub struct SuggestArgs {
    /// Table file to read
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Word to correct
    #[arg(value_name = "WORD")]
    pub word: String,

    /// Key layout of the table
    #[arg(short, long, default_value = "chunked")]
    pub layout: LayoutArg,

    /// Maximum edit distance
    #[arg(short = 'd', long, default_value = "2")]
    pub max_distance: usize,

    /// Maximum number of suggestions
    #[arg(short = 'n', long, default_value = "5")]
    pub limit: usize,
}

/// Arguments for building a query
#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    /// Operator followed by its terms, e.g. `AND cat dog`
    #[arg(value_name = "EXPR", required = true, num_args = 2..)]
    pub expr: Vec<String>,

    /// Window for NEAR and PHRASE (0 = number of terms)
    #[arg(short, long, default_value = "0")]
    pub window: u32,

    /// Merge repeated terms
    #[arg(long)]
    pub collapse: bool,
}

impl QueryArgs {
    /// Split the expression into its operator and terms.
    pub fn operator(&self) -> crate::error::Result<(QueryOp, &[String])> {
        let (op, terms) = self
            .expr
            .split_first()
            .ok_or_else(|| crate::error::LexicoreError::invalid_argument("Empty query expression"))?;
        Ok((op.parse()?, terms))
    }
}

/// Arguments for decoding a query
#[derive(Parser, Debug, Clone)]
pub struct DecodeArgs {
    /// Serialised query
    #[arg(value_name = "SERIALISED")]
    pub serialised: String,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
