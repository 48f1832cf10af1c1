//! CLI argument definitions for `ontomap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use onto_model::{MappingType, Source, Status};

#[derive(Parser)]
#[command(
    name = "ontomap",
    version,
    about = "Curate mappings between provider attributes and ontology terms",
    long_about = "Curate mappings between data provider attributes and ontology terms.\n\n\
                  Ranks ontology suggestions, applies curator edits through the status\n\
                  workflow and searches the mapping catalog."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON configuration file (similarity, search and lookup settings).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Recompute ontology suggestions for the mappings in a document.
    Suggest(SuggestArgs),

    /// Apply a curator edit to one mapping.
    Edit(EditArgs),

    /// Search the mappings in a document.
    Search(SearchArgs),

    /// Look up ontology terms for free text.
    Lookup(LookupArgs),

    /// List the entity types defined in a document.
    Types(TypesArgs),
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Curation document (JSON).
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Ontology catalog (JSON array of terms).
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: PathBuf,

    /// Only refresh these entity types (default: all).
    #[arg(long = "entity-type", value_name = "NAME")]
    pub entity_types: Vec<String>,

    /// Report suggestions without writing the document.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct EditArgs {
    /// Curation document (JSON).
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Id of the mapping to edit.
    #[arg(long = "id")]
    pub id: u64,

    /// Requested status (unmapped, mapped, revise, request).
    #[arg(long = "status")]
    pub status: Status,

    /// Ontology term URL to map to.
    #[arg(long = "term-url", value_name = "URL", requires = "term_label")]
    pub term_url: Option<String>,

    /// Label of the ontology term.
    #[arg(long = "term-label", value_name = "LABEL")]
    pub term_label: Option<String>,

    /// Where the mapping came from (Rule, NCIt, Legacy).
    #[arg(long = "source")]
    pub source: Option<Source>,

    /// Whether the mapping was inferred or curated.
    #[arg(long = "mapping-type")]
    pub mapping_type: Option<MappingType>,

    /// Validate the edit without writing the document.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Curation document (JSON).
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Accepted status (repeatable).
    #[arg(long = "status", value_name = "STATUS")]
    pub statuses: Vec<String>,

    /// Accepted entity type (repeatable).
    #[arg(long = "entity-type", value_name = "NAME")]
    pub entity_types: Vec<String>,

    /// Accepted mapping type (repeatable).
    #[arg(long = "mapping-type", value_name = "TYPE")]
    pub mapping_types: Vec<String>,

    /// Text searched in label-bearing values.
    #[arg(long = "label", value_name = "TEXT")]
    pub label: Option<String>,

    /// Attribute constraint KEY=VALUE (repeatable; values for one key are ORed).
    #[arg(long = "value", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub values: Vec<(String, String)>,

    /// Zero-based page index.
    #[arg(long = "page", default_value_t = 0)]
    pub page: usize,

    /// Page size.
    #[arg(long = "size", default_value_t = onto_curation::DEFAULT_PAGE_SIZE)]
    pub size: usize,
}

#[derive(Args)]
pub struct LookupArgs {
    /// Free text to look up.
    #[arg(value_name = "TEXT")]
    pub input: String,

    /// Ontology catalog (JSON array of terms).
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: PathBuf,

    /// Entity type hint ("treatment" or a diagnosis type).
    #[arg(long = "entity-type", value_name = "NAME", default_value = "diagnosis")]
    pub entity_type: String,
}

#[derive(Args)]
pub struct TypesArgs {
    /// Curation document (JSON).
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in `{raw}`"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
