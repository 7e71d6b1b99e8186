//! Command implementations for the lexicore CLI.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{DatabaseConfig, SuggestionConfig};
use crate::database::{Database, MemoryDatabase};
use crate::error::{LexicoreError, Result};
use crate::query::Query;
use crate::spelling::suggest;
use crate::storage::builder::TableBuilder;
use crate::storage::file::write_table;
use crate::storage::layout::KeyLayout;
use crate::termlist::{collect_raw_names, collect_terms};

/// Execute a CLI command.
pub fn execute_command(args: LexicoreArgs) -> Result<()> {
    match &args.command {
        Command::BuildTable(build_args) => build_table(build_args, &args),
        Command::Terms(terms_args) => list_terms(terms_args, &args),
        Command::Suggest(suggest_args) => suggest_words(suggest_args, &args),
        Command::Query(query_args) => build_query(query_args, &args),
        Command::Decode(decode_args) => decode_query(decode_args, &args),
    }
}

/// Build a table file from `{"term": [doc_freq, coll_freq], ...}`.
fn build_table(args: &BuildTableArgs, cli_args: &LexicoreArgs) -> Result<()> {
    let content = fs::read_to_string(&args.terms_file)
        .with_context(|| format!("Failed to read {}", args.terms_file.display()))?;
    let terms: BTreeMap<String, (u64, u64)> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.terms_file.display()))?;
    let layout = KeyLayout::from(args.layout);

    let mut builder = TableBuilder::new(layout);
    for (term, (doc_freq, coll_freq)) in &terms {
        builder.add_term(term, *doc_freq, *coll_freq)?;
    }
    let table = builder.build();
    write_table(&args.output, &table)?;
    info!(
        "wrote {} terms to {}",
        terms.len(),
        args.output.display()
    );

    output_result(
        "Table built successfully",
        &TableBuildResult {
            path: args.output.to_string_lossy().to_string(),
            layout: layout.name().to_string(),
            terms: terms.len(),
            entries: table.len(),
        },
        cli_args,
    )
}

fn open_database(path: &Path, config: &DatabaseConfig) -> Result<Arc<dyn Database>> {
    Ok(Arc::new(MemoryDatabase::open(path, config)?))
}

/// List the terms of a table.
fn list_terms(args: &TermsArgs, cli_args: &LexicoreArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => DatabaseConfig::from_json_file(path)?,
        None => DatabaseConfig::default().with_layout(args.layout.into()),
    };
    let database = open_database(&args.table, &config)?;
    let mut enumerator = database.all_terms(&args.prefix)?;

    let terms: Vec<ListedTerm> = if args.stats {
        collect_terms(enumerator.as_mut())?
            .into_iter()
            .map(ListedTerm::from)
            .collect()
    } else {
        collect_raw_names(enumerator.as_mut())?
            .into_iter()
            .map(|name| ListedTerm {
                name: String::from_utf8_lossy(&name).into_owned(),
                doc_freq: 0,
                coll_freq: 0,
            })
            .collect()
    };

    output_result(
        &format!("{} terms", terms.len()),
        &TermListing {
            prefix: args.prefix.clone(),
            with_stats: args.stats,
            terms,
        },
        cli_args,
    )
}

/// Suggest spelling corrections for a word.
fn suggest_words(args: &SuggestArgs, cli_args: &LexicoreArgs) -> Result<()> {
    let config = DatabaseConfig::default().with_layout(args.layout.into());
    let database = open_database(&args.table, &config)?;
    let mut enumerator = database.all_terms("")?;

    let suggestion_config = SuggestionConfig::default()
        .with_max_distance(args.max_distance)
        .with_max_suggestions(args.limit);
    let suggestions = suggest(enumerator.as_mut(), &args.word, &suggestion_config)?;

    output_result(
        "Suggestions",
        &SuggestionResults {
            word: args.word.clone(),
            suggestions,
        },
        cli_args,
    )
}

/// Build a query from an operator and its terms.
fn build_query(args: &QueryArgs, cli_args: &LexicoreArgs) -> Result<()> {
    let (op, terms) = args.operator()?;
    let query = Query::from_terms(op, terms.iter().cloned(), args.window)?;
    if args.collapse {
        query.collapse_subqs()?;
    }
    output_result("Query", &report(&query)?, cli_args)
}

/// Parse a serialised query.
fn decode_query(args: &DecodeArgs, cli_args: &LexicoreArgs) -> Result<()> {
    let query = Query::unserialise(&args.serialised)?;
    output_result("Decoded query", &report(&query)?, cli_args)
}

fn report(query: &Query) -> Result<QueryReport> {
    if !query.is_defined() {
        return Err(LexicoreError::invalid_state("Query has no terms"));
    }
    Ok(QueryReport {
        serialised: query.serialise()?,
        description: query.get_description(),
        length: query.length(),
        is_bool: query.is_bool(),
        terms: query
            .get_terms()
            .into_iter()
            .map(|(term, position)| QueryTerm { term, position })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryOp;
    use crate::termlist::collect_names;
    use tempfile::TempDir;

    fn cli(command: Command) -> LexicoreArgs {
        LexicoreArgs {
            verbose: 0,
            quiet: true,
            output_format: OutputFormat::Json,
            pretty: false,
            command,
        }
    }

    #[test]
    fn test_build_table_then_list() {
        let dir = TempDir::new().unwrap();
        let terms_file = dir.path().join("terms.json");
        let output = dir.path().join("terms.lxtb");
        fs::write(&terms_file, r#"{"banana": [1, 1], "apple": [3, 5]}"#).unwrap();

        let args = BuildTableArgs {
            terms_file,
            output: output.clone(),
            layout: LayoutArg::Flat,
        };
        execute_command(cli(Command::BuildTable(args))).unwrap();

        let config = DatabaseConfig::default().with_layout(KeyLayout::Flat);
        let database = open_database(&output, &config).unwrap();
        let mut terms = database.all_terms("").unwrap();
        assert_eq!(collect_names(terms.as_mut()).unwrap(), vec!["apple", "banana"]);
    }

    #[test]
    fn test_build_table_missing_input() {
        let dir = TempDir::new().unwrap();
        let args = BuildTableArgs {
            terms_file: dir.path().join("missing.json"),
            output: dir.path().join("out.lxtb"),
            layout: LayoutArg::Chunked,
        };
        let err = execute_command(cli(Command::BuildTable(args))).unwrap_err();
        assert!(matches!(err, LexicoreError::Anyhow(_)));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_report_collapsed_query() {
        let query = Query::from_terms(QueryOp::Or, ["to", "be", "or", "not", "to", "be"], 0)
            .unwrap();
        query.collapse_subqs().unwrap();
        let report = report(&query).unwrap();
        assert_eq!(report.length, 6);
        assert_eq!(report.terms.len(), 4);
        assert_eq!(report.terms[0].term, "to");
    }

    #[test]
    fn test_report_undefined_query() {
        let err = report(&Query::new()).unwrap_err();
        assert!(err.is_invalid_state());
    }
}
