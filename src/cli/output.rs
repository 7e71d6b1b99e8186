//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{LexicoreArgs, OutputFormat};
use crate::error::Result;
use crate::spelling::Suggestion;
use crate::termlist::Term;

/// Result structure for table building.
#[derive(Debug, Serialize, Deserialize)]
pub struct TableBuildResult {
    pub path: String,
    pub layout: String,
    pub terms: usize,
    pub entries: usize,
}

/// A listed term. Names that are not UTF-8 are shown lossily.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListedTerm {
    pub name: String,
    pub doc_freq: u64,
    pub coll_freq: u64,
}

impl From<Term> for ListedTerm {
    fn from(term: Term) -> Self {
        ListedTerm {
            name: term.name_lossy().into_owned(),
            doc_freq: term.doc_freq,
            coll_freq: term.coll_freq,
        }
    }
}

/// Terms listed from a table.
#[derive(Debug, Serialize, Deserialize)]
pub struct TermListing {
    pub prefix: String,
    pub with_stats: bool,
    pub terms: Vec<ListedTerm>,
}

/// Spelling suggestions for one word.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionResults {
    pub word: String,
    pub suggestions: Vec<Suggestion>,
}

/// A query term and its position.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryTerm {
    pub term: String,
    pub position: u32,
}

/// Everything printed about a query.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryReport {
    pub serialised: String,
    pub description: String,
    pub length: u32,
    pub is_bool: bool,
    pub terms: Vec<QueryTerm>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn print_human(&self);
}

impl HumanOutput for TableBuildResult {
    fn print_human(&self) {
        println!("Path: {}", self.path);
        println!("Layout: {}", self.layout);
        println!("Terms: {}", self.terms);
        println!("Entries: {}", self.entries);
    }
}

impl HumanOutput for TermListing {
    fn print_human(&self) {
        for term in &self.terms {
            if self.with_stats {
                println!("{}\t{}\t{}", term.name, term.doc_freq, term.coll_freq);
            } else {
                println!("{}", term.name);
            }
        }
    }
}

impl HumanOutput for SuggestionResults {
    fn print_human(&self) {
        if self.suggestions.is_empty() {
            println!("No suggestions for '{}'", self.word);
            return;
        }
        for suggestion in &self.suggestions {
            println!(
                "{} (distance {}, {} docs)",
                suggestion.word, suggestion.distance, suggestion.doc_freq
            );
        }
    }
}

impl HumanOutput for QueryReport {
    fn print_human(&self) {
        println!("Serialised: {}", self.serialised);
        println!("Description: {}", self.description);
        println!("Length: {}", self.length);
        if self.is_bool {
            println!("Boolean: yes");
        }
        println!("Terms:");
        for term in &self.terms {
            println!("  {}@{}", term.term, term.position);
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &LexicoreArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LexicoreArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_report_json() {
        let report = QueryReport {
            serialised: "Q:[3:cat@1#1".to_string(),
            description: "Query(cat@1)".to_string(),
            length: 1,
            is_bool: false,
            terms: vec![QueryTerm {
                term: "cat".to_string(),
                position: 1,
            }],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["terms"][0]["term"], "cat");
        assert_eq!(value["length"], 1);
    }

    #[test]
    fn test_listed_term_shows_latin1_lossily() {
        let listed = ListedTerm::from(Term {
            name: b"caf\xe9".to_vec(),
            doc_freq: 2,
            coll_freq: 3,
        });
        assert_eq!(listed.name, "caf\u{fffd}");
        assert_eq!(listed.coll_freq, 3);
    }
}
