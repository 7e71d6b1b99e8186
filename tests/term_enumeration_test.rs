//! Integration tests for term enumeration over both key layouts.

use std::sync::Arc;

use lexicore::config::DatabaseConfig;
use lexicore::database::{Database, MemoryDatabase};
use lexicore::error::Result;
use lexicore::storage::{KeyLayout, TableBuilder};
use lexicore::termlist::{
    TermEnumerator, collect_names, collect_raw_names, collect_terms, open_all_terms,
};
use tempfile::TempDir;

const LAYOUTS: [KeyLayout; 2] = [KeyLayout::Chunked, KeyLayout::Flat];

fn fruit_database(layout: KeyLayout) -> Result<Arc<dyn Database>> {
    let mut builder = TableBuilder::new(layout);
    builder.add_metadata(b"lastdocid", b"\x07");
    builder.add_term("apple", 3, 5)?;
    builder.add_term("banana", 1, 1)?;
    builder.add_term("cherry", 2, 2)?;
    if layout == KeyLayout::Chunked {
        builder.add_chunk("apple", 100, b"more postings")?;
    }
    Ok(Arc::new(MemoryDatabase::new(builder.build(), layout)))
}

fn word_database(layout: KeyLayout) -> Result<Arc<dyn Database>> {
    let mut builder = TableBuilder::new(layout);
    let words = [
        "\u{0}nul", "a", "ab", "abc", "abd", "b", "ba", "bb", "x\u{0}y", "xy", "zeta", "é",
    ];
    for (i, word) in words.iter().enumerate() {
        builder.add_term(word, i as u64 + 1, 2 * i as u64 + 1)?;
        if layout == KeyLayout::Chunked && i % 3 == 0 {
            builder.add_chunk(word, 50, b"chunk")?;
            builder.add_chunk(word, 5000, b"chunk")?;
        }
    }
    Ok(Arc::new(MemoryDatabase::new(builder.build(), layout)))
}

fn stored_words() -> Vec<String> {
    let mut words: Vec<String> = [
        "\u{0}nul", "a", "ab", "abc", "abd", "b", "ba", "bb", "x\u{0}y", "xy", "zeta", "é",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect();
    words.sort();
    words
}

#[test]
fn test_prefix_scenario() -> Result<()> {
    for layout in LAYOUTS {
        let mut terms = open_all_terms(fruit_database(layout)?, "b")?;

        assert!(terms.advance()?, "{layout:?}");
        assert_eq!(terms.term()?, "banana");
        assert_eq!(terms.doc_freq()?, 1);
        assert_eq!(terms.coll_freq()?, 1);

        assert!(!terms.advance()?);
        assert!(terms.at_end());
    }
    Ok(())
}

#[test]
fn test_full_listing_with_stats() -> Result<()> {
    for layout in LAYOUTS {
        let mut terms = open_all_terms(fruit_database(layout)?, "")?;
        let listed = collect_terms(terms.as_mut())?;
        let summary: Vec<(&[u8], u64, u64)> = listed
            .iter()
            .map(|t| (t.name.as_slice(), t.doc_freq, t.coll_freq))
            .collect();
        assert_eq!(
            summary,
            vec![
                (&b"apple"[..], 3, 5),
                (&b"banana"[..], 1, 1),
                (&b"cherry"[..], 2, 2)
            ]
        );
    }
    Ok(())
}

#[test]
fn test_terms_strictly_increase_and_stats_are_idempotent() -> Result<()> {
    for layout in LAYOUTS {
        let database = word_database(layout)?;

        let mut plain = open_all_terms(Arc::clone(&database), "")?;
        let plain_names = collect_names(plain.as_mut())?;
        assert_eq!(plain_names, stored_words(), "{layout:?}");
        assert!(plain_names.windows(2).all(|pair| pair[0] < pair[1]));

        let mut stepped = open_all_terms(database, "")?;
        let mut stepped_names = Vec::new();
        while stepped.advance()? {
            let first = (stepped.doc_freq()?, stepped.coll_freq()?);
            let second = (stepped.coll_freq()?, stepped.doc_freq()?);
            assert_eq!(first, (second.1, second.0));
            stepped_names.push(stepped.term()?.to_string());
        }
        assert_eq!(stepped_names, plain_names);
    }
    Ok(())
}

#[test]
fn test_prefix_properties() -> Result<()> {
    let words = stored_words();
    for layout in LAYOUTS {
        let database = word_database(layout)?;
        for prefix in ["", "a", "ab", "abc", "abz", "b", "x", "x\u{0}", "\u{0}", "é", "zz", "0"] {
            let mut terms = open_all_terms(Arc::clone(&database), prefix)?;
            let listed = collect_names(terms.as_mut())?;

            let expected: Vec<String> = words
                .iter()
                .filter(|w| w.starts_with(prefix))
                .cloned()
                .collect();
            assert_eq!(listed, expected, "{layout:?} prefix {prefix:?}");

            if let Some(first) = listed.first() {
                let smallest = words.iter().find(|w| w.as_str() >= prefix).unwrap();
                assert_eq!(first, smallest);
            }
        }
    }
    Ok(())
}

#[test]
fn test_skip_to_properties() -> Result<()> {
    let words = stored_words();
    for layout in LAYOUTS {
        let database = word_database(layout)?;
        for target in ["", "a", "aa", "abc", "abcd", "b", "c", "x", "xz", "zeta", "zz", "é", "ë"] {
            let mut terms = open_all_terms(Arc::clone(&database), "")?;
            let found = terms.skip_to(target)?;

            match words.iter().find(|w| w.as_str() >= target) {
                Some(expected) => {
                    assert!(found, "{layout:?} target {target:?}");
                    assert_eq!(terms.term()?, expected);
                }
                None => {
                    assert!(!found);
                    assert!(terms.at_end());
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_skip_to_never_moves_backward() -> Result<()> {
    for layout in LAYOUTS {
        let mut terms = open_all_terms(word_database(layout)?, "")?;
        assert!(terms.skip_to("b")?);
        assert_eq!(terms.term()?, "b");

        assert!(terms.skip_to("a")?);
        assert_eq!(terms.term()?, "b");
        assert!(terms.skip_to("b")?);
        assert_eq!(terms.term()?, "b");

        assert!(terms.advance()?);
        assert_eq!(terms.term()?, "ba");
    }
    Ok(())
}

#[test]
fn test_skip_to_respects_prefix() -> Result<()> {
    for layout in LAYOUTS {
        let database = word_database(layout)?;

        let mut terms = open_all_terms(Arc::clone(&database), "ab")?;
        assert!(terms.skip_to("a")?);
        assert_eq!(terms.term()?, "ab");
        assert!(terms.skip_to("abd")?);
        assert_eq!(terms.term()?, "abd");
        assert!(!terms.skip_to("abe")?);
        assert!(terms.at_end());

        let mut terms = open_all_terms(database, "ab")?;
        assert!(!terms.skip_to("b")?);
        assert!(terms.at_end());
    }
    Ok(())
}

#[test]
fn test_state_errors() -> Result<()> {
    for layout in LAYOUTS {
        let mut terms = open_all_terms(fruit_database(layout)?, "")?;
        assert!(terms.term().unwrap_err().is_invalid_state());
        assert!(terms.doc_freq().unwrap_err().is_invalid_state());

        while terms.advance()? {}
        assert!(terms.coll_freq().unwrap_err().is_invalid_state());
        assert!(terms.advance().unwrap_err().is_invalid_state());
        assert!(!terms.skip_to("zzz")?);
    }
    Ok(())
}

#[test]
fn test_table_file_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    for layout in LAYOUTS {
        let path = dir.path().join(format!("{}.lxtb", layout.name()));
        let mut builder = TableBuilder::new(layout);
        builder.add_term("apple", 3, 5)?;
        builder.add_term("banana", 1, 1)?;
        MemoryDatabase::new(builder.build(), layout).save(&path)?;

        let config = DatabaseConfig::default().with_layout(layout);
        let database: Arc<dyn Database> = Arc::new(MemoryDatabase::open(&path, &config)?);
        let mut terms = database.all_terms("a")?;
        assert!(terms.advance()?);
        assert_eq!(terms.current()?.coll_freq, 5);
        assert!(!terms.advance()?);
    }
    Ok(())
}

#[test]
fn test_enumerator_outlives_caller_handle() -> Result<()> {
    let database = fruit_database(KeyLayout::Flat)?;
    let mut terms: Box<dyn TermEnumerator> = open_all_terms(Arc::clone(&database), "")?;
    drop(database);
    assert_eq!(collect_names(terms.as_mut())?, vec!["apple", "banana", "cherry"]);
    Ok(())
}

#[test]
fn test_byte_string_terms_survive_a_file_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    for layout in LAYOUTS {
        let path = dir.path().join(format!("latin1-{}.lxtb", layout.name()));
        let mut builder = TableBuilder::new(layout);
        builder.add_term(b"caf\xe9", 4, 6)?;
        builder.add_term(b"na\xefve", 1, 1)?;
        builder.add_term("zoo", 2, 2)?;
        MemoryDatabase::new(builder.build(), layout).save(&path)?;

        let config = DatabaseConfig::default().with_layout(layout);
        let database: Arc<dyn Database> = Arc::new(MemoryDatabase::open(&path, &config)?);

        let mut terms = Arc::clone(&database).all_terms("")?;
        assert_eq!(
            collect_raw_names(terms.as_mut())?,
            vec![b"caf\xe9".to_vec(), b"na\xefve".to_vec(), b"zoo".to_vec()]
        );

        let mut terms = Arc::clone(&database).all_terms(b"na\xef")?;
        assert!(terms.advance()?);
        assert_eq!(terms.term_bytes()?, b"na\xefve");
        assert!(terms.term().unwrap_err().is_invalid_argument());
        assert!(!terms.advance()?);

        let mut terms = database.all_terms("")?;
        assert!(terms.skip_to_bytes(b"caf\xe9\x01")?);
        assert_eq!(terms.term_bytes()?, b"na\xefve");
        assert!(terms.skip_to("z")?);
        assert_eq!(terms.term()?, "zoo");
    }
    Ok(())
}
