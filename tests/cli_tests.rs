// tests/cli_tests.rs

#![cfg(feature = "cli")]

use std::path::PathBuf;

use sqlface::cli::{
    CheckOptions, CheckResult, CliError, DocCategory, FieldType, RunOptions, SourcesFile,
    execute_check, execute_run, get_doc_category,
};
use sqlface::schema::{NumericKind, Repr};

const SOURCES: &str = r#"{
  "sources": [
    {
      "name": "Book",
      "fields": [
        { "accessor": "bookId", "type": "integer" },
        { "accessor": "title", "type": "string" },
        { "accessor": "tags", "type": ["string"] },
        { "accessor": "author", "type": { "name": "Author", "fields": [
          { "accessor": "name", "type": "string" }
        ] } }
      ],
      "records": [
        { "bookId": 2, "title": "Emma", "tags": [], "author": { "name": "Austen" } },
        { "bookId": 1, "title": "Dune", "tags": ["sf"], "author": { "name": "Herbert" } }
      ]
    },
    { "name": "Shelf", "fields": [ { "accessor": "label", "type": "string" } ] }
  ]
}"#;

fn sources_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("sqlface-{}-{}.json", name, std::process::id()));
    std::fs::write(&path, SOURCES).unwrap();
    path
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_valid_script() {
    let options = CheckOptions {
        script: "select * from books".to_string(),
        ..CheckOptions::default()
    };

    assert!(matches!(execute_check(&options), Ok(CheckResult::SyntaxValid)));
}

#[test]
fn test_check_prints_canonical_statements() {
    let options = CheckOptions {
        script: "SELECT t = title FROM books TOP 1".to_string(),
        ast: true,
        pretty: false,
    };

    match execute_check(&options) {
        Ok(CheckResult::Ast { rendered, tree }) => {
            assert_eq!(rendered, "select top 1 t = title from books;");
            assert!(tree.contains("\"Assignment\""), "{}", tree);
        }
        other => panic!("unexpected check result: {:?}", other),
    }
}

#[test]
fn test_check_reports_parse_errors() {
    let options = CheckOptions {
        script: "select title books".to_string(),
        ..CheckOptions::default()
    };

    let err = execute_check(&options).unwrap_err();
    assert!(err.to_string().starts_with("Parse error: expected `from`"), "{}", err);
}

// ============================================================================
// Sources file
// ============================================================================

#[test]
fn test_field_types() {
    let file = SourcesFile::from_json(SOURCES).unwrap();
    let fields = &file.sources[0].fields;

    assert_eq!(fields[0].ty.to_repr().unwrap(), Repr::Numeric(NumericKind::I64));
    assert_eq!(fields[2].ty.to_repr().unwrap(), Repr::Enumerable(Box::new(Repr::String)));
    assert!(matches!(fields[3].ty.to_repr().unwrap(), Repr::Shape(shape) if shape.name == "Author"));
}

#[test]
fn test_invalid_field_types() {
    let unknown = FieldType::Scalar("timestamp".to_string());
    let ambiguous = FieldType::Enumerable(vec![
        FieldType::Scalar("string".to_string()),
        FieldType::Scalar("integer".to_string()),
    ]);

    assert!(matches!(unknown.to_repr(), Err(CliError::Config(_))));
    assert!(matches!(ambiguous.to_repr(), Err(CliError::Config(_))));
}

#[tokio::test]
async fn test_run_against_sources_file() {
    let options = RunOptions {
        script: "select title, author.name from books order by bookId".to_string(),
        sources: sources_path("run"),
    };

    let output = execute_run(&options).await.unwrap();
    assert_eq!(
        output,
        serde_json::json!({
            "books": [
                { "title": "Dune", "name": "Herbert" },
                { "title": "Emma", "name": "Austen" },
            ]
        })
    );
}

#[tokio::test]
async fn test_source_without_records_cannot_be_queried() {
    let options = RunOptions {
        script: "select * from shelf".to_string(),
        sources: sources_path("shelves"),
    };

    let err = execute_run(&options).await.unwrap_err();
    assert_eq!(err.to_string(), "Schema error: source `shelf` has no resolver");
}

#[tokio::test]
async fn test_missing_sources_file() {
    let options = RunOptions {
        script: "select * from books".to_string(),
        sources: PathBuf::from("/nonexistent/sqlface-sources.json"),
    };

    assert!(matches!(execute_run(&options).await, Err(CliError::Io(_))));
}

// ============================================================================
// docs
// ============================================================================

#[test]
fn test_doc_categories() {
    assert_eq!(DocCategory::from_str("Modifiers"), Some(DocCategory::Modifiers));
    assert_eq!(DocCategory::from_str("ops"), Some(DocCategory::Expressions));
    assert!(get_doc_category("sources").unwrap().starts_with("SOURCES"));
    assert!(matches!(get_doc_category("lambdas"), Err(CliError::UnknownCategory(_))));
}
