// tests/parser_tests.rs

use pretty_assertions::assert_eq;
use sqlface::ast::{
    BinOp, Direction, Expr, Limit, NamePath, Offset, Ordering, Pagination, Parameter, SelectQuery,
    SelectionAtom, Top,
};
use sqlface::parser::Parser;

fn select(script: &str) -> SelectQuery {
    match Parser::new(script).parse_select() {
        Ok(query) => query,
        Err(e) => panic!("`{}` did not parse: {}", script, e),
    }
}

fn expr(text: &str) -> Expr {
    match Parser::new(text).parse_expression() {
        Ok(expr) => expr,
        Err(e) => panic!("`{}` did not parse: {}", text, e),
    }
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_minimal_select() {
    let query = select("select * from books");

    assert_eq!(query.source.name(), "books");
    assert_eq!(query.selection.atoms().len(), 1);
    assert_eq!(query.selection.atoms()[0].expression(), &Expr::Wildcard { level: 1 });
    assert_eq!(query.top, Top::All);
    assert!(query.orderings.is_empty());
    assert_eq!(query.offset, None);
    assert_eq!(query.limit, None);
    assert_eq!(query.pagination, None);
}

#[test]
fn test_keywords_are_case_insensitive() {
    assert_eq!(select("SELECT * FROM books ORDER BY title DESC"), select("select * from books order by title desc"));
}

#[test]
fn test_script_with_several_statements() {
    let tree = Parser::new("select * from books;\nselect title from authors select one * from shelves")
        .parse()
        .unwrap();

    let sources: Vec<String> = tree.selects().map(|query| query.source.name()).collect();
    assert_eq!(sources, vec!["books", "authors", "shelves"]);
}

#[test]
fn test_empty_script() {
    assert!(Parser::new("").parse().unwrap().statements.is_empty());
    assert!(Parser::new("  \n\t ").parse().unwrap().statements.is_empty());
}

#[test]
fn test_dotted_source_name() {
    assert_eq!(select("select * from library.books").source.name(), "library.books");
}

// ============================================================================
// Selection atoms
// ============================================================================

#[test]
fn test_alias_and_assignment_atoms() {
    let query = select("select title as t, p = price from books");
    let atoms = query.selection.atoms();

    assert_eq!(
        atoms[0],
        SelectionAtom::Expression {
            expression: Expr::path("title"),
            output: Some(NamePath::from_dotted("t")),
        }
    );
    assert_eq!(
        atoms[1],
        SelectionAtom::Assignment {
            output: NamePath::from_dotted("p"),
            expression: Expr::path("price"),
        }
    );
    assert_eq!(atoms[1].normalized().output(), Some(&NamePath::from_dotted("p")));
}

#[test]
fn test_alias_and_assignment_normalize_equally() {
    assert_eq!(
        select("select title as t from books").normalized(),
        select("select t = title from books").normalized()
    );
}

#[test]
fn test_nested_name_path() {
    let query = select("select author.name from books");

    assert_eq!(
        query.selection.atoms()[0].expression(),
        &Expr::NamePath(NamePath::new(vec!["author".to_string(), "name".to_string()]))
    );
}

#[test]
fn test_double_wildcard() {
    assert_eq!(expr("**"), Expr::Wildcard { level: 2 });
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(
        expr("1 + 2 * 3"),
        Expr::binary(
            BinOp::Add,
            Expr::integer(1),
            Expr::binary(BinOp::Multiply, Expr::integer(2), Expr::integer(3))
        )
    );
}

#[test]
fn test_operators_associate_left() {
    assert_eq!(
        expr("10 - 4 - 3"),
        Expr::binary(
            BinOp::Subtract,
            Expr::binary(BinOp::Subtract, Expr::integer(10), Expr::integer(4)),
            Expr::integer(3)
        )
    );
}

#[test]
fn test_parentheses() {
    assert_eq!(
        expr("(1 + 2) % 3"),
        Expr::binary(
            BinOp::Modulo,
            Expr::binary(BinOp::Add, Expr::integer(1), Expr::integer(2)),
            Expr::integer(3)
        )
    );
}

#[test]
fn test_literals() {
    assert_eq!(expr("42"), Expr::integer(42));
    assert_eq!(expr("4.5"), Expr::float(4.5));
    assert_eq!(expr("4."), Expr::float(4.0));
    assert_eq!(expr(".5"), Expr::float(0.5));
    assert_eq!(expr("true"), Expr::boolean(true));
    assert_eq!(expr("FALSE"), Expr::boolean(false));
    assert_eq!(expr("'it\"s'"), Expr::string("it\"s"));
    assert_eq!(expr("\"it's\""), Expr::string("it's"));
    assert_eq!(expr("''"), Expr::string(""));
}

#[test]
fn test_keyword_prefixed_identifier() {
    assert_eq!(expr("selection"), Expr::path("selection"));
    assert_eq!(expr("trueValue"), Expr::path("trueValue"));
}

#[test]
fn test_invocation_with_named_parameter() {
    assert_eq!(
        expr("round(price, digits: 2)"),
        Expr::invoke(
            Expr::path("round"),
            vec![
                Parameter::Positional(Expr::path("price")),
                Parameter::Named {
                    name: "digits".to_string(),
                    value: Expr::integer(2),
                },
            ]
        )
    );
}

#[test]
fn test_chained_invocation() {
    assert_eq!(
        expr("f(1)()"),
        Expr::invoke(
            Expr::invoke(Expr::path("f"), vec![Parameter::Positional(Expr::integer(1))]),
            vec![]
        )
    );
}

#[test]
fn test_pipeline() {
    assert_eq!(expr("2 |> square"), Expr::pipe(Expr::integer(2), Expr::path("square")));
    assert_eq!(
        expr("1 + 1 |> square |> half"),
        Expr::pipe(
            Expr::pipe(
                Expr::binary(BinOp::Add, Expr::integer(1), Expr::integer(1)),
                Expr::path("square")
            ),
            Expr::path("half")
        )
    );
}

// ============================================================================
// Modifiers
// ============================================================================

#[test]
fn test_top_variants() {
    assert_eq!(select("select first * from books").top, Top::First);
    assert_eq!(select("select last * from books").top, Top::Last);
    assert_eq!(select("select one * from books").top, Top::One);
    assert_eq!(select("select top 5 * from books").top, Top::Quantity(5));
    assert_eq!(select("select top 5% * from books").top, Top::Percentage(5));
    assert_eq!(select("select at 3 * from books").top, Top::AtPosition(3));
    assert_eq!(select("select * from books top 2").top, Top::Quantity(2));
}

#[test]
fn test_orderings() {
    let query = select("select * from books order by author.name desc, title asc, price");

    assert_eq!(
        query.orderings,
        vec![
            Ordering {
                expression: Expr::path("author.name"),
                direction: Direction::Descending,
            },
            Ordering {
                expression: Expr::path("title"),
                direction: Direction::Ascending,
            },
            Ordering {
                expression: Expr::path("price"),
                direction: Direction::Ascending,
            },
        ]
    );
}

#[test]
fn test_clauses_in_any_order() {
    let query = select("select * from books limit 5 paginated on 2 by 10 offset 3 order by title");

    assert_eq!(query.limit, Some(Limit { quantity: 5 }));
    assert_eq!(query.offset, Some(Offset { quantity: 3 }));
    assert_eq!(query.pagination, Some(Pagination { page: 2, size: 10 }));
    assert_eq!(query.orderings.len(), 1);
}

#[test]
fn test_repeated_clause_is_rejected() {
    assert!(Parser::new("select * from books limit 1 limit 2").parse().is_err());
    assert!(Parser::new("select top 1 * from books top 2").parse().is_err());
    assert!(Parser::new("select * from books order by a order by b").parse().is_err());
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_canonical_rendering() {
    let query = select("SELECT  title AS t,p=price*(1+2)  FROM books ORDER BY price DESC LIMIT 3");

    assert_eq!(
        query.to_string(),
        "select title as t, p = price * (1 + 2) from books order by price desc limit 3;"
    );
}

#[test]
fn test_trailing_top_renders_as_prefix() {
    assert_eq!(
        select("select * from books top 2 offset 1").to_string(),
        "select top 2 * from books offset 1;"
    );
}

#[test]
fn test_render_then_parse_is_identity() {
    let scripts = [
        "select * from books",
        "select first title, author.name as n from books order by title desc",
        "select t = title, price * 2 - 1 from books top 3 offset 1 limit 2",
        "select 10 - (4 - 3), 'x' + \"y\", 2.0 / 4 from books paginated on 2 by 10",
        "select round(price, digits: 2) |> (f |> g) from books",
        "select top 5% ** from books",
        "select at 2 * from books",
    ];

    for script in scripts {
        let parsed = select(script);
        let rendered = parsed.to_string();
        assert_eq!(select(&rendered), parsed, "rendering `{}` as `{}`", script, rendered);
    }
}

#[test]
fn test_tree_renders_one_statement_per_line() {
    let tree = Parser::new("select * from books; select title from authors").parse().unwrap();

    assert_eq!(tree.to_string(), "select * from books;\nselect title from authors;");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_from_is_reported_with_position() {
    let err = Parser::new("select title books").parse().unwrap_err();

    assert_eq!(err.line, 1);
    assert_eq!(err.column, 14);
    assert_eq!(err.offset, 13);
    assert!(err.message.contains("`from`"), "{}", err.message);
}

#[test]
fn test_error_position_on_later_line() {
    let err = Parser::new("select *\nfrom books\norder by").parse().unwrap_err();

    assert_eq!(err.line, 3);
    assert_eq!(err.column, 9);
}

#[test]
fn test_reserved_words_are_not_identifiers() {
    assert!(Parser::new("select from from books").parse().is_err());
    assert!(Parser::new("select * from order").parse().is_err());
    assert!(Parser::new("select title as desc from books").parse().is_err());
}

#[test]
fn test_unterminated_string() {
    let err = Parser::new("select 'abc from books").parse().unwrap_err();

    assert!(err.message.contains("closing quote"), "{}", err.message);
}

#[test]
fn test_mismatched_quotes_do_not_close() {
    assert!(Parser::new("select 'abc\" from books").parse().is_err());
}

#[test]
fn test_trailing_garbage() {
    assert!(Parser::new("select * from books; garbage").parse().is_err());
    assert!(Parser::new("select * from books )").parse().is_err());
}

#[test]
fn test_missing_selection() {
    assert!(Parser::new("select from books").parse().is_err());
    assert!(Parser::new("select title, from books").parse().is_err());
}
