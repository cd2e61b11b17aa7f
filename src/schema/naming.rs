//! Identifier conventions shared by the schema builder.

use once_cell::sync::Lazy;
use regex::Regex;

static MEMBER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^get_?(?P<name>.+?)_?(?:async)?$").expect("valid member pattern"));

/// camelCase form of a member or field name.
///
/// A leading run of capitals is lowered (`ISBN` -> `isbn`, `URLValue` ->
/// `urlValue`), and `_` separated segments are joined with capitalized heads
/// (`book_id` -> `bookId`).
pub fn camel_case(name: &str) -> String {
    let mut segments = name.split('_').filter(|segment| !segment.is_empty());

    let mut out = match segments.next() {
        Some(head) => lower_head(head),
        None => return name.to_string(),
    };
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn lower_head(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    if !chars.first().is_some_and(|c| c.is_uppercase()) {
        return word.to_string();
    }

    let mut out = String::with_capacity(word.len());
    let mut rest = 0;
    for (i, c) in chars.iter().enumerate() {
        if i == 1 && !c.is_uppercase() {
            break;
        }
        // Keep the capital that starts the next word: `URLValue` -> `urlValue`
        if i > 0 && chars.get(i + 1).is_some_and(|next| !next.is_uppercase()) {
            break;
        }
        out.extend(c.to_lowercase());
        rest = i + 1;
    }
    out.extend(&chars[rest..]);
    out
}

/// The source name a resolver member serves, if it follows the `get` naming
/// convention: `GetBooks`, `getBooksAsync` and `get_books_async` all serve
/// `books`.
pub fn candidate_name(member: &str) -> Option<String> {
    MEMBER_NAME
        .captures(member)
        .and_then(|captures| captures.name("name"))
        .map(|name| camel_case(name.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("Book"), "book");
        assert_eq!(camel_case("Books"), "books");
        assert_eq!(camel_case("BookId"), "bookId");
        assert_eq!(camel_case("title"), "title");
        assert_eq!(camel_case("ISBN"), "isbn");
        assert_eq!(camel_case("URLValue"), "urlValue");
        assert_eq!(camel_case("book_id"), "bookId");
        assert_eq!(camel_case("A"), "a");
    }

    #[test]
    fn test_candidate_name() {
        assert_eq!(candidate_name("GetBooks"), Some("books".to_string()));
        assert_eq!(candidate_name("getBooksAsync"), Some("books".to_string()));
        assert_eq!(candidate_name("get_books_async"), Some("books".to_string()));
        assert_eq!(candidate_name("GETAUTHOR"), Some("author".to_string()));
        assert_eq!(candidate_name("Books"), None);
        assert_eq!(candidate_name("Get"), None);
    }
}
