//! Builds a [`TokenList`] from plain source text.
//!
//! cavil's front end (lexing, macro expansion, include resolution) is out
//! of scope per spec.md's Non-goals — the analysis core consumes an
//! already-built token stream. This module is the stand-in used by tests
//! and examples: a small hand-written splitter, not a real C-family
//! tokenizer, good enough to exercise bracket linking, pattern matching,
//! and the checks against literal snippets.

use crate::token::{TokenList, TokenStreamError};

const PUNCTUATION: &str = "(){}[]<>;,.+-*/%=!&|^~?:";

/// Two-character operators combined eagerly into one token. `<<`/`>>` are
/// deliberately excluded: combining them would break `link_angle_brackets`
/// on nested template closes (`vector<vector<int>>`), where the original
/// parser has the same ambiguity.
const TWO_CHAR_OPERATORS: &[&str] = &[
    "::", "==", "!=", "<=", ">=", "&&", "||", "->", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=",
];

/// Splits `source` into words, numbers, and punctuation, appends them to a
/// fresh [`TokenList`], and links brackets.
///
/// Every token is attributed to `file_index` and its 1-based line number
/// within `source`. [`TWO_CHAR_OPERATORS`] are combined eagerly regardless
/// of surrounding whitespace, since checks match them as single tokens
/// (`!=`, `==`, ...); any other multi-character operator is left as
/// individual punctuation characters, since spec.md does not define
/// operator lexing beyond this.
pub fn tokenize(source: &str, file_index: u32) -> Result<TokenList, TokenStreamError> {
    let mut list = TokenList::new();
    for (line_no, line) in source.lines().enumerate() {
        let line_no = line_no as u32 + 1;
        let mut chars = line.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            if c.is_whitespace() {
                continue;
            }
            if let Some(&(_, next_c)) = chars.peek() {
                let combo: String = [c, next_c].into_iter().collect();
                if TWO_CHAR_OPERATORS.contains(&combo.as_str()) {
                    chars.next();
                    list.push_back(combo, line_no, file_index);
                    continue;
                }
            }
            if PUNCTUATION.contains(c) {
                list.push_back(c.to_string(), line_no, file_index);
                continue;
            }
            let mut end = start + c.len_utf8();
            while let Some(&(next_start, next_c)) = chars.peek() {
                if next_c.is_whitespace() || PUNCTUATION.contains(next_c) {
                    break;
                }
                end = next_start + next_c.len_utf8();
                chars.next();
            }
            list.push_back(&line[start..end], line_no, file_index);
        }
    }
    list.link_brackets()?;
    list.link_angle_brackets();
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_names_numbers_and_punctuation() {
        let list = tokenize("int x = 42;", 0).unwrap();
        let texts: Vec<&str> = list.iter().map(|id| list.get(id).text.as_str()).collect();
        assert_eq!(texts, vec!["int", "x", "=", "42", ";"]);
    }

    #[test]
    fn tracks_line_numbers_across_multiple_lines() {
        let list = tokenize("int x;\nint y;\n", 0).unwrap();
        let lines: Vec<u32> = list.iter().map(|id| list.get(id).line).collect();
        assert_eq!(lines, vec![1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn links_brackets_in_a_function_body() {
        let list = tokenize("void f() { if (x) { y(); } }", 0).unwrap();
        // void f ( ) { if ( x ) { y ( ) ; } }
        let front = list.front().unwrap();
        let open_paren = list.tok_at(front, 2).unwrap();
        let close_paren = list.link(open_paren).unwrap();
        assert_eq!(list.get(close_paren).text, ")");
        assert_eq!(list.tok_at(front, 3).unwrap(), close_paren);
    }

    #[test]
    fn propagates_unbalanced_brackets_as_an_error() {
        let err = tokenize("void f( {", 0).unwrap_err();
        assert!(matches!(err, TokenStreamError::UnmatchedOpener { .. }));
    }

    #[test]
    fn relational_less_than_does_not_fail_tokenizing() {
        // "i<v.size()" has a '<' with no matching '>' anywhere on the
        // line — must not be treated as an unclosed bracket.
        let list = tokenize("for(unsigned i=0;i<v.size();++i){}", 0).unwrap();
        let lt = list.iter().find(|&id| list.get(id).text == "<").unwrap();
        assert_eq!(list.link(lt), None);
    }

    #[test]
    fn combines_double_colon_into_one_token() {
        let list = tokenize("std::vector<int> v;", 0).unwrap();
        let texts: Vec<&str> = list.iter().map(|id| list.get(id).text.as_str()).collect();
        assert_eq!(texts, vec!["std", "::", "vector", "<", "int", ">", "v", ";"]);
    }

    #[test]
    fn combines_common_two_character_operators() {
        let list = tokenize("a == b != c <= d && e -> f ++", 0).unwrap();
        let texts: Vec<&str> = list.iter().map(|id| list.get(id).text.as_str()).collect();
        assert_eq!(texts, vec!["a", "==", "b", "!=", "c", "<=", "d", "&&", "e", "->", "f", "++"]);
    }

    #[test]
    fn links_a_template_argument_list() {
        let list = tokenize("std::list<int>::iterator it;", 0).unwrap();
        let lt = list.iter().find(|&id| list.get(id).text == "<").unwrap();
        let gt = list.link(lt).unwrap();
        assert_eq!(list.get(gt).text, ">");
    }
}
