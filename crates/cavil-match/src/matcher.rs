//! `Match`, `simpleMatch`, and `findmatch` over a [`TokenList`].
//!
//! None of these ever mutate the stream — they only borrow it — so pattern
//! matcher purity (spec.md §8 property 7) holds by construction: there is
//! no `&mut TokenList` anywhere in this module.

use cavil_tokens::{TokenId, TokenList};

use crate::pattern::{Atom, Pattern};

fn atom_matches(atom: &Atom, list: &TokenList, id: TokenId, varid_arg: u32) -> bool {
    let token = list.get(id);
    match atom {
        Atom::Literal(text) => token.text == *text,
        Atom::Var => token.is_name,
        Atom::Type => token.is_name || token.is_standard_type,
        Atom::Num => token.is_number,
        Atom::Any => true,
        Atom::VarId => varid_arg != 0 && token.is_name && token.var_id == varid_arg,
        Atom::Negation(text) => token.text != *text,
        Atom::CharClass(chars) => {
            let mut it = token.text.chars();
            match (it.next(), it.next()) {
                (Some(c), None) => chars.contains(&c),
                _ => false,
            }
        }
    }
}

/// Returns true iff the tokens starting at `first` match `pattern`, with
/// `%varid%` bound to `varid_arg` (pass `0` if the pattern has no
/// `%varid%` elements).
pub fn matches(list: &TokenList, first: TokenId, pattern: &Pattern, varid_arg: u32) -> bool {
    let mut cur = Some(first);
    for element in &pattern.elements {
        let matched_here = cur.is_some_and(|id| {
            element
                .alternatives
                .iter()
                .any(|atom| atom_matches(atom, list, id, varid_arg))
        });

        if matched_here {
            cur = cur.and_then(|id| list.next(id));
        } else if !element.optional {
            return false;
        }
        // Optional element that didn't match: stay at the same token and
        // move on to the next pattern element.
    }
    true
}

/// Compiles `pattern` and matches it; convenience for one-shot calls where
/// precompiling separately isn't worth it.
pub fn match_str(
    list: &TokenList,
    first: TokenId,
    pattern: &str,
    varid_arg: u32,
) -> Result<bool, crate::pattern::PatternError> {
    let compiled = Pattern::compile(pattern)?;
    Ok(matches(list, first, &compiled, varid_arg))
}

/// `Match` restricted to literal text: every whitespace-separated word in
/// `literal` must equal the corresponding token's text exactly, with no
/// meta-token handling at all.
pub fn simple_match(list: &TokenList, first: TokenId, literal: &str) -> bool {
    let mut cur = Some(first);
    for word in literal.split_whitespace() {
        match cur {
            Some(id) if list.get(id).text == word => {
                cur = list.next(id);
            }
            _ => return false,
        }
    }
    true
}

/// Scans forward from `start` (inclusive) and returns the first position
/// where `matches` succeeds, or `None` if no such position exists before
/// the stream ends.
pub fn find_match(
    list: &TokenList,
    start: TokenId,
    pattern: &Pattern,
    varid_arg: u32,
) -> Option<TokenId> {
    let mut cur = Some(start);
    while let Some(id) = cur {
        if matches(list, id, pattern, varid_arg) {
            return Some(id);
        }
        cur = list.next(id);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavil_tokens::fixture::tokenize;

    #[test]
    fn matches_literal_sequence() {
        let list = tokenize("void f ( ) { }", 0).unwrap();
        let p = Pattern::compile("void f (").unwrap();
        assert!(matches(&list, list.front().unwrap(), &p, 0));
    }

    #[test]
    fn rejects_literal_sequence_with_wrong_text() {
        let list = tokenize("void f ( )", 0).unwrap();
        let p = Pattern::compile("int f (").unwrap();
        assert!(!matches(&list, list.front().unwrap(), &p, 0));
    }

    #[test]
    fn matches_type_and_var_meta_tokens() {
        let list = tokenize("int count = 0", 0).unwrap();
        let p = Pattern::compile("%type% %var% = %num%").unwrap();
        assert!(matches(&list, list.front().unwrap(), &p, 0));
    }

    #[test]
    fn matches_varid_against_bound_argument() {
        let mut list = tokenize("x = x", 0).unwrap();
        let front = list.front().unwrap();
        let second_x = list.tok_at(front, 2).unwrap();
        list.set_var_id(front, 7);
        list.set_var_id(second_x, 7);

        let p = Pattern::compile("%varid% = %varid%").unwrap();
        assert!(matches(&list, front, &p, 7));
        assert!(!matches(&list, front, &p, 8));
    }

    #[test]
    fn varid_argument_of_zero_never_matches() {
        let mut list = tokenize("x", 0).unwrap();
        let front = list.front().unwrap();
        list.set_var_id(front, 0);
        let p = Pattern::compile("%varid%").unwrap();
        assert!(!matches(&list, front, &p, 0));
    }

    #[test]
    fn optional_element_is_skipped_without_consuming_a_token() {
        let list = tokenize("int x ;", 0).unwrap();
        let p = Pattern::compile("const| %type% %var%").unwrap();
        assert!(matches(&list, list.front().unwrap(), &p, 0));
    }

    #[test]
    fn optional_element_consumes_when_present() {
        let list = tokenize("static int x ;", 0).unwrap();
        let p = Pattern::compile("static| %type% %var%").unwrap();
        assert!(matches(&list, list.front().unwrap(), &p, 0));
    }

    #[test]
    fn alternation_matches_any_listed_alternative() {
        let list = tokenize("public :", 0).unwrap();
        let p = Pattern::compile("public|private|protected :").unwrap();
        assert!(matches(&list, list.front().unwrap(), &p, 0));
    }

    #[test]
    fn negation_rejects_the_named_text_only() {
        let list = tokenize("int", 0).unwrap();
        let p = Pattern::compile("!!void").unwrap();
        assert!(matches(&list, list.front().unwrap(), &p, 0));

        let list = tokenize("void", 0).unwrap();
        let p = Pattern::compile("!!void").unwrap();
        assert!(!matches(&list, list.front().unwrap(), &p, 0));
    }

    #[test]
    fn character_class_matches_single_char_tokens_from_the_set() {
        let list = tokenize("; x", 0).unwrap();
        let p = Pattern::compile("[;,]").unwrap();
        assert!(matches(&list, list.front().unwrap(), &p, 0));
    }

    #[test]
    fn simple_match_ignores_meta_token_syntax() {
        let list = tokenize("%var% x", 0).unwrap();
        assert!(simple_match(&list, list.front().unwrap(), "%var% x"));
    }

    #[test]
    fn find_match_scans_forward_to_first_success() {
        let list = tokenize("int a ; int b = 1 ;", 0).unwrap();
        let p = Pattern::compile("%type% %var% = %num%").unwrap();
        let hit = find_match(&list, list.front().unwrap(), &p, 0).unwrap();
        assert_eq!(list.get(hit).text, "int");
        assert_eq!(list.str_at(hit, 1), Some("b"));
    }

    #[test]
    fn find_match_returns_none_when_nothing_matches() {
        let list = tokenize("int a ;", 0).unwrap();
        let p = Pattern::compile("%num% %num%").unwrap();
        assert!(find_match(&list, list.front().unwrap(), &p, 0).is_none());
    }
}
