//! The token and the arena-backed, doubly-linked stream that holds it.

use cavil_base::{Arena, ArenaId};
use std::fmt;

/// A stable reference to a [`Token`] inside a [`TokenList`].
pub type TokenId = ArenaId<Token>;

/// Brackets whose balance is lexically unambiguous: every valid program's
/// `(`/`[`/`{` matches a real closer, so a stack mismatch here is a
/// genuine contract violation worth failing on. `<`/`>` deliberately do
/// NOT participate: they're ambiguous with the relational and shift
/// operators, so linking them can't use a fatal stack — see
/// `TokenList::link_angle_brackets`.
const OPENERS: [char; 3] = ['(', '[', '{'];
const CLOSERS: [char; 3] = [')', ']', '}'];

const STANDARD_TYPES: &[&str] = &[
    "bool", "char", "short", "int", "long", "float", "double", "void",
    "signed", "unsigned", "wchar_t", "size_t",
];

/// A single lexical unit in the token stream.
///
/// `prev`/`next` thread the doubly-linked stream; `link` joins a bracket
/// token to its match. All three are stored as plain arena indices (see
/// `cavil_base::arena`) rather than pointers, so the stream never forms an
/// owning cycle.
#[derive(Debug, Clone)]
pub struct Token {
    pub text: String,
    pub line: u32,
    pub file_index: u32,
    /// 0 means "not a variable occurrence"; every occurrence of the same
    /// declared variable shares the same positive id.
    pub var_id: u32,
    pub is_name: bool,
    pub is_standard_type: bool,
    pub is_number: bool,
    pub(crate) prev: Option<TokenId>,
    pub(crate) next: Option<TokenId>,
    pub(crate) link: Option<TokenId>,
}

impl Token {
    fn classify(text: &str) -> (bool, bool, bool) {
        let is_number = {
            let mut chars = text.chars();
            match chars.next() {
                Some(c) if c.is_ascii_digit() => true,
                Some('.') => text.len() > 1 && text.chars().nth(1).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            }
        };
        let is_name = !is_number
            && text
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
            && text.chars().all(|c| c.is_alphanumeric() || c == '_');
        let is_standard_type = is_name && STANDARD_TYPES.contains(&text);
        (is_name, is_standard_type, is_number)
    }

    fn new(text: impl Into<String>, line: u32, file_index: u32) -> Self {
        let text = text.into();
        let (is_name, is_standard_type, is_number) = Self::classify(&text);
        Token {
            text,
            line,
            file_index,
            var_id: 0,
            is_name,
            is_standard_type,
            is_number,
            prev: None,
            next: None,
            link: None,
        }
    }

    pub fn is_opening_bracket(&self) -> bool {
        self.text.len() == 1 && OPENERS.contains(&self.text.chars().next().unwrap())
    }

    pub fn is_closing_bracket(&self) -> bool {
        self.text.len() == 1 && CLOSERS.contains(&self.text.chars().next().unwrap())
    }
}

/// Raised when the bracket-linking pass finds tokens the lexer's contract
/// guarantees should never occur: a closer with no opener, or vice versa.
/// This is the fatal "you found a bug" class of failure from spec.md §7 —
/// it indicates the upstream token stream violated its contract, not a
/// finding about the analyzed program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStreamError {
    UnmatchedCloser { text: String, line: u32 },
    UnmatchedOpener { text: String, line: u32 },
}

impl fmt::Display for TokenStreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStreamError::UnmatchedCloser { text, line } => write!(
                f,
                "#### You found a bug: unmatched closing bracket '{text}' at line {line}"
            ),
            TokenStreamError::UnmatchedOpener { text, line } => write!(
                f,
                "#### You found a bug: unmatched opening bracket '{text}' at line {line}"
            ),
        }
    }
}

impl std::error::Error for TokenStreamError {}

/// An ordered sequence of tokens with stable addresses, built by appending
/// and then linking brackets once. Iteration is by `next`; the stream is
/// read-only once analysis begins (simplification passes are out of scope
/// here — spec.md treats them as an implementation detail of the excluded
/// lexer/preprocessor).
#[derive(Debug, Default)]
pub struct TokenList {
    arena: Arena<Token>,
    front: Option<TokenId>,
    back: Option<TokenId>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn front(&self) -> Option<TokenId> {
        self.front
    }

    pub fn get(&self, id: TokenId) -> &Token {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: TokenId) -> &mut Token {
        self.arena.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Appends a new token to the end of the stream.
    pub fn push_back(&mut self, text: impl Into<String>, line: u32, file_index: u32) -> TokenId {
        let mut token = Token::new(text, line, file_index);
        token.prev = self.back;
        let id = self.arena.alloc(token);
        if let Some(back) = self.back {
            self.arena.get_mut(back).next = Some(id);
        } else {
            self.front = Some(id);
        }
        self.back = Some(id);
        id
    }

    pub fn set_var_id(&mut self, id: TokenId, var_id: u32) {
        self.arena.get_mut(id).var_id = var_id;
    }

    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self.arena.get(id).next
    }

    pub fn prev(&self, id: TokenId) -> Option<TokenId> {
        self.arena.get(id).prev
    }

    pub fn link(&self, id: TokenId) -> Option<TokenId> {
        self.arena.get(id).link
    }

    /// Advances `n` tokens from `id` (negative `n` walks backward). Returns
    /// `None` if `n` runs off either end of the stream.
    pub fn tok_at(&self, id: TokenId, n: i64) -> Option<TokenId> {
        let mut cur = id;
        if n >= 0 {
            for _ in 0..n {
                cur = self.next(cur)?;
            }
        } else {
            for _ in 0..(-n) {
                cur = self.prev(cur)?;
            }
        }
        Some(cur)
    }

    pub fn str_at(&self, id: TokenId, n: i64) -> Option<&str> {
        self.tok_at(id, n).map(|t| self.get(t).text.as_str())
    }

    /// Iterates the stream from `start` to the end, following `next`.
    pub fn iter_from(&self, start: TokenId) -> TokenIter<'_> {
        TokenIter {
            list: self,
            cur: Some(start),
        }
    }

    pub fn iter(&self) -> TokenIter<'_> {
        TokenIter {
            list: self,
            cur: self.front,
        }
    }

    /// Joins every opening bracket to its matching closer and vice versa,
    /// in a single forward pass with a stack. Must run exactly once, after
    /// the full stream has been populated; it is a contract violation to
    /// query `link()` before this runs.
    pub fn link_brackets(&mut self) -> Result<(), TokenStreamError> {
        let mut stack: Vec<TokenId> = Vec::new();
        let mut cur = self.front;
        while let Some(id) = cur {
            let (is_open, is_close, text, line) = {
                let tok = self.arena.get(id);
                (
                    tok.is_opening_bracket(),
                    tok.is_closing_bracket(),
                    tok.text.clone(),
                    tok.line,
                )
            };
            if is_open {
                stack.push(id);
            } else if is_close {
                let opener = stack
                    .pop()
                    .ok_or(TokenStreamError::UnmatchedCloser { text, line })?;
                self.arena.get_mut(opener).link = Some(id);
                self.arena.get_mut(id).link = Some(opener);
            }
            cur = self.arena.get(id).next;
        }
        if let Some(id) = stack.pop() {
            let tok = self.arena.get(id);
            return Err(TokenStreamError::UnmatchedOpener {
                text: tok.text.clone(),
                line: tok.line,
            });
        }
        Ok(())
    }

    /// Best-effort linking of `<`/`>` as template argument-list brackets.
    ///
    /// Unlike `link_brackets`, an unmatched `<` or `>` here is routine, not
    /// an error: `<`/`>` are also the relational and shift operators, and
    /// nothing short of full expression parsing can tell them apart from a
    /// lexical pass. A `<` is tentatively pushed as an opener; a `>` pops
    /// and links the most recent pending `<`, if any, and is otherwise
    /// ignored. Any pending `<` is dropped, unlinked, at the next `;`,
    /// `{`, or `}`, so a relational use on one statement never reaches
    /// across into the next.
    pub fn link_angle_brackets(&mut self) {
        let mut stack: Vec<TokenId> = Vec::new();
        let mut cur = self.front;
        while let Some(id) = cur {
            match self.arena.get(id).text.as_str() {
                "<" => stack.push(id),
                ">" => {
                    if let Some(opener) = stack.pop() {
                        self.arena.get_mut(opener).link = Some(id);
                        self.arena.get_mut(id).link = Some(opener);
                    }
                }
                ";" | "{" | "}" => stack.clear(),
                _ => {}
            }
            cur = self.arena.get(id).next;
        }
    }
}

pub struct TokenIter<'a> {
    list: &'a TokenList,
    cur: Option<TokenId>,
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = TokenId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cur?;
        self.cur = self.list.next(id);
        Some(id)
    }
}
