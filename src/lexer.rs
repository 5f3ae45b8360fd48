//! The command-line lexer.
//!
//! One lexer serves both surfaces. Which universes a word may resolve in is
//! controlled by `FindKinds`: C/C++ keywords, the English vocabulary, and
//! typedef names. The caller picks the flags per command (`explain` reads
//! gibberish, `declare` reads English), so the same identifier can be a
//! keyword in one command and a plain name in the next.

use crate::error::{CdeclError, Result};
use crate::keyword::{c_keyword_find, cdecl_keyword_find, cdecl_keyword_token, KwCtx};
use crate::lang::Lang;
use crate::token::{Span, Token, TokenType};
use crate::typedef::TypedefTable;
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FindKinds: u8 {
        const C_KEYWORDS     = 1 << 0;
        const CDECL_KEYWORDS = 1 << 1;
        const TYPEDEFS       = 1 << 2;
    }
}

impl FindKinds {
    pub const ALL: FindKinds = FindKinds::all();
}

/// Multi-character punctuators, longest first, each gated by language.
/// The preprocessor's paste-avoidance check reuses this table.
pub static MULTI_PUNCTS: &[(&str, Lang)] = &[
    ("<<=", Lang::ANY),
    (">>=", Lang::ANY),
    ("...", Lang::ANY),
    ("->*", Lang::CPP_ANY),
    ("<=>", Lang::CPP_20.union(Lang::CPP_23)),
    ("->", Lang::ANY),
    ("++", Lang::ANY),
    ("--", Lang::ANY),
    ("<<", Lang::ANY),
    (">>", Lang::ANY),
    ("<=", Lang::ANY),
    (">=", Lang::ANY),
    ("==", Lang::ANY),
    ("!=", Lang::ANY),
    ("&&", Lang::ANY),
    ("||", Lang::ANY),
    ("+=", Lang::ANY),
    ("-=", Lang::ANY),
    ("*=", Lang::ANY),
    ("/=", Lang::ANY),
    ("%=", Lang::ANY),
    ("&=", Lang::ANY),
    ("|=", Lang::ANY),
    ("^=", Lang::ANY),
    ("##", Lang::ANY),
    ("::", Lang::CPP_ANY.union(Lang::C_23)),
    (".*", Lang::CPP_ANY),
];

pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
    lang: Lang,
    find: FindKinds,
    /// True while reading pseudo-English; admits `english_only` words.
    english: bool,
    /// True between `[[` and `]]`; attribute-context keywords resolve only
    /// here.
    in_attribute: bool,
    typedefs: Option<&'a TypedefTable>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, lang: Lang) -> Self {
        Lexer {
            source,
            chars: source.chars().collect(),
            pos: 0,
            lang,
            find: FindKinds::ALL,
            english: false,
            in_attribute: false,
            typedefs: None,
        }
    }

    pub fn with_find(mut self, find: FindKinds) -> Self {
        self.find = find;
        self
    }

    pub fn english(mut self, english: bool) -> Self {
        self.english = english;
        self
    }

    pub fn typedefs(mut self, table: &'a TypedefTable) -> Self {
        self.typedefs = Some(table);
        self
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, off: usize) -> Option<char> {
        self.chars.get(self.pos + off).copied()
    }

    /// Byte offset of the current char position (spans are byte-based so
    /// they index the original source).
    fn byte_pos(&self) -> usize {
        self.chars[..self.pos].iter().map(|c| c.len_utf8()).sum()
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut out = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenType::Eof;
            out.push(token);
            if done {
                return Ok(out);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
        let start = self.byte_pos();
        let c = match self.peek_char() {
            None => return Ok(Token::new(TokenType::Eof, "", Span::new(start, start))),
            Some(c) => c,
        };

        if c.is_alphabetic() || c == '_' {
            return Ok(self.lex_word(start));
        }
        if c.is_ascii_digit() {
            return self.lex_number(start);
        }
        if c == '"' {
            return self.lex_string(start);
        }
        if c == '\'' {
            return self.lex_char(start);
        }
        self.lex_punct(start)
    }

    fn lex_word(&mut self, start: usize) -> Token {
        let word_start = self.pos;
        while matches!(self.peek_char(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let mut word: String = self.chars[word_start..self.pos].iter().collect();

        // Hyphenated English spellings ("bit-precise", "user-defined"):
        // extend the word greedily and keep the extension only if the whole
        // spelling is in the English table.
        if self.english && self.find.contains(FindKinds::CDECL_KEYWORDS) {
            let mut probe_pos = self.pos;
            let mut probe = word.clone();
            while self.chars.get(probe_pos) == Some(&'-')
                && matches!(self.chars.get(probe_pos + 1), Some(c) if c.is_alphabetic())
            {
                probe.push('-');
                probe_pos += 1;
                while matches!(self.chars.get(probe_pos), Some(c) if c.is_alphanumeric()) {
                    probe.push(self.chars[probe_pos]);
                    probe_pos += 1;
                }
            }
            if probe != word && cdecl_keyword_find(&probe, self.lang, true).is_some() {
                word = probe;
                self.pos = probe_pos;
            }
        }

        let span = Span::new(start, self.byte_pos());
        let kind = self.resolve_word(&word);
        Token::new(kind, word, span)
    }

    fn resolve_word(&self, word: &str) -> TokenType {
        if self.find.contains(FindKinds::CDECL_KEYWORDS) {
            if let Some(kw) = cdecl_keyword_find(word, self.lang, self.english) {
                if let Some(token) = cdecl_keyword_token(kw, self.lang) {
                    return token;
                }
            }
        }
        if self.find.contains(FindKinds::C_KEYWORDS) {
            if let Some(kw) = c_keyword_find(word, self.lang) {
                if kw.ctx == KwCtx::Default || self.in_attribute {
                    return kw.token.clone();
                }
            }
        }
        if self.find.contains(FindKinds::TYPEDEFS) {
            if let Some(table) = self.typedefs {
                if table.find_in(word, self.lang).is_some() {
                    return TokenType::TypedefName(word.to_string());
                }
            }
        }
        TokenType::Identifier(word.to_string())
    }

    fn lex_number(&mut self, start: usize) -> Result<Token> {
        let num_start = self.pos;
        let (radix, digits_start) =
            if self.peek_char() == Some('0') && matches!(self.peek_at(1), Some('x') | Some('X')) {
                self.pos += 2;
                (16, self.pos)
            } else if self.peek_char() == Some('0') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
                (8, self.pos)
            } else {
                (10, self.pos)
            };
        while matches!(self.peek_char(), Some(c) if c.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
        let text: String = self.chars[digits_start..self.pos].iter().collect();
        let lexeme: String = self.chars[num_start..self.pos].iter().collect();
        let span = Span::new(start, self.byte_pos());
        match u64::from_str_radix(if text.is_empty() { "0" } else { &text }, radix) {
            Ok(n) => Ok(Token::new(TokenType::Number(n), lexeme, span)),
            Err(_) => Err(CdeclError::lexical(
                format!("\"{}\": invalid integer", lexeme),
                span,
            )),
        }
    }

    fn lex_string(&mut self, start: usize) -> Result<Token> {
        self.pos += 1;
        let mut content = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(CdeclError::lexical(
                        "unterminated string literal",
                        Span::new(start, self.byte_pos()),
                    ))
                }
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    content.push('\\');
                    self.pos += 1;
                    if let Some(c) = self.peek_char() {
                        content.push(c);
                        self.pos += 1;
                    }
                }
                Some(c) => {
                    content.push(c);
                    self.pos += 1;
                }
            }
        }
        let span = Span::new(start, self.byte_pos());
        Ok(Token::new(TokenType::StrLit(content.clone()), content, span))
    }

    fn lex_char(&mut self, start: usize) -> Result<Token> {
        self.pos += 1;
        let mut content = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(CdeclError::lexical(
                        "unterminated character literal",
                        Span::new(start, self.byte_pos()),
                    ))
                }
                Some('\'') => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    content.push('\\');
                    self.pos += 1;
                    if let Some(c) = self.peek_char() {
                        content.push(c);
                        self.pos += 1;
                    }
                }
                Some(c) => {
                    content.push(c);
                    self.pos += 1;
                }
            }
        }
        let span = Span::new(start, self.byte_pos());
        Ok(Token::new(TokenType::CharLit(content.clone()), content, span))
    }

    fn lex_punct(&mut self, start: usize) -> Result<Token> {
        let rest: String = self.chars[self.pos..].iter().collect();
        for &(p, gate) in MULTI_PUNCTS {
            if gate.contains(self.lang) && rest.starts_with(p) {
                self.pos += p.chars().count();
                let span = Span::new(start, self.byte_pos());
                let kind = match p {
                    "&&" => TokenType::AmpAmp,
                    "::" => TokenType::ColonColon,
                    "..." => TokenType::Ellipsis,
                    other => TokenType::Punct(other.to_string()),
                };
                return Ok(Token::new(kind, p, span));
            }
        }
        let c = self.chars[self.pos];
        self.pos += 1;
        let span = Span::new(start, self.byte_pos());
        let kind = match c {
            '(' => TokenType::LParen,
            ')' => TokenType::RParen,
            '[' => {
                if self.peek_char() == Some('[') {
                    self.in_attribute = true;
                }
                TokenType::LBracket
            }
            ']' => {
                self.in_attribute = false;
                TokenType::RBracket
            }
            '{' => TokenType::LBrace,
            '}' => TokenType::RBrace,
            ',' => TokenType::Comma,
            '*' => TokenType::Star,
            '&' => TokenType::Amp,
            '^' => TokenType::Caret,
            '~' => TokenType::Tilde,
            ';' => TokenType::Semi,
            ':' => TokenType::Colon,
            '=' => TokenType::Equals,
            '<' => TokenType::Less,
            '>' => TokenType::Greater,
            '#' => TokenType::Hash,
            '+' | '-' | '/' | '%' | '|' | '!' | '.' | '?' => {
                TokenType::Punct(c.to_string())
            }
            other => {
                return Err(CdeclError::lexical(
                    format!("'{}': unexpected character", other),
                    span,
                ))
            }
        };
        Ok(Token::new(kind, c.to_string(), span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tid::TypeId;

    fn kinds(source: &str, lang: Lang, find: FindKinds, english: bool) -> Vec<TokenType> {
        Lexer::new(source, lang)
            .with_find(find)
            .english(english)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_simple_gibberish_declaration() {
        let toks = kinds("int *x", Lang::C_11, FindKinds::C_KEYWORDS, false);
        assert_eq!(
            toks,
            vec![
                TokenType::TypeSpec(TypeId::B_INT),
                TokenType::Star,
                TokenType::Identifier("x".into()),
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn english_words_resolve_only_in_english_mode() {
        let toks = kinds("pointer to int", Lang::C_11, FindKinds::ALL, true);
        assert_eq!(toks[0], TokenType::Pointer);
        assert_eq!(toks[1], TokenType::To);
        let raw = kinds("pointer to int", Lang::C_11, FindKinds::ALL, false);
        assert_eq!(raw[0], TokenType::Identifier("pointer".into()));
    }

    #[test]
    fn hyphenated_english_keyword_lexes_as_one_word() {
        let toks = kinds("bit-precise integer", Lang::C_23, FindKinds::ALL, true);
        assert_eq!(toks[0], TokenType::BitInt);
        assert_eq!(toks[1], TokenType::TypeSpec(TypeId::B_INT));
    }

    #[test]
    fn typedef_names_resolve_when_enabled() {
        let table = TypedefTable::with_predefined();
        let toks = Lexer::new("size_t n", Lang::C_11)
            .typedefs(&table)
            .tokenize()
            .unwrap();
        assert_eq!(toks[0].kind, TokenType::TypedefName("size_t".into()));
    }

    #[test]
    fn numbers_lex_in_decimal_octal_hex() {
        let toks = kinds("42 052 0x2a", Lang::C_11, FindKinds::empty(), false);
        assert_eq!(toks[0], TokenType::Number(42));
        assert_eq!(toks[1], TokenType::Number(42));
        assert_eq!(toks[2], TokenType::Number(42));
    }

    #[test]
    fn multi_char_punctuators_use_maximal_munch() {
        let toks = kinds("&& ::", Lang::CPP_17, FindKinds::empty(), false);
        assert_eq!(toks[0], TokenType::AmpAmp);
        assert_eq!(toks[1], TokenType::ColonColon);
    }

    #[test]
    fn scope_punct_is_not_c89() {
        let toks = kinds("::", Lang::C_89, FindKinds::empty(), false);
        // Falls apart into two single colons.
        assert_eq!(toks[0], TokenType::Colon);
        assert_eq!(toks[1], TokenType::Colon);
    }

    #[test]
    fn attribute_keywords_resolve_only_inside_brackets() {
        let toks = kinds("[[nodiscard]] int", Lang::CPP_17, FindKinds::C_KEYWORDS, false);
        assert_eq!(toks[0], TokenType::LBracket);
        assert_eq!(toks[1], TokenType::LBracket);
        assert_eq!(toks[2], TokenType::TypeSpec(TypeId::A_NODISCARD));
        let bare = kinds("nodiscard", Lang::CPP_17, FindKinds::C_KEYWORDS, false);
        assert_eq!(bare[0], TokenType::Identifier("nodiscard".into()));
    }

    #[test]
    fn unterminated_string_is_a_lexical_error() {
        let err = Lexer::new("\"oops", Lang::C_11).tokenize().unwrap_err();
        assert!(err.message().contains("unterminated"));
    }

    #[test]
    fn ellipsis_lexes_as_one_token() {
        let toks = kinds("( ... )", Lang::C_11, FindKinds::empty(), false);
        assert_eq!(toks[1], TokenType::Ellipsis);
    }

    #[test]
    fn spans_cover_the_lexeme() {
        let toks = Lexer::new("int x", Lang::C_11).tokenize().unwrap();
        assert_eq!((toks[0].span.start, toks[0].span.end), (0, 3));
        assert_eq!((toks[1].span.start, toks[1].span.end), (4, 5));
    }
}
