//! Preprocessor tokens and token-list hygiene.
//!
//! Macro machinery works on its own token kind: coarser than the command
//! lexer's (no keyword resolution) but with the bookkeeping expansion needs:
//! a "was substituted" bit, an "ineligible for further expansion" bit on
//! identifiers, and the placemarker sentinel for `#` and `##` of empty
//! arguments.

use crate::error::{CdeclError, Result};
use crate::lang::Lang;
use crate::lexer::MULTI_PUNCTS;
use crate::token::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PTokenKind {
    CharLit(String),
    NumLit(String),
    StrLit(String),
    Ident { name: String, ineligible: bool },
    Punct(String),
    Other(String),
    /// `##`
    Concat,
    /// `#`
    Stringify,
    Space,
    /// Empty-argument sentinel.
    Placemarker,
    VaArgs,
    VaOpt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PToken {
    pub kind: PTokenKind,
    pub span: Span,
    pub is_substituted: bool,
}

impl PToken {
    pub fn new(kind: PTokenKind, span: Span) -> Self {
        PToken { kind, span, is_substituted: false }
    }

    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        PToken::new(PTokenKind::Ident { name: name.into(), ineligible: false }, span)
    }

    pub fn placemarker(span: Span) -> Self {
        PToken::new(PTokenKind::Placemarker, span)
    }

    pub fn is_space(&self) -> bool {
        matches!(self.kind, PTokenKind::Space)
    }

    pub fn is_placemarker(&self) -> bool {
        matches!(self.kind, PTokenKind::Placemarker)
    }

    pub fn ident_name(&self) -> Option<&str> {
        match &self.kind {
            PTokenKind::Ident { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Printed spelling. Placemarkers are invisible.
    pub fn text(&self) -> String {
        match &self.kind {
            PTokenKind::CharLit(s) => format!("'{}'", s),
            PTokenKind::NumLit(s) | PTokenKind::Punct(s) | PTokenKind::Other(s) => s.clone(),
            PTokenKind::StrLit(s) => format!("\"{}\"", s),
            PTokenKind::Ident { name, .. } => name.clone(),
            PTokenKind::Concat => "##".to_string(),
            PTokenKind::Stringify => "#".to_string(),
            PTokenKind::Space => " ".to_string(),
            PTokenKind::Placemarker => String::new(),
            PTokenKind::VaArgs => "__VA_ARGS__".to_string(),
            PTokenKind::VaOpt => "__VA_OPT__".to_string(),
        }
    }

    /// Bare spelling for pasting: no literal quotes re-added.
    fn paste_text(&self) -> String {
        self.text()
    }
}

/// Lex a source string into preprocessor tokens. This is also the re-entry
/// point `##` uses to check that a paste forms exactly one token.
pub fn lex(source: &str, lang: Lang, first_column: usize) -> Result<Vec<PToken>> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = first_column + i;
        let c = chars[i];
        if c.is_whitespace() {
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            out.push(PToken::new(PTokenKind::Space, Span::new(start, first_column + i)));
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let word_start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[word_start..i].iter().collect();
            let span = Span::new(start, first_column + i);
            let kind = match word.as_str() {
                "__VA_ARGS__" => PTokenKind::VaArgs,
                "__VA_OPT__" => PTokenKind::VaOpt,
                _ => PTokenKind::Ident { name: word, ineligible: false },
            };
            out.push(PToken::new(kind, span));
            continue;
        }
        if c.is_ascii_digit() || (c == '.' && matches!(chars.get(i + 1), Some(d) if d.is_ascii_digit())) {
            // pp-number: digits, identifier chars, dots, exponent signs.
            let num_start = i;
            i += 1;
            while i < chars.len() {
                let d = chars[i];
                if d.is_alphanumeric() || d == '.' || d == '_' {
                    i += 1;
                } else if (d == '+' || d == '-')
                    && matches!(chars[i - 1], 'e' | 'E' | 'p' | 'P')
                {
                    i += 1;
                } else {
                    break;
                }
            }
            let text: String = chars[num_start..i].iter().collect();
            out.push(PToken::new(PTokenKind::NumLit(text), Span::new(start, first_column + i)));
            continue;
        }
        if c == '"' || c == '\'' {
            let quote = c;
            let mut content = String::new();
            i += 1;
            loop {
                match chars.get(i) {
                    None => {
                        return Err(CdeclError::lexical(
                            "unterminated literal",
                            Span::new(start, first_column + i),
                        ))
                    }
                    Some(&ch) if ch == quote => {
                        i += 1;
                        break;
                    }
                    Some('\\') => {
                        content.push('\\');
                        i += 1;
                        if let Some(&e) = chars.get(i) {
                            content.push(e);
                            i += 1;
                        }
                    }
                    Some(&ch) => {
                        content.push(ch);
                        i += 1;
                    }
                }
            }
            let span = Span::new(start, first_column + i);
            let kind = if quote == '"' {
                PTokenKind::StrLit(content)
            } else {
                PTokenKind::CharLit(content)
            };
            out.push(PToken::new(kind, span));
            continue;
        }
        // Punctuators, longest first; ## and # are their own kinds.
        let rest: String = chars[i..].iter().collect();
        if rest.starts_with("##") {
            i += 2;
            out.push(PToken::new(PTokenKind::Concat, Span::new(start, first_column + i)));
            continue;
        }
        if c == '#' {
            i += 1;
            out.push(PToken::new(PTokenKind::Stringify, Span::new(start, first_column + i)));
            continue;
        }
        let mut matched = false;
        for &(p, gate) in MULTI_PUNCTS {
            if gate.contains(lang) && rest.starts_with(p) {
                i += p.chars().count();
                out.push(PToken::new(
                    PTokenKind::Punct(p.to_string()),
                    Span::new(start, first_column + i),
                ));
                matched = true;
                break;
            }
        }
        if matched {
            continue;
        }
        i += 1;
        let span = Span::new(start, first_column + i);
        let kind = if c.is_ascii_punctuation() {
            PTokenKind::Punct(c.to_string())
        } else {
            PTokenKind::Other(c.to_string())
        };
        out.push(PToken::new(kind, span));
    }
    Ok(out)
}

/// Whether appending punctuator `b` directly after punctuator `a` would lex
/// as a different, longer punctuator in `lang`.
fn would_paste(a: &str, b: &str, lang: Lang) -> bool {
    let b_chars: Vec<char> = b.chars().collect();
    for n in 1..=b_chars.len() {
        let prefix: String = b_chars[..n].iter().collect();
        let joined = format!("{}{}", a, prefix);
        if joined == a {
            continue;
        }
        let hit = MULTI_PUNCTS
            .iter()
            .any(|&(p, gate)| gate.contains(lang) && p == joined);
        if hit || joined == "##" {
            return true;
        }
    }
    false
}

/// Append with paste avoidance: a separating space is inserted when two
/// adjacent punctuators would otherwise merge into a different token, so
/// expanding `-X` with `X = ->` prints `- ->`, never `-->`.
pub fn push_token(list: &mut Vec<PToken>, token: PToken, lang: Lang) {
    if let PTokenKind::Punct(new) = &token.kind {
        let last_punct = list.last().and_then(|t| match &t.kind {
            PTokenKind::Punct(s) => Some(s.clone()),
            PTokenKind::Concat => Some("##".to_string()),
            PTokenKind::Stringify => Some("#".to_string()),
            _ => None,
        });
        if let Some(prev) = last_punct {
            if would_paste(&prev, new, lang) {
                list.push(PToken::new(PTokenKind::Space, token.span));
            }
        }
    }
    list.push(token);
}

/// Remove leading and trailing spaces, then collapse interior runs of
/// spaces and placemarkers. A lone placemarker is meaningful and survives.
pub fn trim(list: &mut Vec<PToken>) {
    while list.first().map_or(false, |t| t.is_space()) {
        list.remove(0);
    }
    while list.last().map_or(false, |t| t.is_space()) {
        list.pop();
    }
    let mut out: Vec<PToken> = Vec::with_capacity(list.len());
    let mut run: Vec<PToken> = Vec::new();
    for t in list.drain(..) {
        if t.is_space() || t.is_placemarker() {
            run.push(t);
            continue;
        }
        flush_run(&mut out, &mut run);
        out.push(t);
    }
    flush_run(&mut out, &mut run);
    while out.first().map_or(false, |t| t.is_space()) {
        out.remove(0);
    }
    while out.last().map_or(false, |t| t.is_space()) {
        out.pop();
    }
    *list = out;
}

fn flush_run(out: &mut Vec<PToken>, run: &mut Vec<PToken>) {
    if run.is_empty() {
        return;
    }
    if run.len() == 1 {
        out.push(run.pop().unwrap());
        return;
    }
    let span = run[0].span;
    let has_space = run.iter().any(|t| t.is_space());
    run.clear();
    if has_space {
        out.push(PToken::new(PTokenKind::Space, span));
    } else {
        out.push(PToken::new(PTokenKind::Placemarker, span));
    }
}

/// Recompute columns from stringified widths, skipping leading spaces.
pub fn relocate(list: &mut [PToken], first_column: usize) {
    let mut col = first_column;
    let mut leading = true;
    for t in list.iter_mut() {
        if leading && t.is_space() {
            t.span = Span::new(col, col);
            continue;
        }
        leading = false;
        let width = t.text().chars().count();
        t.span = Span::new(col, col + width);
        col += width;
    }
}

/// Concatenated printed form, leading and trailing spaces skipped.
pub fn list_str(list: &[PToken]) -> String {
    let mut start = 0;
    let mut end = list.len();
    while start < end && list[start].is_space() {
        start += 1;
    }
    while end > start && list[end - 1].is_space() {
        end -= 1;
    }
    list[start..end].iter().map(|t| t.text()).collect()
}

/// The spelling used when pasting two tokens with `##`.
pub fn paste_strings(a: &PToken, b: &PToken) -> String {
    format!("{}{}", a.paste_text(), b.paste_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lx(s: &str) -> Vec<PToken> {
        lex(s, Lang::C_23, 0).unwrap()
    }

    #[test]
    fn lexes_identifiers_and_numbers() {
        let toks = lx("abc 42");
        assert_eq!(toks[0].ident_name(), Some("abc"));
        assert!(toks[1].is_space());
        assert_eq!(toks[2].kind, PTokenKind::NumLit("42".into()));
    }

    #[test]
    fn va_args_and_va_opt_are_distinct_kinds() {
        let toks = lx("__VA_ARGS__ __VA_OPT__");
        assert_eq!(toks[0].kind, PTokenKind::VaArgs);
        assert_eq!(toks[2].kind, PTokenKind::VaOpt);
    }

    #[test]
    fn hash_and_hash_hash_are_operators() {
        let toks = lx("# ##");
        assert_eq!(toks[0].kind, PTokenKind::Stringify);
        assert_eq!(toks[2].kind, PTokenKind::Concat);
    }

    #[test]
    fn pp_number_swallows_exponents() {
        let toks = lx("1e+5");
        assert_eq!(toks[0].kind, PTokenKind::NumLit("1e+5".into()));
    }

    #[test]
    fn multi_char_punct_lexes_whole() {
        let toks = lx("->");
        assert_eq!(toks[0].kind, PTokenKind::Punct("->".into()));
    }

    #[test]
    fn push_token_inserts_space_to_avoid_paste() {
        let mut list = vec![PToken::new(PTokenKind::Punct("-".into()), Span::default())];
        push_token(
            &mut list,
            PToken::new(PTokenKind::Punct("->".into()), Span::default()),
            Lang::C_23,
        );
        assert_eq!(list.len(), 3);
        assert!(list[1].is_space());
        assert_eq!(list_str(&list), "- ->");
    }

    #[test]
    fn push_token_leaves_safe_neighbors_alone() {
        let mut list = vec![PToken::new(PTokenKind::Punct(")".into()), Span::default())];
        push_token(
            &mut list,
            PToken::new(PTokenKind::Punct(";".into()), Span::default()),
            Lang::C_23,
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn trim_strips_and_collapses() {
        let mut list = lx("  a   b  ");
        trim(&mut list);
        assert_eq!(list_str(&list), "a b");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn trim_keeps_lone_placemarker() {
        let mut list = vec![PToken::placemarker(Span::default())];
        trim(&mut list);
        assert_eq!(list.len(), 1);
        assert!(list[0].is_placemarker());
    }

    #[test]
    fn list_str_skips_outer_spaces_only() {
        let toks = lx(" x + y ");
        assert_eq!(list_str(&toks), "x + y");
    }

    #[test]
    fn relocate_assigns_sequential_columns() {
        let mut toks = lx("ab cd");
        relocate(&mut toks, 10);
        assert_eq!(toks[0].span, Span::new(10, 12));
        assert_eq!(toks[2].span, Span::new(13, 15));
    }
}
