//! "Did you mean?" suggestions.
//!
//! Damerau–Levenshtein edit distance over the name universes active for the
//! current language: commands, `set` options, C/C++ keywords by type part,
//! the English vocabulary, typedef names, and macro names. The working
//! matrix is allocated once per `EditDistance` handle and reused across
//! candidates.

use crate::keyword::{c_keywords, cdecl_keywords};
use crate::lang::Lang;
use crate::preproc::store::MacroStore;
use crate::tid::TypeId;
use crate::token::TokenType;
use crate::typedef::TypedefTable;
use bitflags::bitflags;
use std::collections::HashMap;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DymKind: u32 {
        const COMMANDS       = 1 << 0;
        const CLI_OPTIONS    = 1 << 1;
        const SET_OPTIONS    = 1 << 2;
        const KW_BASE        = 1 << 3;
        const KW_STORAGE     = 1 << 4;
        const KW_ATTRIBUTES  = 1 << 5;
        const KW_QUALIFIERS  = 1 << 6;
        const KW_OTHER       = 1 << 7;
        const CDECL_KEYWORDS = 1 << 8;
        const TYPEDEFS       = 1 << 9;
        const MACROS         = 1 << 10;
    }
}

impl DymKind {
    pub const KEYWORDS: DymKind = DymKind::KW_BASE
        .union(DymKind::KW_STORAGE)
        .union(DymKind::KW_ATTRIBUTES)
        .union(DymKind::KW_QUALIFIERS)
        .union(DymKind::KW_OTHER);
}

pub const COMMANDS: &[&str] = &[
    "cast", "declare", "define", "exit", "expand", "explain", "help", "quit",
    "set", "show", "typedef",
];

pub const CLI_OPTIONS: &[&str] = &["--color", "--echo", "--help", "--language", "--version"];

pub const SET_OPTIONS: &[&str] = &["color", "echo", "trace"];

/// Damerau–Levenshtein engine with a reusable working matrix. The matrix is
/// `(max_src + 2) x (max_tgt + 2)`, boundary rows pre-filled with an
/// effectively-infinite distance.
pub struct EditDistance {
    cells: Vec<usize>,
    cols: usize,
    max_src: usize,
    max_tgt: usize,
}

impl EditDistance {
    pub fn new(max_src: usize, max_tgt: usize) -> Self {
        let rows = max_src + 2;
        let cols = max_tgt + 2;
        EditDistance { cells: vec![0; rows * cols], cols, max_src, max_tgt }
    }

    fn grow(&mut self, src_len: usize, tgt_len: usize) {
        if src_len > self.max_src || tgt_len > self.max_tgt {
            self.max_src = self.max_src.max(src_len);
            self.max_tgt = self.max_tgt.max(tgt_len);
            self.cols = self.max_tgt + 2;
            self.cells = vec![0; (self.max_src + 2) * self.cols];
        }
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, v: usize) {
        let cols = self.cols;
        self.cells[i * cols + j] = v;
    }

    /// Edit distance with transpositions between `a` and `b`.
    pub fn distance(&mut self, a: &str, b: &str) -> usize {
        let a_chars: Vec<char> = a.chars().collect();
        let b_chars: Vec<char> = b.chars().collect();
        let m = a_chars.len();
        let n = b_chars.len();
        if m == 0 {
            return n;
        }
        if n == 0 {
            return m;
        }
        self.grow(m, n);

        let inf = m + n;
        self.set(0, 0, inf);
        for i in 0..=m {
            self.set(i + 1, 1, i);
            self.set(i + 1, 0, inf);
        }
        for j in 0..=n {
            self.set(1, j + 1, j);
            self.set(0, j + 1, inf);
        }

        // Last row in which each source character was seen.
        let mut last_row: HashMap<char, usize> = HashMap::new();

        for i in 1..=m {
            // Last column in this row where the characters matched.
            let mut last_match_col = 0;
            for j in 1..=n {
                let row_of_match = last_row.get(&b_chars[j - 1]).copied().unwrap_or(0);
                let col_of_match = last_match_col;
                let cost = if a_chars[i - 1] == b_chars[j - 1] {
                    last_match_col = j;
                    0
                } else {
                    1
                };
                let substitute = self.at(i, j) + cost;
                let insert = self.at(i + 1, j) + 1;
                let delete = self.at(i, j + 1) + 1;
                let transpose = self.at(row_of_match, col_of_match)
                    + (i - row_of_match - 1)
                    + (j - col_of_match - 1)
                    + 1;
                let best = substitute.min(insert).min(delete).min(transpose);
                self.set(i + 1, j + 1, best);
            }
            last_row.insert(a_chars[i - 1], i);
        }

        self.at(m + 1, n + 1)
    }
}

fn keyword_part(tid: TypeId) -> DymKind {
    if tid.intersects(TypeId::PART_QUAL) {
        DymKind::KW_QUALIFIERS
    } else if tid.intersects(TypeId::PART_ATTR) {
        DymKind::KW_ATTRIBUTES
    } else if tid.intersects(TypeId::PART_STORE) {
        DymKind::KW_STORAGE
    } else {
        DymKind::KW_BASE
    }
}

/// Enumerate the candidate universe for the given kinds.
fn candidates(
    kinds: DymKind,
    lang: Lang,
    typedefs: Option<&TypedefTable>,
    macros: Option<&MacroStore>,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if kinds.contains(DymKind::COMMANDS) {
        out.extend(COMMANDS.iter().map(|s| s.to_string()));
    }
    if kinds.contains(DymKind::CLI_OPTIONS) {
        out.extend(CLI_OPTIONS.iter().map(|s| s.to_string()));
    }
    if kinds.contains(DymKind::SET_OPTIONS) {
        for opt in SET_OPTIONS {
            out.push(opt.to_string());
            out.push(format!("no{}", opt));
        }
        out.extend(
            ["c", "c89", "c95", "c99", "c11", "c17", "c23", "c++", "c++11", "c++17", "c++20", "c++23", "knr"]
                .iter()
                .map(|s| s.to_string()),
        );
    }
    if kinds.intersects(DymKind::KEYWORDS) {
        for kw in c_keywords(lang) {
            let part = match &kw.token {
                TokenType::TypeSpec(tid) => keyword_part(*tid),
                _ => DymKind::KW_OTHER,
            };
            if kinds.contains(part) {
                out.push(kw.literal.to_string());
            }
        }
    }
    if kinds.contains(DymKind::CDECL_KEYWORDS) {
        for kw in cdecl_keywords(lang) {
            out.push(kw.literal.to_string());
        }
    }
    if kinds.contains(DymKind::TYPEDEFS) {
        if let Some(table) = typedefs {
            for td in table.iter() {
                if td.lang.contains(lang) {
                    out.push(td.sname.to_string());
                }
            }
        }
    }
    if kinds.contains(DymKind::MACROS) {
        if let Some(store) = macros {
            for m in store.iter() {
                if m.lang.contains(lang) {
                    out.push(m.name.clone());
                }
            }
        }
    }
    out.sort();
    out.dedup();
    out
}

/// Rank candidates by edit distance from `unknown` and apply the similarity
/// gate: suggestions are returned only when the best distance is at most
/// 40% of the best candidate's length, rounded. All ties are returned.
pub fn did_you_mean(
    kinds: DymKind,
    unknown: &str,
    lang: Lang,
    typedefs: Option<&TypedefTable>,
    macros: Option<&MacroStore>,
) -> Vec<String> {
    let pool = candidates(kinds, lang, typedefs, macros);
    if pool.is_empty() {
        return Vec::new();
    }
    let mut dl = EditDistance::new(unknown.len(), 16);
    let mut best = usize::MAX;
    let mut scored: Vec<(usize, &String)> = Vec::with_capacity(pool.len());
    for cand in &pool {
        let d = dl.distance(unknown, cand);
        best = best.min(d);
        scored.push((d, cand));
    }
    let ties: Vec<&String> = scored
        .iter()
        .filter(|(d, _)| *d == best)
        .map(|(_, c)| *c)
        .collect();
    let gate_len = ties.first().map(|c| c.chars().count()).unwrap_or(0);
    if best > (0.4 * gate_len as f64).round() as usize {
        return Vec::new();
    }
    ties.into_iter().cloned().collect()
}
