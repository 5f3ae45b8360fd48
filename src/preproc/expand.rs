//! Macro expansion.
//!
//! The scanner walks a token list left to right. Substituted regions are
//! re-scanned under a hide set containing every macro currently being
//! expanded; an identifier that names a hidden macro is marked ineligible
//! instead of expanded, which is what makes `#define X X` and mutually
//! recursive macros terminate. Within a replacement list the operator
//! passes run in order: `#`, `##`, `__VA_OPT__`, then ordinary parameter
//! substitution with fully expanded arguments.

use super::store::{Macro, MacroKind, MacroStore};
use super::token::{self, PToken, PTokenKind};
use crate::error::{CdeclError, Result};
use crate::lang::Lang;
use crate::token::Span;
use std::collections::HashSet;

/// One step of an expansion trace, for the interactive cascade display.
#[derive(Debug, Clone)]
pub struct ExpandStep {
    pub what: String,
    pub tokens: Vec<PToken>,
}

pub struct Expander<'a> {
    store: &'a MacroStore,
    lang: Lang,
    tracing: bool,
    trace: Vec<ExpandStep>,
}

impl<'a> Expander<'a> {
    pub fn new(store: &'a MacroStore, lang: Lang) -> Self {
        Expander { store, lang, tracing: false, trace: Vec::new() }
    }

    pub fn tracing(mut self, on: bool) -> Self {
        self.tracing = on;
        self
    }

    pub fn trace(&self) -> &[ExpandStep] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<ExpandStep> {
        self.trace
    }

    /// Expand `input` fully. On a preprocessor error the caller keeps its
    /// original list; expansion never returns a half-substituted one.
    pub fn expand(&mut self, input: &[PToken]) -> Result<Vec<PToken>> {
        let hide = HashSet::new();
        self.scan(input, &hide)
    }

    fn step(&mut self, what: impl Into<String>, tokens: &[PToken]) {
        if self.tracing {
            self.trace.push(ExpandStep { what: what.into(), tokens: tokens.to_vec() });
        }
    }

    fn scan(&mut self, tokens: &[PToken], hide: &HashSet<String>) -> Result<Vec<PToken>> {
        let store = self.store;
        let mut out: Vec<PToken> = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let t = &tokens[i];
            let name = match &t.kind {
                PTokenKind::Ident { name, ineligible: false } => name.clone(),
                _ => {
                    token::push_token(&mut out, t.clone(), self.lang);
                    i += 1;
                    continue;
                }
            };
            if hide.contains(&name) {
                let mut hidden = t.clone();
                if let PTokenKind::Ident { ineligible, .. } = &mut hidden.kind {
                    *ineligible = true;
                }
                out.push(hidden);
                i += 1;
                continue;
            }
            let mac = match store.find_in(&name, self.lang) {
                Some(m) => m,
                None => {
                    token::push_token(&mut out, t.clone(), self.lang);
                    i += 1;
                    continue;
                }
            };
            match &mac.kind {
                MacroKind::Object => {
                    let mut rep = mark_substituted(mac.replace.clone());
                    rep = self.concat_pass(rep, &[], &[], t.span)?;
                    token::trim(&mut rep);
                    self.step(format!("substitute {}", name), &rep);
                    let expanded = self.rescan(rep, hide, &name)?;
                    self.step(format!("expand {}", name), &expanded);
                    for tok in expanded {
                        token::push_token(&mut out, tok, self.lang);
                    }
                    i += 1;
                }
                MacroKind::Dynamic(f) => {
                    let mut rep = mark_substituted(f(self.lang));
                    token::trim(&mut rep);
                    self.step(format!("substitute {}", name), &rep);
                    let expanded = self.rescan(rep, hide, &name)?;
                    for tok in expanded {
                        token::push_token(&mut out, tok, self.lang);
                    }
                    i += 1;
                }
                MacroKind::Function { params, variadic } => {
                    let mut j = i + 1;
                    while j < tokens.len() && tokens[j].is_space() {
                        j += 1;
                    }
                    let is_call = matches!(
                        tokens.get(j).map(|t| &t.kind),
                        Some(PTokenKind::Punct(p)) if p == "("
                    );
                    if !is_call {
                        token::push_token(&mut out, t.clone(), self.lang);
                        i += 1;
                        continue;
                    }
                    let (raw_args, next) = collect_args(tokens, j)?;
                    let (named, va) =
                        bind_args(raw_args, params, *variadic, &name, t.span)?;
                    let substituted =
                        self.substitute(mac, &named, &va, hide, &name, t.span)?;
                    self.step(format!("substitute {}", name), &substituted);
                    let expanded = self.rescan(substituted, hide, &name)?;
                    self.step(format!("expand {}", name), &expanded);
                    for tok in expanded {
                        token::push_token(&mut out, tok, self.lang);
                    }
                    i = next;
                }
            }
        }
        Ok(out)
    }

    fn rescan(
        &mut self,
        rep: Vec<PToken>,
        hide: &HashSet<String>,
        name: &str,
    ) -> Result<Vec<PToken>> {
        let mut sub_hide = hide.clone();
        sub_hide.insert(name.to_string());
        self.scan(&rep, &sub_hide)
    }

    /// Build the substituted replacement list for one function-like call.
    fn substitute(
        &mut self,
        mac: &Macro,
        named: &[(String, Vec<PToken>)],
        va: &[PToken],
        hide: &HashSet<String>,
        name: &str,
        span: Span,
    ) -> Result<Vec<PToken>> {
        let mut rep = mac.replace.clone();

        let had_stringify = rep.iter().any(|t| matches!(t.kind, PTokenKind::Stringify));
        rep = stringify_pass(rep, named, va, span)?;
        if had_stringify {
            self.step("stringify", &rep);
        }

        let had_concat = rep.iter().any(|t| matches!(t.kind, PTokenKind::Concat));
        rep = self.concat_pass(rep, named, va, span)?;
        if had_concat {
            self.step("concatenate", &rep);
        }

        let had_va_opt = rep.iter().any(|t| matches!(t.kind, PTokenKind::VaOpt));
        rep = va_opt_pass(rep, va, span)?;
        if had_va_opt {
            self.step("__VA_OPT__", &rep);
        }

        // Ordinary parameters substitute their fully expanded arguments,
        // expanded under the caller's hide set plus this macro.
        let mut out: Vec<PToken> = Vec::new();
        for t in rep {
            let arg = match &t.kind {
                PTokenKind::Ident { name: n, ineligible: false } => {
                    named.iter().find(|(p, _)| p == n).map(|(_, a)| a.clone())
                }
                PTokenKind::VaArgs => Some(va.to_vec()),
                _ => None,
            };
            match arg {
                Some(list) => {
                    let expanded = self.rescan(list, hide, name)?;
                    if expanded.is_empty() {
                        out.push(PToken::placemarker(t.span));
                    } else {
                        for tok in expanded {
                            token::push_token(&mut out, tok, self.lang);
                        }
                    }
                }
                None => token::push_token(&mut out, t, self.lang),
            }
        }
        token::trim(&mut out);
        Ok(mark_substituted(out))
    }

    /// Resolve every `##` in `rep`. Parameters adjacent to the operator are
    /// spliced in unexpanded first; pasting then lexes the joined spelling
    /// and must yield exactly one token.
    fn concat_pass(
        &mut self,
        rep: Vec<PToken>,
        named: &[(String, Vec<PToken>)],
        va: &[PToken],
        span: Span,
    ) -> Result<Vec<PToken>> {
        if !rep.iter().any(|t| matches!(t.kind, PTokenKind::Concat)) {
            return Ok(rep);
        }
        // Splice raw arguments for parameters that touch a ## operator.
        let mut spliced: Vec<PToken> = Vec::new();
        for (idx, t) in rep.iter().enumerate() {
            let is_param_like = matches!(&t.kind, PTokenKind::Ident { ineligible: false, .. })
                || matches!(t.kind, PTokenKind::VaArgs);
            let adjacent = touches_concat(&rep, idx);
            if is_param_like && adjacent {
                let arg = match &t.kind {
                    PTokenKind::Ident { name, .. } => {
                        named.iter().find(|(p, _)| p == name).map(|(_, a)| a.clone())
                    }
                    PTokenKind::VaArgs => Some(va.to_vec()),
                    _ => None,
                };
                if let Some(mut list) = arg {
                    token::trim(&mut list);
                    if list.is_empty() {
                        spliced.push(PToken::placemarker(t.span));
                    } else {
                        spliced.extend(list);
                    }
                    continue;
                }
            }
            spliced.push(t.clone());
        }

        // Resolve left to right.
        let mut toks = spliced;
        loop {
            let pos = match toks.iter().position(|t| matches!(t.kind, PTokenKind::Concat)) {
                Some(p) => p,
                None => break,
            };
            let mut l = pos;
            loop {
                if l == 0 {
                    return Err(CdeclError::preproc("\"##\" cannot begin a replacement", span));
                }
                l -= 1;
                if !toks[l].is_space() {
                    break;
                }
            }
            let mut r = pos;
            loop {
                r += 1;
                if r >= toks.len() {
                    return Err(CdeclError::preproc("\"##\" cannot end a replacement", span));
                }
                if !toks[r].is_space() {
                    break;
                }
            }
            let pasted = self.paste(&toks[l], &toks[r], span)?;
            toks.splice(l..=r, [pasted]);
        }
        Ok(toks)
    }

    /// Paste two tokens. A placemarker absorbs into the other operand; two
    /// placemarkers paste to a placemarker.
    fn paste(&mut self, a: &PToken, b: &PToken, span: Span) -> Result<PToken> {
        if a.is_placemarker() && b.is_placemarker() {
            return Ok(PToken::placemarker(span));
        }
        if a.is_placemarker() {
            return Ok(b.clone());
        }
        if b.is_placemarker() {
            return Ok(a.clone());
        }
        let joined = token::paste_strings(a, b);
        let lexed = token::lex(&joined, self.lang, span.start)
            .map_err(|_| bad_paste(&joined, span))?;
        let mut significant = lexed
            .into_iter()
            .filter(|t| !t.is_space())
            .collect::<Vec<_>>();
        if significant.len() != 1 {
            return Err(bad_paste(&joined, span));
        }
        let mut tok = significant.pop().unwrap();
        tok.is_substituted = true;
        // An identifier synthesized out of a reserved spelling must not be
        // treated as the special parameter on re-scan.
        match tok.kind {
            PTokenKind::VaArgs => {
                tok.kind = PTokenKind::Ident { name: "__VA_ARGS__".into(), ineligible: true };
            }
            PTokenKind::VaOpt => {
                tok.kind = PTokenKind::Ident { name: "__VA_OPT__".into(), ineligible: true };
            }
            _ => {}
        }
        Ok(tok)
    }
}

fn bad_paste(joined: &str, span: Span) -> CdeclError {
    CdeclError::preproc(
        format!("\"{}\": pasting does not form a valid token", joined),
        span,
    )
}

fn mark_substituted(mut list: Vec<PToken>) -> Vec<PToken> {
    for t in &mut list {
        t.is_substituted = true;
    }
    list
}

fn touches_concat(rep: &[PToken], idx: usize) -> bool {
    let before = rep[..idx]
        .iter()
        .rev()
        .find(|t| !t.is_space())
        .map_or(false, |t| matches!(t.kind, PTokenKind::Concat));
    let after = rep[idx + 1..]
        .iter()
        .find(|t| !t.is_space())
        .map_or(false, |t| matches!(t.kind, PTokenKind::Concat));
    before || after
}

/// Collect comma-separated argument lists between balanced parentheses.
/// `open` indexes the `(`. Returns the raw argument lists and the index
/// just past the `)`.
fn collect_args(tokens: &[PToken], open: usize) -> Result<(Vec<Vec<PToken>>, usize)> {
    let mut args: Vec<Vec<PToken>> = vec![Vec::new()];
    let mut depth = 1;
    let mut i = open + 1;
    while i < tokens.len() {
        let t = &tokens[i];
        match &t.kind {
            PTokenKind::Punct(p) if p == "(" => {
                depth += 1;
                args.last_mut().unwrap().push(t.clone());
            }
            PTokenKind::Punct(p) if p == ")" => {
                depth -= 1;
                if depth == 0 {
                    return Ok((args, i + 1));
                }
                args.last_mut().unwrap().push(t.clone());
            }
            PTokenKind::Punct(p) if p == "," && depth == 1 => {
                args.push(Vec::new());
            }
            _ => args.last_mut().unwrap().push(t.clone()),
        }
        i += 1;
    }
    Err(CdeclError::preproc(
        "unterminated macro argument list",
        tokens[open].span,
    ))
}

/// Check arity and bind raw argument lists to parameter names. A missing
/// or empty argument binds a placemarker-only list.
fn bind_args(
    mut raw: Vec<Vec<PToken>>,
    params: &[String],
    variadic: bool,
    name: &str,
    span: Span,
) -> Result<(Vec<(String, Vec<PToken>)>, Vec<PToken>)> {
    for arg in &mut raw {
        token::trim(arg);
    }
    // `M()` with no parameters is a zero-argument call.
    if params.is_empty() && !variadic && raw.len() == 1 && raw[0].is_empty() {
        raw.clear();
    }
    let n = params.len();
    if variadic {
        if raw.len() < n {
            return Err(arity_error(name, raw.len(), n, span));
        }
    } else if raw.len() != n {
        return Err(arity_error(name, raw.len(), n, span));
    }

    let mut named = Vec::with_capacity(n);
    for (p, arg) in params.iter().zip(raw.iter()) {
        let list = if arg.is_empty() {
            vec![PToken::placemarker(span)]
        } else {
            arg.clone()
        };
        named.push((p.clone(), list));
    }
    let mut va: Vec<PToken> = Vec::new();
    if variadic {
        for (k, arg) in raw.iter().enumerate().skip(n) {
            if k > n {
                va.push(PToken::new(PTokenKind::Punct(",".into()), span));
                va.push(PToken::new(PTokenKind::Space, span));
            }
            va.extend(arg.iter().cloned());
        }
        token::trim(&mut va);
        if va.is_empty() {
            va.push(PToken::placemarker(span));
        }
    }
    Ok((named, va))
}

fn arity_error(name: &str, got: usize, want: usize, span: Span) -> CdeclError {
    CdeclError::preproc(
        format!(
            "\"{}\": macro expects {} argument{}, got {}",
            name,
            want,
            if want == 1 { "" } else { "s" },
            got
        ),
        span,
    )
}

/// Resolve every `#` in `rep`: the following parameter's raw argument list
/// becomes a string literal, outer spaces trimmed, interior runs collapsed,
/// quotes and backslashes escaped.
fn stringify_pass(
    rep: Vec<PToken>,
    named: &[(String, Vec<PToken>)],
    va: &[PToken],
    span: Span,
) -> Result<Vec<PToken>> {
    if !rep.iter().any(|t| matches!(t.kind, PTokenKind::Stringify)) {
        return Ok(rep);
    }
    let mut out: Vec<PToken> = Vec::new();
    let mut i = 0;
    while i < rep.len() {
        if !matches!(rep[i].kind, PTokenKind::Stringify) {
            out.push(rep[i].clone());
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < rep.len() && rep[j].is_space() {
            j += 1;
        }
        let arg = rep.get(j).and_then(|t| match &t.kind {
            PTokenKind::Ident { name, .. } => {
                named.iter().find(|(p, _)| p == name).map(|(_, a)| a.clone())
            }
            PTokenKind::VaArgs => Some(va.to_vec()),
            _ => None,
        });
        let arg = match arg {
            Some(a) => a,
            None => {
                return Err(CdeclError::preproc(
                    "\"#\" is not followed by a macro parameter",
                    span,
                ))
            }
        };
        let mut lit = PToken::new(PTokenKind::StrLit(stringify(&arg)), rep[i].span);
        lit.is_substituted = true;
        out.push(lit);
        i = j + 1;
    }
    Ok(out)
}

fn stringify(arg: &[PToken]) -> String {
    let mut list = arg.to_vec();
    token::trim(&mut list);
    let mut s = String::new();
    for t in &list {
        if t.is_placemarker() {
            continue;
        }
        let text = t.text();
        match &t.kind {
            PTokenKind::StrLit(_) | PTokenKind::CharLit(_) => {
                for c in text.chars() {
                    if c == '"' || c == '\\' {
                        s.push('\\');
                    }
                    s.push(c);
                }
            }
            _ => s.push_str(&text),
        }
    }
    s
}

/// Resolve `__VA_OPT__(seq)`: the whole construct becomes `seq` when the
/// variadic arguments are non-empty, a placemarker otherwise. Nesting is
/// disallowed.
fn va_opt_pass(rep: Vec<PToken>, va: &[PToken], span: Span) -> Result<Vec<PToken>> {
    if !rep.iter().any(|t| matches!(t.kind, PTokenKind::VaOpt)) {
        return Ok(rep);
    }
    let va_empty = va.is_empty() || va.iter().all(|t| t.is_placemarker() || t.is_space());
    let mut out: Vec<PToken> = Vec::new();
    let mut i = 0;
    while i < rep.len() {
        if !matches!(rep[i].kind, PTokenKind::VaOpt) {
            out.push(rep[i].clone());
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < rep.len() && rep[j].is_space() {
            j += 1;
        }
        if !matches!(&rep.get(j).map(|t| &t.kind), Some(PTokenKind::Punct(p)) if p == "(") {
            return Err(CdeclError::preproc("__VA_OPT__ requires parentheses", span));
        }
        let mut depth = 1;
        let mut k = j + 1;
        let mut seq: Vec<PToken> = Vec::new();
        loop {
            let t = match rep.get(k) {
                Some(t) => t,
                None => {
                    return Err(CdeclError::preproc("unterminated __VA_OPT__", span));
                }
            };
            match &t.kind {
                PTokenKind::VaOpt => {
                    return Err(CdeclError::preproc("__VA_OPT__ may not nest", span));
                }
                PTokenKind::Punct(p) if p == "(" => {
                    depth += 1;
                    seq.push(t.clone());
                }
                PTokenKind::Punct(p) if p == ")" => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    seq.push(t.clone());
                }
                _ => seq.push(t.clone()),
            }
            k += 1;
        }
        if va_empty {
            out.push(PToken::placemarker(rep[i].span));
        } else {
            token::trim(&mut seq);
            out.extend(mark_substituted(seq));
        }
        i = k + 1;
    }
    Ok(out)
}
