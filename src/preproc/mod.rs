//! The preprocessor: token model, macro store, and expansion engine.

pub mod expand;
pub mod store;
pub mod token;

pub use expand::{ExpandStep, Expander};
pub use store::{Macro, MacroKind, MacroStore};
pub use token::{PToken, PTokenKind};

use crate::error::{CdeclError, Result};
use crate::lang::Lang;
use crate::token::Span;

/// Parse the body of a `#define` directive (everything after the keyword)
/// into a macro definition. A `(` immediately after the name, with no
/// intervening space, makes the macro function-like.
pub fn parse_define(body: &str, lang: Lang) -> Result<Macro> {
    let toks = token::lex(body, lang, 0)?;
    let mut i = 0;
    while i < toks.len() && toks[i].is_space() {
        i += 1;
    }
    let (name, name_span) = match toks.get(i).map(|t| (&t.kind, t.span)) {
        Some((PTokenKind::Ident { name, .. }, span)) => (name.clone(), span),
        _ => {
            return Err(CdeclError::preproc(
                "macro name expected after #define",
                Span::new(0, body.len().max(1)),
            ))
        }
    };
    i += 1;

    let adjacent_paren = matches!(
        toks.get(i).map(|t| &t.kind),
        Some(PTokenKind::Punct(p)) if p == "("
    ) && toks[i].span.start == name_span.end;

    if !adjacent_paren {
        let mut replace: Vec<PToken> = toks[i..].to_vec();
        token::trim(&mut replace);
        return Ok(Macro::object(name, replace));
    }

    // Function-like: collect parameter names up to the closing paren.
    i += 1;
    let mut params: Vec<String> = Vec::new();
    let mut variadic = false;
    let mut want_name = true;
    loop {
        let t = match toks.get(i) {
            Some(t) => t,
            None => {
                return Err(CdeclError::preproc(
                    "unterminated macro parameter list",
                    name_span,
                ))
            }
        };
        match &t.kind {
            PTokenKind::Space => {}
            PTokenKind::Punct(p) if p == ")" => {
                i += 1;
                break;
            }
            PTokenKind::Punct(p) if p == "," && !want_name => {
                if variadic {
                    return Err(CdeclError::preproc(
                        "\"...\" must be the last parameter",
                        t.span,
                    ));
                }
                want_name = true;
            }
            PTokenKind::Punct(p) if p == "..." && want_name => {
                variadic = true;
                want_name = false;
            }
            PTokenKind::Ident { name: p, .. } if want_name => {
                if variadic {
                    return Err(CdeclError::preproc(
                        "\"...\" must be the last parameter",
                        t.span,
                    ));
                }
                if params.iter().any(|q| q == p) {
                    return Err(CdeclError::preproc(
                        format!("\"{}\": duplicate macro parameter", p),
                        t.span,
                    ));
                }
                params.push(p.clone());
                want_name = false;
            }
            _ => {
                return Err(CdeclError::preproc(
                    "malformed macro parameter list",
                    t.span,
                ))
            }
        }
        i += 1;
    }

    let mut replace: Vec<PToken> = toks[i..].to_vec();
    token::trim(&mut replace);
    Ok(Macro::function(name, params, variadic, replace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_macro() {
        let mac = parse_define("ANSWER 42", Lang::C_23).unwrap();
        assert_eq!(mac.name, "ANSWER");
        assert_eq!(mac.kind, MacroKind::Object);
        assert_eq!(token::list_str(&mac.replace), "42");
    }

    #[test]
    fn parses_function_macro() {
        let mac = parse_define("SQ(x) ((x) * (x))", Lang::C_23).unwrap();
        assert_eq!(
            mac.kind,
            MacroKind::Function { params: vec!["x".into()], variadic: false }
        );
    }

    #[test]
    fn space_before_paren_means_object_like() {
        let mac = parse_define("F (x)", Lang::C_23).unwrap();
        assert_eq!(mac.kind, MacroKind::Object);
        assert_eq!(token::list_str(&mac.replace), "(x)");
    }

    #[test]
    fn parses_variadic_parameters() {
        let mac = parse_define("LOG(fmt, ...) f(fmt, __VA_ARGS__)", Lang::C_23).unwrap();
        assert_eq!(
            mac.kind,
            MacroKind::Function { params: vec!["fmt".into()], variadic: true }
        );
    }

    #[test]
    fn variadic_must_be_last() {
        assert!(parse_define("BAD(..., x) x", Lang::C_23).is_err());
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        assert!(parse_define("BAD(a, a) a", Lang::C_23).is_err());
    }

    #[test]
    fn empty_parameter_list_is_fine() {
        let mac = parse_define("NOW() 0", Lang::C_23).unwrap();
        assert_eq!(
            mac.kind,
            MacroKind::Function { params: vec![], variadic: false }
        );
    }
}
