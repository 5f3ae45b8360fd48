//! The recursive-descent parser shared by both surfaces.
//!
//! One `Parser` holds the token list, a cursor, the paren-nesting depth that
//! feeds declarator composition, and the arena receiving the nodes of this
//! parse. Submodules supply the per-surface grammars: `decl` reads
//! gibberish, `english` reads the `declare`/`cast` vocabulary.

mod decl;
mod english;

pub use english::EnglishCommand;

use crate::ast::{self, oper, AstArena, AstId, AstKind, VisitDir};
use crate::error::{CdeclError, Result};
use crate::lang::Lang;
use crate::preproc::MacroStore;
use crate::suggest::{did_you_mean, DymKind};
use crate::tid::{self, TypeId};
use crate::token::{Span, Token, TokenType};
use crate::typedef::TypedefTable;

pub struct Parser<'t> {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
    pub(super) lang: Lang,
    pub(super) typedefs: &'t TypedefTable,
    pub(super) macros: Option<&'t MacroStore>,
    /// Grouping-paren nesting; recorded on each node at creation.
    pub(super) depth: u32,
    pub arena: AstArena,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: Vec<Token>, lang: Lang, typedefs: &'t TypedefTable) -> Self {
        Parser {
            tokens,
            current: 0,
            lang,
            typedefs,
            macros: None,
            depth: 0,
            arena: AstArena::new(),
        }
    }

    pub fn with_macros(mut self, macros: &'t MacroStore) -> Self {
        self.macros = Some(macros);
        self
    }

    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub(super) fn peek_at(&self, off: usize) -> &Token {
        let idx = (self.current + off).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub(super) fn at_end(&self) -> bool {
        self.peek().kind == TokenType::Eof
    }

    pub(super) fn advance(&mut self) -> Token {
        let t = self.peek().clone();
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        t
    }

    pub(super) fn check(&self, kind: &TokenType) -> bool {
        &self.peek().kind == kind
    }

    pub(super) fn eat(&mut self, kind: &TokenType) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    pub(super) fn expect(&mut self, kind: &TokenType, what: &str) -> Result<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(self.syntax_error(what))
    }

    pub(super) fn syntax_error(&self, expected: &str) -> CdeclError {
        let t = self.peek();
        let found = if t.kind == TokenType::Eof {
            "end of input".to_string()
        } else {
            format!("\"{}\"", t.lexeme)
        };
        CdeclError::syntax(expected, found, t.span)
    }

    /// An unknown identifier, with suggestions from the active universes.
    pub(super) fn unknown_name(&self, word: &str, span: Span, kinds: DymKind) -> CdeclError {
        let suggestions = did_you_mean(kinds, word, self.lang, Some(self.typedefs), self.macros);
        CdeclError::unknown_name(word, suggestions, span)
    }

    pub(super) fn save(&self) -> usize {
        self.current
    }

    pub(super) fn restore(&mut self, checkpoint: usize) {
        self.current = checkpoint;
    }

    /// Read a possibly scoped name: `a::b::c`.
    pub(super) fn scoped_name(&mut self) -> Result<crate::sname::ScopedName> {
        let mut sname = crate::sname::ScopedName::new();
        loop {
            match &self.peek().kind {
                TokenType::Identifier(name) | TokenType::TypedefName(name) => {
                    let name = name.clone();
                    self.advance();
                    sname.append(name, TypeId::empty());
                }
                _ => return Err(self.syntax_error("name")),
            }
            if !self.eat(&TokenType::ColonColon) {
                return Ok(sname);
            }
        }
    }

    /// Every node reachable from `root` through ownership links.
    fn tree_nodes(&self, root: AstId) -> Vec<AstId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let node = self.arena.node(id);
            if node.kind.is_parent() {
                if let Some(of) = node.kind.of_id() {
                    stack.push(of);
                }
            }
            if let Some(params) = node.kind.params() {
                stack.extend(params.iter().copied());
            }
            if let AstKind::Lambda { captures, .. } = &node.kind {
                stack.extend(captures.iter().copied());
            }
        }
        out
    }

    /// Languages in which a node kind exists at all.
    fn kind_langs(kind: &AstKind) -> Lang {
        match kind {
            AstKind::Reference { .. }
            | AstKind::PointerToMember { .. }
            | AstKind::Operator { .. }
            | AstKind::Constructor { .. }
            | AstKind::Destructor
            | AstKind::UdConversion { .. }
            | AstKind::Concept => Lang::CPP_ANY,
            AstKind::RvalueReference { .. } | AstKind::Lambda { .. } | AstKind::Capture { .. } => {
                Lang::cpp_min(Lang::CPP_11)
            }
            AstKind::UdLiteral { .. } => Lang::cpp_min(Lang::CPP_11),
            AstKind::StructuredBinding { .. } => Lang::cpp_min(Lang::CPP_17),
            _ => Lang::ANY,
        }
    }

    /// Validate a finished declaration against the active language: per-bit
    /// gates, pair legality, kind availability, structural rules, operator
    /// arity, and parameter-pack placement.
    pub fn validate(&self, root: AstId) -> Result<()> {
        for id in self.tree_nodes(root) {
            let node = self.arena.node(id);

            let kind_ok = Self::kind_langs(&node.kind);
            if !kind_ok.contains(self.lang) {
                return Err(CdeclError::semantic(
                    format!("{} {}", node.kind.noun(), kind_ok.which(self.lang)),
                    node.span,
                ));
            }

            if let Err(e) = tid::check(node.tid, self.lang) {
                let spelled = tid::bit_name(e.offending, self.lang);
                let msg = match e.second {
                    Some(b) => format!(
                        "\"{} {}\" is illegal: {}",
                        spelled,
                        tid::bit_name(b, self.lang),
                        e.ok_langs.which(self.lang)
                    ),
                    None => format!("\"{}\" {}", spelled, e.ok_langs.which(self.lang)),
                };
                return Err(CdeclError::semantic(msg, node.span));
            }

            match &node.kind {
                AstKind::Array { of, .. } => {
                    let inner = &self.arena.node(*of).kind;
                    if inner.is_function_like() && !matches!(inner, AstKind::Lambda { .. }) {
                        return Err(CdeclError::semantic(
                            "array of functions is illegal; did you mean array of pointers to function?",
                            node.span,
                        ));
                    }
                }
                AstKind::Function { ret, .. } => {
                    let inner = &self.arena.node(*ret).kind;
                    if matches!(inner, AstKind::Array { .. }) {
                        return Err(CdeclError::semantic(
                            "function returning array is illegal; did you mean function returning pointer?",
                            node.span,
                        ));
                    }
                    if inner.is_function_like() && !matches!(inner, AstKind::Lambda { .. }) {
                        return Err(CdeclError::semantic(
                            "function returning function is illegal; did you mean function returning pointer to function?",
                            node.span,
                        ));
                    }
                }
                AstKind::Operator { op, params, .. } => {
                    let info = oper::operator_info(*op);
                    if !info.lang.contains(self.lang) {
                        return Err(CdeclError::semantic(
                            format!("operator {} {}", info.literal, info.lang.which(self.lang)),
                            node.span,
                        ));
                    }
                    if params.len() < info.params_min
                        || (info.params_max != usize::MAX && params.len() > info.params_max)
                    {
                        return Err(CdeclError::semantic(
                            format!(
                                "operator {} takes {}, got {}",
                                info.literal,
                                arity_phrase(info.params_min, info.params_max),
                                params.len()
                            ),
                            node.span,
                        ));
                    }
                }
                _ => {}
            }

            if node.tid.contains(TypeId::A_NORETURN) && !node.kind.is_function_like() {
                return Err(CdeclError::semantic(
                    "\"noreturn\" applies only to functions",
                    node.span,
                ));
            }
            if node.tid.contains(TypeId::Q_RESTRICT)
                && !matches!(node.kind, AstKind::Pointer { .. })
            {
                return Err(CdeclError::semantic(
                    "\"restrict\" applies only to pointers",
                    node.span,
                ));
            }

            if node.is_param_pack {
                let in_params = node.param_of.is_some()
                    || ast::visit(&self.arena, id, VisitDir::Up, |a, up| {
                        a.node(up).param_of.is_some()
                    })
                    .is_some();
                if !in_params {
                    return Err(CdeclError::semantic(
                        "parameter pack is not allowed here",
                        node.span,
                    ));
                }
            }
        }
        Ok(())
    }
}

fn arity_phrase(min: usize, max: usize) -> String {
    let plural = |n: usize| if n == 1 { "argument" } else { "arguments" };
    if max == usize::MAX {
        format!("at least {} {}", min, plural(min))
    } else if min == max {
        format!("exactly {} {}", min, plural(min))
    } else {
        format!("{} to {} arguments", min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{FindKinds, Lexer};

    fn parser<'t>(source: &str, lang: Lang, typedefs: &'t TypedefTable) -> Parser<'t> {
        let tokens = Lexer::new(source, lang)
            .with_find(FindKinds::C_KEYWORDS | FindKinds::TYPEDEFS)
            .typedefs(typedefs)
            .tokenize()
            .unwrap();
        Parser::new(tokens, lang, typedefs)
    }

    #[test]
    fn long_long_is_rejected_in_c89() {
        let typedefs = TypedefTable::new();
        let mut p = parser("long long x", Lang::C_89, &typedefs);
        let roots = p.parse_gibberish_decl();
        let err = match roots {
            Err(e) => e,
            Ok(roots) => p.validate(roots[0]).unwrap_err(),
        };
        let msg = err.message();
        assert!(msg.contains("long long"), "{}", msg);
        assert!(msg.contains("not supported until C99"), "{}", msg);
    }

    #[test]
    fn array_of_functions_is_rejected() {
        let typedefs = TypedefTable::new();
        let mut p = parser("int x[3](void)", Lang::C_11, &typedefs);
        let err = p
            .parse_gibberish_decl()
            .and_then(|roots| p.validate(roots[0]))
            .unwrap_err();
        assert!(err.message().contains("array of functions"), "{}", err.message());
    }

    #[test]
    fn function_returning_function_is_rejected() {
        let typedefs = TypedefTable::new();
        let mut p = parser("int f(void)(void)", Lang::C_11, &typedefs);
        let err = p
            .parse_gibberish_decl()
            .and_then(|roots| p.validate(roots[0]))
            .unwrap_err();
        assert!(
            err.message().contains("function returning function"),
            "{}",
            err.message()
        );
    }

    #[test]
    fn reference_is_rejected_in_c() {
        let typedefs = TypedefTable::new();
        let mut p = parser("int &r", Lang::C_11, &typedefs);
        let err = p
            .parse_gibberish_decl()
            .and_then(|roots| p.validate(roots[0]))
            .unwrap_err();
        assert!(err.message().contains("not supported in C"), "{}", err.message());
    }

    #[test]
    fn restrict_on_non_pointer_is_rejected() {
        let typedefs = TypedefTable::new();
        let mut p = parser("restrict int x", Lang::C_99, &typedefs);
        let err = p
            .parse_gibberish_decl()
            .and_then(|roots| p.validate(roots[0]))
            .unwrap_err();
        assert!(err.message().contains("restrict"), "{}", err.message());
    }
}
