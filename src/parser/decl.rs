//! Gibberish declarations: `explain int (*x[3])(char)` and friends.
//!
//! Declaration specifiers accumulate into a `DeclSpecs` value that is
//! materialized into a fresh type node once per declarator, so
//! `int x, *p, a[3]` shares one specifier parse across three trees.

use super::Parser;
use crate::ast::compose;
use crate::ast::{Alignment, ArrayKind, ArraySize, AstId, AstKind, FnMember};
use crate::error::Result;
use crate::sname::ScopedName;
use crate::suggest::DymKind;
use crate::tid::{self, TypeId};
use crate::token::{Span, TokenType};
use crate::typedef::Typedef;
use std::rc::Rc;

pub(super) struct DeclSpecs {
    pub tid: TypeId,
    pub base: BaseSpec,
    pub align: Alignment,
    pub span: Span,
}

pub(super) enum BaseSpec {
    None,
    Builtin { width: Option<u64> },
    Typedef(Rc<Typedef>),
    Enum { sname: ScopedName, of_tid: Option<TypeId> },
    Csu { sname: ScopedName },
}

impl<'t> Parser<'t> {
    /// `type declarator (, declarator)* ;?`
    pub fn parse_gibberish_decl(&mut self) -> Result<Vec<AstId>> {
        let specs = self.decl_specifiers()?;
        let mut roots = Vec::new();
        loop {
            let decl = self.declarator()?;
            let ty = self.materialize(&specs);
            let root = compose::patch_placeholder(&mut self.arena, ty, decl);
            if self.eat(&TokenType::Colon) {
                let width = match self.peek().kind.clone() {
                    TokenType::Number(n) => {
                        self.advance();
                        n
                    }
                    _ => return Err(self.syntax_error("bit-field width")),
                };
                self.set_bit_width(root, width);
            }
            roots.push(root);
            if !self.eat(&TokenType::Comma) {
                break;
            }
        }
        self.eat(&TokenType::Semi);
        if !self.at_end() {
            return Err(self.syntax_error("end of declaration"));
        }
        Ok(roots)
    }

    /// `( type abstract-declarator ) name`: a C-style cast.
    pub fn parse_gibberish_cast(&mut self) -> Result<AstId> {
        self.expect(&TokenType::LParen, "\"(\"")?;
        let specs = self.decl_specifiers()?;
        let decl = self.declarator()?;
        let ty = self.materialize(&specs);
        let type_root = compose::patch_placeholder(&mut self.arena, ty, decl);
        self.expect(&TokenType::RParen, "\")\"")?;
        let sname = if matches!(self.peek().kind, TokenType::Identifier(_)) {
            self.scoped_name()?
        } else {
            ScopedName::new()
        };
        let span = self.peek().span;
        let cast = self.arena.alloc(
            AstKind::Cast { kind: crate::ast::CastKind::C, to: type_root },
            self.depth,
            span,
        );
        self.arena.set_parent(type_root, cast);
        self.arena.node_mut(cast).sname = sname;
        if !self.at_end() {
            return Err(self.syntax_error("end of cast"));
        }
        Ok(cast)
    }

    fn set_bit_width(&mut self, root: AstId, width: u64) {
        match &mut self.arena.node_mut(root).kind {
            AstKind::Builtin { bit_width }
            | AstKind::TypedefRef { bit_width, .. }
            | AstKind::Enum { bit_width, .. } => *bit_width = Some(width),
            _ => {}
        }
    }

    fn add_tid(&mut self, tid: &mut TypeId, bits: TypeId, span: Span) -> Result<()> {
        tid::add(tid, bits).map_err(|e| {
            crate::error::CdeclError::semantic(
                format!(
                    "\"{}\": type is already \"{}\"",
                    tid::bit_name(e.new, self.lang),
                    tid::bit_name(e.existing, self.lang)
                ),
                span,
            )
        })
    }

    pub(super) fn decl_specifiers(&mut self) -> Result<DeclSpecs> {
        let start = self.peek().span;
        let mut tid = TypeId::empty();
        let mut base = BaseSpec::None;
        let mut align = Alignment::None;
        loop {
            let span = self.peek().span;
            match self.peek().kind.clone() {
                TokenType::TypeSpec(bits) => {
                    self.advance();
                    self.add_tid(&mut tid, bits, span)?;
                }
                TokenType::Typedef => {
                    self.advance();
                    self.add_tid(&mut tid, TypeId::S_TYPEDEF, span)?;
                }
                TokenType::Enum => {
                    self.advance();
                    self.add_tid(&mut tid, TypeId::B_ENUM, span)?;
                    if self.eat(&TokenType::Class) || self.eat(&TokenType::Struct) {
                        self.add_tid(&mut tid, TypeId::B_CLASS, span)?;
                    }
                    let sname = self.scoped_name()?;
                    let of_tid = if self.eat(&TokenType::Colon) {
                        let mut fixed = TypeId::empty();
                        while let TokenType::TypeSpec(bits) = self.peek().kind.clone() {
                            let s = self.peek().span;
                            self.advance();
                            self.add_tid(&mut fixed, bits, s)?;
                        }
                        Some(fixed)
                    } else {
                        None
                    };
                    base = BaseSpec::Enum { sname, of_tid };
                }
                TokenType::Struct | TokenType::Class | TokenType::Union => {
                    let bits = match &self.peek().kind {
                        TokenType::Struct => TypeId::B_STRUCT,
                        TokenType::Class => TypeId::B_CLASS,
                        _ => TypeId::B_UNION,
                    };
                    self.advance();
                    self.add_tid(&mut tid, bits, span)?;
                    let sname = self.scoped_name()?;
                    base = BaseSpec::Csu { sname };
                }
                TokenType::TypedefName(name) => {
                    self.advance();
                    let def = self
                        .typedefs
                        .find_in(&name, self.lang)
                        .cloned()
                        .ok_or_else(|| {
                            self.unknown_name(&name, span, DymKind::TYPEDEFS)
                        })?;
                    base = BaseSpec::Typedef(def);
                }
                TokenType::BitInt => {
                    self.advance();
                    self.add_tid(&mut tid, TypeId::B_BITINT, span)?;
                    self.expect(&TokenType::LParen, "\"(\"")?;
                    let width = match self.peek().kind.clone() {
                        TokenType::Number(n) => {
                            self.advance();
                            n
                        }
                        _ => return Err(self.syntax_error("bit-precise width")),
                    };
                    self.expect(&TokenType::RParen, "\")\"")?;
                    base = BaseSpec::Builtin { width: Some(width) };
                }
                TokenType::Typeof => {
                    // typeof(T) contributes T's specifiers directly.
                    self.advance();
                    self.expect(&TokenType::LParen, "\"(\"")?;
                    let inner = self.decl_specifiers()?;
                    self.expect(&TokenType::RParen, "\")\"")?;
                    self.add_tid(&mut tid, inner.tid, span)?;
                    base = inner.base;
                }
                TokenType::AlignAs => {
                    self.advance();
                    self.expect(&TokenType::LParen, "\"(\"")?;
                    let bytes = match self.peek().kind.clone() {
                        TokenType::Number(n) => {
                            self.advance();
                            n as u32
                        }
                        _ => return Err(self.syntax_error("alignment in bytes")),
                    };
                    self.expect(&TokenType::RParen, "\")\"")?;
                    align = Alignment::Bytes(bytes);
                }
                TokenType::LBracket if self.peek_at(1).kind == TokenType::LBracket => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek().kind.clone() {
                            TokenType::TypeSpec(bits) => {
                                let s = self.peek().span;
                                self.advance();
                                self.add_tid(&mut tid, bits, s)?;
                            }
                            TokenType::Comma => {
                                self.advance();
                            }
                            TokenType::RBracket => break,
                            TokenType::Identifier(name) => {
                                let s = self.peek().span;
                                return Err(self.unknown_name(
                                    &name,
                                    s,
                                    DymKind::KW_ATTRIBUTES,
                                ));
                            }
                            _ => return Err(self.syntax_error("attribute")),
                        }
                    }
                    self.expect(&TokenType::RBracket, "\"]\"")?;
                    self.expect(&TokenType::RBracket, "\"]\"")?;
                }
                TokenType::Identifier(name) => {
                    if matches!(base, BaseSpec::None) && tid.base().is_empty() {
                        // Not a known type and nothing else names one.
                        if implicit_int_ok(self.lang) && !tid.is_empty() {
                            break;
                        }
                        return Err(self.unknown_name(
                            &name,
                            span,
                            DymKind::KW_BASE
                                | DymKind::KW_STORAGE
                                | DymKind::KW_QUALIFIERS
                                | DymKind::TYPEDEFS,
                        ));
                    }
                    break;
                }
                _ => break,
            }
        }
        if matches!(base, BaseSpec::None) && tid.base().is_empty() {
            if implicit_int_ok(self.lang) && !tid.is_empty() {
                // K&R / C89 implicit int.
                tid |= TypeId::B_INT;
            } else {
                return Err(crate::error::CdeclError::semantic(
                    "declaration has no base type",
                    start,
                ));
            }
        }
        if matches!(base, BaseSpec::None) {
            base = BaseSpec::Builtin { width: None };
        }
        Ok(DeclSpecs { tid, base, align, span: start })
    }

    /// Allocate a fresh type node from parsed specifiers.
    pub(super) fn materialize(&mut self, specs: &DeclSpecs) -> AstId {
        let id = match &specs.base {
            BaseSpec::None | BaseSpec::Builtin { .. } => {
                let width = match &specs.base {
                    BaseSpec::Builtin { width } => *width,
                    _ => None,
                };
                self.arena.alloc(AstKind::Builtin { bit_width: width }, self.depth, specs.span)
            }
            BaseSpec::Typedef(def) => self.arena.alloc(
                AstKind::TypedefRef { def: Rc::clone(def), bit_width: None },
                self.depth,
                specs.span,
            ),
            BaseSpec::Enum { sname, of_tid } => {
                let of = of_tid.map(|fixed| {
                    let of = self
                        .arena
                        .alloc(AstKind::Builtin { bit_width: None }, self.depth, specs.span);
                    self.arena.node_mut(of).tid = fixed;
                    of
                });
                let e = self.arena.alloc(
                    AstKind::Enum { of, bit_width: None },
                    self.depth,
                    specs.span,
                );
                if let Some(of) = of {
                    self.arena.set_parent(of, e);
                }
                self.arena.node_mut(e).sname = sname.clone();
                e
            }
            BaseSpec::Csu { sname } => {
                let c = self.arena.alloc(AstKind::ClassStructUnion, self.depth, specs.span);
                self.arena.node_mut(c).sname = sname.clone();
                c
            }
        };
        self.arena.node_mut(id).tid = specs.tid;
        self.arena.node_mut(id).align = specs.align.clone();
        id
    }

    fn qualifier_bits(&mut self) -> TypeId {
        let mut quals = TypeId::empty();
        while let TokenType::TypeSpec(bits) = self.peek().kind.clone() {
            if !bits.intersects(TypeId::PART_QUAL) {
                break;
            }
            self.advance();
            quals |= bits;
        }
        quals
    }

    /// One declarator: pointer layers, then the direct declarator.
    pub(super) fn declarator(&mut self) -> Result<AstId> {
        let span = self.peek().span;
        match self.peek().kind.clone() {
            TokenType::Star => {
                self.advance();
                let quals = self.qualifier_bits();
                let ptr = self.referrer_node(
                    |to| AstKind::Pointer { to },
                    quals,
                    span,
                );
                let inner = self.declarator()?;
                Ok(compose::add_pointer(&mut self.arena, inner, ptr))
            }
            TokenType::Amp => {
                self.advance();
                let r = self.referrer_node(|to| AstKind::Reference { to }, TypeId::empty(), span);
                let inner = self.declarator()?;
                Ok(compose::add_pointer(&mut self.arena, inner, r))
            }
            TokenType::AmpAmp => {
                self.advance();
                let r = self.referrer_node(
                    |to| AstKind::RvalueReference { to },
                    TypeId::empty(),
                    span,
                );
                let inner = self.declarator()?;
                Ok(compose::add_pointer(&mut self.arena, inner, r))
            }
            TokenType::Identifier(_) if self.member_pointer_ahead() => {
                let class_sname = self.member_pointer_class()?;
                let quals = self.qualifier_bits();
                let hole = self.arena.alloc(AstKind::Placeholder, self.depth, span);
                let ptm = self.arena.alloc(
                    AstKind::PointerToMember { class_sname, of: hole },
                    self.depth,
                    span,
                );
                self.arena.set_parent(hole, ptm);
                self.arena.node_mut(ptm).tid = quals;
                let inner = self.declarator()?;
                Ok(compose::add_pointer(&mut self.arena, inner, ptm))
            }
            _ => self.direct_declarator(),
        }
    }

    fn referrer_node(
        &mut self,
        make: impl FnOnce(AstId) -> AstKind,
        quals: TypeId,
        span: Span,
    ) -> AstId {
        let hole = self.arena.alloc(AstKind::Placeholder, self.depth, span);
        let node = self.arena.alloc(make(hole), self.depth, span);
        self.arena.set_parent(hole, node);
        self.arena.node_mut(node).tid = quals;
        node
    }

    /// `C::` chains ending in `*` introduce a pointer-to-member declarator.
    fn member_pointer_ahead(&self) -> bool {
        let mut k = 0;
        loop {
            let a = &self.peek_at(k).kind;
            let b = &self.peek_at(k + 1).kind;
            if matches!(a, TokenType::Identifier(_)) && *b == TokenType::ColonColon {
                k += 2;
                continue;
            }
            break;
        }
        k > 0 && self.peek_at(k).kind == TokenType::Star
    }

    fn member_pointer_class(&mut self) -> Result<ScopedName> {
        let mut sname = ScopedName::new();
        loop {
            match self.peek().kind.clone() {
                TokenType::Identifier(name)
                    if self.peek_at(1).kind == TokenType::ColonColon =>
                {
                    self.advance();
                    self.advance();
                    sname.append(name, TypeId::empty());
                }
                TokenType::Star => {
                    self.advance();
                    return Ok(sname);
                }
                _ => return Err(self.syntax_error("\"::*\"")),
            }
        }
    }

    fn grouping_paren_ahead(&self) -> bool {
        matches!(
            self.peek_at(1).kind,
            TokenType::Star
                | TokenType::Amp
                | TokenType::AmpAmp
                | TokenType::LParen
                | TokenType::Identifier(_)
                | TokenType::ColonColon
                | TokenType::Caret
        )
    }

    fn direct_declarator(&mut self) -> Result<AstId> {
        let span = self.peek().span;
        let mut core = match self.peek().kind.clone() {
            TokenType::LParen if self.grouping_paren_ahead() => {
                self.advance();
                self.depth += 1;
                let inner = if self.eat(&TokenType::Caret) {
                    // Apple block: (^declarator)
                    let quals = self.qualifier_bits();
                    let hole = self.arena.alloc(AstKind::Placeholder, self.depth, span);
                    let block = self.arena.alloc(
                        AstKind::AppleBlock { ret: hole, params: vec![] },
                        self.depth,
                        span,
                    );
                    self.arena.set_parent(hole, block);
                    self.arena.node_mut(block).tid = quals;
                    let inner = self.declarator()?;
                    compose::add_func(&mut self.arena, inner, block)
                } else {
                    self.declarator()?
                };
                self.expect(&TokenType::RParen, "\")\"")?;
                self.depth -= 1;
                inner
            }
            TokenType::Identifier(_) => {
                let sname = self.scoped_name()?;
                let p = self.arena.alloc(AstKind::Placeholder, self.depth, span);
                self.arena.node_mut(p).sname = sname;
                p
            }
            _ => self.arena.alloc(AstKind::Placeholder, self.depth, span),
        };

        loop {
            let span = self.peek().span;
            match self.peek().kind.clone() {
                TokenType::LBracket => {
                    if self.peek_at(1).kind == TokenType::LBracket {
                        break;
                    }
                    self.advance();
                    let size = match self.peek().kind.clone() {
                        TokenType::Number(n) => {
                            self.advance();
                            ArrayKind::Fixed(ArraySize::Int(n))
                        }
                        TokenType::Star => {
                            self.advance();
                            ArrayKind::Fixed(ArraySize::Vla)
                        }
                        TokenType::Identifier(name) => {
                            self.advance();
                            ArrayKind::NamedVla(name)
                        }
                        _ => ArrayKind::Fixed(ArraySize::None),
                    };
                    self.expect(&TokenType::RBracket, "\"]\"")?;
                    let hole = self.arena.alloc(AstKind::Placeholder, self.depth, span);
                    let array = self
                        .arena
                        .alloc(AstKind::Array { of: hole, size }, self.depth, span);
                    self.arena.set_parent(hole, array);
                    core = compose::add_array(&mut self.arena, core, array);
                }
                TokenType::LParen => {
                    self.advance();
                    let params = self.param_list()?;
                    self.expect(&TokenType::RParen, "\")\"")?;
                    let trailing = self.function_trailer()?;
                    // A parameter list following `(^b)` belongs to the block.
                    if let Some(block) = self.pending_block(core) {
                        if let AstKind::AppleBlock { params: block_params, .. } =
                            &mut self.arena.node_mut(block).kind
                        {
                            *block_params = params.clone();
                        }
                        let t = self.arena.node(block).tid;
                        self.arena.node_mut(block).tid = t | trailing;
                        self.arena.set_param_of(&params, block);
                        continue;
                    }
                    let hole = self.arena.alloc(AstKind::Placeholder, self.depth, span);
                    let func = self.arena.alloc(
                        AstKind::Function {
                            ret: hole,
                            params: params.clone(),
                            member: FnMember::Unspecified,
                        },
                        self.depth,
                        span,
                    );
                    self.arena.set_parent(hole, func);
                    self.arena.node_mut(func).tid = trailing;
                    self.arena.set_param_of(&params, func);
                    core = compose::add_func(&mut self.arena, core, func);
                }
                _ => break,
            }
        }
        Ok(core)
    }

    /// An Apple block on the spine whose parameter list has not yet been
    /// attached: the placeholder's parent is the block itself.
    fn pending_block(&self, core: AstId) -> Option<AstId> {
        let hole = compose::find_placeholder(&self.arena, core)?;
        let parent = self.arena.node(hole).parent?;
        match &self.arena.node(parent).kind {
            AstKind::AppleBlock { params, .. } if params.is_empty() => Some(parent),
            _ => None,
        }
    }

    /// Qualifiers and annotations after a function's parameter list:
    /// `const`, `noexcept`, `override`, `= 0`, `= default`, `= delete`.
    fn function_trailer(&mut self) -> Result<TypeId> {
        let mut tid = TypeId::empty();
        loop {
            let span = self.peek().span;
            match self.peek().kind.clone() {
                TokenType::TypeSpec(bits)
                    if bits.intersects(TypeId::PART_QUAL | TypeId::PART_STORE) =>
                {
                    self.advance();
                    self.add_tid(&mut tid, bits, span)?;
                }
                TokenType::Equals => {
                    self.advance();
                    match self.peek().kind.clone() {
                        TokenType::Number(0) => {
                            self.advance();
                            self.add_tid(&mut tid, TypeId::S_PURE, span)?;
                        }
                        TokenType::TypeSpec(bits)
                            if bits.intersects(TypeId::S_DEFAULT | TypeId::S_DELETE) =>
                        {
                            self.advance();
                            self.add_tid(&mut tid, bits, span)?;
                        }
                        _ => return Err(self.syntax_error("\"0\", \"default\", or \"delete\"")),
                    }
                }
                _ => return Ok(tid),
            }
        }
    }

    fn param_list(&mut self) -> Result<Vec<AstId>> {
        let mut params: Vec<AstId> = Vec::new();
        if self.check(&TokenType::RParen) {
            return Ok(params);
        }
        loop {
            let span = self.peek().span;
            match self.peek().kind.clone() {
                TokenType::Ellipsis => {
                    self.advance();
                    params.push(self.arena.alloc(AstKind::Variadic, self.depth, span));
                }
                TokenType::Identifier(name)
                    if !matches!(
                        self.peek_at(1).kind,
                        TokenType::ColonColon | TokenType::Star
                    ) =>
                {
                    // K&R typeless parameter name.
                    self.advance();
                    let p = self.arena.alloc(AstKind::Name, self.depth, span);
                    self.arena.node_mut(p).sname = ScopedName::from_name(name);
                    params.push(p);
                }
                _ => {
                    let specs = self.decl_specifiers()?;
                    let decl = self.declarator()?;
                    let ty = self.materialize(&specs);
                    let root = compose::patch_placeholder(&mut self.arena, ty, decl);
                    params.push(root);
                }
            }
            if !self.eat(&TokenType::Comma) {
                break;
            }
        }
        // f(void) declares no parameters at all.
        if params.len() == 1 {
            let node = self.arena.node(params[0]);
            if matches!(node.kind, AstKind::Builtin { .. })
                && node.tid.base() == TypeId::B_VOID
                && node.sname.is_empty()
            {
                params.clear();
            }
        }
        Ok(params)
    }
}

use crate::lang::Lang;

fn implicit_int_ok(lang: Lang) -> bool {
    Lang::max(Lang::C_89).contains(lang)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::english;
    use crate::gibberish;
    use crate::lexer::{FindKinds, Lexer};
    use crate::typedef::TypedefTable;

    fn explain(source: &str, lang: Lang, typedefs: &TypedefTable) -> String {
        let tokens = Lexer::new(source, lang)
            .with_find(FindKinds::C_KEYWORDS | FindKinds::TYPEDEFS)
            .typedefs(typedefs)
            .tokenize()
            .unwrap();
        let mut p = Parser::new(tokens, lang, typedefs);
        let roots = p.parse_gibberish_decl().unwrap();
        p.validate(roots[0]).unwrap();
        english::explain(&p.arena, roots[0], lang)
    }

    #[test]
    fn explains_simple_pointer() {
        let t = TypedefTable::new();
        assert_eq!(
            explain("char const *s", Lang::C_11, &t),
            "declare s as pointer to const char"
        );
    }

    #[test]
    fn explains_array_of_pointer_to_function() {
        let t = TypedefTable::new();
        assert_eq!(
            explain("int (*x[3])(char)", Lang::C_11, &t),
            "declare x as array 3 of pointer to function (char) returning int"
        );
    }

    #[test]
    fn explains_nested_parens_with_depth() {
        let t = TypedefTable::new();
        assert_eq!(
            explain("int (*(*x)[3])[5]", Lang::C_11, &t),
            "declare x as pointer to array 3 of pointer to array 5 of int"
        );
    }

    #[test]
    fn storage_hoists_to_the_function() {
        let t = TypedefTable::new();
        let out = explain("static int f(void)", Lang::C_11, &t);
        assert!(out.contains("static function"), "{}", out);
        assert!(!out.contains("returning static"), "{}", out);
    }

    #[test]
    fn multiple_declarators_share_specifiers() {
        let t = TypedefTable::new();
        let tokens = Lexer::new("int x, *p", Lang::C_11)
            .with_find(FindKinds::C_KEYWORDS)
            .tokenize()
            .unwrap();
        let mut parser = Parser::new(tokens, Lang::C_11, &t);
        let roots = parser.parse_gibberish_decl().unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(
            english::explain(&parser.arena, roots[0], Lang::C_11),
            "declare x as int"
        );
        assert_eq!(
            english::explain(&parser.arena, roots[1], Lang::C_11),
            "declare p as pointer to int"
        );
    }

    #[test]
    fn typedef_name_resolves_in_declaration() {
        let t = TypedefTable::with_predefined();
        assert_eq!(
            explain("size_t n", Lang::C_11, &t),
            "declare n as size_t"
        );
    }

    #[test]
    fn knr_parameter_names_parse() {
        let t = TypedefTable::new();
        assert_eq!(
            explain("int f(a, b)", Lang::C_KNR, &t),
            "declare f as function (a, b) returning int"
        );
    }

    #[test]
    fn void_parameter_list_means_no_parameters() {
        let t = TypedefTable::new();
        assert_eq!(
            explain("int f(void)", Lang::C_11, &t),
            "declare f as function returning int"
        );
    }

    #[test]
    fn variadic_parameter_parses() {
        let t = TypedefTable::new();
        assert_eq!(
            explain("int f(char, ...)", Lang::C_11, &t),
            "declare f as function (char, ...) returning int"
        );
    }

    #[test]
    fn unknown_type_gets_suggestions() {
        let t = TypedefTable::new();
        let tokens = Lexer::new("imt x", Lang::C_11)
            .with_find(FindKinds::C_KEYWORDS)
            .tokenize()
            .unwrap();
        let mut p = Parser::new(tokens, Lang::C_11, &t);
        let err = p.parse_gibberish_decl().unwrap_err();
        match err.kind {
            crate::error::ErrorKind::UnknownName { suggestions, .. } => {
                assert!(suggestions.contains(&"int".to_string()), "{:?}", suggestions);
            }
            other => panic!("expected unknown name, got {:?}", other),
        }
    }

    #[test]
    fn cast_parses_and_prints() {
        let t = TypedefTable::new();
        let tokens = Lexer::new("(int*)x", Lang::C_11)
            .with_find(FindKinds::C_KEYWORDS)
            .tokenize()
            .unwrap();
        let mut p = Parser::new(tokens, Lang::C_11, &t);
        let root = p.parse_gibberish_cast().unwrap();
        assert_eq!(
            english::explain(&p.arena, root, Lang::C_11),
            "cast x into pointer to int"
        );
        assert_eq!(gibberish::declare(&p.arena, root, Lang::C_11), "(int *)x");
    }

    #[test]
    fn round_trip_gibberish_to_english_to_gibberish() {
        let t = TypedefTable::new();
        for (input, normalized) in [
            ("int (*f)(char)", "int (*f)(char)"),
            ("const char *s", "const char *s"),
            ("int x[3][5]", "int x[3][5]"),
            ("static int f(void)", "static int f()"),
        ] {
            let tokens = Lexer::new(input, Lang::C_11)
                .with_find(FindKinds::C_KEYWORDS)
                .tokenize()
                .unwrap();
            let mut p = Parser::new(tokens, Lang::C_11, &t);
            let roots = p.parse_gibberish_decl().unwrap();
            assert_eq!(
                gibberish::declare(&p.arena, roots[0], Lang::C_11),
                normalized,
                "for {}",
                input
            );
        }
    }

    #[test]
    fn enum_with_fixed_type_parses() {
        let t = TypedefTable::new();
        let out = explain("enum E : short x", Lang::C_23, &t);
        assert!(out.contains("enumeration E of type short"), "{}", out);
    }

    #[test]
    fn member_pointer_parses_in_cpp() {
        let t = TypedefTable::new();
        let out = explain("int C::*p", Lang::CPP_17, &t);
        assert_eq!(out, "declare p as pointer to member of class C int");
    }

    #[test]
    fn attribute_parses_and_validates() {
        let t = TypedefTable::new();
        let out = explain("[[deprecated]] int x", Lang::C_23, &t);
        assert!(out.contains("deprecated"), "{}", out);
    }
}
