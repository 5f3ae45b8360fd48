//! Pseudo-English: `declare x as pointer to function (char) returning int`.
//!
//! English builds the tree top-down: the first phrase word is the root and
//! each `to`/`of`/`returning` step descends one link. Several names may be
//! declared at once; the phrase is re-read from a checkpoint for each, so
//! every declaration gets its own tree.

use super::Parser;
use crate::ast::{
    oper, ArrayKind, ArraySize, AstId, AstKind, CaptureKind, CastKind, FnMember,
};
use crate::error::Result;
use crate::sname::ScopedName;
use crate::suggest::DymKind;
use crate::tid::{self, TypeId};
use crate::token::TokenType;
use std::rc::Rc;

pub enum EnglishCommand {
    Declare(Vec<AstId>),
    Cast(AstId),
    DefineType { name: ScopedName, root: AstId },
}

impl<'t> Parser<'t> {
    pub fn parse_english_command(&mut self) -> Result<EnglishCommand> {
        match self.peek().kind.clone() {
            TokenType::Declare => self.parse_declare().map(EnglishCommand::Declare),
            TokenType::Define => self.parse_define_type(),
            _ => self.parse_cast().map(EnglishCommand::Cast),
        }
    }

    /// `declare name (, name)* as <phrase>`
    pub fn parse_declare(&mut self) -> Result<Vec<AstId>> {
        self.expect(&TokenType::Declare, "\"declare\"")?;
        let names = self.name_list()?;
        self.expect(&TokenType::As, "\"as\"")?;

        if self.check(&TokenType::StructuredBinding) {
            let span = self.peek().span;
            while self.eat(&TokenType::StructuredBinding) {}
            if !self.at_end() {
                return Err(self.syntax_error("end of declaration"));
            }
            let node = self
                .arena
                .alloc(AstKind::StructuredBinding { names }, self.depth, span);
            self.validate(node)?;
            return Ok(vec![node]);
        }

        let checkpoint = self.save();
        let mut roots = Vec::new();
        for name in names {
            self.restore(checkpoint);
            let root = self.english_phrase()?;
            if !self.at_end() {
                return Err(self.syntax_error("end of declaration"));
            }
            self.arena.node_mut(root).sname = name;
            self.validate(root)?;
            roots.push(root);
        }
        Ok(roots)
    }

    /// `define name as <phrase>`: a typedef in English.
    fn parse_define_type(&mut self) -> Result<EnglishCommand> {
        self.expect(&TokenType::Define, "\"define\"")?;
        let name = self.scoped_name()?;
        self.expect(&TokenType::As, "\"as\"")?;
        let root = self.english_phrase()?;
        if !self.at_end() {
            return Err(self.syntax_error("end of definition"));
        }
        self.validate(root)?;
        Ok(EnglishCommand::DefineType { name, root })
    }

    /// `[static|dynamic|reinterpret|const] cast name into <phrase>`
    pub fn parse_cast(&mut self) -> Result<AstId> {
        let kind = match self.peek().kind.clone() {
            TokenType::TypeSpec(bits) if bits == TypeId::S_STATIC => {
                self.advance();
                CastKind::Static
            }
            TokenType::TypeSpec(bits) if bits == TypeId::Q_CONST => {
                self.advance();
                CastKind::Const
            }
            TokenType::Identifier(word) if word == "dynamic" => {
                self.advance();
                CastKind::Dynamic
            }
            TokenType::Identifier(word) if word == "reinterpret" => {
                self.advance();
                CastKind::Reinterpret
            }
            _ => CastKind::C,
        };
        let span = self.peek().span;
        self.expect(&TokenType::Cast, "\"cast\"")?;
        let sname = if matches!(self.peek().kind, TokenType::Identifier(_)) {
            self.scoped_name()?
        } else {
            ScopedName::new()
        };
        self.expect(&TokenType::Into, "\"into\"")?;
        let to = self.english_phrase()?;
        if !self.at_end() {
            return Err(self.syntax_error("end of cast"));
        }
        let cast = self.arena.alloc(AstKind::Cast { kind, to }, self.depth, span);
        self.arena.set_parent(to, cast);
        self.arena.node_mut(cast).sname = sname;
        self.validate(cast)?;
        Ok(cast)
    }

    fn name_list(&mut self) -> Result<Vec<ScopedName>> {
        let mut names = vec![self.scoped_name()?];
        while self.eat(&TokenType::Comma) {
            names.push(self.scoped_name()?);
        }
        Ok(names)
    }

    /// Leading storage, annotation, attribute, and qualifier words. Base
    /// modifiers stay put; they belong to the builtin phrase.
    fn leading_bits(&mut self) -> Result<TypeId> {
        let mut lead = TypeId::empty();
        loop {
            match self.peek().kind.clone() {
                TokenType::TypeSpec(bits) if !bits.intersects(TypeId::PART_BASE) => {
                    let span = self.peek().span;
                    self.advance();
                    tid::add(&mut lead, bits).map_err(|e| {
                        crate::error::CdeclError::semantic(
                            format!(
                                "\"{}\": type is already \"{}\"",
                                tid::bit_name(e.new, self.lang),
                                tid::bit_name(e.existing, self.lang)
                            ),
                            span,
                        )
                    })?;
                }
                _ => return Ok(lead),
            }
        }
    }

    /// One phrase; the returned node carries any leading words as bits.
    pub(super) fn english_phrase(&mut self) -> Result<AstId> {
        let lead = self.leading_bits()?;
        let span = self.peek().span;
        let id = match self.peek().kind.clone() {
            TokenType::Array => {
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
                self.expect(&TokenType::Of, "\"of\"")?;
                let of = self.english_phrase()?;
                let array = self
                    .arena
                    .alloc(AstKind::Array { of, size }, self.depth, span);
                self.arena.set_parent(of, array);
                array
            }
            TokenType::Pointer => {
                self.advance();
                self.expect(&TokenType::To, "\"to\"")?;
                if self.eat(&TokenType::Member) {
                    self.expect(&TokenType::Of, "\"of\"")?;
                    let _ = self.eat(&TokenType::Class) || self.eat(&TokenType::Struct);
                    let class_sname = self.scoped_name()?;
                    let of = self.english_phrase()?;
                    let ptm = self.arena.alloc(
                        AstKind::PointerToMember { class_sname, of },
                        self.depth,
                        span,
                    );
                    self.arena.set_parent(of, ptm);
                    ptm
                } else {
                    let of = self.english_phrase()?;
                    let ptr = self
                        .arena
                        .alloc(AstKind::Pointer { to: of }, self.depth, span);
                    self.arena.set_parent(of, ptr);
                    ptr
                }
            }
            TokenType::Reference => {
                self.advance();
                self.expect(&TokenType::To, "\"to\"")?;
                let of = self.english_phrase()?;
                let r = self
                    .arena
                    .alloc(AstKind::Reference { to: of }, self.depth, span);
                self.arena.set_parent(of, r);
                r
            }
            TokenType::Rvalue => {
                self.advance();
                self.expect(&TokenType::Reference, "\"reference\"")?;
                self.expect(&TokenType::To, "\"to\"")?;
                let of = self.english_phrase()?;
                let r = self.arena.alloc(
                    AstKind::RvalueReference { to: of },
                    self.depth,
                    span,
                );
                self.arena.set_parent(of, r);
                r
            }
            TokenType::Member | TokenType::Function => {
                let member = if self.eat(&TokenType::Member) {
                    self.expect(&TokenType::Function, "\"function\"")?;
                    FnMember::Member
                } else {
                    self.advance();
                    FnMember::Unspecified
                };
                let params = self.english_params()?;
                self.expect(&TokenType::Returning, "\"returning\"")?;
                let ret = self.english_phrase()?;
                let f = self.arena.alloc(
                    AstKind::Function { ret, params: params.clone(), member },
                    self.depth,
                    span,
                );
                self.arena.set_parent(ret, f);
                self.arena.set_param_of(&params, f);
                f
            }
            TokenType::Block => {
                self.advance();
                let params = self.english_params()?;
                self.expect(&TokenType::Returning, "\"returning\"")?;
                let ret = self.english_phrase()?;
                let b = self.arena.alloc(
                    AstKind::AppleBlock { ret, params: params.clone() },
                    self.depth,
                    span,
                );
                self.arena.set_parent(ret, b);
                self.arena.set_param_of(&params, b);
                b
            }
            TokenType::Operator => {
                self.advance();
                let lexeme = self.advance().lexeme;
                let info = oper::operator_find(&lexeme)
                    .ok_or_else(|| self.syntax_error("operator symbol"))?;
                let params = self.english_params()?;
                self.expect(&TokenType::Returning, "\"returning\"")?;
                let ret = self.english_phrase()?;
                let o = self.arena.alloc(
                    AstKind::Operator {
                        op: info.id,
                        ret,
                        params: params.clone(),
                        member: FnMember::Unspecified,
                    },
                    self.depth,
                    span,
                );
                self.arena.set_parent(ret, o);
                self.arena.set_param_of(&params, o);
                o
            }
            TokenType::Constructor => {
                self.advance();
                let params = if self.check(&TokenType::LParen) {
                    self.english_params()?
                } else {
                    vec![]
                };
                let c = self.arena.alloc(
                    AstKind::Constructor { params: params.clone() },
                    self.depth,
                    span,
                );
                self.arena.set_param_of(&params, c);
                c
            }
            TokenType::Destructor => {
                self.advance();
                self.arena.alloc(AstKind::Destructor, self.depth, span)
            }
            TokenType::UserDefined | TokenType::Conversion => {
                if self.eat(&TokenType::UserDefined) {
                    if self.check(&TokenType::Literal) {
                        self.advance();
                        let params = self.english_params()?;
                        self.expect(&TokenType::Returning, "\"returning\"")?;
                        let ret = self.english_phrase()?;
                        let l = self.arena.alloc(
                            AstKind::UdLiteral { ret, params: params.clone() },
                            self.depth,
                            span,
                        );
                        self.arena.set_parent(ret, l);
                        self.arena.set_param_of(&params, l);
                        l
                    } else {
                        self.expect(&TokenType::Conversion, "\"conversion\" or \"literal\"")?;
                        self.ud_conversion(span)?
                    }
                } else {
                    self.advance();
                    self.ud_conversion(span)?
                }
            }
            TokenType::Lambda => {
                self.advance();
                let captures = if self.eat(&TokenType::Capturing) {
                    self.capture_list()?
                } else {
                    vec![]
                };
                let params = if self.check(&TokenType::LParen) {
                    self.english_params()?
                } else {
                    vec![]
                };
                let ret = if self.eat(&TokenType::Returning) {
                    Some(self.english_phrase()?)
                } else {
                    None
                };
                let l = self.arena.alloc(
                    AstKind::Lambda { captures, params: params.clone(), ret: None },
                    self.depth,
                    span,
                );
                if let Some(ret) = ret {
                    self.arena.set_parent(ret, l);
                }
                self.arena.set_param_of(&params, l);
                l
            }
            TokenType::Enum => {
                self.advance();
                let class = self.eat(&TokenType::Class) || self.eat(&TokenType::Struct);
                let sname = self.scoped_name()?;
                let of = if self.eat(&TokenType::Of) {
                    self.expect(&TokenType::Typedef, "\"type\"")?;
                    Some(self.english_phrase()?)
                } else {
                    None
                };
                let e = self
                    .arena
                    .alloc(AstKind::Enum { of: None, bit_width: None }, self.depth, span);
                if let Some(of) = of {
                    self.arena.set_parent(of, e);
                }
                self.arena.node_mut(e).sname = sname;
                self.arena.node_mut(e).tid = if class {
                    TypeId::B_ENUM | TypeId::B_CLASS
                } else {
                    TypeId::B_ENUM
                };
                e
            }
            TokenType::Struct | TokenType::Class | TokenType::Union => {
                let bits = match &self.peek().kind {
                    TokenType::Struct => TypeId::B_STRUCT,
                    TokenType::Class => TypeId::B_CLASS,
                    _ => TypeId::B_UNION,
                };
                self.advance();
                let sname = self.scoped_name()?;
                let c = self.arena.alloc(AstKind::ClassStructUnion, self.depth, span);
                self.arena.node_mut(c).sname = sname;
                self.arena.node_mut(c).tid = bits;
                c
            }
            TokenType::BitInt => {
                self.advance();
                // "bit-precise integer width N bits"
                if let TokenType::TypeSpec(bits) = self.peek().kind.clone() {
                    if bits == TypeId::B_INT {
                        self.advance();
                    }
                }
                self.expect(&TokenType::Width, "\"width\"")?;
                let width = match self.peek().kind.clone() {
                    TokenType::Number(n) => {
                        self.advance();
                        n
                    }
                    _ => return Err(self.syntax_error("width in bits")),
                };
                self.eat(&TokenType::Bits);
                let b = self
                    .arena
                    .alloc(AstKind::Builtin { bit_width: Some(width) }, self.depth, span);
                self.arena.node_mut(b).tid = TypeId::B_BITINT;
                b
            }
            TokenType::TypedefName(name) => {
                self.advance();
                let def = self
                    .typedefs
                    .find_in(&name, self.lang)
                    .cloned()
                    .ok_or_else(|| self.unknown_name(&name, span, DymKind::TYPEDEFS))?;
                self.arena.alloc(
                    AstKind::TypedefRef { def: Rc::clone(&def), bit_width: None },
                    self.depth,
                    span,
                )
            }
            TokenType::TypeSpec(_) => {
                let mut tid = TypeId::empty();
                while let TokenType::TypeSpec(bits) = self.peek().kind.clone() {
                    let s = self.peek().span;
                    self.advance();
                    tid::add(&mut tid, bits).map_err(|e| {
                        crate::error::CdeclError::semantic(
                            format!(
                                "\"{}\": type is already \"{}\"",
                                tid::bit_name(e.new, self.lang),
                                tid::bit_name(e.existing, self.lang)
                            ),
                            s,
                        )
                    })?;
                }
                let width = if self.eat(&TokenType::Width) {
                    let w = match self.peek().kind.clone() {
                        TokenType::Number(n) => {
                            self.advance();
                            n
                        }
                        _ => return Err(self.syntax_error("width in bits")),
                    };
                    self.eat(&TokenType::Bits);
                    Some(w)
                } else {
                    None
                };
                let b = self
                    .arena
                    .alloc(AstKind::Builtin { bit_width: width }, self.depth, span);
                self.arena.node_mut(b).tid = tid;
                b
            }
            TokenType::Identifier(word) => {
                return Err(self.unknown_name(
                    &word,
                    span,
                    DymKind::CDECL_KEYWORDS
                        | DymKind::KW_BASE
                        | DymKind::KW_QUALIFIERS
                        | DymKind::TYPEDEFS,
                ));
            }
            _ => return Err(self.syntax_error("English type phrase")),
        };
        let t = self.arena.node(id).tid;
        self.arena.node_mut(id).tid = t | lead;
        Ok(id)
    }

    fn ud_conversion(&mut self, span: crate::token::Span) -> Result<AstId> {
        self.expect(&TokenType::Returning, "\"returning\"")?;
        let to = self.english_phrase()?;
        let c = self.arena.alloc(
            AstKind::UdConversion { to },
            self.depth,
            span,
        );
        self.arena.set_parent(to, c);
        Ok(c)
    }

    fn english_params(&mut self) -> Result<Vec<AstId>> {
        let mut params = Vec::new();
        if !self.eat(&TokenType::LParen) {
            return Ok(params);
        }
        if self.eat(&TokenType::RParen) {
            return Ok(params);
        }
        loop {
            let span = self.peek().span;
            match self.peek().kind.clone() {
                TokenType::Ellipsis | TokenType::Variadic => {
                    self.advance();
                    params.push(self.arena.alloc(AstKind::Variadic, self.depth, span));
                }
                TokenType::Identifier(name) if self.peek_at(1).kind == TokenType::As => {
                    self.advance();
                    self.advance();
                    let p = self.english_phrase()?;
                    self.arena.node_mut(p).sname = ScopedName::from_name(name);
                    params.push(p);
                }
                TokenType::Identifier(name)
                    if matches!(
                        self.peek_at(1).kind,
                        TokenType::Comma | TokenType::RParen
                    ) =>
                {
                    self.advance();
                    let p = self.arena.alloc(AstKind::Name, self.depth, span);
                    self.arena.node_mut(p).sname = ScopedName::from_name(name);
                    params.push(p);
                }
                _ => params.push(self.english_phrase()?),
            }
            if !self.eat(&TokenType::Comma) {
                break;
            }
        }
        self.expect(&TokenType::RParen, "\")\"")?;
        Ok(params)
    }

    fn capture_list(&mut self) -> Result<Vec<AstId>> {
        self.expect(&TokenType::LBracket, "\"[\"")?;
        let mut captures = Vec::new();
        if self.eat(&TokenType::RBracket) {
            return Ok(captures);
        }
        loop {
            let span = self.peek().span;
            let id = match self.peek().kind.clone() {
                TokenType::Equals => {
                    self.advance();
                    self.arena
                        .alloc(AstKind::Capture { kind: CaptureKind::Copy }, self.depth, span)
                }
                TokenType::Amp => {
                    self.advance();
                    let c = self.arena.alloc(
                        AstKind::Capture { kind: CaptureKind::Reference },
                        self.depth,
                        span,
                    );
                    if let TokenType::Identifier(name) = self.peek().kind.clone() {
                        self.advance();
                        self.arena.node_mut(c).sname = ScopedName::from_name(name);
                    }
                    c
                }
                TokenType::Star => {
                    self.advance();
                    match self.peek().kind.clone() {
                        TokenType::Identifier(word) if word == "this" => {
                            self.advance();
                            self.arena.alloc(
                                AstKind::Capture { kind: CaptureKind::StarThis },
                                self.depth,
                                span,
                            )
                        }
                        _ => return Err(self.syntax_error("\"this\"")),
                    }
                }
                TokenType::Identifier(word) if word == "this" => {
                    self.advance();
                    self.arena
                        .alloc(AstKind::Capture { kind: CaptureKind::This }, self.depth, span)
                }
                TokenType::Identifier(name) => {
                    self.advance();
                    let c = self.arena.alloc(
                        AstKind::Capture { kind: CaptureKind::Copy },
                        self.depth,
                        span,
                    );
                    self.arena.node_mut(c).sname = ScopedName::from_name(name);
                    c
                }
                _ => return Err(self.syntax_error("capture")),
            };
            captures.push(id);
            if !self.eat(&TokenType::Comma) {
                break;
            }
        }
        self.expect(&TokenType::RBracket, "\"]\"")?;
        Ok(captures)
    }
}
