//! The two keyword tables.
//!
//! `C_KEYWORDS` maps C/C++ source keywords to tokens, gated by the language
//! versions that recognize them; a context gate restricts attribute names to
//! attribute position. `CDECL_KEYWORDS` maps the pseudo-English vocabulary:
//! either a direct token or a synonym for language-specific C spellings, with
//! a find-gate for words admitted only while reading English. Each English
//! entry carries autocompletion metadata for a line editor to consume.
//!
//! Tables are sorted once on first use; iteration order is the sorted order,
//! which keeps suggestion output deterministic.

use crate::lang::Lang;
use crate::tid::TypeId;
use crate::token::TokenType;
use std::sync::OnceLock;

/// Grammar context in which a keyword is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KwCtx {
    /// Anywhere a keyword may appear.
    Default,
    /// Only inside `[[...]]` attribute brackets.
    Attribute,
}

pub struct CKeyword {
    pub literal: &'static str,
    pub token: TokenType,
    pub lang: Lang,
    pub ctx: KwCtx,
}

/// Autocompletion policy for a cdecl keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcPolicy {
    /// Complete normally.
    Default,
    /// Complete only when listed in the previous keyword's `next` set.
    InNextOnly,
    /// After this keyword, complete nothing but its `next` set.
    NoOther,
    /// Completion is handled by another literal (a fuller spelling).
    DeferTo(&'static str),
    /// Too short to be worth completing.
    TooShort,
}

/// A language-gated mapping from an English word to a C token.
pub struct Synonym {
    pub lang: Lang,
    pub token: TokenType,
}

pub enum CdeclKeywordKind {
    /// The word is a token of the English grammar itself.
    Token(TokenType),
    /// The word stands for a language-specific C/C++ spelling; the first
    /// entry whose gate admits the active language wins.
    Synonyms(&'static [Synonym]),
}

pub struct CdeclKeyword {
    pub literal: &'static str,
    pub kind: CdeclKeywordKind,
    pub lang: Lang,
    /// Admitted only while reading English (`declare`, `cast ... into`);
    /// when false the word is also recognized while reading gibberish.
    pub english_only: bool,
    pub ac: AcPolicy,
    pub ac_next: &'static [&'static str],
}

macro_rules! ts {
    ($bit:ident) => {
        TokenType::TypeSpec(TypeId::$bit)
    };
}

// Gate shorthands usable in const context.
const C_MIN_95: Lang = Lang::C_95
    .union(Lang::C_99)
    .union(Lang::C_11)
    .union(Lang::C_17)
    .union(Lang::C_23);
const C_MIN_99: Lang = Lang::C_99.union(Lang::C_11).union(Lang::C_17).union(Lang::C_23);
const C_MIN_11: Lang = Lang::C_11.union(Lang::C_17).union(Lang::C_23);
const C_MAX_17: Lang = Lang::C_KNR
    .union(Lang::C_89)
    .union(Lang::C_95)
    .union(Lang::C_99)
    .union(Lang::C_11)
    .union(Lang::C_17);
const CPP_MIN_11: Lang = Lang::CPP_11
    .union(Lang::CPP_14)
    .union(Lang::CPP_17)
    .union(Lang::CPP_20)
    .union(Lang::CPP_23);
const CPP_MIN_20: Lang = Lang::CPP_20.union(Lang::CPP_23);

pub static C_KEYWORDS: &[CKeyword] = &[
    CKeyword { literal: "_Accum", token: ts!(B_ACCUM), lang: Lang::C_EMC, ctx: KwCtx::Default },
    CKeyword { literal: "_Alignas", token: TokenType::AlignAs, lang: C_MIN_11, ctx: KwCtx::Default },
    CKeyword { literal: "_Atomic", token: ts!(Q_ATOMIC), lang: C_MIN_11, ctx: KwCtx::Default },
    CKeyword { literal: "_BitInt", token: TokenType::BitInt, lang: Lang::C_23, ctx: KwCtx::Default },
    CKeyword { literal: "_Bool", token: ts!(B_BOOL), lang: C_MIN_99, ctx: KwCtx::Default },
    CKeyword { literal: "_Complex", token: ts!(B_COMPLEX), lang: C_MIN_99, ctx: KwCtx::Default },
    CKeyword { literal: "_Fract", token: ts!(B_FRACT), lang: Lang::C_EMC, ctx: KwCtx::Default },
    CKeyword { literal: "_Imaginary", token: ts!(B_IMAGINARY), lang: C_MIN_99, ctx: KwCtx::Default },
    CKeyword { literal: "_Noreturn", token: ts!(A_NORETURN), lang: C_MIN_11, ctx: KwCtx::Default },
    CKeyword { literal: "_Sat", token: ts!(B_SAT), lang: Lang::C_EMC, ctx: KwCtx::Default },
    CKeyword { literal: "_Thread_local", token: ts!(S_THREAD_LOCAL), lang: C_MIN_11, ctx: KwCtx::Default },
    CKeyword { literal: "__block", token: ts!(S_BLOCK), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "alignas", token: TokenType::AlignAs, lang: Lang::CPP_ANY.union(Lang::C_23), ctx: KwCtx::Default },
    CKeyword { literal: "auto", token: ts!(S_AUTO), lang: C_MAX_17.union(Lang::CPP_98).union(Lang::CPP_03), ctx: KwCtx::Default },
    CKeyword { literal: "auto", token: ts!(B_AUTO), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "bool", token: ts!(B_BOOL), lang: C_MIN_99.union(Lang::CPP_ANY), ctx: KwCtx::Default },
    CKeyword { literal: "carries_dependency", token: ts!(A_CARRIES_DEPENDENCY), lang: Lang::CPP_ANY, ctx: KwCtx::Attribute },
    CKeyword { literal: "char", token: ts!(B_CHAR), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "char16_t", token: ts!(B_CHAR16), lang: C_MIN_11.union(CPP_MIN_11), ctx: KwCtx::Default },
    CKeyword { literal: "char32_t", token: ts!(B_CHAR32), lang: C_MIN_11.union(CPP_MIN_11), ctx: KwCtx::Default },
    CKeyword { literal: "char8_t", token: ts!(B_CHAR8), lang: Lang::C_23.union(CPP_MIN_20), ctx: KwCtx::Default },
    CKeyword { literal: "class", token: TokenType::Class, lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "const", token: ts!(Q_CONST), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "consteval", token: ts!(S_CONSTEVAL), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "constexpr", token: ts!(S_CONSTEXPR), lang: Lang::CPP_ANY.union(Lang::C_23), ctx: KwCtx::Default },
    CKeyword { literal: "constinit", token: ts!(S_CONSTINIT), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "default", token: ts!(S_DEFAULT), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "delete", token: ts!(S_DELETE), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "deprecated", token: ts!(A_DEPRECATED), lang: Lang::CPP_ANY.union(Lang::C_23), ctx: KwCtx::Attribute },
    CKeyword { literal: "double", token: ts!(B_DOUBLE), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "enum", token: TokenType::Enum, lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "explicit", token: ts!(S_EXPLICIT), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "export", token: ts!(S_EXPORT), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "extern", token: ts!(S_EXTERN), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "final", token: ts!(S_FINAL), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "float", token: ts!(B_FLOAT), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "friend", token: ts!(S_FRIEND), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "inline", token: ts!(S_INLINE), lang: C_MIN_99.union(Lang::CPP_ANY), ctx: KwCtx::Default },
    CKeyword { literal: "int", token: ts!(B_INT), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "long", token: ts!(B_LONG), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "maybe_unused", token: ts!(A_MAYBE_UNUSED), lang: Lang::CPP_ANY.union(Lang::C_23), ctx: KwCtx::Attribute },
    CKeyword { literal: "mutable", token: ts!(S_MUTABLE), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "namespace", token: TokenType::Namespace, lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "nodiscard", token: ts!(A_NODISCARD), lang: Lang::CPP_ANY.union(Lang::C_23), ctx: KwCtx::Attribute },
    CKeyword { literal: "noexcept", token: ts!(S_NOEXCEPT), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "noreturn", token: ts!(A_NORETURN), lang: Lang::CPP_ANY.union(Lang::C_23), ctx: KwCtx::Attribute },
    CKeyword { literal: "no_unique_address", token: ts!(A_NO_UNIQUE_ADDRESS), lang: Lang::CPP_ANY, ctx: KwCtx::Attribute },
    CKeyword { literal: "operator", token: TokenType::Operator, lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "override", token: ts!(S_OVERRIDE), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "register", token: ts!(S_REGISTER), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "reproducible", token: ts!(A_REPRODUCIBLE), lang: Lang::C_23, ctx: KwCtx::Attribute },
    CKeyword { literal: "restrict", token: ts!(Q_RESTRICT), lang: C_MIN_99, ctx: KwCtx::Default },
    CKeyword { literal: "short", token: ts!(B_SHORT), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "signed", token: ts!(B_SIGNED), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "static", token: ts!(S_STATIC), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "struct", token: TokenType::Struct, lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "thread_local", token: ts!(S_THREAD_LOCAL), lang: Lang::CPP_ANY.union(Lang::C_23), ctx: KwCtx::Default },
    CKeyword { literal: "typedef", token: TokenType::Typedef, lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "typeof", token: TokenType::Typeof, lang: Lang::C_23, ctx: KwCtx::Default },
    CKeyword { literal: "union", token: TokenType::Union, lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "unsequenced", token: ts!(A_UNSEQUENCED), lang: Lang::C_23, ctx: KwCtx::Attribute },
    CKeyword { literal: "unsigned", token: ts!(B_UNSIGNED), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "virtual", token: ts!(S_VIRTUAL), lang: Lang::CPP_ANY, ctx: KwCtx::Default },
    CKeyword { literal: "void", token: ts!(B_VOID), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "volatile", token: ts!(Q_VOLATILE), lang: Lang::ANY, ctx: KwCtx::Default },
    CKeyword { literal: "wchar_t", token: ts!(B_WCHAR), lang: C_MIN_95.union(Lang::CPP_ANY), ctx: KwCtx::Default },
];

static NEXT_OF: &[&str] = &["of"];
static NEXT_TO: &[&str] = &["to"];
static NEXT_AS: &[&str] = &["as"];
static NEXT_NONE: &[&str] = &[];
static NEXT_REFERENCE: &[&str] = &["reference"];
static NEXT_RETURNING: &[&str] = &["returning"];
static NEXT_MEMBER: &[&str] = &["to", "member"];
static NEXT_INTO: &[&str] = &["into"];

pub static CDECL_KEYWORDS: &[CdeclKeyword] = &[
    CdeclKeyword { literal: "array", kind: CdeclKeywordKind::Token(TokenType::Array), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_OF },
    CdeclKeyword { literal: "as", kind: CdeclKeywordKind::Token(TokenType::As), lang: Lang::ANY, english_only: true, ac: AcPolicy::TooShort, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "atomic", kind: CdeclKeywordKind::Synonyms(&[Synonym { lang: Lang::ANY, token: TokenType::TypeSpec(TypeId::Q_ATOMIC) }]), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "automatic", kind: CdeclKeywordKind::Synonyms(&[Synonym { lang: Lang::ANY, token: TokenType::TypeSpec(TypeId::S_AUTO) }]), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "binding", kind: CdeclKeywordKind::Token(TokenType::StructuredBinding), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::InNextOnly, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "bit-precise", kind: CdeclKeywordKind::Token(TokenType::BitInt), lang: Lang::C_23, english_only: true, ac: AcPolicy::Default, ac_next: &["integer"] },
    CdeclKeyword { literal: "bits", kind: CdeclKeywordKind::Token(TokenType::Bits), lang: Lang::ANY, english_only: true, ac: AcPolicy::InNextOnly, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "block", kind: CdeclKeywordKind::Token(TokenType::Block), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_RETURNING },
    CdeclKeyword { literal: "boolean", kind: CdeclKeywordKind::Synonyms(&[Synonym { lang: Lang::ANY, token: TokenType::TypeSpec(TypeId::B_BOOL) }]), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "capturing", kind: CdeclKeywordKind::Token(TokenType::Capturing), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "cast", kind: CdeclKeywordKind::Token(TokenType::Cast), lang: Lang::ANY, english_only: false, ac: AcPolicy::Default, ac_next: NEXT_INTO },
    CdeclKeyword { literal: "character", kind: CdeclKeywordKind::Synonyms(&[Synonym { lang: Lang::ANY, token: TokenType::TypeSpec(TypeId::B_CHAR) }]), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "constant", kind: CdeclKeywordKind::Synonyms(&[Synonym { lang: Lang::ANY, token: TokenType::TypeSpec(TypeId::Q_CONST) }]), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "constructor", kind: CdeclKeywordKind::Token(TokenType::Constructor), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "conversion", kind: CdeclKeywordKind::Token(TokenType::Conversion), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "ctor", kind: CdeclKeywordKind::Token(TokenType::Constructor), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::DeferTo("constructor"), ac_next: NEXT_NONE },
    CdeclKeyword { literal: "declare", kind: CdeclKeywordKind::Token(TokenType::Declare), lang: Lang::ANY, english_only: false, ac: AcPolicy::Default, ac_next: NEXT_AS },
    CdeclKeyword { literal: "define", kind: CdeclKeywordKind::Token(TokenType::Define), lang: Lang::ANY, english_only: false, ac: AcPolicy::Default, ac_next: NEXT_AS },
    CdeclKeyword { literal: "destructor", kind: CdeclKeywordKind::Token(TokenType::Destructor), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "dtor", kind: CdeclKeywordKind::Token(TokenType::Destructor), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::DeferTo("destructor"), ac_next: NEXT_NONE },
    CdeclKeyword { literal: "enumeration", kind: CdeclKeywordKind::Token(TokenType::Enum), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "exit", kind: CdeclKeywordKind::Token(TokenType::Quit), lang: Lang::ANY, english_only: false, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "expand", kind: CdeclKeywordKind::Token(TokenType::Expand), lang: Lang::ANY, english_only: false, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "explain", kind: CdeclKeywordKind::Token(TokenType::Explain), lang: Lang::ANY, english_only: false, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "func", kind: CdeclKeywordKind::Token(TokenType::Function), lang: Lang::ANY, english_only: true, ac: AcPolicy::DeferTo("function"), ac_next: NEXT_NONE },
    CdeclKeyword { literal: "function", kind: CdeclKeywordKind::Token(TokenType::Function), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_RETURNING },
    CdeclKeyword { literal: "help", kind: CdeclKeywordKind::Token(TokenType::Help), lang: Lang::ANY, english_only: false, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "integer", kind: CdeclKeywordKind::Synonyms(&[Synonym { lang: Lang::ANY, token: TokenType::TypeSpec(TypeId::B_INT) }]), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "into", kind: CdeclKeywordKind::Token(TokenType::Into), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "lambda", kind: CdeclKeywordKind::Token(TokenType::Lambda), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_RETURNING },
    CdeclKeyword { literal: "literal", kind: CdeclKeywordKind::Token(TokenType::Literal), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::InNextOnly, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "member", kind: CdeclKeywordKind::Token(TokenType::Member), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_OF },
    CdeclKeyword { literal: "no-discard", kind: CdeclKeywordKind::Synonyms(&[Synonym { lang: Lang::ANY, token: TokenType::TypeSpec(TypeId::A_NODISCARD) }]), lang: Lang::CPP_ANY.union(Lang::C_23), english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "non-returning", kind: CdeclKeywordKind::Synonyms(&[Synonym { lang: Lang::ANY, token: TokenType::TypeSpec(TypeId::A_NORETURN) }]), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "of", kind: CdeclKeywordKind::Token(TokenType::Of), lang: Lang::ANY, english_only: true, ac: AcPolicy::TooShort, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "pointer", kind: CdeclKeywordKind::Token(TokenType::Pointer), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_MEMBER },
    CdeclKeyword { literal: "predefined", kind: CdeclKeywordKind::Token(TokenType::All), lang: Lang::ANY, english_only: true, ac: AcPolicy::InNextOnly, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "ptr", kind: CdeclKeywordKind::Token(TokenType::Pointer), lang: Lang::ANY, english_only: true, ac: AcPolicy::DeferTo("pointer"), ac_next: NEXT_NONE },
    CdeclKeyword { literal: "quit", kind: CdeclKeywordKind::Token(TokenType::Quit), lang: Lang::ANY, english_only: false, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "ref", kind: CdeclKeywordKind::Token(TokenType::Reference), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::DeferTo("reference"), ac_next: NEXT_NONE },
    CdeclKeyword { literal: "reference", kind: CdeclKeywordKind::Token(TokenType::Reference), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_TO },
    CdeclKeyword { literal: "ret", kind: CdeclKeywordKind::Token(TokenType::Returning), lang: Lang::ANY, english_only: true, ac: AcPolicy::DeferTo("returning"), ac_next: NEXT_NONE },
    CdeclKeyword { literal: "returning", kind: CdeclKeywordKind::Token(TokenType::Returning), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "rvalue", kind: CdeclKeywordKind::Token(TokenType::Rvalue), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::NoOther, ac_next: NEXT_REFERENCE },
    CdeclKeyword { literal: "set", kind: CdeclKeywordKind::Token(TokenType::Set), lang: Lang::ANY, english_only: false, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "show", kind: CdeclKeywordKind::Token(TokenType::Show), lang: Lang::ANY, english_only: false, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "structure", kind: CdeclKeywordKind::Token(TokenType::Struct), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "structured", kind: CdeclKeywordKind::Token(TokenType::StructuredBinding), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::NoOther, ac_next: &["binding"] },
    CdeclKeyword { literal: "to", kind: CdeclKeywordKind::Token(TokenType::To), lang: Lang::ANY, english_only: true, ac: AcPolicy::TooShort, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "type", kind: CdeclKeywordKind::Token(TokenType::Typedef), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "user-defined", kind: CdeclKeywordKind::Token(TokenType::UserDefined), lang: Lang::CPP_ANY, english_only: true, ac: AcPolicy::NoOther, ac_next: &["conversion", "literal"] },
    CdeclKeyword { literal: "varargs", kind: CdeclKeywordKind::Token(TokenType::Variadic), lang: Lang::ANY, english_only: true, ac: AcPolicy::DeferTo("variadic"), ac_next: NEXT_NONE },
    CdeclKeyword { literal: "variadic", kind: CdeclKeywordKind::Token(TokenType::Variadic), lang: Lang::ANY, english_only: true, ac: AcPolicy::Default, ac_next: NEXT_NONE },
    CdeclKeyword { literal: "vector", kind: CdeclKeywordKind::Token(TokenType::Array), lang: Lang::ANY, english_only: true, ac: AcPolicy::DeferTo("array"), ac_next: NEXT_NONE },
    CdeclKeyword { literal: "width", kind: CdeclKeywordKind::Token(TokenType::Width), lang: Lang::ANY, english_only: true, ac: AcPolicy::InNextOnly, ac_next: &["bits"] },
];

fn c_sorted() -> &'static Vec<usize> {
    static SORTED: OnceLock<Vec<usize>> = OnceLock::new();
    SORTED.get_or_init(|| {
        let mut idx: Vec<usize> = (0..C_KEYWORDS.len()).collect();
        idx.sort_by_key(|&i| C_KEYWORDS[i].literal);
        idx
    })
}

fn cdecl_sorted() -> &'static Vec<usize> {
    static SORTED: OnceLock<Vec<usize>> = OnceLock::new();
    SORTED.get_or_init(|| {
        let mut idx: Vec<usize> = (0..CDECL_KEYWORDS.len()).collect();
        idx.sort_by_key(|&i| CDECL_KEYWORDS[i].literal);
        idx
    })
}

/// Find a C/C++ keyword recognized in `lang`. Entries sharing a literal are
/// ordered oldest-gate-first, so the first match is the version-appropriate
/// one.
pub fn c_keyword_find(literal: &str, lang: Lang) -> Option<&'static CKeyword> {
    let sorted = c_sorted();
    let start = sorted.partition_point(|&i| C_KEYWORDS[i].literal < literal);
    sorted[start..]
        .iter()
        .map(|&i| &C_KEYWORDS[i])
        .take_while(|k| k.literal == literal)
        .find(|k| k.lang.contains(lang))
}

/// Find a cdecl (English) keyword. `english` is true while the parser is
/// reading pseudo-English; entries marked `english_only` are hidden
/// otherwise.
pub fn cdecl_keyword_find(
    literal: &str,
    lang: Lang,
    english: bool,
) -> Option<&'static CdeclKeyword> {
    let sorted = cdecl_sorted();
    let start = sorted.partition_point(|&i| CDECL_KEYWORDS[i].literal < literal);
    sorted[start..]
        .iter()
        .map(|&i| &CDECL_KEYWORDS[i])
        .take_while(|k| k.literal == literal)
        .find(|k| k.lang.contains(lang) && (english || !k.english_only))
}

/// Resolve a cdecl keyword to its token for the active language.
pub fn cdecl_keyword_token(kw: &CdeclKeyword, lang: Lang) -> Option<TokenType> {
    match &kw.kind {
        CdeclKeywordKind::Token(t) => Some(t.clone()),
        CdeclKeywordKind::Synonyms(syns) => syns
            .iter()
            .find(|s| s.lang.contains(lang))
            .map(|s| s.token.clone()),
    }
}

/// All C keyword literals legal in `lang`, in sorted order.
pub fn c_keywords(lang: Lang) -> impl Iterator<Item = &'static CKeyword> {
    c_sorted()
        .iter()
        .map(|&i| &C_KEYWORDS[i])
        .filter(move |k| k.lang.contains(lang))
}

/// All cdecl keyword literals admitted in `lang`, in sorted order.
pub fn cdecl_keywords(lang: Lang) -> impl Iterator<Item = &'static CdeclKeyword> {
    cdecl_sorted()
        .iter()
        .map(|&i| &CDECL_KEYWORDS[i])
        .filter(move |k| k.lang.contains(lang))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_resolves_plain_keyword() {
        let kw = c_keyword_find("int", Lang::C_99).unwrap();
        assert_eq!(kw.token, TokenType::TypeSpec(TypeId::B_INT));
    }

    #[test]
    fn find_respects_language_gate() {
        assert!(c_keyword_find("class", Lang::CPP_17).is_some());
        assert!(c_keyword_find("class", Lang::C_17).is_none());
        assert!(c_keyword_find("_Bool", Lang::C_89).is_none());
        assert!(c_keyword_find("_Bool", Lang::C_99).is_some());
    }

    #[test]
    fn auto_is_storage_before_cpp11_and_type_after() {
        let old = c_keyword_find("auto", Lang::CPP_03).unwrap();
        assert_eq!(old.token, TokenType::TypeSpec(TypeId::S_AUTO));
        let new = c_keyword_find("auto", Lang::CPP_11).unwrap();
        assert_eq!(new.token, TokenType::TypeSpec(TypeId::B_AUTO));
    }

    #[test]
    fn attribute_keywords_carry_context() {
        let kw = c_keyword_find("nodiscard", Lang::CPP_17).unwrap();
        assert_eq!(kw.ctx, KwCtx::Attribute);
    }

    #[test]
    fn cdecl_find_honors_english_gate() {
        assert!(cdecl_keyword_find("pointer", Lang::C_99, true).is_some());
        assert!(cdecl_keyword_find("pointer", Lang::C_99, false).is_none());
        // Commands are found in either mode.
        assert!(cdecl_keyword_find("explain", Lang::C_99, false).is_some());
    }

    #[test]
    fn synonym_resolves_to_c_token() {
        let kw = cdecl_keyword_find("character", Lang::C_99, true).unwrap();
        assert_eq!(
            cdecl_keyword_token(kw, Lang::C_99),
            Some(TokenType::TypeSpec(TypeId::B_CHAR))
        );
    }

    #[test]
    fn reference_is_cpp_only() {
        assert!(cdecl_keyword_find("reference", Lang::CPP_11, true).is_some());
        assert!(cdecl_keyword_find("reference", Lang::C_11, true).is_none());
    }

    #[test]
    fn iteration_is_sorted() {
        let lits: Vec<&str> = c_keywords(Lang::CPP_23).map(|k| k.literal).collect();
        let mut sorted = lits.clone();
        sorted.sort();
        assert_eq!(lits, sorted);
    }

    #[test]
    fn autocompletion_metadata_present() {
        let kw = cdecl_keyword_find("pointer", Lang::CPP_11, true).unwrap();
        assert_eq!(kw.ac, AcPolicy::Default);
        assert!(kw.ac_next.contains(&"to"));
        let short = cdecl_keyword_find("ptr", Lang::CPP_11, true).unwrap();
        assert_eq!(short.ac, AcPolicy::DeferTo("pointer"));
    }
}
