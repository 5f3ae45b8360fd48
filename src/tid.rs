//! Type-id bitset and the cross-type legality tables.
//!
//! One wide bitset holds everything a declaration position can say about a
//! type: base type, modifiers, storage class, storage-adjacent annotations,
//! attributes, and qualifiers. The bitset is partitioned by part masks;
//! validation first gates each set bit on the active language, then scans the
//! illegal-pair table.

use crate::lang::Lang;
use bitflags::bitflags;
use std::sync::OnceLock;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeId: u128 {
        // Base types (bits 0-31).
        const B_VOID        = 1 << 0;
        const B_AUTO        = 1 << 1;
        const B_BOOL        = 1 << 2;
        const B_CHAR        = 1 << 3;
        const B_CHAR8       = 1 << 4;
        const B_CHAR16      = 1 << 5;
        const B_CHAR32      = 1 << 6;
        const B_WCHAR       = 1 << 7;
        const B_SHORT       = 1 << 8;
        const B_INT         = 1 << 9;
        const B_LONG        = 1 << 10;
        const B_LONG_LONG   = 1 << 11;
        const B_SIGNED      = 1 << 12;
        const B_UNSIGNED    = 1 << 13;
        const B_FLOAT       = 1 << 14;
        const B_DOUBLE      = 1 << 15;
        const B_COMPLEX     = 1 << 16;
        const B_IMAGINARY   = 1 << 17;
        const B_ENUM        = 1 << 18;
        const B_STRUCT      = 1 << 19;
        const B_CLASS       = 1 << 20;
        const B_UNION       = 1 << 21;
        const B_NAMESPACE   = 1 << 22;
        const B_SCOPE       = 1 << 23;
        const B_TYPEDEF     = 1 << 24;
        const B_BITINT      = 1 << 25;
        const B_ACCUM       = 1 << 26;
        const B_FRACT       = 1 << 27;
        const B_SAT         = 1 << 28;
        const B_TYPEOF      = 1 << 29;

        // Storage classes and storage-adjacent annotations (bits 40-63).
        const S_AUTO        = 1 << 40;
        const S_BLOCK       = 1 << 41;
        const S_EXTERN      = 1 << 42;
        const S_MUTABLE     = 1 << 43;
        const S_REGISTER    = 1 << 44;
        const S_STATIC      = 1 << 45;
        const S_THREAD_LOCAL = 1 << 46;
        const S_TYPEDEF     = 1 << 47;
        const S_CONSTEVAL   = 1 << 48;
        const S_CONSTEXPR   = 1 << 49;
        const S_CONSTINIT   = 1 << 50;
        const S_DEFAULT     = 1 << 51;
        const S_DELETE      = 1 << 52;
        const S_EXPLICIT    = 1 << 53;
        const S_EXPORT      = 1 << 54;
        const S_FINAL       = 1 << 55;
        const S_FRIEND      = 1 << 56;
        const S_INLINE      = 1 << 57;
        const S_NOEXCEPT    = 1 << 58;
        const S_OVERRIDE    = 1 << 59;
        const S_PURE        = 1 << 60;
        const S_THROW       = 1 << 61;
        const S_VIRTUAL     = 1 << 62;

        // Attributes (bits 72-79).
        const A_CARRIES_DEPENDENCY = 1 << 72;
        const A_DEPRECATED         = 1 << 73;
        const A_MAYBE_UNUSED       = 1 << 74;
        const A_NODISCARD          = 1 << 75;
        const A_NORETURN           = 1 << 76;
        const A_NO_UNIQUE_ADDRESS  = 1 << 77;
        const A_REPRODUCIBLE       = 1 << 78;
        const A_UNSEQUENCED        = 1 << 79;

        // Qualifiers and reference qualifiers (bits 88-95).
        const Q_CONST       = 1 << 88;
        const Q_VOLATILE    = 1 << 89;
        const Q_RESTRICT    = 1 << 90;
        const Q_ATOMIC      = 1 << 91;
        const Q_REF         = 1 << 92;
        const Q_RVALUE_REF  = 1 << 93;
    }
}

impl TypeId {
    pub const PART_BASE: TypeId = TypeId::from_bits_retain(0x0000_0000_ffff_ffff);
    pub const PART_STORE: TypeId = TypeId::from_bits_retain(0xffff_ff00_0000_0000);
    pub const PART_ATTR: TypeId =
        TypeId::from_bits_retain(0x00ff_u128 << 72);
    pub const PART_QUAL: TypeId =
        TypeId::from_bits_retain(0x00ff_u128 << 88);

    /// The `signed unsigned short long` family; these combine with a proper
    /// base type instead of excluding it.
    pub const MODIFIERS: TypeId = TypeId::B_SHORT
        .union(TypeId::B_INT)
        .union(TypeId::B_LONG)
        .union(TypeId::B_LONG_LONG)
        .union(TypeId::B_SIGNED)
        .union(TypeId::B_UNSIGNED);

    pub const FLOATING: TypeId = TypeId::B_FLOAT.union(TypeId::B_DOUBLE);

    /// Record-like base bits whose node carries a tag name.
    pub const ANY_CSU: TypeId = TypeId::B_STRUCT
        .union(TypeId::B_CLASS)
        .union(TypeId::B_UNION);

    pub const ANY_STORAGE_CLASS: TypeId = TypeId::S_AUTO
        .union(TypeId::S_BLOCK)
        .union(TypeId::S_EXTERN)
        .union(TypeId::S_REGISTER)
        .union(TypeId::S_STATIC)
        .union(TypeId::S_THREAD_LOCAL)
        .union(TypeId::S_TYPEDEF);

    pub fn base(self) -> TypeId {
        self & Self::PART_BASE
    }

    pub fn storage(self) -> TypeId {
        self & Self::PART_STORE
    }

    pub fn attrs(self) -> TypeId {
        self & Self::PART_ATTR
    }

    pub fn quals(self) -> TypeId {
        self & Self::PART_QUAL
    }
}

/// A rejected `add`: the new bit (or its promotion) is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddError {
    pub existing: TypeId,
    pub new: TypeId,
}

/// A type illegal in the active language: either one bit is outside its
/// version range, or two bits may not combine there. `ok_langs` feeds
/// `Lang::which` for the diagnostic phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckError {
    pub offending: TypeId,
    pub second: Option<TypeId>,
    pub ok_langs: Lang,
}

/// Add `new` to `dest`, rejecting duplicates. The one permitted overlap is
/// `long` meeting `long` with no floating component, which promotes to
/// `long long`; a third `long` is a duplicate of the promotion.
pub fn add(dest: &mut TypeId, new: TypeId) -> Result<(), AddError> {
    if new == TypeId::B_LONG && dest.contains(TypeId::B_LONG) {
        if dest.intersects(TypeId::FLOATING) {
            return Err(AddError { existing: TypeId::B_LONG, new });
        }
        dest.remove(TypeId::B_LONG);
        *dest |= TypeId::B_LONG_LONG;
        return Ok(());
    }
    if new == TypeId::B_LONG && dest.contains(TypeId::B_LONG_LONG) {
        return Err(AddError { existing: TypeId::B_LONG_LONG, new });
    }
    let overlap = *dest & new;
    if !overlap.is_empty() {
        return Err(AddError { existing: overlap, new });
    }
    *dest |= new;
    Ok(())
}

/// Normalize before structural comparison: `signed` without `char` is
/// redundant, and stripping it from a bare `signed` leaves `int`.
pub fn normalize(tid: TypeId) -> TypeId {
    let mut tid = tid;
    if tid.contains(TypeId::B_SIGNED) && !tid.contains(TypeId::B_CHAR) {
        tid.remove(TypeId::B_SIGNED);
        if tid.base().is_empty() {
            tid |= TypeId::B_INT;
        }
    }
    tid
}

/// Whether the base part spells `size_t`'s underlying type:
/// `unsigned long`, possibly with `int`.
pub fn is_size_t(tid: TypeId) -> bool {
    let base = tid.base();
    base == TypeId::B_UNSIGNED | TypeId::B_LONG
        || base == TypeId::B_UNSIGNED | TypeId::B_LONG | TypeId::B_INT
}

/// Every single bit set in `tid`, in ascending bit order.
pub fn bits_of(tid: TypeId) -> impl Iterator<Item = TypeId> {
    let raw = tid.bits();
    (0..128)
        .map(move |i| raw & (1u128 << i))
        .filter(|&b| b != 0)
        .map(TypeId::from_bits_retain)
}

fn lang_gates() -> &'static Vec<(TypeId, Lang)> {
    static GATES: OnceLock<Vec<(TypeId, Lang)>> = OnceLock::new();
    GATES.get_or_init(|| {
        let c = |l| Lang::c_min(l);
        let cpp = |l| Lang::cpp_min(l);
        vec![
            (TypeId::B_VOID, Lang::min(Lang::C_89)),
            (TypeId::B_AUTO, c(Lang::C_23) | cpp(Lang::CPP_11)),
            (TypeId::B_BOOL, c(Lang::C_99) | Lang::CPP_ANY),
            (TypeId::B_CHAR, Lang::ANY),
            (TypeId::B_CHAR8, c(Lang::C_23) | cpp(Lang::CPP_20)),
            (TypeId::B_CHAR16, c(Lang::C_11) | cpp(Lang::CPP_11)),
            (TypeId::B_CHAR32, c(Lang::C_11) | cpp(Lang::CPP_11)),
            (TypeId::B_WCHAR, c(Lang::C_95) | Lang::CPP_ANY),
            (TypeId::B_SHORT, Lang::ANY),
            (TypeId::B_INT, Lang::ANY),
            (TypeId::B_LONG, Lang::ANY),
            (TypeId::B_LONG_LONG, c(Lang::C_99) | cpp(Lang::CPP_11)),
            (TypeId::B_SIGNED, Lang::min(Lang::C_89)),
            (TypeId::B_UNSIGNED, Lang::ANY),
            (TypeId::B_FLOAT, Lang::ANY),
            (TypeId::B_DOUBLE, Lang::ANY),
            (TypeId::B_COMPLEX, c(Lang::C_99)),
            (TypeId::B_IMAGINARY, c(Lang::C_99)),
            (TypeId::B_ENUM, Lang::min(Lang::C_89)),
            (TypeId::B_STRUCT, Lang::ANY),
            (TypeId::B_CLASS, Lang::CPP_ANY),
            (TypeId::B_UNION, Lang::ANY),
            (TypeId::B_NAMESPACE, Lang::CPP_ANY),
            (TypeId::B_SCOPE, Lang::CPP_ANY),
            (TypeId::B_TYPEDEF, Lang::ANY),
            (TypeId::B_BITINT, c(Lang::C_23)),
            (TypeId::B_ACCUM, Lang::C_EMC),
            (TypeId::B_FRACT, Lang::C_EMC),
            (TypeId::B_SAT, Lang::C_EMC),
            (TypeId::B_TYPEOF, c(Lang::C_23)),
            (TypeId::S_AUTO, Lang::max(Lang::C_17) | Lang::CPP_98 | Lang::CPP_03),
            (TypeId::S_BLOCK, Lang::ANY),
            (TypeId::S_EXTERN, Lang::ANY),
            (TypeId::S_MUTABLE, Lang::CPP_ANY),
            (
                TypeId::S_REGISTER,
                Lang::C_ANY | Lang::range(Lang::CPP_98, Lang::CPP_14),
            ),
            (TypeId::S_STATIC, Lang::ANY),
            (TypeId::S_THREAD_LOCAL, c(Lang::C_11) | cpp(Lang::CPP_11)),
            (TypeId::S_TYPEDEF, Lang::ANY),
            (TypeId::S_CONSTEVAL, cpp(Lang::CPP_20)),
            (TypeId::S_CONSTEXPR, c(Lang::C_23) | cpp(Lang::CPP_11)),
            (TypeId::S_CONSTINIT, cpp(Lang::CPP_20)),
            (TypeId::S_DEFAULT, cpp(Lang::CPP_11)),
            (TypeId::S_DELETE, cpp(Lang::CPP_11)),
            (TypeId::S_EXPLICIT, Lang::CPP_ANY),
            (TypeId::S_EXPORT, Lang::CPP_ANY),
            (TypeId::S_FINAL, cpp(Lang::CPP_11)),
            (TypeId::S_FRIEND, Lang::CPP_ANY),
            (TypeId::S_INLINE, c(Lang::C_99) | Lang::CPP_ANY),
            (TypeId::S_NOEXCEPT, cpp(Lang::CPP_11)),
            (TypeId::S_OVERRIDE, cpp(Lang::CPP_11)),
            (TypeId::S_PURE, Lang::CPP_ANY),
            (TypeId::S_THROW, Lang::CPP_ANY),
            (TypeId::S_VIRTUAL, Lang::CPP_ANY),
            (
                TypeId::A_CARRIES_DEPENDENCY,
                Lang::range(Lang::CPP_11, Lang::CPP_23),
            ),
            (TypeId::A_DEPRECATED, c(Lang::C_23) | cpp(Lang::CPP_14)),
            (TypeId::A_MAYBE_UNUSED, c(Lang::C_23) | cpp(Lang::CPP_17)),
            (TypeId::A_NODISCARD, c(Lang::C_23) | cpp(Lang::CPP_17)),
            (TypeId::A_NORETURN, c(Lang::C_11) | cpp(Lang::CPP_11)),
            (TypeId::A_NO_UNIQUE_ADDRESS, cpp(Lang::CPP_20)),
            (TypeId::A_REPRODUCIBLE, c(Lang::C_23)),
            (TypeId::A_UNSEQUENCED, c(Lang::C_23)),
            (TypeId::Q_CONST, Lang::min(Lang::C_89)),
            (TypeId::Q_VOLATILE, Lang::min(Lang::C_89)),
            (TypeId::Q_RESTRICT, c(Lang::C_99)),
            (TypeId::Q_ATOMIC, c(Lang::C_11)),
            (TypeId::Q_REF, Lang::CPP_ANY),
            (TypeId::Q_RVALUE_REF, cpp(Lang::CPP_11)),
        ]
    })
}

/// The languages in which a single type bit is legal at all.
pub fn bit_langs(bit: TypeId) -> Lang {
    for &(b, l) in lang_gates() {
        if b == bit {
            return l;
        }
    }
    Lang::ANY
}

/// Upper-triangular illegal-pair table: `(a, b, langs-in-which-illegal)`.
fn illegal_pairs() -> &'static Vec<(TypeId, TypeId, Lang)> {
    static PAIRS: OnceLock<Vec<(TypeId, TypeId, Lang)>> = OnceLock::new();
    PAIRS.get_or_init(|| {
        let mut v: Vec<(TypeId, TypeId, Lang)> = Vec::new();
        let all_mods = [
            TypeId::B_SHORT,
            TypeId::B_LONG,
            TypeId::B_LONG_LONG,
            TypeId::B_SIGNED,
            TypeId::B_UNSIGNED,
        ];
        // Base types that accept no size/sign modifier at all.
        let unmodifiable = [
            TypeId::B_VOID,
            TypeId::B_AUTO,
            TypeId::B_BOOL,
            TypeId::B_CHAR8,
            TypeId::B_CHAR16,
            TypeId::B_CHAR32,
            TypeId::B_WCHAR,
            TypeId::B_ENUM,
            TypeId::B_STRUCT,
            TypeId::B_CLASS,
            TypeId::B_UNION,
            TypeId::B_NAMESPACE,
        ];
        for &b in &unmodifiable {
            for &m in &all_mods {
                v.push((b, m, Lang::ANY));
            }
        }
        // char takes sign but no size.
        for m in [TypeId::B_SHORT, TypeId::B_LONG, TypeId::B_LONG_LONG] {
            v.push((TypeId::B_CHAR, m, Lang::ANY));
        }
        // float: "long float" was the K&R spelling of double.
        v.push((TypeId::B_FLOAT, TypeId::B_SHORT, Lang::ANY));
        v.push((TypeId::B_FLOAT, TypeId::B_LONG, Lang::min(Lang::C_89)));
        v.push((TypeId::B_FLOAT, TypeId::B_LONG_LONG, Lang::ANY));
        v.push((TypeId::B_FLOAT, TypeId::B_SIGNED, Lang::ANY));
        v.push((TypeId::B_FLOAT, TypeId::B_UNSIGNED, Lang::ANY));
        // double: only "long double" is a thing.
        v.push((TypeId::B_DOUBLE, TypeId::B_SHORT, Lang::ANY));
        v.push((TypeId::B_DOUBLE, TypeId::B_LONG_LONG, Lang::ANY));
        v.push((TypeId::B_DOUBLE, TypeId::B_SIGNED, Lang::ANY));
        v.push((TypeId::B_DOUBLE, TypeId::B_UNSIGNED, Lang::ANY));
        // Conflicting modifiers.
        v.push((TypeId::B_SIGNED, TypeId::B_UNSIGNED, Lang::ANY));
        v.push((TypeId::B_SHORT, TypeId::B_LONG, Lang::ANY));
        v.push((TypeId::B_SHORT, TypeId::B_LONG_LONG, Lang::ANY));
        v.push((TypeId::B_LONG, TypeId::B_LONG_LONG, Lang::ANY));
        // Complex/imaginary pair only with floating types.
        for b in [
            TypeId::B_BOOL,
            TypeId::B_CHAR,
            TypeId::B_ENUM,
            TypeId::B_VOID,
        ] {
            v.push((b, TypeId::B_COMPLEX, Lang::ANY));
            v.push((b, TypeId::B_IMAGINARY, Lang::ANY));
        }
        // enum class is C++11-only.
        v.push((
            TypeId::B_ENUM,
            TypeId::B_CLASS,
            Lang::C_ANY | Lang::CPP_98 | Lang::CPP_03,
        ));
        // Mutually exclusive storage classes; thread_local pairs with
        // static and extern.
        let excl = [
            TypeId::S_AUTO,
            TypeId::S_EXTERN,
            TypeId::S_REGISTER,
            TypeId::S_STATIC,
            TypeId::S_TYPEDEF,
        ];
        for (i, &a) in excl.iter().enumerate() {
            for &b in &excl[i + 1..] {
                v.push((a, b, Lang::ANY));
            }
        }
        v.push((TypeId::S_AUTO, TypeId::S_THREAD_LOCAL, Lang::ANY));
        v.push((TypeId::S_REGISTER, TypeId::S_THREAD_LOCAL, Lang::ANY));
        // constexpr family is mutually exclusive.
        v.push((TypeId::S_CONSTEVAL, TypeId::S_CONSTEXPR, Lang::ANY));
        v.push((TypeId::S_CONSTEVAL, TypeId::S_CONSTINIT, Lang::ANY));
        v.push((TypeId::S_CONSTEXPR, TypeId::S_CONSTINIT, Lang::ANY));
        v.push((TypeId::S_DEFAULT, TypeId::S_DELETE, Lang::ANY));
        v.push((TypeId::S_STATIC, TypeId::S_VIRTUAL, Lang::ANY));
        v.push((TypeId::S_FRIEND, TypeId::S_VIRTUAL, Lang::ANY));
        v.push((TypeId::S_MUTABLE, TypeId::Q_CONST, Lang::ANY));
        v.push((TypeId::S_NOEXCEPT, TypeId::S_THROW, Lang::ANY));
        v
    })
}

/// Validate `tid` against the active language: each bit must exist there and
/// every pair of bits must be allowed to combine there. Reports the first
/// violation found, per-bit gates before pairs.
pub fn check(tid: TypeId, current: Lang) -> Result<(), CheckError> {
    for bit in bits_of(tid) {
        let ok = bit_langs(bit);
        if !ok.contains(current) {
            return Err(CheckError { offending: bit, second: None, ok_langs: ok });
        }
    }
    for &(a, b, illegal) in illegal_pairs() {
        if tid.contains(a) && tid.contains(b) && illegal.contains(current) {
            return Err(CheckError {
                offending: a,
                second: Some(b),
                ok_langs: Lang::ANY - illegal,
            });
        }
    }
    Ok(())
}

/// Gibberish spelling of a single type bit in the given language.
pub fn bit_name(bit: TypeId, lang: Lang) -> &'static str {
    match bit {
        b if b == TypeId::B_VOID => "void",
        b if b == TypeId::B_AUTO => "auto",
        b if b == TypeId::B_BOOL => {
            if lang.is_cpp() || lang == Lang::C_23 {
                "bool"
            } else {
                "_Bool"
            }
        }
        b if b == TypeId::B_CHAR => "char",
        b if b == TypeId::B_CHAR8 => "char8_t",
        b if b == TypeId::B_CHAR16 => "char16_t",
        b if b == TypeId::B_CHAR32 => "char32_t",
        b if b == TypeId::B_WCHAR => "wchar_t",
        b if b == TypeId::B_SHORT => "short",
        b if b == TypeId::B_INT => "int",
        b if b == TypeId::B_LONG => "long",
        b if b == TypeId::B_LONG_LONG => "long long",
        b if b == TypeId::B_SIGNED => "signed",
        b if b == TypeId::B_UNSIGNED => "unsigned",
        b if b == TypeId::B_FLOAT => "float",
        b if b == TypeId::B_DOUBLE => "double",
        b if b == TypeId::B_COMPLEX => "_Complex",
        b if b == TypeId::B_IMAGINARY => "_Imaginary",
        b if b == TypeId::B_ENUM => "enum",
        b if b == TypeId::B_STRUCT => "struct",
        b if b == TypeId::B_CLASS => "class",
        b if b == TypeId::B_UNION => "union",
        b if b == TypeId::B_NAMESPACE => "namespace",
        b if b == TypeId::B_SCOPE => "scope",
        b if b == TypeId::B_TYPEDEF => "typedef",
        b if b == TypeId::B_BITINT => "_BitInt",
        b if b == TypeId::B_ACCUM => "_Accum",
        b if b == TypeId::B_FRACT => "_Fract",
        b if b == TypeId::B_SAT => "_Sat",
        b if b == TypeId::B_TYPEOF => "typeof",
        b if b == TypeId::S_AUTO => "auto",
        b if b == TypeId::S_BLOCK => "__block",
        b if b == TypeId::S_EXTERN => "extern",
        b if b == TypeId::S_MUTABLE => "mutable",
        b if b == TypeId::S_REGISTER => "register",
        b if b == TypeId::S_STATIC => "static",
        b if b == TypeId::S_THREAD_LOCAL => {
            if lang.is_cpp() || lang == Lang::C_23 {
                "thread_local"
            } else {
                "_Thread_local"
            }
        }
        b if b == TypeId::S_TYPEDEF => "typedef",
        b if b == TypeId::S_CONSTEVAL => "consteval",
        b if b == TypeId::S_CONSTEXPR => "constexpr",
        b if b == TypeId::S_CONSTINIT => "constinit",
        b if b == TypeId::S_DEFAULT => "= default",
        b if b == TypeId::S_DELETE => "= delete",
        b if b == TypeId::S_EXPLICIT => "explicit",
        b if b == TypeId::S_EXPORT => "export",
        b if b == TypeId::S_FINAL => "final",
        b if b == TypeId::S_FRIEND => "friend",
        b if b == TypeId::S_INLINE => "inline",
        b if b == TypeId::S_NOEXCEPT => "noexcept",
        b if b == TypeId::S_OVERRIDE => "override",
        b if b == TypeId::S_PURE => "= 0",
        b if b == TypeId::S_THROW => "throw()",
        b if b == TypeId::S_VIRTUAL => "virtual",
        b if b == TypeId::A_CARRIES_DEPENDENCY => "carries_dependency",
        b if b == TypeId::A_DEPRECATED => "deprecated",
        b if b == TypeId::A_MAYBE_UNUSED => "maybe_unused",
        b if b == TypeId::A_NODISCARD => "nodiscard",
        b if b == TypeId::A_NORETURN => {
            if lang.is_cpp() || lang == Lang::C_23 {
                "noreturn"
            } else {
                "_Noreturn"
            }
        }
        b if b == TypeId::A_NO_UNIQUE_ADDRESS => "no_unique_address",
        b if b == TypeId::A_REPRODUCIBLE => "reproducible",
        b if b == TypeId::A_UNSEQUENCED => "unsequenced",
        b if b == TypeId::Q_CONST => "const",
        b if b == TypeId::Q_VOLATILE => "volatile",
        b if b == TypeId::Q_RESTRICT => "restrict",
        b if b == TypeId::Q_ATOMIC => "_Atomic",
        b if b == TypeId::Q_REF => "&",
        b if b == TypeId::Q_RVALUE_REF => "&&",
        _ => "",
    }
}

/// Language-sensitive rendering of a whole bitset, ordered storage, then
/// qualifiers, then sign/size modifiers, then the base type.
pub fn name(tid: TypeId, lang: Lang) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let storage_order = [
        TypeId::S_TYPEDEF,
        TypeId::S_EXPORT,
        TypeId::S_EXTERN,
        TypeId::S_STATIC,
        TypeId::S_AUTO,
        TypeId::S_REGISTER,
        TypeId::S_THREAD_LOCAL,
        TypeId::S_BLOCK,
        TypeId::S_FRIEND,
        TypeId::S_MUTABLE,
        TypeId::S_CONSTEVAL,
        TypeId::S_CONSTEXPR,
        TypeId::S_CONSTINIT,
        TypeId::S_EXPLICIT,
        TypeId::S_INLINE,
        TypeId::S_VIRTUAL,
    ];
    for &s in &storage_order {
        if tid.contains(s) {
            parts.push(bit_name(s, lang));
        }
    }
    for q in [TypeId::Q_ATOMIC, TypeId::Q_CONST, TypeId::Q_VOLATILE, TypeId::Q_RESTRICT] {
        if tid.contains(q) {
            parts.push(bit_name(q, lang));
        }
    }
    for m in [
        TypeId::B_SIGNED,
        TypeId::B_UNSIGNED,
        TypeId::B_SHORT,
        TypeId::B_LONG,
        TypeId::B_LONG_LONG,
        TypeId::B_INT,
    ] {
        if tid.contains(m) {
            parts.push(bit_name(m, lang));
        }
    }
    let plain_base = tid.base() - TypeId::MODIFIERS;
    for bit in bits_of(plain_base) {
        parts.push(bit_name(bit, lang));
    }
    // Trailing annotations come last in a diagnostic spelling.
    for s in [
        TypeId::S_NOEXCEPT,
        TypeId::S_THROW,
        TypeId::S_FINAL,
        TypeId::S_OVERRIDE,
        TypeId::S_DEFAULT,
        TypeId::S_DELETE,
        TypeId::S_PURE,
    ] {
        if tid.contains(s) {
            parts.push(bit_name(s, lang));
        }
    }
    for bit in bits_of(tid.attrs()) {
        parts.push(bit_name(bit, lang));
    }
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}
