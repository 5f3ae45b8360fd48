//! The gibberish printer: AST back to C/C++ declarator syntax.
//!
//! Works in two passes around the declared name: the innermost type is
//! emitted first, then declarator fragments thread outward, inserting
//! grouping parentheses wherever a pointer layer binds tighter than an
//! array or function suffix.

use crate::ast::{oper, ArrayKind, ArraySize, AstArena, AstId, AstKind, CaptureKind, CastKind};
use crate::lang::Lang;
use crate::tid::{self, TypeId};

/// Annotations that print after a function's parameter list.
const TRAILING: TypeId = TypeId::S_NOEXCEPT
    .union(TypeId::S_THROW)
    .union(TypeId::S_PURE)
    .union(TypeId::S_OVERRIDE)
    .union(TypeId::S_FINAL)
    .union(TypeId::S_DEFAULT)
    .union(TypeId::S_DELETE);

fn leaf_name(arena: &AstArena, id: AstId, lang: Lang, strip: TypeId) -> String {
    let node = arena.node(id);
    let tid = node.tid - strip - TypeId::PART_ATTR;
    match &node.kind {
        AstKind::Builtin { bit_width } => {
            if tid.contains(TypeId::B_BITINT) {
                let quals = tid::name(tid - TypeId::B_BITINT, lang);
                let w = bit_width.unwrap_or(0);
                if quals.is_empty() {
                    format!("_BitInt({})", w)
                } else {
                    format!("{} _BitInt({})", quals, w)
                }
            } else {
                tid::name(tid, lang)
            }
        }
        AstKind::TypedefRef { def, .. } => {
            let quals = tid::name(tid, lang);
            if quals.is_empty() {
                def.sname.to_string()
            } else {
                format!("{} {}", quals, def.sname)
            }
        }
        AstKind::Enum { of, .. } => {
            let kw = if tid.contains(TypeId::B_CLASS) { "enum class" } else { "enum" };
            let quals = tid::name(tid - TypeId::B_ENUM - TypeId::B_CLASS, lang);
            let mut s = if quals.is_empty() {
                format!("{} {}", kw, node.sname)
            } else {
                format!("{} {} {}", quals, kw, node.sname)
            };
            if let Some(of) = of {
                s.push_str(&format!(" : {}", leaf_name(arena, *of, lang, TypeId::empty())));
            }
            s
        }
        AstKind::ClassStructUnion => {
            let kw = if tid.contains(TypeId::B_CLASS) {
                "class"
            } else if tid.contains(TypeId::B_UNION) {
                "union"
            } else {
                "struct"
            };
            let quals = tid::name(tid - TypeId::ANY_CSU, lang);
            if quals.is_empty() {
                format!("{} {}", kw, node.sname)
            } else {
                format!("{} {} {}", quals, kw, node.sname)
            }
        }
        AstKind::Concept => node.sname.to_string(),
        _ => tid::name(tid, lang),
    }
}

fn is_postfix(kind: &AstKind) -> bool {
    matches!(
        kind,
        AstKind::Array { .. }
            | AstKind::Function { .. }
            | AstKind::AppleBlock { .. }
            | AstKind::Operator { .. }
            | AstKind::UdLiteral { .. }
    )
}

fn params_str(arena: &AstArena, params: &[AstId], lang: Lang) -> String {
    params
        .iter()
        .map(|&p| decl_str(arena, p, lang, true))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Left and right fragments around the declared name.
fn parts(arena: &AstArena, id: AstId, lang: Lang, strip: TypeId) -> (String, String) {
    let node = arena.node(id);
    match &node.kind {
        AstKind::Pointer { to } => {
            let (l, r) = parts(arena, *to, lang, TypeId::empty());
            let quals = tid::name(node.tid - strip & TypeId::PART_QUAL, lang);
            let star = if quals.is_empty() {
                "*".to_string()
            } else {
                format!("*{} ", quals)
            };
            if is_postfix(&arena.node(*to).kind) {
                (format!("{}({}", l, star), format!("){}", r))
            } else {
                (format!("{}{}", l, star), r)
            }
        }
        AstKind::Reference { to } | AstKind::RvalueReference { to } => {
            let amp = if matches!(node.kind, AstKind::Reference { .. }) { "&" } else { "&&" };
            let (l, r) = parts(arena, *to, lang, TypeId::empty());
            if is_postfix(&arena.node(*to).kind) {
                (format!("{}({}", l, amp), format!("){}", r))
            } else {
                (format!("{}{}", l, amp), r)
            }
        }
        AstKind::PointerToMember { class_sname, of } => {
            let (l, r) = parts(arena, *of, lang, TypeId::empty());
            let quals = tid::name(node.tid & TypeId::PART_QUAL, lang);
            let star = if quals.is_empty() {
                format!("{}::*", class_sname)
            } else {
                format!("{}::*{} ", class_sname, quals)
            };
            if is_postfix(&arena.node(*of).kind) {
                (format!("{}({}", l, star), format!("){}", r))
            } else {
                (format!("{}{}", l, star), r)
            }
        }
        AstKind::Array { of, size } => {
            let (l, r) = parts(arena, *of, lang, TypeId::empty());
            let size_str = match size {
                ArrayKind::Fixed(ArraySize::None) => String::new(),
                ArrayKind::Fixed(ArraySize::Int(n)) => n.to_string(),
                ArrayKind::Fixed(ArraySize::Vla) => "*".to_string(),
                ArrayKind::NamedVla(name) => name.clone(),
            };
            (l, format!("[{}]{}", size_str, r))
        }
        AstKind::Function { ret, params, .. } => {
            let (l, r) = parts(arena, *ret, lang, TypeId::empty());
            let trailing = trailing_str(node.tid - strip, lang);
            (l, format!("({}){}{}", params_str(arena, params, lang), trailing, r))
        }
        AstKind::Operator { ret, params, .. } => {
            let (l, r) = parts(arena, *ret, lang, TypeId::empty());
            let trailing = trailing_str(node.tid - strip, lang);
            (l, format!("({}){}{}", params_str(arena, params, lang), trailing, r))
        }
        AstKind::UdLiteral { ret, params } => {
            let (l, r) = parts(arena, *ret, lang, TypeId::empty());
            (l, format!("({}){}", params_str(arena, params, lang), r))
        }
        AstKind::AppleBlock { ret, params } => {
            let (l, r) = parts(arena, *ret, lang, TypeId::empty());
            (
                format!("{}(^", l),
                format!(")({}){}", params_str(arena, params, lang), r),
            )
        }
        AstKind::Variadic => ("...".to_string(), String::new()),
        AstKind::Name => (String::new(), String::new()),
        _ => (format!("{} ", leaf_name(arena, id, lang, strip)), String::new()),
    }
}

fn trailing_str(tid: TypeId, lang: Lang) -> String {
    let bits = tid & TRAILING;
    if bits.is_empty() {
        String::new()
    } else {
        format!(" {}", tid::name(bits, lang))
    }
}

/// One declarator, with or without its name: used for parameters and for
/// the top level.
fn decl_str(arena: &AstArena, id: AstId, lang: Lang, with_name: bool) -> String {
    let node = arena.node(id);
    if matches!(node.kind, AstKind::Name) {
        return node.sname.to_string();
    }
    let (l, r) = parts(arena, id, lang, TypeId::empty());
    let name = if with_name && !node.sname.is_empty() {
        node.sname.to_string()
    } else {
        String::new()
    };
    let pack = if node.is_param_pack { "..." } else { "" };
    let mut s = format!("{}{}{}{}", l, pack, name, r);
    if let AstKind::Builtin { bit_width: Some(w) } = &node.kind {
        if !node.tid.contains(TypeId::B_BITINT) {
            s.push_str(&format!(" : {}", w));
        }
    }
    while s.ends_with(' ') {
        s.pop();
    }
    s
}

/// Render a full declaration in gibberish.
pub fn declare(arena: &AstArena, id: AstId, lang: Lang) -> String {
    let node = arena.node(id);
    match &node.kind {
        AstKind::Cast { kind, to } => {
            let what = node.sname.to_string();
            let ty = decl_str(arena, *to, lang, false);
            match kind {
                CastKind::C => format!("({}){}", ty, what),
                CastKind::Const => format!("const_cast<{}>({})", ty, what),
                CastKind::Dynamic => format!("dynamic_cast<{}>({})", ty, what),
                CastKind::Reinterpret => format!("reinterpret_cast<{}>({})", ty, what),
                CastKind::Static => format!("static_cast<{}>({})", ty, what),
            }
        }
        AstKind::StructuredBinding { names } => {
            let list = names
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("auto [{}]", list)
        }
        AstKind::Lambda { captures, params, ret } => {
            let caps = captures
                .iter()
                .map(|&c| capture_str(arena, c))
                .collect::<Vec<_>>()
                .join(", ");
            let mut s = format!("[{}]", caps);
            s.push_str(&format!("({})", params_str(arena, params, lang)));
            if let Some(ret) = ret {
                s.push_str(&format!(" -> {}", decl_str(arena, *ret, lang, false)));
            }
            s
        }
        AstKind::Constructor { params } => {
            format!("{}({})", node.sname, params_str(arena, params, lang))
        }
        AstKind::Destructor => format!("~{}()", node.sname.local_name().unwrap_or("")),
        AstKind::UdConversion { to } => {
            format!("operator {}()", decl_str(arena, *to, lang, false))
        }
        AstKind::Operator { op, ret, params, .. } => {
            let info = oper::operator_info(*op);
            let (l, _r) = parts(arena, *ret, lang, prefix_bits(node.tid));
            let prefix = prefix_str(arena, id, lang);
            format!(
                "{}{}operator{}({}){}",
                prefix,
                l,
                info.literal,
                params_str(arena, params, lang),
                trailing_str(node.tid, lang)
            )
        }
        _ => {
            let prefix = prefix_str(arena, id, lang);
            let body = decl_str_stripped(arena, id, lang);
            format!("{}{}", prefix, body)
        }
    }
}

/// Leading storage and attributes of the declaration root.
fn prefix_bits(tid: TypeId) -> TypeId {
    tid & (TypeId::PART_STORE - TRAILING)
}

fn prefix_str(arena: &AstArena, id: AstId, lang: Lang) -> String {
    let node = arena.node(id);
    let mut prefix = String::new();
    let attrs: Vec<&str> = tid::bits_of(node.tid & TypeId::PART_ATTR)
        .map(|b| tid::bit_name(b, lang))
        .collect();
    if !attrs.is_empty() {
        prefix.push_str(&format!("[[{}]] ", attrs.join(", ")));
    }
    // A leaf root prints its own storage inside `tid::name`; composite roots
    // carry hoisted storage that prints up front.
    if parts_is_composite(&node.kind) {
        let storage = prefix_bits(node.tid);
        if !storage.is_empty() {
            prefix.push_str(&format!("{} ", tid::name(storage, lang)));
        }
    }
    prefix
}

fn parts_is_composite(kind: &AstKind) -> bool {
    kind.of_id().is_some() || matches!(kind, AstKind::Variadic)
}

fn decl_str_stripped(arena: &AstArena, id: AstId, lang: Lang) -> String {
    let node = arena.node(id);
    if matches!(node.kind, AstKind::Name) {
        return node.sname.to_string();
    }
    let strip = if parts_is_composite(&node.kind) {
        prefix_bits(node.tid)
    } else {
        TypeId::empty()
    };
    let (l, r) = parts(arena, id, lang, strip);
    let name = node.sname.to_string();
    let mut s = format!("{}{}{}", l, name, r);
    if let AstKind::Builtin { bit_width: Some(w) } = &node.kind {
        if !node.tid.contains(TypeId::B_BITINT) {
            s.push_str(&format!(" : {}", w));
        }
    }
    while s.ends_with(' ') {
        s.pop();
    }
    s
}

fn capture_str(arena: &AstArena, id: AstId) -> String {
    let node = arena.node(id);
    match &node.kind {
        AstKind::Capture { kind } => match kind {
            CaptureKind::Copy if node.sname.is_empty() => "=".to_string(),
            CaptureKind::Copy => node.sname.to_string(),
            CaptureKind::Reference if node.sname.is_empty() => "&".to_string(),
            CaptureKind::Reference => format!("&{}", node.sname),
            CaptureKind::This => "this".to_string(),
            CaptureKind::StarThis => "*this".to_string(),
        },
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FnMember;
    use crate::sname::ScopedName;
    use crate::token::Span;

    fn builtin(arena: &mut AstArena, tid: TypeId) -> AstId {
        let id = arena.alloc(AstKind::Builtin { bit_width: None }, 0, Span::default());
        arena.node_mut(id).tid = tid;
        id
    }

    #[test]
    fn prints_simple_declaration() {
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT);
        arena.node_mut(int).sname = ScopedName::from("x");
        assert_eq!(declare(&arena, int, Lang::C_11), "int x");
    }

    #[test]
    fn pointer_to_function_needs_parens() {
        // pointer to function (char) returning int => int (*f)(char)
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT);
        let ch = builtin(&mut arena, TypeId::B_CHAR);
        let f = arena.alloc(
            AstKind::Function { ret: int, params: vec![ch], member: FnMember::Unspecified },
            0,
            Span::default(),
        );
        arena.set_parent(int, f);
        let ptr = arena.alloc(AstKind::Pointer { to: f }, 0, Span::default());
        arena.set_parent(f, ptr);
        arena.node_mut(ptr).sname = ScopedName::from("f");
        assert_eq!(declare(&arena, ptr, Lang::C_11), "int (*f)(char)");
    }

    #[test]
    fn array_of_pointer_to_function() {
        // array 3 of pointer to function (char) returning int => int (*x[3])(char)
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT);
        let ch = builtin(&mut arena, TypeId::B_CHAR);
        let f = arena.alloc(
            AstKind::Function { ret: int, params: vec![ch], member: FnMember::Unspecified },
            0,
            Span::default(),
        );
        arena.set_parent(int, f);
        let ptr = arena.alloc(AstKind::Pointer { to: f }, 0, Span::default());
        arena.set_parent(f, ptr);
        let arr = arena.alloc(
            AstKind::Array { of: ptr, size: ArrayKind::Fixed(ArraySize::Int(3)) },
            0,
            Span::default(),
        );
        arena.set_parent(ptr, arr);
        arena.node_mut(arr).sname = ScopedName::from("x");
        assert_eq!(declare(&arena, arr, Lang::C_11), "int (*x[3])(char)");
    }

    #[test]
    fn plain_pointer_needs_no_parens() {
        let mut arena = AstArena::new();
        let ch = builtin(&mut arena, TypeId::B_CHAR | TypeId::Q_CONST);
        let ptr = arena.alloc(AstKind::Pointer { to: ch }, 0, Span::default());
        arena.set_parent(ch, ptr);
        arena.node_mut(ptr).sname = ScopedName::from("s");
        assert_eq!(declare(&arena, ptr, Lang::C_11), "const char *s");
    }

    #[test]
    fn static_function_prints_storage_first() {
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT);
        let f = arena.alloc(
            AstKind::Function { ret: int, params: vec![], member: FnMember::Unspecified },
            0,
            Span::default(),
        );
        arena.set_parent(int, f);
        arena.node_mut(f).sname = ScopedName::from("f");
        arena.node_mut(f).tid = TypeId::S_STATIC;
        assert_eq!(declare(&arena, f, Lang::C_11), "static int f()");
    }

    #[test]
    fn const_pointer_quals_print_after_star() {
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT);
        let ptr = arena.alloc(AstKind::Pointer { to: int }, 0, Span::default());
        arena.set_parent(int, ptr);
        arena.node_mut(ptr).tid = TypeId::Q_CONST;
        arena.node_mut(ptr).sname = ScopedName::from("p");
        assert_eq!(declare(&arena, ptr, Lang::C_11), "int *const p");
    }

    #[test]
    fn cast_prints_c_style() {
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT);
        let ptr = arena.alloc(AstKind::Pointer { to: int }, 0, Span::default());
        arena.set_parent(int, ptr);
        let cast = arena.alloc(AstKind::Cast { kind: CastKind::C, to: ptr }, 0, Span::default());
        arena.set_parent(ptr, cast);
        arena.node_mut(cast).sname = ScopedName::from("x");
        assert_eq!(declare(&arena, cast, Lang::C_11), "(int *)x");
    }

    #[test]
    fn vla_star_prints_in_brackets() {
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT);
        let arr = arena.alloc(
            AstKind::Array { of: int, size: ArrayKind::Fixed(ArraySize::Vla) },
            0,
            Span::default(),
        );
        arena.set_parent(int, arr);
        arena.node_mut(arr).sname = ScopedName::from("a");
        assert_eq!(declare(&arena, arr, Lang::C_99), "int a[*]");
    }
}
