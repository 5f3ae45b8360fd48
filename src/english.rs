//! The pseudo-English printer.
//!
//! Reads an AST left to right from the declared name outward, producing the
//! `declare x as ...` phrasing. Spellings of type bits are version-correct
//! via the type-id name tables.

use crate::ast::{oper, ArrayKind, ArraySize, AstArena, AstId, AstKind, CaptureKind, CastKind, FnMember};
use crate::lang::Lang;
use crate::tid::{self, TypeId};

/// Render a whole declaration: `declare <name> as <phrase>`, or just the
/// phrase when there is no name (cast types, parameter types).
pub fn explain(arena: &AstArena, id: AstId, lang: Lang) -> String {
    let node = arena.node(id);
    match &node.kind {
        AstKind::Cast { kind, to } => {
            let what = if node.sname.is_empty() {
                "expression".to_string()
            } else {
                node.sname.to_string()
            };
            let how = match kind {
                CastKind::C => "cast",
                CastKind::Const => "const cast",
                CastKind::Dynamic => "dynamic cast",
                CastKind::Reinterpret => "reinterpret cast",
                CastKind::Static => "static cast",
            };
            format!("{} {} into {}", how, what, phrase(arena, *to, lang))
        }
        AstKind::StructuredBinding { names } => {
            let list = names
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("declare {} as structured binding", list)
        }
        _ if !node.sname.is_empty() => {
            format!("declare {} as {}", node.sname, phrase(arena, id, lang))
        }
        _ => phrase(arena, id, lang),
    }
}

/// Storage, annotation, attribute, and qualifier words preceding the kind
/// phrase.
fn tid_prefix(tid: TypeId, lang: Lang) -> String {
    let prefix_bits = tid & (TypeId::PART_STORE | TypeId::PART_ATTR | TypeId::PART_QUAL);
    let s = tid::name(prefix_bits, lang);
    if s.is_empty() {
        s
    } else {
        format!("{} ", s)
    }
}

fn params_phrase(arena: &AstArena, params: &[AstId], lang: Lang) -> String {
    let list = params
        .iter()
        .map(|&p| {
            let node = arena.node(p);
            match &node.kind {
                AstKind::Name => node.sname.to_string(),
                AstKind::Variadic => "...".to_string(),
                _ if !node.sname.is_empty() => {
                    format!("{} as {}", node.sname, phrase(arena, p, lang))
                }
                _ => phrase(arena, p, lang),
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("({})", list)
}

/// The recursive phrase for one node, name excluded.
pub fn phrase(arena: &AstArena, id: AstId, lang: Lang) -> String {
    let node = arena.node(id);
    let pack = if node.is_param_pack { "parameter pack of " } else { "" };
    let body = match &node.kind {
        AstKind::Placeholder => "?".to_string(),
        AstKind::Builtin { bit_width } => {
            if node.tid.contains(TypeId::B_BITINT) {
                let width = bit_width.unwrap_or(0);
                let extra = tid_prefix(node.tid, lang);
                format!("{}bit-precise integer width {} bits", extra, width)
            } else {
                let name = tid::name(node.tid, lang);
                match bit_width {
                    Some(w) => format!("{} width {} bits", name, w),
                    None => name,
                }
            }
        }
        AstKind::TypedefRef { def, bit_width } => {
            let name = format!("{}{}", tid_prefix(node.tid, lang), def.sname);
            match bit_width {
                Some(w) => format!("{} width {} bits", name, w),
                None => name,
            }
        }
        AstKind::Enum { of, .. } => {
            let noun = if node.tid.contains(TypeId::B_CLASS) {
                "enumeration class"
            } else {
                "enumeration"
            };
            let mut s = format!("{}{} {}", tid_prefix(node.tid - TypeId::B_CLASS, lang), noun, node.sname);
            if let Some(of) = of {
                s.push_str(&format!(" of type {}", phrase(arena, *of, lang)));
            }
            s
        }
        AstKind::ClassStructUnion => {
            let noun = if node.tid.contains(TypeId::B_CLASS) {
                "class"
            } else if node.tid.contains(TypeId::B_UNION) {
                "union"
            } else {
                "structure"
            };
            let quals = tid_prefix(node.tid & TypeId::PART_QUAL, lang);
            format!("{}{} {}", quals, noun, node.sname)
        }
        AstKind::Concept => format!("concept {}", node.sname),
        AstKind::Name => node.sname.to_string(),
        AstKind::Variadic => "variadic".to_string(),
        AstKind::Pointer { to } => {
            format!("{}pointer to {}", tid_prefix(node.tid, lang), phrase(arena, *to, lang))
        }
        AstKind::Reference { to } => {
            format!("{}reference to {}", tid_prefix(node.tid, lang), phrase(arena, *to, lang))
        }
        AstKind::RvalueReference { to } => format!(
            "{}rvalue reference to {}",
            tid_prefix(node.tid, lang),
            phrase(arena, *to, lang)
        ),
        AstKind::PointerToMember { class_sname, of } => format!(
            "{}pointer to member of class {} {}",
            tid_prefix(node.tid, lang),
            class_sname,
            phrase(arena, *of, lang)
        ),
        AstKind::Array { of, size } => {
            let size_str = match size {
                ArrayKind::Fixed(ArraySize::None) => String::new(),
                ArrayKind::Fixed(ArraySize::Int(n)) => format!("{} ", n),
                ArrayKind::Fixed(ArraySize::Vla) => "* ".to_string(),
                ArrayKind::NamedVla(name) => format!("{} ", name),
            };
            format!(
                "{}array {}of {}",
                tid_prefix(node.tid, lang),
                size_str,
                phrase(arena, *of, lang)
            )
        }
        AstKind::Function { ret, params, member } => {
            let member_str = match member {
                FnMember::Member => "member ",
                _ => "",
            };
            let params_str = if params.is_empty() {
                String::new()
            } else {
                format!("{} ", params_phrase(arena, params, lang))
            };
            format!(
                "{}{}function {}returning {}",
                tid_prefix(node.tid, lang),
                member_str,
                params_str,
                phrase(arena, *ret, lang)
            )
        }
        AstKind::AppleBlock { ret, params } => {
            let params_str = if params.is_empty() {
                String::new()
            } else {
                format!("{} ", params_phrase(arena, params, lang))
            };
            format!(
                "{}block {}returning {}",
                tid_prefix(node.tid, lang),
                params_str,
                phrase(arena, *ret, lang)
            )
        }
        AstKind::Operator { op, ret, params, member } => {
            let info = oper::operator_info(*op);
            let member_str = match member {
                FnMember::Member => "member ",
                FnMember::NonMember => "non-member ",
                FnMember::Unspecified => "",
            };
            let params_str = if params.is_empty() {
                String::new()
            } else {
                format!("{} ", params_phrase(arena, params, lang))
            };
            format!(
                "{}{}operator {} {}returning {}",
                tid_prefix(node.tid, lang),
                member_str,
                info.literal,
                params_str,
                phrase(arena, *ret, lang)
            )
        }
        AstKind::Constructor { params } => {
            if params.is_empty() {
                format!("{}constructor", tid_prefix(node.tid, lang))
            } else {
                format!(
                    "{}constructor {}",
                    tid_prefix(node.tid, lang),
                    params_phrase(arena, params, lang)
                )
            }
        }
        AstKind::Destructor => format!("{}destructor", tid_prefix(node.tid, lang)),
        AstKind::UdConversion { to } => format!(
            "{}user-defined conversion returning {}",
            tid_prefix(node.tid, lang),
            phrase(arena, *to, lang)
        ),
        AstKind::UdLiteral { ret, params } => format!(
            "{}user-defined literal {} returning {}",
            tid_prefix(node.tid, lang),
            params_phrase(arena, params, lang),
            phrase(arena, *ret, lang)
        ),
        AstKind::Lambda { captures, params, ret } => {
            let mut s = "lambda".to_string();
            if !captures.is_empty() {
                let caps = captures
                    .iter()
                    .map(|&c| capture_phrase(arena, c))
                    .collect::<Vec<_>>()
                    .join(", ");
                s.push_str(&format!(" capturing [{}]", caps));
            }
            if !params.is_empty() {
                s.push_str(&format!(" {}", params_phrase(arena, params, lang)));
            }
            if let Some(ret) = ret {
                s.push_str(&format!(" returning {}", phrase(arena, *ret, lang)));
            }
            s
        }
        AstKind::Capture { .. } => capture_phrase(arena, id),
        AstKind::StructuredBinding { .. } => "structured binding".to_string(),
        AstKind::Cast { .. } => explain(arena, id, lang),
    };
    format!("{}{}", pack, body)
}

fn capture_phrase(arena: &AstArena, id: AstId) -> String {
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
