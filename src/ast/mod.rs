//! The declaration AST.
//!
//! Nodes live in an `AstArena` and refer to each other by `AstId` handles;
//! one arena holds everything produced by one parse and frees it wholesale.
//! Child links within a tree are owned by the parent node; a typedef
//! reference is the one non-parent referrer and shares its target through an
//! `Rc` into the typedef table, whose root node never has a parent.

pub mod compose;
pub mod oper;

use crate::sname::ScopedName;
use crate::tid::{self, TypeId};
use crate::token::Span;
use crate::typedef::Typedef;
use std::cell::Cell;
use std::rc::Rc;

pub use oper::OperatorId;

thread_local! {
    /// Count of AST nodes alive across this thread's arenas; teardown
    /// asserts it reaches zero. The tool is single-threaded, so per-thread
    /// accounting is exact.
    static NODE_COUNT: Cell<usize> = const { Cell::new(0) };
}

pub fn live_nodes() -> usize {
    NODE_COUNT.with(|c| c.get())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AstId(u32);

impl AstId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySize {
    /// `[]`
    None,
    /// `[3]`
    Int(u64),
    /// `[*]`
    Vla,
}

/// `[n]` with a named size is close enough to a VLA to share the variant
/// space, but carries the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayKind {
    Fixed(ArraySize),
    NamedVla(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// `[x]`, or `[=]` when the capture has no name.
    Copy,
    /// `[&x]`, or `[&]` when the capture has no name.
    Reference,
    /// `[this]`
    This,
    /// `[*this]`
    StarThis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    C,
    Const,
    Dynamic,
    Reinterpret,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FnMember {
    Unspecified,
    Member,
    NonMember,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alignment {
    None,
    Bytes(u32),
    Sname(ScopedName),
    Type(AstId),
}

#[derive(Debug, Clone)]
pub enum AstKind {
    /// Temporary sentinel inserted during parsing; composition splices the
    /// real subtree into its place.
    Placeholder,
    Builtin { bit_width: Option<u64> },
    TypedefRef { def: Rc<Typedef>, bit_width: Option<u64> },
    Enum { of: Option<AstId>, bit_width: Option<u64> },
    ClassStructUnion,
    Concept,
    /// K&R typeless parameter.
    Name,
    Variadic,
    Pointer { to: AstId },
    Reference { to: AstId },
    RvalueReference { to: AstId },
    PointerToMember { class_sname: ScopedName, of: AstId },
    Array { of: AstId, size: ArrayKind },
    Function { ret: AstId, params: Vec<AstId>, member: FnMember },
    AppleBlock { ret: AstId, params: Vec<AstId> },
    Operator { op: OperatorId, ret: AstId, params: Vec<AstId>, member: FnMember },
    Constructor { params: Vec<AstId> },
    Destructor,
    UdConversion { to: AstId },
    UdLiteral { ret: AstId, params: Vec<AstId> },
    Lambda { captures: Vec<AstId>, params: Vec<AstId>, ret: Option<AstId> },
    Capture { kind: CaptureKind },
    StructuredBinding { names: Vec<ScopedName> },
    Cast { kind: CastKind, to: AstId },
}

impl AstKind {
    /// The single `of` link, when this kind is a parent referrer.
    pub fn of_id(&self) -> Option<AstId> {
        match self {
            AstKind::Enum { of, .. } => *of,
            AstKind::Pointer { to }
            | AstKind::Reference { to }
            | AstKind::RvalueReference { to }
            | AstKind::UdConversion { to }
            | AstKind::Cast { to, .. } => Some(*to),
            AstKind::PointerToMember { of, .. } | AstKind::Array { of, .. } => Some(*of),
            AstKind::Function { ret, .. }
            | AstKind::AppleBlock { ret, .. }
            | AstKind::Operator { ret, .. }
            | AstKind::UdLiteral { ret, .. } => Some(*ret),
            AstKind::Lambda { ret, .. } => *ret,
            _ => None,
        }
    }

    /// Whether setting this kind's `of` link also claims parenthood of the
    /// target. Typedef references refer without owning.
    pub fn is_parent(&self) -> bool {
        !matches!(self, AstKind::TypedefRef { .. }) && self.of_id().is_some()
    }

    pub fn is_referrer(&self) -> bool {
        self.is_parent() || matches!(self, AstKind::TypedefRef { .. })
    }

    /// Function-like kinds exempt from the parameter-pack bubble-up: a pack
    /// below a function boundary belongs to that parameter, not the
    /// function.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            AstKind::Function { .. }
                | AstKind::AppleBlock { .. }
                | AstKind::Operator { .. }
                | AstKind::Constructor { .. }
                | AstKind::UdLiteral { .. }
                | AstKind::Lambda { .. }
        )
    }

    pub fn params(&self) -> Option<&[AstId]> {
        match self {
            AstKind::Function { params, .. }
            | AstKind::AppleBlock { params, .. }
            | AstKind::Operator { params, .. }
            | AstKind::Constructor { params }
            | AstKind::UdLiteral { params, .. }
            | AstKind::Lambda { params, .. } => Some(params),
            _ => None,
        }
    }

    /// A short noun for diagnostics.
    pub fn noun(&self) -> &'static str {
        match self {
            AstKind::Placeholder => "placeholder",
            AstKind::Builtin { .. } => "built-in type",
            AstKind::TypedefRef { .. } => "typedef",
            AstKind::Enum { .. } => "enumeration",
            AstKind::ClassStructUnion => "class, struct, or union",
            AstKind::Concept => "concept",
            AstKind::Name => "name",
            AstKind::Variadic => "variadic",
            AstKind::Pointer { .. } => "pointer",
            AstKind::Reference { .. } => "reference",
            AstKind::RvalueReference { .. } => "rvalue reference",
            AstKind::PointerToMember { .. } => "pointer to member",
            AstKind::Array { .. } => "array",
            AstKind::Function { .. } => "function",
            AstKind::AppleBlock { .. } => "block",
            AstKind::Operator { .. } => "operator",
            AstKind::Constructor { .. } => "constructor",
            AstKind::Destructor => "destructor",
            AstKind::UdConversion { .. } => "user-defined conversion",
            AstKind::UdLiteral { .. } => "user-defined literal",
            AstKind::Lambda { .. } => "lambda",
            AstKind::Capture { .. } => "capture",
            AstKind::StructuredBinding { .. } => "structured binding",
            AstKind::Cast { .. } => "cast",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AstNode {
    pub kind: AstKind,
    pub span: Span,
    /// Count of grouping parentheses enclosing this node at creation;
    /// drives array/function splicing precedence.
    pub depth: u32,
    pub sname: ScopedName,
    pub tid: TypeId,
    pub align: Alignment,
    pub is_param_pack: bool,
    pub parent: Option<AstId>,
    pub param_of: Option<AstId>,
    /// Set on the copy when a node is produced by `dup`; refers into the
    /// source arena and is for diagnostics only.
    pub dup_from: Option<AstId>,
}

#[derive(Debug, Default)]
pub struct AstArena {
    nodes: Vec<AstNode>,
}

impl AstArena {
    pub fn new() -> Self {
        AstArena { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, kind: AstKind, depth: u32, span: Span) -> AstId {
        let id = AstId(self.nodes.len() as u32);
        self.nodes.push(AstNode {
            kind,
            span,
            depth,
            sname: ScopedName::new(),
            tid: TypeId::empty(),
            align: Alignment::None,
            is_param_pack: false,
            parent: None,
            param_of: None,
            dup_from: None,
        });
        NODE_COUNT.with(|c| c.set(c.get() + 1));
        id
    }

    pub fn node(&self, id: AstId) -> &AstNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: AstId) -> &mut AstNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Write the `of` slot of `parent_id`, whatever its kind.
    fn set_of(&mut self, parent_id: AstId, child: AstId) {
        match &mut self.node_mut(parent_id).kind {
            AstKind::Enum { of, .. } => *of = Some(child),
            AstKind::Pointer { to }
            | AstKind::Reference { to }
            | AstKind::RvalueReference { to }
            | AstKind::UdConversion { to }
            | AstKind::Cast { to, .. } => *to = child,
            AstKind::PointerToMember { of, .. } | AstKind::Array { of, .. } => *of = child,
            AstKind::Function { ret, .. }
            | AstKind::AppleBlock { ret, .. }
            | AstKind::Operator { ret, .. }
            | AstKind::UdLiteral { ret, .. } => *ret = child,
            AstKind::Lambda { ret, .. } => *ret = Some(child),
            other => unreachable!("set_of on non-referrer kind {}", other.noun()),
        }
    }

    /// Install `child` as the `of` target of `parent` and fix back-links.
    ///
    /// The parameter-pack flag bubbles up: `auto &...x` denotes a pack of
    /// references, so the top of a non-function spine carries the flag.
    pub fn set_parent(&mut self, child: AstId, parent: AstId) {
        debug_assert!(!self.would_cycle(child, parent), "AST cycle");
        self.set_of(parent, child);
        self.node_mut(child).parent = Some(parent);
        if self.node(child).is_param_pack && !self.node(parent).kind.is_function_like() {
            self.node_mut(child).is_param_pack = false;
            self.node_mut(parent).is_param_pack = true;
        }
    }

    fn would_cycle(&self, child: AstId, parent: AstId) -> bool {
        let mut cur = Some(parent);
        while let Some(id) = cur {
            if id == child {
                return true;
            }
            cur = self.node(id).parent;
        }
        false
    }

    /// Record each parameter's owning function.
    pub fn set_param_of(&mut self, params: &[AstId], func: AstId) {
        for &p in params {
            debug_assert!(self.node(p).param_of.is_none(), "parameter already owned");
            self.node_mut(p).param_of = Some(func);
        }
    }
}

impl Drop for AstArena {
    fn drop(&mut self) {
        NODE_COUNT.with(|c| c.set(c.get() - self.nodes.len()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitDir {
    /// Follow `of` links downward through parent kinds.
    Down,
    /// Follow `parent` links upward.
    Up,
}

/// Walk from `start`, returning the first node for which `f` answers true.
pub fn visit(
    arena: &AstArena,
    start: AstId,
    dir: VisitDir,
    mut f: impl FnMut(&AstArena, AstId) -> bool,
) -> Option<AstId> {
    let mut cur = Some(start);
    while let Some(id) = cur {
        if f(arena, id) {
            return Some(id);
        }
        cur = match dir {
            VisitDir::Down => {
                let node = arena.node(id);
                if node.kind.is_parent() {
                    node.kind.of_id()
                } else {
                    None
                }
            }
            VisitDir::Up => arena.node(id).parent,
        };
    }
    None
}

/// Recursive structural copy into `dst` (possibly a different arena).
/// Parent referrers duplicate their subtree; a typedef reference copies the
/// shared handle only.
pub fn dup(src: &AstArena, id: AstId, dst: &mut AstArena) -> AstId {
    let node = src.node(id).clone();
    let new_kind = match node.kind {
        AstKind::Placeholder => AstKind::Placeholder,
        AstKind::Builtin { bit_width } => AstKind::Builtin { bit_width },
        AstKind::TypedefRef { ref def, bit_width } => {
            AstKind::TypedefRef { def: Rc::clone(def), bit_width }
        }
        AstKind::Enum { of, bit_width } => AstKind::Enum {
            of: of.map(|o| dup(src, o, dst)),
            bit_width,
        },
        AstKind::ClassStructUnion => AstKind::ClassStructUnion,
        AstKind::Concept => AstKind::Concept,
        AstKind::Name => AstKind::Name,
        AstKind::Variadic => AstKind::Variadic,
        AstKind::Pointer { to } => AstKind::Pointer { to: dup(src, to, dst) },
        AstKind::Reference { to } => AstKind::Reference { to: dup(src, to, dst) },
        AstKind::RvalueReference { to } => {
            AstKind::RvalueReference { to: dup(src, to, dst) }
        }
        AstKind::PointerToMember { ref class_sname, of } => AstKind::PointerToMember {
            class_sname: class_sname.clone(),
            of: dup(src, of, dst),
        },
        AstKind::Array { of, ref size } => AstKind::Array {
            of: dup(src, of, dst),
            size: size.clone(),
        },
        AstKind::Function { ret, ref params, member } => AstKind::Function {
            ret: dup(src, ret, dst),
            params: params.iter().map(|&p| dup(src, p, dst)).collect(),
            member,
        },
        AstKind::AppleBlock { ret, ref params } => AstKind::AppleBlock {
            ret: dup(src, ret, dst),
            params: params.iter().map(|&p| dup(src, p, dst)).collect(),
        },
        AstKind::Operator { op, ret, ref params, member } => AstKind::Operator {
            op,
            ret: dup(src, ret, dst),
            params: params.iter().map(|&p| dup(src, p, dst)).collect(),
            member,
        },
        AstKind::Constructor { ref params } => AstKind::Constructor {
            params: params.iter().map(|&p| dup(src, p, dst)).collect(),
        },
        AstKind::Destructor => AstKind::Destructor,
        AstKind::UdConversion { to } => AstKind::UdConversion { to: dup(src, to, dst) },
        AstKind::UdLiteral { ret, ref params } => AstKind::UdLiteral {
            ret: dup(src, ret, dst),
            params: params.iter().map(|&p| dup(src, p, dst)).collect(),
        },
        AstKind::Lambda { ref captures, ref params, ret } => AstKind::Lambda {
            captures: captures.iter().map(|&c| dup(src, c, dst)).collect(),
            params: params.iter().map(|&p| dup(src, p, dst)).collect(),
            ret: ret.map(|r| dup(src, r, dst)),
        },
        AstKind::Capture { kind } => AstKind::Capture { kind },
        AstKind::StructuredBinding { ref names } => {
            AstKind::StructuredBinding { names: names.clone() }
        }
        AstKind::Cast { kind, to } => AstKind::Cast { kind, to: dup(src, to, dst) },
    };

    let new_id = dst.alloc(new_kind, node.depth, node.span);
    {
        let n = dst.node_mut(new_id);
        n.sname = node.sname.clone();
        n.tid = node.tid;
        n.align = node.align.clone();
        n.is_param_pack = node.is_param_pack;
        n.dup_from = Some(id);
    }
    // Re-parent duplicated children.
    if dst.node(new_id).kind.is_parent() {
        if let Some(child) = dst.node(new_id).kind.of_id() {
            dst.node_mut(child).parent = Some(new_id);
        }
    }
    if let Some(params) = dst.node(new_id).kind.params().map(|p| p.to_vec()) {
        dst.set_param_of(&params, new_id);
    }
    new_id
}

fn align_equal(a_arena: &AstArena, a: &Alignment, b_arena: &AstArena, b: &Alignment) -> bool {
    match (a, b) {
        (Alignment::None, Alignment::None) => true,
        (Alignment::Bytes(x), Alignment::Bytes(y)) => x == y,
        (Alignment::Sname(x), Alignment::Sname(y)) => x == y,
        (Alignment::Type(x), Alignment::Type(y)) => equal(a_arena, *x, b_arena, *y),
        _ => false,
    }
}

fn lists_equal(a_arena: &AstArena, a: &[AstId], b_arena: &AstArena, b: &[AstId]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b.iter())
            .all(|(&x, &y)| equal(a_arena, x, b_arena, y))
}

/// Structural equality. Names of nested nodes are ignored; kinds whose
/// meaning includes a name (enum, class/struct/union, K&R name, concept,
/// pointer-to-member class, structured binding) compare it.
pub fn equal(a_arena: &AstArena, a: AstId, b_arena: &AstArena, b: AstId) -> bool {
    let an = a_arena.node(a);
    let bn = b_arena.node(b);
    if an.is_param_pack != bn.is_param_pack {
        return false;
    }
    if tid::normalize(an.tid) != tid::normalize(bn.tid) {
        return false;
    }
    if !align_equal(a_arena, &an.align, b_arena, &bn.align) {
        return false;
    }
    match (&an.kind, &bn.kind) {
        (AstKind::Placeholder, AstKind::Placeholder) => true,
        (AstKind::Builtin { bit_width: x }, AstKind::Builtin { bit_width: y }) => x == y,
        (
            AstKind::TypedefRef { def: dx, bit_width: x },
            AstKind::TypedefRef { def: dy, bit_width: y },
        ) => x == y && dx.sname == dy.sname,
        (
            AstKind::Enum { of: ox, bit_width: x },
            AstKind::Enum { of: oy, bit_width: y },
        ) => {
            x == y
                && an.sname == bn.sname
                && match (ox, oy) {
                    (None, None) => true,
                    (Some(p), Some(q)) => equal(a_arena, *p, b_arena, *q),
                    _ => false,
                }
        }
        (AstKind::ClassStructUnion, AstKind::ClassStructUnion) => an.sname == bn.sname,
        (AstKind::Concept, AstKind::Concept) => an.sname == bn.sname,
        (AstKind::Name, AstKind::Name) => an.sname == bn.sname,
        (AstKind::Variadic, AstKind::Variadic) => true,
        (AstKind::Pointer { to: x }, AstKind::Pointer { to: y })
        | (AstKind::Reference { to: x }, AstKind::Reference { to: y })
        | (AstKind::RvalueReference { to: x }, AstKind::RvalueReference { to: y })
        | (AstKind::UdConversion { to: x }, AstKind::UdConversion { to: y }) => {
            equal(a_arena, *x, b_arena, *y)
        }
        (
            AstKind::PointerToMember { class_sname: cx, of: x },
            AstKind::PointerToMember { class_sname: cy, of: y },
        ) => cx == cy && equal(a_arena, *x, b_arena, *y),
        (
            AstKind::Array { of: x, size: sx },
            AstKind::Array { of: y, size: sy },
        ) => sx == sy && equal(a_arena, *x, b_arena, *y),
        (
            AstKind::Function { ret: rx, params: px, member: mx },
            AstKind::Function { ret: ry, params: py, member: my },
        ) => {
            mx == my
                && equal(a_arena, *rx, b_arena, *ry)
                && lists_equal(a_arena, px, b_arena, py)
        }
        (
            AstKind::AppleBlock { ret: rx, params: px },
            AstKind::AppleBlock { ret: ry, params: py },
        ) => equal(a_arena, *rx, b_arena, *ry) && lists_equal(a_arena, px, b_arena, py),
        (
            AstKind::Operator { op: ox, ret: rx, params: px, member: mx },
            AstKind::Operator { op: oy, ret: ry, params: py, member: my },
        ) => {
            ox == oy
                && mx == my
                && equal(a_arena, *rx, b_arena, *ry)
                && lists_equal(a_arena, px, b_arena, py)
        }
        (AstKind::Constructor { params: px }, AstKind::Constructor { params: py }) => {
            lists_equal(a_arena, px, b_arena, py)
        }
        (AstKind::Destructor, AstKind::Destructor) => true,
        (
            AstKind::UdLiteral { ret: rx, params: px },
            AstKind::UdLiteral { ret: ry, params: py },
        ) => equal(a_arena, *rx, b_arena, *ry) && lists_equal(a_arena, px, b_arena, py),
        (
            AstKind::Lambda { captures: cx, params: px, ret: rx },
            AstKind::Lambda { captures: cy, params: py, ret: ry },
        ) => {
            lists_equal(a_arena, cx, b_arena, cy)
                && lists_equal(a_arena, px, b_arena, py)
                && match (rx, ry) {
                    (None, None) => true,
                    (Some(p), Some(q)) => equal(a_arena, *p, b_arena, *q),
                    _ => false,
                }
        }
        (AstKind::Capture { kind: kx }, AstKind::Capture { kind: ky }) => kx == ky,
        (
            AstKind::StructuredBinding { names: nx },
            AstKind::StructuredBinding { names: ny },
        ) => nx == ny,
        (
            AstKind::Cast { kind: kx, to: x },
            AstKind::Cast { kind: ky, to: y },
        ) => kx == ky && equal(a_arena, *x, b_arena, *y),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin(arena: &mut AstArena, bits: TypeId) -> AstId {
        let id = arena.alloc(AstKind::Builtin { bit_width: None }, 0, Span::default());
        arena.node_mut(id).tid = bits;
        id
    }

    #[test]
    fn alloc_starts_with_empty_name_and_type() {
        let mut arena = AstArena::new();
        let id = arena.alloc(AstKind::Placeholder, 0, Span::default());
        assert!(arena.node(id).sname.is_empty());
        assert_eq!(arena.node(id).tid, TypeId::empty());
        assert!(arena.node(id).parent.is_none());
    }

    #[test]
    fn set_parent_links_both_directions() {
        let mut arena = AstArena::new();
        let inner = builtin(&mut arena, TypeId::B_INT);
        let ptr = arena.alloc(AstKind::Pointer { to: inner }, 0, Span::default());
        arena.set_parent(inner, ptr);
        assert_eq!(arena.node(inner).parent, Some(ptr));
        assert_eq!(arena.node(ptr).kind.of_id(), Some(inner));
    }

    #[test]
    fn pack_flag_bubbles_through_non_function_parent() {
        let mut arena = AstArena::new();
        let inner = builtin(&mut arena, TypeId::B_AUTO);
        arena.node_mut(inner).is_param_pack = true;
        let r = arena.alloc(AstKind::Reference { to: inner }, 0, Span::default());
        arena.set_parent(inner, r);
        assert!(!arena.node(inner).is_param_pack);
        assert!(arena.node(r).is_param_pack);
    }

    #[test]
    fn pack_flag_stays_below_function_parent() {
        let mut arena = AstArena::new();
        let ret = builtin(&mut arena, TypeId::B_INT);
        arena.node_mut(ret).is_param_pack = true;
        let f = arena.alloc(
            AstKind::Function { ret, params: vec![], member: FnMember::Unspecified },
            0,
            Span::default(),
        );
        arena.set_parent(ret, f);
        assert!(arena.node(ret).is_param_pack);
        assert!(!arena.node(f).is_param_pack);
    }

    #[test]
    fn visit_down_walks_of_chain() {
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT);
        let ptr = arena.alloc(AstKind::Pointer { to: int }, 0, Span::default());
        arena.set_parent(int, ptr);
        let found = visit(&arena, ptr, VisitDir::Down, |a, id| {
            matches!(a.node(id).kind, AstKind::Builtin { .. })
        });
        assert_eq!(found, Some(int));
    }

    #[test]
    fn visit_up_walks_parent_chain() {
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT);
        let ptr = arena.alloc(AstKind::Pointer { to: int }, 0, Span::default());
        arena.set_parent(int, ptr);
        let found = visit(&arena, int, VisitDir::Up, |a, id| {
            matches!(a.node(id).kind, AstKind::Pointer { .. })
        });
        assert_eq!(found, Some(ptr));
    }

    #[test]
    fn dup_produces_structurally_equal_tree() {
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT | TypeId::Q_CONST);
        let ptr = arena.alloc(AstKind::Pointer { to: int }, 0, Span::default());
        arena.set_parent(int, ptr);
        let arr = arena.alloc(
            AstKind::Array { of: ptr, size: ArrayKind::Fixed(ArraySize::Int(3)) },
            0,
            Span::default(),
        );
        arena.set_parent(ptr, arr);

        let mut copy_arena = AstArena::new();
        let copy = dup(&arena, arr, &mut copy_arena);
        assert!(equal(&arena, arr, &copy_arena, copy));
        assert_eq!(copy_arena.node(copy).dup_from, Some(arr));
    }

    #[test]
    fn dup_reparents_children_in_destination() {
        let mut arena = AstArena::new();
        let int = builtin(&mut arena, TypeId::B_INT);
        let ptr = arena.alloc(AstKind::Pointer { to: int }, 0, Span::default());
        arena.set_parent(int, ptr);

        let mut dst = AstArena::new();
        let copy = dup(&arena, ptr, &mut dst);
        let child = dst.node(copy).kind.of_id().unwrap();
        assert_eq!(dst.node(child).parent, Some(copy));
    }

    #[test]
    fn equal_ignores_nested_names_but_not_tagged_ones() {
        let mut a = AstArena::new();
        let ai = builtin(&mut a, TypeId::B_INT);
        a.node_mut(ai).sname = ScopedName::from("x");
        let mut b = AstArena::new();
        let bi = builtin(&mut b, TypeId::B_INT);
        b.node_mut(bi).sname = ScopedName::from("y");
        assert!(equal(&a, ai, &b, bi));

        let ae = a.alloc(AstKind::Enum { of: None, bit_width: None }, 0, Span::default());
        a.node_mut(ae).sname = ScopedName::from("E1");
        a.node_mut(ae).tid = TypeId::B_ENUM;
        let be = b.alloc(AstKind::Enum { of: None, bit_width: None }, 0, Span::default());
        b.node_mut(be).sname = ScopedName::from("E2");
        b.node_mut(be).tid = TypeId::B_ENUM;
        assert!(!equal(&a, ae, &b, be));
    }

    #[test]
    fn equal_normalizes_types() {
        let mut a = AstArena::new();
        let ai = builtin(&mut a, TypeId::B_SIGNED | TypeId::B_INT);
        let mut b = AstArena::new();
        let bi = builtin(&mut b, TypeId::B_INT);
        assert!(equal(&a, ai, &b, bi));
    }

    #[test]
    fn equal_distinguishes_array_sizes() {
        let mut a = AstArena::new();
        let ai = builtin(&mut a, TypeId::B_INT);
        let aa = a.alloc(
            AstKind::Array { of: ai, size: ArrayKind::Fixed(ArraySize::Int(3)) },
            0,
            Span::default(),
        );
        a.set_parent(ai, aa);
        let mut b = AstArena::new();
        let bi = builtin(&mut b, TypeId::B_INT);
        let ba = b.alloc(
            AstKind::Array { of: bi, size: ArrayKind::Fixed(ArraySize::Int(5)) },
            0,
            Span::default(),
        );
        b.set_parent(bi, ba);
        assert!(!equal(&a, aa, &b, ba));
    }

    #[test]
    fn equal_compares_alignment() {
        let mut a = AstArena::new();
        let ai = builtin(&mut a, TypeId::B_INT);
        a.node_mut(ai).align = Alignment::Bytes(8);
        let mut b = AstArena::new();
        let bi = builtin(&mut b, TypeId::B_INT);
        assert!(!equal(&a, ai, &b, bi));
        b.node_mut(bi).align = Alignment::Bytes(8);
        assert!(equal(&a, ai, &b, bi));
        a.node_mut(ai).align = Alignment::Sname(ScopedName::from("max_align_t"));
        assert!(!equal(&a, ai, &b, bi));
    }

    #[test]
    fn arena_accounting_reaches_zero() {
        let before = live_nodes();
        {
            let mut arena = AstArena::new();
            for _ in 0..10 {
                arena.alloc(AstKind::Placeholder, 0, Span::default());
            }
            assert_eq!(live_nodes(), before + 10);
        }
        assert_eq!(live_nodes(), before);
    }

    #[test]
    fn set_param_of_records_owner() {
        let mut arena = AstArena::new();
        let p = builtin(&mut arena, TypeId::B_CHAR);
        let ret = builtin(&mut arena, TypeId::B_INT);
        let f = arena.alloc(
            AstKind::Function { ret, params: vec![p], member: FnMember::Unspecified },
            0,
            Span::default(),
        );
        arena.set_param_of(&[p], f);
        assert_eq!(arena.node(p).param_of, Some(f));
    }
}
