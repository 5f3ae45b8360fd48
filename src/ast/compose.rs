//! Declarator composition.
//!
//! The parser builds the type AST and the declarator AST separately; the
//! declarator side grows by splicing array, function, and pointer nodes onto
//! a spine that always ends in a placeholder. `patch_placeholder` finally
//! swaps the type AST into that terminal slot and hoists any storage class
//! onto the declaration root, so `static int f()` reads as a static function
//! rather than a function returning "static int".

use super::{visit, AstArena, AstId, AstKind, VisitDir};
use crate::tid::TypeId;

/// Find the terminal placeholder of a declarator spine, if any.
pub fn find_placeholder(arena: &AstArena, root: AstId) -> Option<AstId> {
    visit(arena, root, VisitDir::Down, |a, id| {
        matches!(a.node(id).kind, AstKind::Placeholder)
    })
}

/// Walk the spine from `root` to the node the new `node_depth`-deep wrapper
/// should replace. Arrays and functions are always stepped through; a
/// pointer is stepped through only while it is deeper than the node being
/// added, which is what turns `(*(*x)[3])[5]` into alternating
/// pointer-array layers instead of stacking both arrays together.
fn splice_target(arena: &AstArena, root: AstId, node_depth: u32) -> AstId {
    let mut cur = root;
    loop {
        let node = arena.node(cur);
        let step = match &node.kind {
            AstKind::Placeholder => break,
            AstKind::Pointer { to }
            | AstKind::Reference { to }
            | AstKind::RvalueReference { to } => {
                if node.depth > node_depth {
                    Some(*to)
                } else {
                    None
                }
            }
            other => other.of_id(),
        };
        match step {
            Some(next) => cur = next,
            None => break,
        }
    }
    cur
}

/// Splice `new_node` into the spine at the terminal placeholder (or wrap the
/// shallower node when depths say so), keeping the placeholder as the new
/// node's `of` target. Returns the new root.
fn splice(arena: &mut AstArena, root: AstId, new_node: AstId) -> AstId {
    let target = splice_target(arena, root, arena.node(new_node).depth);
    let parent = arena.node(target).parent;
    match parent {
        Some(p) => {
            arena.set_parent(new_node, p);
            arena.set_parent(target, new_node);
            root
        }
        None => {
            arena.set_parent(target, new_node);
            new_node
        }
    }
}

/// Splice a fresh array node (its `of` is a placeholder) into `root`.
/// If `root` is already an array chain the new array appends after it, so
/// `x[3][5]` reads "array 3 of array 5". Returns the new root.
pub fn add_array(arena: &mut AstArena, root: AstId, array: AstId) -> AstId {
    debug_assert!(matches!(arena.node(array).kind, AstKind::Array { .. }));
    splice(arena, root, array)
}

/// Splice a fresh function node into `root`; the spine placeholder becomes
/// the function's return slot, to be patched with the real return type.
/// A function with no declared name takes the name found on the spine.
pub fn add_func(arena: &mut AstArena, root: AstId, func: AstId) -> AstId {
    debug_assert!(arena.node(func).kind.is_function_like());
    splice(arena, root, func)
}

/// Splice a pointer, reference, or rvalue-reference layer into `root`.
pub fn add_pointer(arena: &mut AstArena, root: AstId, ptr: AstId) -> AstId {
    debug_assert!(matches!(
        arena.node(ptr).kind,
        AstKind::Pointer { .. }
            | AstKind::Reference { .. }
            | AstKind::RvalueReference { .. }
            | AstKind::PointerToMember { .. }
    ));
    splice(arena, root, ptr)
}

/// Replace the declarator's terminal placeholder with the parsed type AST.
/// The declarator's name (held by the placeholder until now) moves to the
/// declaration root, and any storage class on the type moves with it.
/// Returns the root of the finished declaration.
pub fn patch_placeholder(arena: &mut AstArena, type_root: AstId, decl_root: AstId) -> AstId {
    let hole = match find_placeholder(arena, decl_root) {
        Some(h) => h,
        None => return decl_root,
    };
    let name = std::mem::take(&mut arena.node_mut(hole).sname);
    let quals = arena.node(hole).tid;

    let root = if hole == decl_root {
        type_root
    } else {
        let parent = arena.node(hole).parent.expect("non-root placeholder has a parent");
        arena.set_parent(type_root, parent);
        decl_root
    };

    if !name.is_empty() && arena.node(root).sname.is_empty() {
        arena.node_mut(root).sname = name;
    }
    // Qualifiers parsed onto the placeholder (e.g. `* const`) belong to the
    // node that replaced it.
    if hole != decl_root {
        let tid = arena.node(type_root).tid;
        arena.node_mut(type_root).tid = tid | quals;
    } else {
        let tid = arena.node(root).tid;
        arena.node_mut(root).tid = tid | quals;
    }

    // Storage hoist: a storage class spelled on the type belongs to the
    // declaration itself.
    if root != type_root {
        let storage = arena.node(type_root).tid & TypeId::ANY_STORAGE_CLASS;
        let annotations =
            arena.node(type_root).tid & (TypeId::PART_STORE - TypeId::ANY_STORAGE_CLASS);
        if !storage.is_empty() || !annotations.is_empty() {
            let t = arena.node(type_root).tid;
            arena.node_mut(type_root).tid = t - (storage | annotations);
            let r = arena.node(root).tid;
            arena.node_mut(root).tid = r | storage | annotations;
        }
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArrayKind, ArraySize, FnMember};
    use crate::sname::ScopedName;
    use crate::token::Span;

    fn placeholder(arena: &mut AstArena, name: &str, depth: u32) -> AstId {
        let id = arena.alloc(AstKind::Placeholder, depth, Span::default());
        if !name.is_empty() {
            arena.node_mut(id).sname = ScopedName::from(name);
        }
        id
    }

    fn array(arena: &mut AstArena, n: u64, depth: u32) -> AstId {
        let hole = placeholder(arena, "", depth);
        let id = arena.alloc(
            AstKind::Array { of: hole, size: ArrayKind::Fixed(ArraySize::Int(n)) },
            depth,
            Span::default(),
        );
        arena.set_parent(hole, id);
        id
    }

    fn pointer(arena: &mut AstArena, depth: u32) -> AstId {
        let hole = placeholder(arena, "", depth);
        let id = arena.alloc(AstKind::Pointer { to: hole }, depth, Span::default());
        arena.set_parent(hole, id);
        id
    }

    fn int_type(arena: &mut AstArena, extra: TypeId) -> AstId {
        let id = arena.alloc(AstKind::Builtin { bit_width: None }, 0, Span::default());
        arena.node_mut(id).tid = TypeId::B_INT | extra;
        id
    }

    fn chain(arena: &AstArena, root: AstId) -> Vec<&'static str> {
        let mut out = Vec::new();
        visit(arena, root, VisitDir::Down, |a, id| {
            out.push(a.node(id).kind.noun());
            false
        });
        out
    }

    #[test]
    fn two_arrays_append_in_source_order() {
        // x[3][5]: array 3 of array 5 of int.
        let mut arena = AstArena::new();
        let name = placeholder(&mut arena, "x", 0);
        let a3 = array(&mut arena, 3, 0);
        let root = add_array(&mut arena, name, a3);
        let a5 = array(&mut arena, 5, 0);
        let root = add_array(&mut arena, root, a5);
        let ty = int_type(&mut arena, TypeId::empty());
        let root = patch_placeholder(&mut arena, ty, root);

        assert_eq!(chain(&arena, root), ["array", "array", "built-in type"]);
        match (&arena.node(root).kind, &arena.node(root).sname) {
            (AstKind::Array { size: ArrayKind::Fixed(ArraySize::Int(3)), .. }, s) => {
                assert_eq!(s.to_string(), "x")
            }
            other => panic!("unexpected root {:?}", other),
        }
    }

    #[test]
    fn array_of_pointer_via_hole() {
        // *x[3]: the pointer is parsed first but lands inside the array.
        let mut arena = AstArena::new();
        let name = placeholder(&mut arena, "x", 0);
        let a3 = array(&mut arena, 3, 0);
        let root = add_array(&mut arena, name, a3);
        let p = pointer(&mut arena, 0);
        let root = add_pointer(&mut arena, root, p);
        let ty = int_type(&mut arena, TypeId::empty());
        let root = patch_placeholder(&mut arena, ty, root);

        assert_eq!(chain(&arena, root), ["array", "pointer", "built-in type"]);
    }

    #[test]
    fn pointer_to_array_with_parens() {
        // (*x)[3]: pointer at depth 1, array at depth 0.
        let mut arena = AstArena::new();
        let name = placeholder(&mut arena, "x", 1);
        let p = pointer(&mut arena, 1);
        let root = add_pointer(&mut arena, name, p);
        let a3 = array(&mut arena, 3, 0);
        let root = add_array(&mut arena, root, a3);
        let ty = int_type(&mut arena, TypeId::empty());
        let root = patch_placeholder(&mut arena, ty, root);

        assert_eq!(chain(&arena, root), ["pointer", "array", "built-in type"]);
    }

    #[test]
    fn alternating_pointer_array_layers() {
        // (*(*x)[3])[5]: pointer to array 3 of pointer to array 5 of int.
        let mut arena = AstArena::new();
        let name = placeholder(&mut arena, "x", 2);
        let p1 = pointer(&mut arena, 2);
        let root = add_pointer(&mut arena, name, p1);
        let a3 = array(&mut arena, 3, 1);
        let root = add_array(&mut arena, root, a3);
        let p2 = pointer(&mut arena, 1);
        let root = add_pointer(&mut arena, root, p2);
        let a5 = array(&mut arena, 5, 0);
        let root = add_array(&mut arena, root, a5);
        let ty = int_type(&mut arena, TypeId::empty());
        let root = patch_placeholder(&mut arena, ty, root);

        assert_eq!(
            chain(&arena, root),
            ["pointer", "array", "pointer", "array", "built-in type"]
        );
    }

    #[test]
    fn function_takes_name_and_placeholder_becomes_return_slot() {
        let mut arena = AstArena::new();
        let name = placeholder(&mut arena, "f", 0);
        let f = {
            let hole = placeholder(&mut arena, "", 0);
            let id = arena.alloc(
                AstKind::Function { ret: hole, params: vec![], member: FnMember::Unspecified },
                0,
                Span::default(),
            );
            arena.set_parent(hole, id);
            id
        };
        let root = add_func(&mut arena, name, f);
        let ty = int_type(&mut arena, TypeId::empty());
        let root = patch_placeholder(&mut arena, ty, root);

        assert_eq!(chain(&arena, root), ["function", "built-in type"]);
        assert_eq!(arena.node(root).sname.to_string(), "f");
    }

    #[test]
    fn storage_hoists_from_return_type_to_function() {
        // static int f(): the function is static, the int is not.
        let mut arena = AstArena::new();
        let name = placeholder(&mut arena, "f", 0);
        let f = {
            let hole = placeholder(&mut arena, "", 0);
            let id = arena.alloc(
                AstKind::Function { ret: hole, params: vec![], member: FnMember::Unspecified },
                0,
                Span::default(),
            );
            arena.set_parent(hole, id);
            id
        };
        let root = add_func(&mut arena, name, f);
        let ty = int_type(&mut arena, TypeId::S_STATIC);
        let root = patch_placeholder(&mut arena, ty, root);

        assert!(arena.node(root).tid.contains(TypeId::S_STATIC));
        let ret = arena.node(root).kind.of_id().unwrap();
        assert!(!arena.node(ret).tid.contains(TypeId::S_STATIC));
    }

    #[test]
    fn bare_name_patch_moves_name_onto_type() {
        let mut arena = AstArena::new();
        let name = placeholder(&mut arena, "x", 0);
        let ty = int_type(&mut arena, TypeId::empty());
        let root = patch_placeholder(&mut arena, ty, name);
        assert_eq!(root, ty);
        assert_eq!(arena.node(root).sname.to_string(), "x");
    }

    #[test]
    fn placeholder_qualifiers_transfer_on_patch() {
        // `* const x` leaves const on the placeholder; the pointee type
        // must not lose it.
        let mut arena = AstArena::new();
        let name = placeholder(&mut arena, "p", 0);
        arena.node_mut(name).tid = TypeId::Q_CONST;
        let ty = int_type(&mut arena, TypeId::empty());
        let root = patch_placeholder(&mut arena, ty, name);
        assert!(arena.node(root).tid.contains(TypeId::Q_CONST));
    }
}
