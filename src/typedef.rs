//! The typedef table.
//!
//! Each typedef owns a small arena holding the AST of its underlying type;
//! declarations that use the name hold an `Rc` to the entry, never a parent
//! link, so one body is shared by every reference. Predefined names are
//! installed at startup gated by language; `define` adds user entries.

use crate::ast::{self, AstArena, AstId, AstKind};
use crate::lang::Lang;
use crate::sname::ScopedName;
use crate::tid::TypeId;
use crate::token::Span;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Typedef {
    pub sname: ScopedName,
    pub arena: AstArena,
    pub root: AstId,
    /// Languages in which this name is defined.
    pub lang: Lang,
    pub user_defined: bool,
}

#[derive(Debug, Default)]
pub struct TypedefTable {
    map: BTreeMap<String, Rc<Typedef>>,
}

fn builtin_typedef(name: &str, tid: TypeId, lang: Lang) -> Typedef {
    let mut arena = AstArena::new();
    let root = arena.alloc(AstKind::Builtin { bit_width: None }, 0, Span::default());
    arena.node_mut(root).tid = tid;
    Typedef {
        sname: ScopedName::from(name),
        arena,
        root,
        lang,
        user_defined: false,
    }
}

fn record_typedef(name: &str, tag_tid: TypeId, lang: Lang) -> Typedef {
    let mut arena = AstArena::new();
    let root = arena.alloc(AstKind::ClassStructUnion, 0, Span::default());
    arena.node_mut(root).tid = tag_tid;
    arena.node_mut(root).sname = ScopedName::from(name);
    Typedef {
        sname: ScopedName::from(name),
        arena,
        root,
        lang,
        user_defined: false,
    }
}

impl TypedefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-loaded with the standard names, each gated by the
    /// language that introduces it.
    pub fn with_predefined() -> Self {
        let since_c99 = Lang::c_min(Lang::C_99) | Lang::CPP_ANY;
        let mut table = TypedefTable::new();
        let predefined = [
            builtin_typedef("size_t", TypeId::B_UNSIGNED | TypeId::B_LONG, Lang::min(Lang::C_89)),
            builtin_typedef("ssize_t", TypeId::B_LONG, Lang::min(Lang::C_89)),
            builtin_typedef("ptrdiff_t", TypeId::B_LONG, Lang::min(Lang::C_89)),
            builtin_typedef("intptr_t", TypeId::B_LONG, since_c99),
            builtin_typedef("uintptr_t", TypeId::B_UNSIGNED | TypeId::B_LONG, since_c99),
            builtin_typedef("intmax_t", TypeId::B_LONG_LONG, since_c99),
            builtin_typedef("int8_t", TypeId::B_SIGNED | TypeId::B_CHAR, since_c99),
            builtin_typedef("uint8_t", TypeId::B_UNSIGNED | TypeId::B_CHAR, since_c99),
            builtin_typedef("int16_t", TypeId::B_SHORT, since_c99),
            builtin_typedef("uint16_t", TypeId::B_UNSIGNED | TypeId::B_SHORT, since_c99),
            builtin_typedef("int32_t", TypeId::B_INT, since_c99),
            builtin_typedef("uint32_t", TypeId::B_UNSIGNED | TypeId::B_INT, since_c99),
            builtin_typedef("int64_t", TypeId::B_LONG_LONG, since_c99),
            builtin_typedef("uint64_t", TypeId::B_UNSIGNED | TypeId::B_LONG_LONG, since_c99),
            record_typedef("FILE", TypeId::B_STRUCT, Lang::min(Lang::C_89)),
            record_typedef("std::string", TypeId::B_CLASS, Lang::CPP_ANY),
            record_typedef("std::ostream", TypeId::B_CLASS, Lang::CPP_ANY),
        ];
        for td in predefined {
            let key = td.sname.to_string();
            table.map.insert(key, Rc::new(td));
        }
        table
    }

    /// Install a typedef. Redefinition is rejected unless the new body is
    /// structurally equal to the old one.
    pub fn define(&mut self, td: Typedef) -> Result<(), String> {
        let key = td.sname.to_string();
        if let Some(existing) = self.map.get(&key) {
            if ast::equal(&existing.arena, existing.root, &td.arena, td.root) {
                return Ok(());
            }
            return Err(format!("\"{}\": typedef redefinition with different type", key));
        }
        self.map.insert(key, Rc::new(td));
        Ok(())
    }

    pub fn undef(&mut self, name: &str) -> bool {
        self.map.remove(name).is_some()
    }

    pub fn find(&self, name: &str) -> Option<&Rc<Typedef>> {
        self.map.get(name)
    }

    /// Whether `name` resolves to a typedef visible in `lang`.
    pub fn find_in(&self, name: &str, lang: Lang) -> Option<&Rc<Typedef>> {
        self.map.get(name).filter(|td| td.lang.contains(lang))
    }

    /// Lexicographic iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Typedef>> {
        self.map.values()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_size_t_is_unsigned_long() {
        let table = TypedefTable::with_predefined();
        let td = table.find("size_t").unwrap();
        assert!(crate::tid::is_size_t(td.arena.node(td.root).tid));
    }

    #[test]
    fn find_in_respects_language_gate() {
        let table = TypedefTable::with_predefined();
        assert!(table.find_in("int8_t", Lang::C_99).is_some());
        assert!(table.find_in("int8_t", Lang::C_89).is_none());
        assert!(table.find_in("std::string", Lang::CPP_17).is_some());
        assert!(table.find_in("std::string", Lang::C_17).is_none());
    }

    #[test]
    fn define_accepts_identical_redefinition() {
        let mut table = TypedefTable::new();
        table.define(builtin_typedef("myint", TypeId::B_INT, Lang::ANY)).unwrap();
        table.define(builtin_typedef("myint", TypeId::B_INT, Lang::ANY)).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn define_rejects_conflicting_redefinition() {
        let mut table = TypedefTable::new();
        table.define(builtin_typedef("myint", TypeId::B_INT, Lang::ANY)).unwrap();
        let err = table
            .define(builtin_typedef("myint", TypeId::B_CHAR, Lang::ANY))
            .unwrap_err();
        assert!(err.contains("redefinition"), "{}", err);
    }

    #[test]
    fn undef_removes_entry() {
        let mut table = TypedefTable::new();
        table.define(builtin_typedef("myint", TypeId::B_INT, Lang::ANY)).unwrap();
        assert!(table.undef("myint"));
        assert!(!table.undef("myint"));
        assert!(table.find("myint").is_none());
    }

    #[test]
    fn iteration_is_lexicographic() {
        let table = TypedefTable::with_predefined();
        let names: Vec<String> = table.iter().map(|t| t.sname.to_string()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
