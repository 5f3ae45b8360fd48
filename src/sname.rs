//! Scoped names: `std::vector::iterator` as an ordered component list.
//!
//! Each component remembers what kind of scope it names (class, struct,
//! union, namespace, or the generic `scope` for an undeclared outer name),
//! which the printers use to re-emit `namespace std { ... }`-style context.

use crate::tid::TypeId;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeComponent {
    pub name: String,
    /// One of the scope-type base bits, or empty when unknown.
    pub tid: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopedName {
    components: Vec<ScopeComponent>,
}

impl ScopedName {
    pub fn new() -> Self {
        Self { components: Vec::new() }
    }

    /// A one-component name with no scope type.
    pub fn from_name(name: impl Into<String>) -> Self {
        let mut sname = Self::new();
        sname.append(name.into(), TypeId::empty());
        sname
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn count(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[ScopeComponent] {
        &self.components
    }

    /// The rightmost (unqualified) component, if any.
    pub fn local_name(&self) -> Option<&str> {
        self.components.last().map(|c| c.name.as_str())
    }

    /// Everything but the rightmost component.
    pub fn scope_of(&self) -> ScopedName {
        let mut s = self.clone();
        s.components.pop();
        s
    }

    pub fn first(&self) -> Option<&ScopeComponent> {
        self.components.first()
    }

    pub fn append(&mut self, name: String, tid: TypeId) {
        self.components.push(ScopeComponent { name, tid });
    }

    pub fn prepend(&mut self, name: String, tid: TypeId) {
        self.components.insert(0, ScopeComponent { name, tid });
    }

    /// Set the scope type of the rightmost component.
    pub fn set_local_tid(&mut self, tid: TypeId) {
        if let Some(c) = self.components.last_mut() {
            c.tid = tid;
        }
    }
}

impl fmt::Display for ScopedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, "::")?;
            }
            write!(f, "{}", c.name)?;
        }
        Ok(())
    }
}

impl PartialOrd for ScopedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScopedName {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut a = self.components.iter();
        let mut b = other.components.iter();
        loop {
            match (a.next(), b.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(x), Some(y)) => match x.name.cmp(&y.name) {
                    Ordering::Equal => continue,
                    ord => return ord,
                },
            }
        }
    }
}

impl From<&str> for ScopedName {
    /// Parse a `::`-separated spelling; scope types are left empty.
    fn from(s: &str) -> Self {
        let mut sname = ScopedName::new();
        for part in s.split("::").filter(|p| !p.is_empty()) {
            sname.append(part.to_string(), TypeId::empty());
        }
        sname
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_with_colons() {
        let sname = ScopedName::from("std::vector");
        assert_eq!(sname.to_string(), "std::vector");
    }

    #[test]
    fn local_name_is_rightmost() {
        let sname = ScopedName::from("a::b::c");
        assert_eq!(sname.local_name(), Some("c"));
        assert_eq!(sname.scope_of().to_string(), "a::b");
    }

    #[test]
    fn equality_is_component_wise() {
        assert_eq!(ScopedName::from("x::y"), ScopedName::from("x::y"));
        assert_ne!(ScopedName::from("x::y"), ScopedName::from("x"));
    }

    #[test]
    fn ordering_is_total_and_lexicographic() {
        let a = ScopedName::from("alpha");
        let b = ScopedName::from("beta");
        let ab = ScopedName::from("alpha::beta");
        assert!(a < b);
        assert!(a < ab);
        assert!(ab < b);
    }

    #[test]
    fn set_local_tid_marks_scope_kind() {
        let mut sname = ScopedName::from("S");
        sname.set_local_tid(TypeId::B_STRUCT);
        assert_eq!(sname.components()[0].tid, TypeId::B_STRUCT);
    }

    #[test]
    fn empty_name_displays_empty() {
        assert_eq!(ScopedName::new().to_string(), "");
        assert!(ScopedName::new().is_empty());
    }
}
