//! The macro store: user definitions plus language-gated built-ins.
//!
//! An ordered map gives log-time lookup and lexicographic iteration in one
//! structure. Built-in macros are either fixed object-like replacements or
//! dynamic: a function of the active language, evaluated at expansion time
//! so a `set` of the language never has to rebuild the store.

use super::token::{self, PToken, PTokenKind};
use crate::lang::Lang;
use crate::token::Span;
use std::collections::BTreeMap;

pub type DynFn = fn(Lang) -> Vec<PToken>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroKind {
    Object,
    Function { params: Vec<String>, variadic: bool },
    Dynamic(DynFn),
}

#[derive(Debug, Clone)]
pub struct Macro {
    pub name: String,
    pub kind: MacroKind,
    pub replace: Vec<PToken>,
    /// Languages in which the macro is defined.
    pub lang: Lang,
    pub predefined: bool,
}

impl Macro {
    pub fn object(name: impl Into<String>, replace: Vec<PToken>) -> Self {
        Macro {
            name: name.into(),
            kind: MacroKind::Object,
            replace,
            lang: Lang::ANY,
            predefined: false,
        }
    }

    pub fn function(
        name: impl Into<String>,
        params: Vec<String>,
        variadic: bool,
        replace: Vec<PToken>,
    ) -> Self {
        Macro {
            name: name.into(),
            kind: MacroKind::Function { params, variadic },
            replace,
            lang: Lang::ANY,
            predefined: false,
        }
    }

    fn dynamic(name: &str, lang: Lang, f: DynFn) -> Self {
        Macro {
            name: name.to_string(),
            kind: MacroKind::Dynamic(f),
            replace: Vec::new(),
            lang,
            predefined: true,
        }
    }

    /// Normalized replacement spelling, used to decide whether a
    /// redefinition is identical.
    fn signature(&self) -> String {
        let mut rep = self.replace.clone();
        token::trim(&mut rep);
        let params = match &self.kind {
            MacroKind::Object => String::new(),
            MacroKind::Function { params, variadic } => {
                format!("({}{})", params.join(","), if *variadic { ",..." } else { "" })
            }
            MacroKind::Dynamic(_) => "<dynamic>".to_string(),
        };
        format!("{}{}", params, token::list_str(&rep))
    }
}

fn num(value: &str) -> Vec<PToken> {
    vec![PToken::new(PTokenKind::NumLit(value.to_string()), Span::default())]
}

fn stdc_version(lang: Lang) -> Vec<PToken> {
    let v = match lang {
        l if l == Lang::C_95 => "199409L",
        l if l == Lang::C_99 => "199901L",
        l if l == Lang::C_11 => "201112L",
        l if l == Lang::C_17 => "201710L",
        l if l == Lang::C_23 => "202311L",
        _ => return Vec::new(),
    };
    num(v)
}

fn cplusplus(lang: Lang) -> Vec<PToken> {
    let v = match lang {
        l if l == Lang::CPP_98 || l == Lang::CPP_03 => "199711L",
        l if l == Lang::CPP_11 => "201103L",
        l if l == Lang::CPP_14 => "201402L",
        l if l == Lang::CPP_17 => "201703L",
        l if l == Lang::CPP_20 => "202002L",
        l if l == Lang::CPP_23 => "202302L",
        _ => return Vec::new(),
    };
    num(v)
}

#[derive(Debug, Default)]
pub struct MacroStore {
    map: BTreeMap<String, Macro>,
}

impl MacroStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with the built-in predefined macros installed.
    pub fn with_predefined() -> Self {
        let mut store = MacroStore::new();
        let mut stdc = Macro::object("__STDC__", num("1"));
        stdc.lang = Lang::min(Lang::C_89) & Lang::C_ANY;
        stdc.predefined = true;
        store.map.insert(stdc.name.clone(), stdc);

        let mut hosted = Macro::object("__STDC_HOSTED__", num("1"));
        hosted.lang = Lang::c_min(Lang::C_99);
        hosted.predefined = true;
        store.map.insert(hosted.name.clone(), hosted);

        let version = Macro::dynamic("__STDC_VERSION__", Lang::c_min(Lang::C_95), stdc_version);
        store.map.insert(version.name.clone(), version);

        let cpp = Macro::dynamic("__cplusplus", Lang::CPP_ANY, cplusplus);
        store.map.insert(cpp.name.clone(), cpp);

        store
    }

    /// Define a macro. Identical redefinition is permitted; anything else
    /// is rejected, as is shadowing a predefined macro.
    pub fn define(&mut self, mac: Macro) -> Result<(), String> {
        if let Some(existing) = self.map.get(&mac.name) {
            if existing.predefined {
                return Err(format!("\"{}\": predefined macro may not be redefined", mac.name));
            }
            if existing.signature() == mac.signature() {
                return Ok(());
            }
            return Err(format!("\"{}\": macro redefinition differs", mac.name));
        }
        self.map.insert(mac.name.clone(), mac);
        Ok(())
    }

    pub fn undef(&mut self, name: &str) -> Result<bool, String> {
        if let Some(existing) = self.map.get(name) {
            if existing.predefined {
                return Err(format!("\"{}\": predefined macro may not be undefined", name));
            }
        }
        Ok(self.map.remove(name).is_some())
    }

    pub fn find(&self, name: &str) -> Option<&Macro> {
        self.map.get(name)
    }

    /// Lookup restricted to macros defined in `lang`.
    pub fn find_in(&self, name: &str, lang: Lang) -> Option<&Macro> {
        self.map.get(name).filter(|m| m.lang.contains(lang))
    }

    /// Lexicographic iteration.
    pub fn iter(&self) -> impl Iterator<Item = &Macro> {
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
    use crate::preproc::token::lex;

    fn toks(s: &str) -> Vec<PToken> {
        lex(s, Lang::C_23, 0).unwrap()
    }

    #[test]
    fn define_and_find() {
        let mut store = MacroStore::new();
        store.define(Macro::object("ONE", toks("1"))).unwrap();
        assert!(store.find("ONE").is_some());
        assert!(store.find("TWO").is_none());
    }

    #[test]
    fn identical_redefinition_is_permitted() {
        let mut store = MacroStore::new();
        store.define(Macro::object("ONE", toks("1"))).unwrap();
        store.define(Macro::object("ONE", toks(" 1 "))).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn differing_redefinition_is_rejected() {
        let mut store = MacroStore::new();
        store.define(Macro::object("ONE", toks("1"))).unwrap();
        let err = store.define(Macro::object("ONE", toks("2"))).unwrap_err();
        assert!(err.contains("redefinition"), "{}", err);
    }

    #[test]
    fn predefined_macros_are_protected() {
        let mut store = MacroStore::with_predefined();
        assert!(store.define(Macro::object("__STDC__", toks("0"))).is_err());
        assert!(store.undef("__STDC__").is_err());
    }

    #[test]
    fn undef_removes_user_macro() {
        let mut store = MacroStore::new();
        store.define(Macro::object("ONE", toks("1"))).unwrap();
        assert_eq!(store.undef("ONE"), Ok(true));
        assert_eq!(store.undef("ONE"), Ok(false));
    }

    #[test]
    fn builtins_are_language_gated() {
        let store = MacroStore::with_predefined();
        assert!(store.find_in("__STDC__", Lang::C_99).is_some());
        assert!(store.find_in("__STDC__", Lang::CPP_17).is_none());
        assert!(store.find_in("__cplusplus", Lang::CPP_17).is_some());
        assert!(store.find_in("__cplusplus", Lang::C_99).is_none());
    }

    #[test]
    fn dynamic_macro_tracks_language() {
        assert_eq!(token::list_str(&stdc_version(Lang::C_99)), "199901L");
        assert_eq!(token::list_str(&stdc_version(Lang::C_23)), "202311L");
        assert_eq!(token::list_str(&cplusplus(Lang::CPP_20)), "202002L");
    }

    #[test]
    fn iteration_is_lexicographic() {
        let mut store = MacroStore::new();
        store.define(Macro::object("B", toks("2"))).unwrap();
        store.define(Macro::object("A", toks("1"))).unwrap();
        let names: Vec<&str> = store.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
