//! Language-version bitset.
//!
//! Every C and C++ version the tool knows about is one bit; feature gates
//! throughout the crate are `Lang` values, and validation intersects them
//! with the single active version. The Embedded-C and UPC extension bits sit
//! outside the version ordering and outside the `C_ANY`/`CPP_ANY` masks so
//! that range arithmetic never picks them up by accident.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Lang: u32 {
        const C_KNR  = 1 << 0;
        const C_89   = 1 << 1;
        const C_95   = 1 << 2;
        const C_99   = 1 << 3;
        const C_11   = 1 << 4;
        const C_17   = 1 << 5;
        const C_23   = 1 << 6;

        // Extension dialects, orthogonal to the version ordering.
        const C_EMC  = 1 << 8;
        const C_UPC  = 1 << 9;

        const CPP_98 = 1 << 16;
        const CPP_03 = 1 << 17;
        const CPP_11 = 1 << 18;
        const CPP_14 = 1 << 19;
        const CPP_17 = 1 << 20;
        const CPP_20 = 1 << 21;
        const CPP_23 = 1 << 22;
    }
}

/// Version bits in chronological order, C first then C++. Extension bits are
/// deliberately absent: `min`/`max`/`range` walk this list.
const ORDERED: &[Lang] = &[
    Lang::C_KNR,
    Lang::C_89,
    Lang::C_95,
    Lang::C_99,
    Lang::C_11,
    Lang::C_17,
    Lang::C_23,
    Lang::CPP_98,
    Lang::CPP_03,
    Lang::CPP_11,
    Lang::CPP_14,
    Lang::CPP_17,
    Lang::CPP_20,
    Lang::CPP_23,
];

impl Lang {
    pub const C_ANY: Lang = Lang::C_KNR
        .union(Lang::C_89)
        .union(Lang::C_95)
        .union(Lang::C_99)
        .union(Lang::C_11)
        .union(Lang::C_17)
        .union(Lang::C_23);

    pub const CPP_ANY: Lang = Lang::CPP_98
        .union(Lang::CPP_03)
        .union(Lang::CPP_11)
        .union(Lang::CPP_14)
        .union(Lang::CPP_17)
        .union(Lang::CPP_20)
        .union(Lang::CPP_23);

    pub const ANY: Lang = Lang::C_ANY.union(Lang::CPP_ANY);

    /// All versions at or after the oldest version in `l`, across both
    /// families. `Lang::min(Lang::C_99)` reads "since C99 (and in all C++)".
    pub fn min(l: Lang) -> Lang {
        let mut out = Lang::empty();
        let mut seen = false;
        for &v in ORDERED {
            if !seen && l.intersects(v) {
                seen = true;
            }
            if seen {
                out |= v;
            }
        }
        out
    }

    /// All versions at or before the newest version in `l`.
    pub fn max(l: Lang) -> Lang {
        let mut out = Lang::empty();
        let mut seen = false;
        for &v in ORDERED.iter().rev() {
            if !seen && l.intersects(v) {
                seen = true;
            }
            if seen {
                out |= v;
            }
        }
        out
    }

    /// Versions from `lo` through `hi` inclusive.
    pub fn range(lo: Lang, hi: Lang) -> Lang {
        Lang::min(lo) & Lang::max(hi)
    }

    /// `min` restricted to the C family.
    pub fn c_min(l: Lang) -> Lang {
        Lang::min(l) & Lang::C_ANY
    }

    /// `min` restricted to the C++ family.
    pub fn cpp_min(l: Lang) -> Lang {
        Lang::min(l) & Lang::CPP_ANY
    }

    /// The oldest version bit present, if any.
    pub fn oldest(self) -> Option<Lang> {
        ORDERED.iter().copied().find(|&v| self.intersects(v))
    }

    /// The newest version bit present, if any.
    pub fn newest(self) -> Option<Lang> {
        ORDERED.iter().rev().copied().find(|&v| self.intersects(v))
    }

    pub fn is_c(self) -> bool {
        self.intersects(Lang::C_ANY)
    }

    pub fn is_cpp(self) -> bool {
        self.intersects(Lang::CPP_ANY)
    }

    /// True when every version bit present belongs to a single family.
    pub fn is_one_family(self) -> bool {
        self.is_c() != self.is_cpp()
    }

    /// Canonical display name; only meaningful for a single version bit.
    pub fn name(self) -> &'static str {
        match self {
            l if l == Lang::C_KNR => "K&R C",
            l if l == Lang::C_89 => "C89",
            l if l == Lang::C_95 => "C95",
            l if l == Lang::C_99 => "C99",
            l if l == Lang::C_11 => "C11",
            l if l == Lang::C_17 => "C17",
            l if l == Lang::C_23 => "C23",
            l if l == Lang::CPP_98 => "C++98",
            l if l == Lang::CPP_03 => "C++03",
            l if l == Lang::CPP_11 => "C++11",
            l if l == Lang::CPP_14 => "C++14",
            l if l == Lang::CPP_17 => "C++17",
            l if l == Lang::CPP_20 => "C++20",
            l if l == Lang::CPP_23 => "C++23",
            _ => "?",
        }
    }

    /// Parse a user spelling of a language version.
    pub fn find(name: &str) -> Option<Lang> {
        let lower = name.to_lowercase();
        let lang = match lower.as_str() {
            "knr" | "k&r" | "k&rc" | "knrc" => Lang::C_KNR,
            "c" => Lang::C_23,
            "c89" | "c90" | "ansi" => Lang::C_89,
            "c95" => Lang::C_95,
            "c99" => Lang::C_99,
            "c11" => Lang::C_11,
            "c17" | "c18" => Lang::C_17,
            "c23" => Lang::C_23,
            "c++" | "cpp" => Lang::CPP_23,
            "c++98" | "cpp98" => Lang::CPP_98,
            "c++03" | "cpp03" => Lang::CPP_03,
            "c++11" | "cpp11" => Lang::CPP_11,
            "c++14" | "cpp14" => Lang::CPP_14,
            "c++17" | "cpp17" => Lang::CPP_17,
            "c++20" | "cpp20" => Lang::CPP_20,
            "c++23" | "cpp23" => Lang::CPP_23,
            _ => return None,
        };
        Some(lang)
    }

    /// Render the "since/until/unless" phrase explaining why a feature whose
    /// legal versions are `self` is unavailable in the single active version
    /// `current`. Returns an empty string when the feature is legal.
    pub fn which(self, current: Lang) -> String {
        if self.contains(current) {
            return String::new();
        }
        if self.is_empty() {
            return "never supported".to_string();
        }
        let family = if current.is_cpp() {
            self & Lang::CPP_ANY
        } else {
            self & Lang::C_ANY
        };
        if family.is_empty() {
            return if self.is_cpp() {
                "not supported in C".to_string()
            } else {
                "not supported in C++".to_string()
            };
        }
        let oldest = family.oldest().unwrap();
        let newest = family.newest().unwrap();
        let cur_idx = ORDERED.iter().position(|&v| v == current).unwrap_or(0);
        let old_idx = ORDERED.iter().position(|&v| v == oldest).unwrap();
        let new_idx = ORDERED.iter().position(|&v| v == newest).unwrap();
        if cur_idx < old_idx {
            format!("not supported until {}", oldest.name())
        } else if cur_idx > new_idx {
            format!("not supported since {}", after(newest).name())
        } else {
            // Legal before and after but not here: a hole in the range.
            format!("not supported in {}", current.name())
        }
    }
}

fn after(v: Lang) -> Lang {
    let idx = ORDERED.iter().position(|&x| x == v).unwrap();
    if idx + 1 < ORDERED.len() {
        ORDERED[idx + 1]
    } else {
        v
    }
}

/// A per-family literal spelling: some features are spelled one way in C and
/// another in C++ (or changed spelling at a version boundary).
pub struct LangLit {
    pub lang: Lang,
    pub literal: &'static str,
}

/// Pick the literal matching the active language from a gated table.
/// The last entry is the fallback and must cover `Lang::ANY`.
pub fn lang_literal(table: &[LangLit], current: Lang) -> &'static str {
    for entry in table {
        if entry.lang.contains(current) {
            return entry.literal;
        }
    }
    table.last().map(|e| e.literal).unwrap_or("")
}
