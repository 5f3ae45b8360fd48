//! cdecl: translate C and C++ declarations between their native declarator
//! syntax ("gibberish") and a stylized English reading, validate them
//! against a chosen language version, and expand preprocessor macros step
//! by step.
//!
//! The pipeline is lexer → parser → AST → validator → printer; the AST and
//! the macro engine are the core, everything else consumes them. The
//! [`cli::Session`] type ties the pieces together for interactive use; the
//! [`explain`] and [`declare`] functions are one-shot conveniences over a
//! fresh session.

pub mod ast;
pub mod cli;
pub mod english;
pub mod error;
pub mod gibberish;
pub mod keyword;
pub mod lang;
pub mod lexer;
pub mod parser;
pub mod preproc;
pub mod sname;
pub mod style;
pub mod suggest;
pub mod tid;
pub mod token;
pub mod typedef;

pub use cli::{Reply, Session};
pub use error::{CdeclError, ErrorKind, Result};
pub use lang::Lang;

/// Explain one gibberish declaration in English, using a fresh session.
pub fn explain(decl: &str, lang: Lang) -> Result<String> {
    one_shot(&format!("explain {}", decl), lang)
}

/// Compose gibberish from one English declaration, using a fresh session.
pub fn declare(english: &str, lang: Lang) -> Result<String> {
    one_shot(english, lang)
}

fn one_shot(line: &str, lang: Lang) -> Result<String> {
    let mut session = Session::new(lang);
    session.opts.trace = false;
    match session.run_line(line)? {
        Reply::Text(text) => Ok(text),
        Reply::Quit => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_one_shot() {
        assert_eq!(
            explain("int *p", Lang::C_11).unwrap(),
            "declare p as pointer to int"
        );
    }

    #[test]
    fn declare_one_shot() {
        assert_eq!(
            declare("declare p as pointer to int", Lang::C_11).unwrap(),
            "int *p"
        );
    }
}
