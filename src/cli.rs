//! Command-line interface and interactive session.
//!
//! One `Session` owns the process-wide state: the active language, the
//! typedef table, the macro store, and the option switches. Each input line
//! is dispatched on its first word; errors come back with spans so the REPL
//! can underline the offending part of the line.

use crate::ast;
use crate::english;
use crate::error::{CdeclError, Result};
use crate::gibberish;
use crate::lang::Lang;
use crate::lexer::{FindKinds, Lexer};
use crate::parser::{EnglishCommand, Parser};
use crate::preproc::{self, token as ptoken, Expander, MacroKind, MacroStore};
use crate::sname::ScopedName;
use crate::style::Style;
use crate::suggest::{did_you_mean, DymKind};
use crate::tid::TypeId;
use crate::token::Span;
use crate::typedef::{Typedef, TypedefTable};
use clap::Parser as ClapParser;
use std::io::{self, BufRead, IsTerminal, Write};

// Exit statuses per sysexits.h.
pub const EX_OK: i32 = 0;
pub const EX_USAGE: i32 = 64;
pub const EX_DATAERR: i32 = 65;
pub const EX_IOERR: i32 = 74;

#[derive(ClapParser)]
#[command(name = "cdecl")]
#[command(about = "Explain C and C++ declarations, and compose them from English", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Language to use (c, c89, c99, c23, c++, c++17, ...)
    #[arg(short = 'x', long = "language", default_value = "c")]
    pub language: String,

    /// Colorize output: always, never, or auto
    #[arg(long, default_value = "auto")]
    pub color: String,

    /// Echo each command before its output
    #[arg(short = 'e', long)]
    pub echo: bool,

    /// A single command to run instead of reading interactively
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub color: bool,
    pub echo: bool,
    pub trace: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { color: true, echo: false, trace: true }
    }
}

/// What the REPL should do after one line.
#[derive(Debug)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct Session {
    lang: Lang,
    typedefs: TypedefTable,
    macros: MacroStore,
    pub opts: Options,
}

impl Session {
    pub fn new(lang: Lang) -> Self {
        Session {
            lang,
            typedefs: TypedefTable::with_predefined(),
            macros: MacroStore::with_predefined(),
            opts: Options::default(),
        }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Execute one input line.
    pub fn run_line(&mut self, line: &str) -> Result<Reply> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Reply::Text(String::new()));
        }
        if let Some(rest) = line.strip_prefix('#') {
            return self.directive(rest.trim_start(), line).map(Reply::Text);
        }
        let first = line.split_whitespace().next().unwrap_or("");
        let rest = line[first.len()..].trim_start();
        match first {
            "help" | "?" => Ok(Reply::Text(help_text())),
            "quit" | "exit" | "q" => Ok(Reply::Quit),
            "set" => self.cmd_set(rest).map(Reply::Text),
            "show" => self.cmd_show(rest).map(Reply::Text),
            "expand" => self.cmd_expand(rest).map(Reply::Text),
            "explain" => self.cmd_explain(rest).map(Reply::Text),
            "typedef" => self.cmd_explain(line).map(Reply::Text),
            "declare" | "cast" | "define" => self.cmd_english(line).map(Reply::Text),
            "static" | "dynamic" | "reinterpret" | "const"
                if rest.split_whitespace().next() == Some("cast") =>
            {
                self.cmd_english(line).map(Reply::Text)
            }
            _ => {
                if self.looks_like_gibberish(line) {
                    self.cmd_explain(line).map(Reply::Text)
                } else {
                    let span = Span::new(0, first.len());
                    let suggestions = did_you_mean(
                        DymKind::COMMANDS,
                        first,
                        self.lang,
                        Some(&self.typedefs),
                        Some(&self.macros),
                    );
                    Err(CdeclError::unknown_name(first, suggestions, span))
                }
            }
        }
    }

    /// A bare line is treated as `explain` when it plausibly starts a
    /// declaration.
    fn looks_like_gibberish(&self, line: &str) -> bool {
        if line.starts_with('(') {
            return true;
        }
        let first = line.split_whitespace().next().unwrap_or("");
        crate::keyword::c_keyword_find(first, self.lang).is_some()
            || self.typedefs.find_in(first, self.lang).is_some()
    }

    /// `#define` and `#undef` lines.
    fn directive(&mut self, rest: &str, line: &str) -> Result<String> {
        let word = rest.split_whitespace().next().unwrap_or("");
        let body = rest[word.len()..].trim_start();
        let span = Span::new(0, line.len());
        match word {
            "define" => {
                let mac = preproc::parse_define(body, self.lang)?;
                self.macros
                    .define(mac)
                    .map_err(|msg| CdeclError::preproc(msg, span))?;
                Ok(String::new())
            }
            "undef" => {
                let name = body.split_whitespace().next().unwrap_or("");
                if name.is_empty() {
                    return Err(CdeclError::preproc("macro name expected", span));
                }
                self.macros
                    .undef(name)
                    .map_err(|msg| CdeclError::preproc(msg, span))?;
                Ok(String::new())
            }
            other => Err(CdeclError::preproc(
                format!("\"#{}\": unknown directive", other),
                span,
            )),
        }
    }

    fn cmd_explain(&mut self, src: &str) -> Result<String> {
        let lang = self.lang;
        let (out, new_typedefs) = {
            let tokens = Lexer::new(src, lang)
                .with_find(FindKinds::C_KEYWORDS | FindKinds::TYPEDEFS)
                .typedefs(&self.typedefs)
                .tokenize()?;
            let mut parser =
                Parser::new(tokens, lang, &self.typedefs).with_macros(&self.macros);

            if src.trim_start().starts_with('(') {
                let root = parser.parse_gibberish_cast()?;
                parser.validate(root)?;
                return Ok(english::explain(&parser.arena, root, lang));
            }

            let roots = parser.parse_gibberish_decl()?;
            let mut out = Vec::new();
            let mut new_typedefs = Vec::new();
            for root in roots {
                parser.validate(root)?;
                if parser.arena.node(root).tid.contains(TypeId::S_TYPEDEF) {
                    let (td, line) = typedef_from_decl(&parser.arena, root, lang)?;
                    out.push(line);
                    new_typedefs.push(td);
                } else {
                    out.push(english::explain(&parser.arena, root, lang));
                }
            }
            (out, new_typedefs)
        };
        for td in new_typedefs {
            self.typedefs
                .define(td)
                .map_err(|msg| CdeclError::semantic(msg, Span::default()))?;
        }
        Ok(out.join("\n"))
    }

    fn cmd_english(&mut self, line: &str) -> Result<String> {
        let lang = self.lang;
        let (out, new_typedef) = {
            let tokens = Lexer::new(line, lang)
                .with_find(FindKinds::ALL)
                .english(true)
                .typedefs(&self.typedefs)
                .tokenize()?;
            let mut parser =
                Parser::new(tokens, lang, &self.typedefs).with_macros(&self.macros);
            match parser.parse_english_command()? {
                EnglishCommand::Declare(roots) => (
                    roots
                        .iter()
                        .map(|&r| gibberish::declare(&parser.arena, r, lang))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    None,
                ),
                EnglishCommand::Cast(root) => {
                    (gibberish::declare(&parser.arena, root, lang), None)
                }
                EnglishCommand::DefineType { name, root } => {
                    let mut body_arena = ast::AstArena::new();
                    let body = ast::dup(&parser.arena, root, &mut body_arena);
                    body_arena.node_mut(body).parent = None;
                    let td = Typedef {
                        sname: name,
                        arena: body_arena,
                        root: body,
                        lang: Lang::ANY,
                        user_defined: true,
                    };
                    (String::new(), Some(td))
                }
            }
        };
        if let Some(td) = new_typedef {
            self.typedefs
                .define(td)
                .map_err(|msg| CdeclError::semantic(msg, Span::default()))?;
        }
        Ok(out)
    }

    fn cmd_expand(&mut self, rest: &str) -> Result<String> {
        let input = ptoken::lex(rest, self.lang, 0)?;
        let mut expander = Expander::new(&self.macros, self.lang).tracing(self.opts.trace);
        let out = expander.expand(&input)?;
        let mut lines = Vec::new();
        if self.opts.trace {
            lines.push(format!("{} {}", Style::blue("input:"), ptoken::list_str(&input)));
            for step in expander.trace() {
                lines.push(format!(
                    "{} {}",
                    Style::blue(&format!("{}:", step.what)),
                    ptoken::list_str(&step.tokens)
                ));
            }
        }
        lines.push(ptoken::list_str(&out));
        Ok(lines.join("\n"))
    }

    fn cmd_set(&mut self, rest: &str) -> Result<String> {
        if rest.is_empty() || rest == "options" {
            return Ok(format!(
                "lang={}\n{}color\n{}echo\n{}trace",
                self.lang.name(),
                if self.opts.color { "" } else { "no" },
                if self.opts.echo { "" } else { "no" },
                if self.opts.trace { "" } else { "no" },
            ));
        }
        for word in rest.split_whitespace() {
            if let Some(lang) = Lang::find(word) {
                self.lang = lang;
                continue;
            }
            match word {
                "color" => {
                    self.opts.color = true;
                    Style::set_enabled(true);
                }
                "nocolor" => {
                    self.opts.color = false;
                    Style::set_enabled(false);
                }
                "echo" => self.opts.echo = true,
                "noecho" => self.opts.echo = false,
                "trace" => self.opts.trace = true,
                "notrace" => self.opts.trace = false,
                other => {
                    let start = rest.find(other).unwrap_or(0);
                    let span = Span::new(start, start + other.len());
                    let suggestions = did_you_mean(
                        DymKind::SET_OPTIONS,
                        other,
                        self.lang,
                        None,
                        None,
                    );
                    return Err(CdeclError::unknown_name(other, suggestions, span));
                }
            }
        }
        Ok(String::new())
    }

    fn cmd_show(&mut self, rest: &str) -> Result<String> {
        let what = rest.split_whitespace().next().unwrap_or("");
        let all = what == "all" || what == "predefined";
        let mut lines = Vec::new();
        if what.is_empty() || what == "typedefs" || all {
            for td in self.typedefs.iter() {
                if !td.lang.contains(self.lang) {
                    continue;
                }
                if !td.user_defined && !all {
                    continue;
                }
                lines.push(format!(
                    "define {} as {}",
                    td.sname,
                    english::phrase(&td.arena, td.root, self.lang)
                ));
            }
        }
        if what.is_empty() || what == "macros" || all {
            for mac in self.macros.iter() {
                if !mac.lang.contains(self.lang) {
                    continue;
                }
                if mac.predefined && !all {
                    continue;
                }
                match &mac.kind {
                    MacroKind::Object => lines.push(format!(
                        "#define {} {}",
                        mac.name,
                        ptoken::list_str(&mac.replace)
                    )),
                    MacroKind::Function { params, variadic } => {
                        let mut plist = params.join(", ");
                        if *variadic {
                            if !plist.is_empty() {
                                plist.push_str(", ");
                            }
                            plist.push_str("...");
                        }
                        lines.push(format!(
                            "#define {}({}) {}",
                            mac.name,
                            plist,
                            ptoken::list_str(&mac.replace)
                        ));
                    }
                    MacroKind::Dynamic(f) => lines.push(format!(
                        "#define {} {}",
                        mac.name,
                        ptoken::list_str(&f(self.lang))
                    )),
                }
            }
        }
        Ok(lines.join("\n"))
    }
}

/// A gibberish `typedef` declaration becomes a table entry plus its echoed
/// English definition.
fn typedef_from_decl(
    arena: &ast::AstArena,
    root: ast::AstId,
    lang: Lang,
) -> Result<(Typedef, String)> {
    let name = arena.node(root).sname.clone();
    if name.is_empty() {
        return Err(CdeclError::semantic(
            "typedef requires a name",
            arena.node(root).span,
        ));
    }
    let mut body_arena = ast::AstArena::new();
    let body = ast::dup(arena, root, &mut body_arena);
    {
        let node = body_arena.node_mut(body);
        node.tid -= TypeId::S_TYPEDEF;
        node.sname = ScopedName::new();
        node.parent = None;
    }
    let phrase = english::phrase(&body_arena, body, lang);
    let line = format!("define {} as {}", name, phrase);
    let td = Typedef {
        sname: name,
        arena: body_arena,
        root: body,
        lang: Lang::ANY,
        user_defined: true,
    };
    Ok((td, line))
}

fn help_text() -> String {
    let lines = [
        "commands:",
        "  explain <declaration>         explain a C/C++ declaration in English",
        "  declare <name> as <english>   compose a declaration from English",
        "  cast <name> into <english>    compose a cast expression",
        "  define <name> as <english>    define a type name",
        "  #define / #undef              define or remove a macro",
        "  expand <macro>[(args)]        expand a macro, showing each step",
        "  show [typedefs|macros|all]    list known names",
        "  set [<lang>|<option>]         change the language or an option",
        "  help, quit",
    ];
    lines.join("\n")
}

/// Entry point for the binary: parse options, then run a single command or
/// the interactive loop.
pub fn run_cli() -> i32 {
    let cli = Cli::parse();
    let lang = match Lang::find(&cli.language) {
        Some(l) => l,
        None => {
            eprintln!("cdecl: \"{}\": unknown language", cli.language);
            return EX_USAGE;
        }
    };
    let color_on = match cli.color.as_str() {
        "always" => true,
        "never" => false,
        _ => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    };
    Style::set_enabled(color_on);

    let mut session = Session::new(lang);
    session.opts.echo = cli.echo;
    session.opts.color = color_on;

    if !cli.command.is_empty() {
        let line = cli.command.join(" ");
        return match session.run_line(&line) {
            Ok(Reply::Text(text)) => {
                if !text.is_empty() {
                    println!("{}", text);
                }
                EX_OK
            }
            Ok(Reply::Quit) => EX_OK,
            Err(e) => {
                eprintln!("{}", e.display_with_source(&line));
                EX_DATAERR
            }
        };
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", Style::bold("cdecl"));
        if io::stdout().flush().is_err() {
            return EX_IOERR;
        }
        let line = match lines.next() {
            None => return EX_OK,
            Some(Ok(line)) => line,
            Some(Err(_)) => return EX_IOERR,
        };
        if session.opts.echo {
            println!("{}", line);
        }
        match session.run_line(&line) {
            Ok(Reply::Text(text)) => {
                if !text.is_empty() {
                    println!("{}", text);
                }
            }
            Ok(Reply::Quit) => return EX_OK,
            Err(e) => eprintln!("{}", e.display_with_source(&line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Style::set_enabled(false);
        Session::new(Lang::C_11)
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(t) => t,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn explain_and_declare_are_inverses() {
        let mut s = session();
        let english = text(s.run_line("explain int (*f)(char)").unwrap());
        assert_eq!(english, "declare f as pointer to function (char) returning int");
        let gibberish = text(s.run_line(&english).unwrap());
        assert_eq!(gibberish, "int (*f)(char)");
    }

    #[test]
    fn bare_gibberish_is_explained() {
        let mut s = session();
        assert_eq!(
            text(s.run_line("int *p").unwrap()),
            "declare p as pointer to int"
        );
    }

    #[test]
    fn define_then_use_typedef() {
        let mut s = session();
        text(s.run_line("define mystring as pointer to char").unwrap());
        assert_eq!(
            text(s.run_line("explain mystring x").unwrap()),
            "declare x as mystring"
        );
    }

    #[test]
    fn gibberish_typedef_is_recorded() {
        let mut s = session();
        let out = text(s.run_line("typedef unsigned char byte").unwrap());
        assert_eq!(out, "define byte as unsigned char");
        assert_eq!(
            text(s.run_line("explain byte *p").unwrap()),
            "declare p as pointer to byte"
        );
    }

    #[test]
    fn define_and_expand_macro() {
        let mut s = session();
        s.opts.trace = false;
        text(s.run_line("#define SQ(x) ((x) * (x))").unwrap());
        assert_eq!(text(s.run_line("expand SQ(3)").unwrap()), "((3) * (3))");
    }

    #[test]
    fn expand_trace_shows_steps() {
        let mut s = session();
        text(s.run_line("#define C(a,b) a##b").unwrap());
        let out = text(s.run_line("expand C(x, y)").unwrap());
        assert!(out.contains("input:"), "{}", out);
        assert!(out.contains("concatenate"), "{}", out);
        assert!(out.ends_with("xy"), "{}", out);
    }

    #[test]
    fn undef_removes_macro() {
        let mut s = session();
        s.opts.trace = false;
        text(s.run_line("#define N 42").unwrap());
        assert_eq!(text(s.run_line("expand N").unwrap()), "42");
        text(s.run_line("#undef N").unwrap());
        assert_eq!(text(s.run_line("expand N").unwrap()), "N");
    }

    #[test]
    fn set_changes_language() {
        let mut s = session();
        text(s.run_line("set c89").unwrap());
        assert_eq!(s.lang(), Lang::C_89);
        let err = s.run_line("explain long long x").unwrap_err();
        assert!(err.message().contains("not supported until C99"), "{}", err.message());
    }

    #[test]
    fn unknown_command_suggests() {
        let mut s = session();
        let err = s.run_line("explian int x").unwrap_err();
        match err.kind {
            crate::error::ErrorKind::UnknownName { suggestions, .. } => {
                assert_eq!(suggestions, vec!["explain".to_string()]);
            }
            other => panic!("expected unknown name, got {:?}", other),
        }
    }

    #[test]
    fn show_lists_user_macros_and_typedefs() {
        let mut s = session();
        s.opts.trace = false;
        text(s.run_line("#define ONE 1").unwrap());
        text(s.run_line("define mystring as pointer to char").unwrap());
        let out = text(s.run_line("show").unwrap());
        assert!(out.contains("#define ONE 1"), "{}", out);
        assert!(out.contains("define mystring as pointer to char"), "{}", out);
    }

    #[test]
    fn show_all_includes_predefined() {
        let mut s = session();
        let out = text(s.run_line("show all").unwrap());
        assert!(out.contains("size_t"), "{}", out);
        assert!(out.contains("__STDC__"), "{}", out);
    }

    #[test]
    fn quit_returns_quit() {
        let mut s = session();
        assert!(matches!(s.run_line("quit").unwrap(), Reply::Quit));
    }

    #[test]
    fn set_bare_reports_options() {
        let mut s = session();
        let out = text(s.run_line("set").unwrap());
        assert!(out.contains("lang=C11"), "{}", out);
    }
}
