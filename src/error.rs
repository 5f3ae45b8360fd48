//! Error kinds and styled rendering.
//!
//! Every non-fatal error carries the span of the offending input. The
//! renderer prints the source line with a caret underline and, for unknown
//! names, the "did you mean?" candidates computed at raise time.

use crate::style::Style;
use crate::token::Span;
use std::fmt;

pub type Result<T> = std::result::Result<T, CdeclError>;

#[derive(Debug, Clone)]
pub struct CdeclError {
    pub kind: ErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// Invalid character, unterminated literal.
    Lexical { msg: String },
    /// Parser rejection.
    Syntax { expected: String, found: String },
    /// Type illegal in the language, bad operator arity, misplaced storage,
    /// and friends.
    Semantic { msg: String },
    /// Macro definition or expansion failure.
    Preproc { msg: String },
    /// Unknown identifier, with ranked suggestions when the gate passed.
    UnknownName { name: String, suggestions: Vec<String> },
}

impl CdeclError {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn lexical(msg: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Lexical { msg: msg.into() }, span)
    }

    pub fn syntax(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        Self::new(
            ErrorKind::Syntax { expected: expected.into(), found: found.into() },
            span,
        )
    }

    pub fn semantic(msg: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Semantic { msg: msg.into() }, span)
    }

    pub fn preproc(msg: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Preproc { msg: msg.into() }, span)
    }

    pub fn unknown_name(name: impl Into<String>, suggestions: Vec<String>, span: Span) -> Self {
        Self::new(
            ErrorKind::UnknownName { name: name.into(), suggestions },
            span,
        )
    }

    /// One-line message without source context.
    pub fn message(&self) -> String {
        match &self.kind {
            ErrorKind::Lexical { msg } => msg.clone(),
            ErrorKind::Syntax { expected, found } => {
                format!("expected {}, found {}", expected, found)
            }
            ErrorKind::Semantic { msg } => msg.clone(),
            ErrorKind::Preproc { msg } => msg.clone(),
            ErrorKind::UnknownName { name, .. } => {
                format!("\"{}\": unknown name", name)
            }
        }
    }

    /// Full rendering: the source line, a caret underline, and any hint.
    pub fn display_with_source(&self, source: &str) -> String {
        let (line_num, line_start, line_content) = self.find_context(source);
        let col = self.span.start.saturating_sub(line_start);
        let len = (self.span.end.saturating_sub(self.span.start)).max(1);
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));

        let error_label = Style::bold_red("error");
        let line_num_str = Style::blue(&format!("{:4}", line_num));
        let pipe = Style::blue("|");
        let underline_colored = Style::red(&underline);

        let mut result = format!(
            "{}: {}\n\n{} {} {}\n     {} {}",
            error_label,
            self.message(),
            line_num_str,
            pipe,
            line_content,
            pipe,
            underline_colored
        );

        if let ErrorKind::UnknownName { suggestions, .. } = &self.kind {
            if !suggestions.is_empty() {
                let hint = Style::cyan("help");
                let list = suggestions
                    .iter()
                    .map(|s| format!("'{}'", Style::green(s)))
                    .collect::<Vec<_>>()
                    .join(" or ");
                result.push_str(&format!("\n     {} {}: did you mean {}?", pipe, hint, list));
            }
        }

        result
    }

    fn find_context<'a>(&self, source: &'a str) -> (usize, usize, &'a str) {
        let mut line_num = 1;
        let mut line_start = 0;

        for (i, c) in source.char_indices() {
            if i >= self.span.start {
                break;
            }
            if c == '\n' {
                line_num += 1;
                line_start = i + 1;
            }
        }

        let line_end = source[line_start..]
            .find('\n')
            .map(|off| line_start + off)
            .unwrap_or(source.len());

        (line_num, line_start, &source[line_start..line_end])
    }
}

impl fmt::Display for CdeclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CdeclError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_has_span() {
        let error = CdeclError::semantic("bad type", Span::new(5, 10));
        assert_eq!(error.span.start, 5);
        assert_eq!(error.span.end, 10);
    }

    #[test]
    fn display_with_source_shows_line_and_underline() {
        let error = CdeclError::syntax("declarator", "']'", Span::new(4, 10));
        let source = "int [3] x;";
        let display = error.display_with_source(source);
        assert!(display.contains("int [3] x;"), "source line shown: {}", display);
        assert!(display.contains("^"), "underline shown: {}", display);
    }

    #[test]
    fn display_with_source_shows_suggestions() {
        let error = CdeclError::unknown_name(
            "autmatic",
            vec!["automatic".to_string()],
            Span::new(0, 8),
        );
        let display = error.display_with_source("autmatic x");
        assert!(display.contains("did you mean"), "{}", display);
        assert!(display.contains("automatic"), "{}", display);
    }

    #[test]
    fn unknown_name_without_suggestions_has_no_hint() {
        let error = CdeclError::unknown_name("xylofone", vec![], Span::new(0, 8));
        let display = error.display_with_source("xylofone y");
        assert!(!display.contains("did you mean"), "{}", display);
    }

    #[test]
    fn message_formats_syntax_error() {
        let error = CdeclError::syntax("type name", "'*'", Span::new(0, 1));
        assert_eq!(error.message(), "expected type name, found '*'");
    }

    #[test]
    fn multiline_source_finds_right_line() {
        let source = "first line\nint [3] x;\n";
        let error = CdeclError::syntax("declarator", "'['", Span::new(15, 16));
        let display = error.display_with_source(source);
        assert!(display.contains("int [3] x;"), "{}", display);
        assert!(!display.contains("first line"), "{}", display);
    }
}
