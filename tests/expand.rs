//! Macro definition and expansion scenarios through the session API.

use cdecl::{Lang, Reply, Session};

fn run(session: &mut Session, line: &str) -> String {
    match session.run_line(line).unwrap() {
        Reply::Text(t) => t,
        Reply::Quit => panic!("unexpected quit"),
    }
}

fn session() -> Session {
    cdecl::style::Style::set_enabled(false);
    let mut s = Session::new(Lang::C_23);
    s.opts.trace = false;
    s
}

#[test]
fn paste_joins_arguments_into_one_identifier() {
    let mut s = session();
    run(&mut s, "#define C(a,b) a##b");
    assert_eq!(run(&mut s, "expand C(x, y)"), "xy");
}

#[test]
fn paste_trace_shows_substitution_then_concatenation() {
    let mut s = session();
    s.opts.trace = true;
    run(&mut s, "#define C(a,b) a##b");
    let out = run(&mut s, "expand C(x, y)");
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("input:"), "{}", out);
    assert!(
        lines.iter().any(|l| l.starts_with("concatenate:")),
        "{}",
        out
    );
    assert_eq!(*lines.last().unwrap(), "xy");
}

#[test]
fn stringify_of_empty_argument_is_an_empty_string() {
    let mut s = session();
    run(&mut s, "#define Q2(A,B) A = # B");
    assert_eq!(run(&mut s, "expand Q2(x,)"), "x = \"\"");
}

#[test]
fn paste_avoidance_keeps_tokens_apart() {
    let mut s = session();
    run(&mut s, "#define P(X) -X");
    assert_eq!(run(&mut s, "expand P(->)"), "- ->");
}

#[test]
fn self_referential_macro_terminates() {
    let mut s = session();
    run(&mut s, "#define X X");
    assert_eq!(run(&mut s, "expand X"), "X");
}

#[test]
fn growing_self_reference_expands_once() {
    let mut s = session();
    run(&mut s, "#define F F + 1");
    assert_eq!(run(&mut s, "expand F"), "F + 1");
}

#[test]
fn variadic_arguments_are_absorbed() {
    let mut s = session();
    run(&mut s, "#define LOG(fmt, ...) printf(fmt, __VA_ARGS__)");
    assert_eq!(
        run(&mut s, "expand LOG(msg, 1, 2)"),
        "printf(msg, 1, 2)"
    );
}

#[test]
fn va_opt_tracks_argument_presence() {
    let mut s = session();
    run(&mut s, "#define LOG(fmt, ...) printf(fmt __VA_OPT__(,) __VA_ARGS__)");
    assert_eq!(run(&mut s, "expand LOG(m, 1)"), "printf(m , 1)");
}

#[test]
fn object_macros_chain() {
    let mut s = session();
    run(&mut s, "#define A B");
    run(&mut s, "#define B 42");
    assert_eq!(run(&mut s, "expand A"), "42");
}

#[test]
fn function_macro_without_call_stays_put() {
    let mut s = session();
    run(&mut s, "#define SQ(x) ((x) * (x))");
    assert_eq!(run(&mut s, "expand SQ + 1"), "SQ + 1");
}

#[test]
fn arity_mismatch_is_reported() {
    let mut s = session();
    run(&mut s, "#define TWO(a,b) a b");
    let err = s.run_line("expand TWO(1)").unwrap_err();
    assert!(err.message().contains("argument"), "{}", err.message());
}

#[test]
fn bad_paste_is_reported_with_the_spelling() {
    let mut s = session();
    run(&mut s, "#define C(a,b) a##b");
    let err = s.run_line("expand C(+, /)").unwrap_err();
    assert!(err.message().contains("+/"), "{}", err.message());
}

#[test]
fn redefinition_must_match() {
    let mut s = session();
    run(&mut s, "#define N 42");
    run(&mut s, "#define N 42");
    let err = s.run_line("#define N 43").unwrap_err();
    assert!(err.message().contains("redefinition"), "{}", err.message());
}

#[test]
fn undef_then_expand_is_identity() {
    let mut s = session();
    run(&mut s, "#define N 42");
    run(&mut s, "#undef N");
    assert_eq!(run(&mut s, "expand N"), "N");
}

#[test]
fn predefined_version_macro_follows_language() {
    let mut s = session();
    run(&mut s, "set c99");
    assert_eq!(run(&mut s, "expand __STDC_VERSION__"), "199901L");
    run(&mut s, "set c23");
    assert_eq!(run(&mut s, "expand __STDC_VERSION__"), "202311L");
}

#[test]
fn cplusplus_is_not_defined_in_c() {
    let mut s = session();
    assert_eq!(run(&mut s, "expand __cplusplus"), "__cplusplus");
    run(&mut s, "set c++17");
    assert_eq!(run(&mut s, "expand __cplusplus"), "201703L");
}

#[test]
fn prescan_expands_arguments_before_substitution() {
    let mut s = session();
    run(&mut s, "#define ONE 1");
    run(&mut s, "#define ID(x) x");
    assert_eq!(run(&mut s, "expand ID(ONE)"), "1");
}

#[test]
fn arguments_next_to_paste_are_not_prescanned() {
    let mut s = session();
    run(&mut s, "#define ONE 1");
    run(&mut s, "#define GLUE(a,b) a##b");
    assert_eq!(run(&mut s, "expand GLUE(ONE, TWO)"), "ONETWO");
}
