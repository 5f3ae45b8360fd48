//! End-to-end translation scenarios through the public session API.

use cdecl::{ErrorKind, Lang, Reply, Session};

fn run(session: &mut Session, line: &str) -> String {
    match session.run_line(line).unwrap() {
        Reply::Text(t) => t,
        Reply::Quit => panic!("unexpected quit"),
    }
}

fn session(lang: Lang) -> Session {
    cdecl::style::Style::set_enabled(false);
    let mut s = Session::new(lang);
    s.opts.trace = false;
    s
}

#[test]
fn declarator_composition_reads_left_to_right() {
    let mut s = session(Lang::C_11);
    assert_eq!(
        run(&mut s, "explain int (*x[3])(char)"),
        "declare x as array 3 of pointer to function (char) returning int"
    );
}

#[test]
fn composed_declaration_round_trips() {
    let mut s = session(Lang::C_11);
    let english = run(&mut s, "explain int (*x[3])(char)");
    let gibberish = run(&mut s, &english);
    assert_eq!(gibberish, "int (*x[3])(char)");
    let english_again = run(&mut s, &format!("explain {}", gibberish));
    assert_eq!(english_again, english);
}

#[test]
fn storage_class_belongs_to_the_function() {
    let mut s = session(Lang::C_11);
    let out = run(&mut s, "explain static int f(void)");
    assert!(out.contains("static function"), "{}", out);
    assert!(!out.contains("returning static"), "{}", out);
}

#[test]
fn long_long_is_gated_on_c99() {
    let mut s = session(Lang::C_89);
    let err = s.run_line("explain long long x").unwrap_err();
    let msg = err.message();
    assert!(msg.contains("long long"), "{}", msg);
    assert!(msg.contains("not supported until C99"), "{}", msg);

    let mut s99 = session(Lang::C_99);
    assert_eq!(
        run(&mut s99, "explain long long x"),
        "declare x as long long"
    );
}

#[test]
fn english_to_gibberish_matches_cdecl_style() {
    let mut s = session(Lang::C_11);
    assert_eq!(
        run(
            &mut s,
            "declare f as pointer to function (pointer to const char) returning int"
        ),
        "int (*f)(const char *)"
    );
}

#[test]
fn casts_translate_both_ways() {
    let mut s = session(Lang::C_11);
    assert_eq!(run(&mut s, "cast p into pointer to int"), "(int *)p");
    assert_eq!(run(&mut s, "explain (int*)p"), "cast p into pointer to int");
}

#[test]
fn cpp_named_cast_spellings() {
    let mut s = session(Lang::CPP_17);
    assert_eq!(
        run(&mut s, "static cast p into pointer to int"),
        "static_cast<int *>(p)"
    );
}

#[test]
fn synonyms_and_abbreviations_read_the_same() {
    let mut s = session(Lang::C_11);
    assert_eq!(
        run(&mut s, "declare s as ptr to constant character"),
        "const char *s"
    );
}

#[test]
fn typedefs_flow_through_both_surfaces() {
    let mut s = session(Lang::C_11);
    run(&mut s, "define mystring as pointer to char");
    assert_eq!(
        run(&mut s, "explain mystring x"),
        "declare x as mystring"
    );
    assert_eq!(run(&mut s, "declare y as mystring"), "mystring y");
}

#[test]
fn predefined_size_t_is_known() {
    let mut s = session(Lang::C_11);
    assert_eq!(
        run(&mut s, "explain size_t n"),
        "declare n as size_t"
    );
}

#[test]
fn multiple_declarators_expand_to_multiple_lines() {
    let mut s = session(Lang::C_11);
    assert_eq!(
        run(&mut s, "explain int x, *p"),
        "declare x as int\ndeclare p as pointer to int"
    );
}

#[test]
fn cpp_references_round_trip() {
    let mut s = session(Lang::CPP_17);
    assert_eq!(
        run(&mut s, "declare r as rvalue reference to int"),
        "int &&r"
    );
    assert_eq!(
        run(&mut s, "explain int &&r"),
        "declare r as rvalue reference to int"
    );
}

#[test]
fn member_pointer_round_trips() {
    let mut s = session(Lang::CPP_17);
    let gib = run(&mut s, "declare p as pointer to member of class C int");
    assert_eq!(gib, "int C::*p");
    assert_eq!(
        run(&mut s, &format!("explain {}", gib)),
        "declare p as pointer to member of class C int"
    );
}

#[test]
fn structured_binding_declares_in_cpp17() {
    let mut s = session(Lang::CPP_17);
    assert_eq!(
        run(&mut s, "declare a, b as structured binding"),
        "auto [a, b]"
    );
    let mut old = session(Lang::CPP_11);
    let err = old.run_line("declare a, b as structured binding").unwrap_err();
    assert!(
        err.message().contains("not supported until C++17"),
        "{}",
        err.message()
    );
}

#[test]
fn array_of_functions_is_diagnosed() {
    let mut s = session(Lang::C_11);
    let err = s.run_line("explain int x[3](char)").unwrap_err();
    assert!(err.message().contains("array of functions"), "{}", err.message());
}

#[test]
fn unknown_word_suggests_correction() {
    let mut s = session(Lang::CPP_17);
    let err = s.run_line("declare x as automatc").unwrap_err();
    match err.kind {
        ErrorKind::UnknownName { suggestions, .. } => {
            assert_eq!(suggestions, vec!["automatic".to_string()]);
        }
        other => panic!("expected unknown name, got {:?}", other),
    }
}

#[test]
fn distant_typo_gets_no_suggestions() {
    let mut s = session(Lang::CPP_17);
    let err = s.run_line("declare x as xylofone").unwrap_err();
    match err.kind {
        ErrorKind::UnknownName { suggestions, .. } => {
            assert!(suggestions.is_empty(), "{:?}", suggestions);
        }
        other => panic!("expected unknown name, got {:?}", other),
    }
}

#[test]
fn language_switch_is_immediate() {
    let mut s = session(Lang::C_23);
    assert_eq!(run(&mut s, "explain bool b"), "declare b as bool");
    run(&mut s, "set c99");
    assert_eq!(run(&mut s, "explain _Bool b"), "declare b as _Bool");
}

#[test]
fn nested_grouping_parens_alternate_layers() {
    let mut s = session(Lang::C_11);
    assert_eq!(
        run(&mut s, "explain int (*(*x)[3])[5]"),
        "declare x as pointer to array 3 of pointer to array 5 of int"
    );
}
