use rat_mask::{EditSession, LookupCompletion, MaskCompiler, MaskError};

fn session(pattern: &str) -> EditSession {
    let compiler = MaskCompiler::new();
    let mask = compiler.compile(pattern).expect("ok");
    let mut s = mask.new_session();
    s.begin_edit("").expect("ok");
    s
}

fn type_chars(s: &mut EditSession, text: &str) {
    for c in text.chars() {
        s.insert_text(&c.to_string()).expect("ok");
    }
}

#[test]
fn test_date_typing() {
    let mut s = session("m/d/y");
    assert_eq!(s.display(), "__/__/__");
    assert_eq!(s.cursor(), 0);

    s.insert_text("1").expect("ok");
    assert_eq!(s.display(), "1_/__/__");
    assert_eq!(s.cursor(), 1);
    s.insert_text("2").expect("ok");
    assert_eq!(s.display(), "12/__/__");
    assert_eq!(s.cursor(), 3);
    s.insert_text("2").expect("ok");
    assert_eq!(s.display(), "12/2_/__");
    assert_eq!(s.cursor(), 4);
    s.insert_text("5").expect("ok");
    assert_eq!(s.display(), "12/25/__");
    assert_eq!(s.cursor(), 6);
    assert_eq!(s.value(), "12/25");

    let mut s = session("m/d/y");
    s.insert_text("1225").expect("ok");
    assert_eq!(s.display(), "12/25/__");
    assert_eq!(s.cursor(), 6);
}

#[test]
fn test_literal_prefix() {
    let mut s = session("\\D\\a\\t\\e: m/d/y");
    assert_eq!(s.display(), "Date: __/__/__");
    assert_eq!(s.cursor(), 6);

    type_chars(&mut s, "12301");
    assert!(s.display().starts_with("Date: 12/30/"));
    assert_eq!(s.display(), "Date: 12/30/1_");
    assert_eq!(s.cursor(), 13);
    assert_eq!(s.value(), "Date: 12/30/1");
}

#[test]
fn test_logical_cursor() {
    let mut s = session("\\D\\a\\t\\e: m/d/y");
    type_chars(&mut s, "12");
    assert_eq!(s.display(), "Date: 12/__/__");
    assert_eq!(s.cursor(), 9);
    assert_eq!(s.logical_cursor(), 8);
}

#[test]
fn test_invalid_char() {
    let mut s = session("m/d/y");
    s.insert_text("12").expect("ok");
    let r = s.insert_text("a");
    assert!(matches!(
        r,
        Err(MaskError::InvalidInputCharacter { ch: 'a', .. })
    ));
    assert!(r.expect_err("err").is_rejected_input());
    assert_eq!(s.display(), "12/__/__");
    assert_eq!(s.cursor(), 3);

    let mut s = session("000");
    s.insert_text("1").expect("ok");
    assert!(s.insert_text("x").is_err());
    assert_eq!(s.display(), "1__");
    assert_eq!(s.cursor(), 1);
}

#[test]
fn test_custom_set() {
    let mut s = session("[ABC]{3}");
    s.insert_text("BAC").expect("ok");
    assert_eq!(s.display(), "BAC");
    assert!(s.is_complete());
    assert_eq!(s.end_edit(), Ok("BAC".to_string()));

    let mut s = session("[ABC]{3}");
    assert_eq!(
        s.insert_text("BAX"),
        Err(MaskError::InvalidInputCharacter { pos: 2, ch: 'X' })
    );
    assert_eq!(s.display(), "___");
}

#[test]
fn test_zero_pad() {
    let mut s = session("m/d/y");
    s.insert_text("5").expect("ok");
    assert_eq!(s.display(), "05/__/__");
    assert_eq!(s.cursor(), 3);
    assert_eq!(s.value(), "05");

    s.insert_text("3/").expect("ok");
    assert_eq!(s.display(), "05/03/__");
    assert_eq!(s.cursor(), 6);
}

#[test]
fn test_begin_end() {
    let compiler = MaskCompiler::new();
    let mask = compiler.compile("m/d/y").expect("ok");
    let mut s = mask.new_session();
    assert!(!s.is_editing());
    assert_eq!(s.display(), "__/__/__");
    assert_eq!(s.insert_text("1"), Err(MaskError::NotEditing));

    assert!(s.begin_edit("ab").is_err());
    assert!(!s.is_editing());

    s.begin_edit("1/5/99").expect("ok");
    assert!(s.is_editing());
    assert_eq!(s.display(), "01/05/99");
    assert_eq!(s.value(), "01/05/99");
    assert_eq!(s.selection(), 0..8);
    assert_eq!(s.cursor(), 8);

    let v1 = s.end_edit().expect("ok");
    let v2 = s.end_edit().expect("ok");
    assert_eq!(v1, "01/05/99");
    assert_eq!(v1, v2);
    assert!(!s.is_editing());
}

#[test]
fn test_incomplete() {
    let mut s = session("m/d/y");
    s.insert_text("1225").expect("ok");
    assert!(!s.is_complete());
    assert_eq!(s.end_edit(), Err(MaskError::InvalidEntry(vec![4])));
    assert!(s.is_editing());

    s.insert_text("99").expect("ok");
    assert!(s.is_complete());
    assert_eq!(s.end_edit(), Ok("12/25/99".to_string()));
}

#[test]
fn test_select_all_overwrite() {
    let mut s = session("m/d/y");
    s.begin_edit("12/25/99").expect("ok");
    assert_eq!(s.selection(), 0..8);
    s.insert_text("1").expect("ok");
    assert_eq!(s.display(), "1_/__/__");
    assert_eq!(s.cursor(), 1);
    assert!(!s.has_selection());
}

#[test]
fn test_backspace() {
    let mut s = session("m/d/y");
    s.insert_text("1225").expect("ok");
    assert_eq!(s.cursor(), 6);

    // steps over the literal
    s.backspace().expect("ok");
    assert_eq!(s.display(), "12/2_/__");
    assert_eq!(s.cursor(), 4);
    s.backspace().expect("ok");
    assert_eq!(s.display(), "12/__/__");
    assert_eq!(s.cursor(), 3);
    s.backspace().expect("ok");
    assert_eq!(s.display(), "1_/__/__");
    assert_eq!(s.cursor(), 1);
    s.backspace().expect("ok");
    assert_eq!(s.display(), "__/__/__");
    assert_eq!(s.cursor(), 0);
    // no-op
    s.backspace().expect("ok");
    assert_eq!(s.display(), "__/__/__");
    assert_eq!(s.cursor(), 0);
}

#[test]
fn test_delete() {
    let mut s = session("m/d/y");
    s.begin_edit("12/25/99").expect("ok");
    s.move_home(false);
    assert_eq!(s.cursor(), 0);
    s.delete().expect("ok");
    assert_eq!(s.display(), "02/25/99");
    assert_eq!(s.cursor(), 0);

    s.begin_edit("12/25/99").expect("ok");
    s.move_cursor(2, false);
    assert_eq!(s.cursor(), 2);
    s.delete().expect("ok");
    assert_eq!(s.display(), "12/05/99");
    assert_eq!(s.cursor(), 3);

    // at the end
    s.move_end(false);
    assert_eq!(s.cursor(), 8);
    s.delete().expect("ok");
    assert_eq!(s.display(), "12/05/99");
    assert_eq!(s.cursor(), 8);
}

#[test]
fn test_delete_selection() {
    let mut s = session("m/d/y");
    s.begin_edit("12/25/99").expect("ok");
    s.move_home(false);
    s.move_right(true);
    s.move_right(true);
    assert_eq!(s.selection(), 0..3);
    s.insert_text("1").expect("ok");
    assert_eq!(s.display(), "01/25/99");
    assert_eq!(s.cursor(), 3);

    s.begin_edit("12/25/99").expect("ok");
    s.delete().expect("ok");
    assert_eq!(s.display(), "__/__/__");
    assert_eq!(s.value(), "");
    assert_eq!(s.cursor(), 0);
}

#[test]
fn test_replace() {
    let mut s = session("m/d/y");
    s.replace("1225", Some(2)).expect("ok");
    assert_eq!(s.display(), "12/25/__");
    assert_eq!(s.cursor(), 3);

    s.replace("1225", None).expect("ok");
    assert_eq!(s.cursor(), 6);

    assert!(s.replace("1325x", None).is_err());
    assert_eq!(s.display(), "12/25/__");
}

#[test]
fn test_cursor_literal_runs() {
    let mut s = session("'('000') '000\\-0000");
    assert_eq!(s.display(), "(___) ___-____");
    s.begin_edit("(555) 123-4567").expect("ok");
    assert_eq!(s.display(), "(555) 123-4567");

    s.move_home(false);
    assert_eq!(s.cursor(), 1);

    let runs = [0..1, 4..6, 9..10];
    let inside = |c: u32| runs.iter().any(|r| r.start < c && c < r.end);

    let mut visited = Vec::new();
    for _ in 0..20 {
        s.move_right(false);
        assert!(!inside(s.cursor()));
        assert!(s.cursor() >= 1);
        visited.push(s.cursor());
    }
    assert_eq!(s.cursor(), 14);
    assert!(visited.contains(&6));
    assert!(!visited.contains(&5));

    for _ in 0..20 {
        s.move_left(false);
        assert!(!inside(s.cursor()));
        assert!(s.cursor() >= 1);
    }
    assert_eq!(s.cursor(), 1);

    s.move_cursor(5, false);
    assert_eq!(s.cursor(), 6);
    s.move_cursor(5, false);
    assert_eq!(s.cursor(), 4);
    s.move_cursor(0, false);
    assert_eq!(s.cursor(), 1);
}

#[test]
fn test_literal_round_trip() {
    for (pattern, text) in [("'abc'", "abc"), ("\\D\\a\\t\\e", "Date"), ("': /'", ": /")] {
        let compiler = MaskCompiler::new();
        let mask = compiler.compile(pattern).expect("ok");
        let mut s = mask.new_session();
        s.begin_edit(text).expect("ok");
        assert_eq!(s.display(), text);
        assert_eq!(s.end_edit(), Ok(text.to_string()));
    }
}

#[test]
fn test_autocomplete() {
    let compiler = MaskCompiler::new();
    let mask = compiler.compile("<l{6}").expect("ok");
    let mut s = mask
        .new_session()
        .with_completion(LookupCompletion::new(["Berlin", "Bern", "Bonn"]));
    s.begin_edit("").expect("ok");

    s.insert_text("b").expect("ok");
    assert_eq!(s.display(), "BERLIN");
    assert_eq!(s.cursor(), 1);
    assert_eq!(s.selection(), 1..6);

    s.insert_text("o").expect("ok");
    assert_eq!(s.display(), "BONN__");
    assert_eq!(s.selection(), 2..4);

    s.insert_text("x").expect("ok");
    assert_eq!(s.display(), "BOX___");
    assert_eq!(s.cursor(), 3);
    assert!(!s.has_selection());
    assert_eq!(s.end_edit(), Ok("BOX".to_string()));
}

#[test]
fn test_session_clone() {
    let mut s = session("000");
    s.insert_text("12").expect("ok");
    let s2 = s.clone();
    s.insert_text("3").expect("ok");
    assert_eq!(s.display(), "123");
    assert_eq!(s2.display(), "12_");
}

#[test]
fn test_numeric_short() {
    let compiler = MaskCompiler::new();
    let mask = compiler.compile("#,##0.00").expect("ok");
    let mut s = mask.new_session();
    s.begin_edit("5.25").expect("ok");
    assert_eq!(s.display(), "_,__5.25");
    assert!(s.is_complete());
    assert_eq!(s.end_edit(), Ok("5.25".to_string()));

    let mut s = session("#,##0.00");
    s.insert_text("5").expect("ok");
    assert_eq!(s.display(), "5,___.__");
    s.insert_text(".").expect("ok");
    assert_eq!(s.display(), "_,__5.__");
    assert_eq!(s.cursor(), 6);
    type_chars(&mut s, "25");
    assert_eq!(s.display(), "_,__5.25");
    assert_eq!(s.end_edit(), Ok("5.25".to_string()));

    let mut s = session("#,##0.00");
    s.insert_text("1,234.56").expect("ok");
    assert_eq!(s.display(), "1,234.56");
    assert_eq!(s.end_edit(), Ok("1,234.56".to_string()));
}

#[test]
fn test_optional_digits() {
    let mut s = session("##0");
    s.insert_text("5").expect("ok");
    assert_eq!(s.display(), "__5");
    assert_eq!(s.cursor(), 3);
    assert!(s.is_complete());
    assert_eq!(s.end_edit(), Ok("5".to_string()));

    let mut s = session("##0");
    type_chars(&mut s, "12");
    assert_eq!(s.display(), "_12");
    assert_eq!(s.value(), "12");
}
