use rat_mask::MaskType;
use rat_mask::core::{MaskToken, compile, lex};

#[test]
fn test_repeater_count() {
    for (pattern, n) in [
        ("0{3}", 3),
        ("AA{4}", 4),
        ("\\x{2}0", 2),
        ("[ab]{3}", 3),
        ("mm{1}", 1),
        ("'ab'{12}", 12),
    ] {
        let raw = lex(pattern).expect("ok");
        let expanded = compile(pattern).expect("ok");
        // the repeater is dropped, the repeated token gets n-1 copies.
        assert_eq!(expanded.tokens.len(), raw.len() - 1 + (n - 1), "{}", pattern);
    }
}

#[test]
fn test_repeater_copies() {
    let m = compile("[ab]{3}").expect("ok");
    assert_eq!(m.tokens.len(), 3);
    assert!(m.tokens.iter().all(|v| *v == m.tokens[0]));

    let m = compile("'ab'{3}").expect("ok");
    assert_eq!(
        m.tokens
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .concat(),
        "\\a\\b\\b\\b"
    );
}

#[test]
fn test_mask_type() {
    assert_eq!(compile("m/d/y").expect("ok").mask_type, MaskType::Date);
    assert_eq!(compile("H:I:S P").expect("ok").mask_type, MaskType::Date);
    assert_eq!(compile("+#,##0.00").expect("ok").mask_type, MaskType::Numeric);
    assert_eq!(compile("LLL\\-000").expect("ok").mask_type, MaskType::Text);
    assert_eq!(compile("M/D/Y 0").expect("ok").mask_type, MaskType::Text);
    assert_eq!(compile("[xyz]").expect("ok").mask_type, MaskType::Text);
}

#[test]
fn test_definition_errors() {
    for pattern in [
        "\\", "'abc", "\"abc", "[abc", "[]", "{2}", "0{", "0{}", "0{a}", "0{0}", "<{2}0", "x",
        "00-00", "..", ",0,", "++", "!!", "0!{2}",
    ] {
        assert!(
            matches!(
                compile(pattern),
                Err(rat_mask::MaskError::MaskDefinition { .. })
            ),
            "{}",
            pattern
        );
    }
}

#[test]
fn test_literals() {
    let t = lex("\\D'at'\"e\\\"\"").expect("ok");
    assert_eq!(
        t,
        vec![
            MaskToken::Literal("D".into()),
            MaskToken::Literal("a".into()),
            MaskToken::Literal("t".into()),
            MaskToken::Literal("e".into()),
            MaskToken::Literal("\"".into()),
        ]
    );

    // reserved codes inside quotes are literals.
    let m = compile("'MDY'").expect("ok");
    assert!(m.tokens.iter().all(|v| v.is_literal()));
}
