use format_num_pattern::{CurrencySym, NumberSymbols};
use rat_mask::{MaskCompiler, MaskConfig, MaskError, MaskFlags, MaskType};
use std::sync::Arc;

#[test]
fn test_cache() {
    let compiler = MaskCompiler::new();
    assert!(compiler.is_empty());

    let m1 = compiler.compile("m/d/y").expect("ok");
    let m2 = compiler.compile("m/d/y").expect("ok");
    assert!(Arc::ptr_eq(&m1, &m2));
    assert_eq!(compiler.len(), 1);

    let m3 = compiler
        .compile_with("m/d/y", MaskFlags::default().with_mask_type(MaskType::Text))
        .expect("ok");
    assert!(!Arc::ptr_eq(&m1, &m3));
    assert_eq!(m1.mask_type(), MaskType::Date);
    assert_eq!(m3.mask_type(), MaskType::Text);
    assert_eq!(compiler.len(), 2);

    // errors are not cached
    assert!(matches!(
        compiler.compile("0{0}"),
        Err(MaskError::MaskDefinition { pos: 1, .. })
    ));
    assert_eq!(compiler.len(), 2);

    compiler.clear();
    assert!(compiler.is_empty());
}

#[test]
fn test_config() {
    let compiler = MaskCompiler::with_config(MaskConfig::new().with_placeholder('*'));
    let mask = compiler.compile("m/d/y").expect("ok");
    assert_eq!(mask.empty_text(), "**/**/**");

    let compiler = MaskCompiler::new();
    let mask = compiler.compile("#,##0.00").expect("ok");
    assert_eq!(mask.empty_text(), "_,___.__");
    assert_eq!(mask.mask_type(), MaskType::Numeric);

    let sym = NumberSymbols {
        decimal_sep: ',',
        decimal_grp: Some('.'),
        negative_sym: '-',
        positive_sym: ' ',
        exponent_upper_sym: 'E',
        exponent_lower_sym: 'e',
        currency_sym: CurrencySym::new("€"),
    };
    let compiler = MaskCompiler::with_config(MaskConfig::new().with_symbols(sym));
    let mask = compiler.compile("#,##0.00").expect("ok");
    assert_eq!(mask.empty_text(), "_.___,__");

    let mut s = mask.new_session();
    s.begin_edit("").expect("ok");
    s.insert_text("1234,5").expect("ok");
    assert_eq!(s.display(), "1.234,5_");
}

#[test]
fn test_rtl() {
    let compiler = MaskCompiler::new();
    let mask = compiler.compile("###!0.00").expect("ok");
    assert_eq!(mask.rtl_pos(), 3);
    assert_eq!(mask.mask_tokens().len(), 7);
    assert_eq!(mask.pattern(), "###!0.00");
}

#[test]
fn test_error_display() {
    let err = MaskCompiler::new().compile("00x").expect_err("err");
    assert_eq!(err.to_string(), "invalid mask at 2: unknown mask character 'x'");
}
