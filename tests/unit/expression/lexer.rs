use super::*;

#[test]
fn number_grammar() {
    for ok in ["0", "42", "-3.25", "1.", ".5", "-.5", "007", "-."] {
        assert!(is_number(ok), "{ok} should be numeric");
    }
    for bad in ["", "-", ".", "1-", "--1", "1..2", "1.2.3", "1e5", "x", "+1", "abs"] {
        assert!(!is_number(bad), "{bad} should not be numeric");
    }
}

#[test]
fn parse_matches_multiply_accumulate() {
    assert_eq!(parse_number("-3.25"), -3.25);
    assert_eq!(parse_number("7"), 7.0);
    assert_eq!(parse_number("0.5"), 0.5);
    assert_eq!(parse_number(".5"), 0.5);
    assert_eq!(parse_number("1."), 1.0);
    assert_eq!(parse_number("255"), 255.0);
    assert_eq!(parse_number("-.").to_bits(), (-0.0f32).to_bits());

    // 0.1 is 1 / 10 computed in f32, the same bits as the literal.
    assert_eq!(parse_number("0.1").to_bits(), 0.1f32.to_bits());
    assert_eq!(parse_number("12.75").to_bits(), 12.75f32.to_bits());
}

#[test]
fn lone_minus_is_an_operator() {
    let t = Token::classify("-", 0).unwrap();
    assert_eq!(t.op, OpId::Sub);
    assert_eq!(t.arity, 2);
    assert_eq!(t.literal, None);

    let t = Token::classify("-2", 1).unwrap();
    assert_eq!(t.op, OpId::Num);
    assert_eq!(t.literal, Some(-2.0));
    assert_eq!(t.index, 1);
}

#[test]
fn normalize_collapses_whitespace_and_terminates() {
    assert_eq!(normalize("x"), "x ");
    assert_eq!(normalize("  x   y\t+\n"), "x y + ");
    assert_eq!(normalize(""), " ");
    assert_eq!(normalize("   "), " ");
}

#[test]
fn lex_flushes_final_token() {
    let toks = lex("  3   4 +").unwrap();
    let texts: Vec<&str> = toks.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, ["3", "4", "+"]);
    assert_eq!(toks[2].op, OpId::Add);
    assert_eq!(toks[2].index, 2);
}

#[test]
fn lex_reports_unknown_symbols() {
    let err = lex("x foo +").unwrap_err();
    assert!(matches!(err, DrawError::Lex(_)));
    assert!(err.to_string().contains("foo"));
    assert!(err.to_string().contains("token 1"));
}

#[test]
fn lex_of_blank_input_is_empty() {
    assert!(lex("").unwrap().is_empty());
    assert!(lex(" \t ").unwrap().is_empty());
}
