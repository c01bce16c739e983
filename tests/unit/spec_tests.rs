// imageView2 extraction, parsing and option mapping

use imageview_proxy::image_optimizer::{
    extract_spec, FitMode, ModeValue, ParsedSpec, TransformOptions,
};
use imageview_proxy::proxy::helpers::parse_query_pairs;

fn parse_and_map(spec: &str) -> (ParsedSpec, TransformOptions) {
    let parsed = ParsedSpec::parse(spec).unwrap();
    let options = TransformOptions::from_spec(&parsed);
    (parsed, options)
}

#[test]
fn test_mode_two_with_width_and_height_contains() {
    let (parsed, options) = parse_and_map("2/w/100/h/200");
    assert_eq!(
        parsed,
        ParsedSpec {
            mode: Some(ModeValue::Numeric(2)),
            width: Some(100),
            height: Some(200),
            ..Default::default()
        }
    );
    assert_eq!(
        options,
        TransformOptions {
            fit: FitMode::Contain,
            width: Some(100),
            height: Some(200),
            ..Default::default()
        }
    );
}

#[test]
fn test_mode_one_covers() {
    let (parsed, options) = parse_and_map("1/w/50");
    assert_eq!(parsed.mode, Some(ModeValue::Numeric(1)));
    assert_eq!(parsed.width, Some(50));
    assert_eq!(options.fit, FitMode::Cover);
}

#[test]
fn test_mode_three_with_format_and_quality() {
    let (parsed, options) = parse_and_map("3/format/png/q/80");
    assert_eq!(parsed.mode, Some(ModeValue::Numeric(3)));
    assert_eq!(parsed.format.as_deref(), Some("png"));
    assert_eq!(parsed.quality, Some(80));
    assert_eq!(options.fit, FitMode::Cover);
    assert_eq!(options.content_type(), "image/png");
}

#[test]
fn test_unknown_key_consumes_its_value() {
    let (parsed, _) = parse_and_map("2/foo/bar/w/10");
    assert_eq!(
        parsed,
        ParsedSpec {
            mode: Some(ModeValue::Numeric(2)),
            width: Some(10),
            ..Default::default()
        }
    );
}

#[test]
fn test_trailing_key_without_value_is_dropped() {
    let (parsed, _) = parse_and_map("2/w/10/h");
    assert_eq!(parsed.width, Some(10));
    assert_eq!(parsed.height, None);
}

#[test]
fn test_empty_spec_is_hard_failure() {
    assert!(ParsedSpec::parse("").is_err());
}

#[test]
fn test_only_modes_one_three_five_cover() {
    for mode in 0..=6 {
        let (_, options) = parse_and_map(&format!("{}/w/10/h/10", mode));
        let expected = if matches!(mode, 1 | 3 | 5) {
            FitMode::Cover
        } else {
            FitMode::Contain
        };
        assert_eq!(options.fit, expected, "mode {}", mode);
    }

    let (parsed, options) = parse_and_map("abc/w/10");
    assert_eq!(parsed.mode, Some(ModeValue::NotANumber));
    assert_eq!(options.fit, FitMode::Contain);
}

#[test]
fn test_zero_width_is_treated_as_absent() {
    let (parsed, options) = parse_and_map("2/w/0/h/30");
    assert_eq!(parsed.width, Some(0));
    assert_eq!(options.width, None);
    assert_eq!(options.height, Some(30));
}

#[test]
fn test_both_query_encodings_yield_same_spec() {
    let value_form = parse_query_pairs("imageView2=2/w/20/h/20");
    let key_form = parse_query_pairs("imageView2/2/w/20/h/20");

    assert_eq!(extract_spec(&value_form).as_deref(), Some("2/w/20/h/20"));
    assert_eq!(extract_spec(&key_form).as_deref(), Some("2/w/20/h/20"));
}

#[test]
fn test_percent_encoded_value_form() {
    let pairs = parse_query_pairs("imageView2=2%2Fw%2F20%2Fh%2F20");
    assert_eq!(extract_spec(&pairs).as_deref(), Some("2/w/20/h/20"));
}

#[test]
fn test_first_spec_key_wins() {
    let pairs = parse_query_pairs("v=1&imageView2/1/w/5&imageView2=2/w/9");
    assert_eq!(extract_spec(&pairs).as_deref(), Some("1/w/5"));
}

#[test]
fn test_bare_spec_key_parses_as_non_numeric_mode() {
    let pairs = parse_query_pairs("imageView2");
    let spec = extract_spec(&pairs).unwrap();
    assert_eq!(spec, "imageView2");

    let (parsed, options) = parse_and_map(&spec);
    assert_eq!(parsed.mode, Some(ModeValue::NotANumber));
    assert_eq!(options, TransformOptions::default());
}

#[test]
fn test_no_spec_key_is_passthrough() {
    let pairs = parse_query_pairs("v=3&token=abc");
    assert_eq!(extract_spec(&pairs), None);
}
