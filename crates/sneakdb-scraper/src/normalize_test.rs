use super::*;

// -----------------------------------------------------------------------
// absolutize
// -----------------------------------------------------------------------

#[test]
fn absolutize_resolves_root_relative_path() {
    assert_eq!(
        absolutize("/a/b.jpg", "https://example.com").unwrap(),
        "https://example.com/a/b.jpg"
    );
}

#[test]
fn absolutize_prefixes_scheme_for_protocol_relative() {
    assert_eq!(
        absolutize("//cdn.example.com/a.jpg", "https://example.com").unwrap(),
        "https://cdn.example.com/a.jpg"
    );
}

#[test]
fn absolutize_protocol_relative_follows_base_scheme() {
    assert_eq!(
        absolutize("//cdn.example.com/a.jpg", "http://example.com").unwrap(),
        "http://cdn.example.com/a.jpg"
    );
}

#[test]
fn absolutize_returns_absolute_candidate_unchanged() {
    assert_eq!(
        absolutize("https://x.com/y.jpg", "https://example.com").unwrap(),
        "https://x.com/y.jpg"
    );
}

#[test]
fn absolutize_keeps_cdn_transform_commas() {
    let url = "https://static.nike.com/a/images/t_PDP_1728_v1/f_auto,q_auto:eco/abc/pegasus.png";
    assert_eq!(absolutize(url, "https://www.nike.com").unwrap(), url);
}

#[test]
fn absolutize_resolves_bare_relative_against_origin_root() {
    assert_eq!(
        absolutize("images/shoe.png", "https://www.nike.com/t/pegasus-41/IM6674-101").unwrap(),
        "https://www.nike.com/images/shoe.png"
    );
}

#[test]
fn absolutize_trims_surrounding_whitespace() {
    assert_eq!(
        absolutize("  /a/b.jpg\n", "https://example.com").unwrap(),
        "https://example.com/a/b.jpg"
    );
}

#[test]
fn absolutize_rejects_empty_candidate() {
    let err = absolutize("   ", "https://example.com").unwrap_err();
    assert!(matches!(err, NormalizeError::MalformedUrl { ref reason, .. } if reason.contains("empty")));
}

#[test]
fn absolutize_rejects_fragment_only_candidate() {
    assert!(matches!(
        absolutize("#gallery", "https://example.com"),
        Err(NormalizeError::MalformedUrl { .. })
    ));
}

#[test]
fn absolutize_rejects_protocol_relative_without_host() {
    assert!(matches!(
        absolutize("//", "https://example.com"),
        Err(NormalizeError::MalformedUrl { .. })
    ));
}

#[test]
fn absolutize_rejects_unparsable_base() {
    assert!(matches!(
        absolutize("/a.jpg", "not a url"),
        Err(NormalizeError::MalformedUrl { .. })
    ));
}

// -----------------------------------------------------------------------
// parse_price
// -----------------------------------------------------------------------

#[test]
fn parse_price_strips_dollar_sign() {
    assert_eq!(parse_price("$145.00").unwrap(), Decimal::new(14500, 2));
}

#[test]
fn parse_price_european_grouping_with_trailing_euro() {
    assert_eq!(parse_price("1.299,00 €").unwrap(), Decimal::new(129_900, 2));
}

#[test]
fn parse_price_us_grouping() {
    assert_eq!(parse_price("$1,299.00").unwrap(), Decimal::new(129_900, 2));
}

#[test]
fn parse_price_comma_decimal() {
    assert_eq!(parse_price("€ 89,95").unwrap(), Decimal::new(8995, 2));
}

#[test]
fn parse_price_single_comma_with_three_digits_is_thousands() {
    assert_eq!(parse_price("1,299").unwrap(), Decimal::new(1299, 0));
}

#[test]
fn parse_price_single_dot_with_three_digits_is_thousands() {
    assert_eq!(parse_price("1.299 €").unwrap(), Decimal::new(1299, 0));
    assert_eq!(parse_price("1,299 €").unwrap(), parse_price("1.299 €").unwrap());
}

#[test]
fn parse_price_single_dot_with_one_digit_is_decimal() {
    assert_eq!(parse_price("89.5").unwrap(), Decimal::new(895, 1));
}

#[test]
fn parse_price_repeated_dots_are_thousands() {
    assert_eq!(parse_price("1.299.000").unwrap(), Decimal::new(1_299_000, 0));
}

#[test]
fn parse_price_integer_with_currency_code() {
    assert_eq!(parse_price("USD 120").unwrap(), Decimal::new(120, 0));
}

#[test]
fn parse_price_ignores_minus_sign() {
    assert_eq!(parse_price("-$20.00").unwrap(), Decimal::new(2000, 2));
}

#[test]
fn parse_price_trims_dangling_separators() {
    assert_eq!(parse_price("Rs. 1,299").unwrap(), Decimal::new(1299, 0));
}

#[test]
fn parse_price_fails_without_digits() {
    let err = parse_price("Sold out").unwrap_err();
    assert_eq!(
        err,
        NormalizeError::UnparsablePrice {
            raw: "Sold out".to_string()
        }
    );
}

#[test]
fn parse_price_fails_on_separators_only() {
    assert!(parse_price("$.,").is_err());
}

// -----------------------------------------------------------------------
// extract_origin
// -----------------------------------------------------------------------

#[test]
fn extract_origin_strips_path() {
    assert_eq!(
        extract_origin("https://www.nike.com/t/pegasus-41/IM6674-101").as_deref(),
        Some("https://www.nike.com")
    );
}

#[test]
fn extract_origin_keeps_non_default_port() {
    assert_eq!(
        extract_origin("http://127.0.0.1:8080/us/samba-og/KJ1363.html").as_deref(),
        Some("http://127.0.0.1:8080")
    );
}

#[test]
fn extract_origin_none_for_garbage() {
    assert!(extract_origin("nike dot com").is_none());
}
