use vtscan_core::{classify, IndicatorKind};

#[test]
fn recognises_each_kind() {
    assert_eq!(classify("8.8.8.8"), Some(IndicatorKind::Ipv4));
    assert_eq!(classify("example.com"), Some(IndicatorKind::Domain));
    assert_eq!(
        classify("d41d8cd98f00b204e9800998ecf8427e"),
        Some(IndicatorKind::Hash)
    );
    assert_eq!(classify("not a valid @@ string"), None);
}

#[test]
fn ipv4_octets_are_not_range_checked() {
    assert_eq!(classify("999.999.999.999"), Some(IndicatorKind::Ipv4));
    assert_eq!(classify("1.2.3.4444"), None);
    assert_eq!(classify("1.2.3"), None);
}

#[test]
fn domains_need_an_alphabetic_tld() {
    assert_eq!(classify("sub-domain.example.co.uk"), Some(IndicatorKind::Domain));
    assert_eq!(classify("EXAMPLE.ORG"), Some(IndicatorKind::Domain));
    assert_eq!(classify("example.c"), None);
    assert_eq!(classify("example.c0m"), None);
    assert_eq!(classify("localhost"), None);
    assert_eq!(classify("under_score.com"), None);
}

#[test]
fn digests_of_common_lengths() {
    // sha1 and sha256 of the empty input, plus an upper-case md5.
    assert_eq!(
        classify("da39a3ee5e6b4b0d3255bfef95601890afd80709"),
        Some(IndicatorKind::Hash)
    );
    assert_eq!(
        classify("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
        Some(IndicatorKind::Hash)
    );
    assert_eq!(
        classify("D41D8CD98F00B204E9800998ECF8427E"),
        Some(IndicatorKind::Hash)
    );
    assert_eq!(classify("g41d8cd98f00b204e9800998ecf8427e"), None);
}

#[test]
fn surrounding_whitespace_is_not_stripped() {
    assert_eq!(classify(" 8.8.8.8"), None);
    assert_eq!(classify("example.com\n"), None);
    assert_eq!(classify(""), None);
}

#[test]
fn non_ascii_digits_are_not_digits() {
    // Arabic-Indic digits.
    assert_eq!(classify("\u{661}.\u{662}.\u{663}.\u{664}"), None);
}

#[test]
fn resource_paths_follow_kind() {
    assert_eq!(IndicatorKind::Domain.resource(), "domains");
    assert_eq!(IndicatorKind::Ipv4.resource(), "ip_addresses");
    assert_eq!(IndicatorKind::Hash.resource(), "files");
}
