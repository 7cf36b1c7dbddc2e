// tests/unit/types.rs
//! Identifier parsing and validated configuration values.

use notion_site_map::{normalize_id, AuthToken, PageId, PageUrlOverrides, SiteDomain, SpaceId};
use pretty_assertions::assert_eq;

const COMPACT: &str = "067dd719a912471ea9a3ac10710e7fdf";

#[test]
fn page_ids_parse_from_every_user_format() {
    let inputs = [
        "067dd719-a912-471e-a9a3-ac10710e7fdf",
        "067DD719A912471EA9A3AC10710E7FDF",
        "https://www.notion.so/Home-067dd719a912471ea9a3ac10710e7fdf",
        "https://www.notion.so/workspace/067dd719a912471ea9a3ac10710e7fdf?v=1",
        "  067dd719a912471ea9a3ac10710e7fdf/ ",
    ];

    for input in inputs {
        let id = PageId::parse(input).unwrap();
        assert_eq!(id.as_str(), COMPACT, "input: {input}");
    }
}

#[test]
fn garbage_is_not_a_page_id() {
    assert!(PageId::parse("").is_err());
    assert!(PageId::parse("not-an-id").is_err());
    assert!(PageId::parse("https://www.notion.so/no-id-here").is_err());
}

#[test]
fn ids_compare_across_formats() {
    let dashed = PageId::new("067dd719-a912-471e-a9a3-ac10710e7fdf");
    let compact = PageId::new(COMPACT);
    let space = SpaceId::new("067DD719A912471EA9A3AC10710E7FDF");

    assert!(dashed.same_as(&compact));
    assert!(compact.same_as(&space));
    assert_eq!(dashed.normalized(), COMPACT);
    assert_eq!(compact.to_dashed(), "067dd719-a912-471e-a9a3-ac10710e7fdf");
    assert_eq!(normalize_id(" AB-CD "), "abcd");
}

#[test]
fn site_domain_keeps_only_the_host() {
    assert_eq!(SiteDomain::parse("blog.example.com").unwrap().as_str(), "blog.example.com");
    assert_eq!(
        SiteDomain::parse("https://blog.example.com/").unwrap().as_str(),
        "blog.example.com"
    );
    assert_eq!(
        SiteDomain::parse("localhost").unwrap().root_url().unwrap().as_str(),
        "https://localhost/"
    );

    assert!(SiteDomain::parse("").is_err());
    assert!(SiteDomain::parse("example.com/blog").is_err());
}

#[test]
fn overrides_parse_slug_page_pairs() {
    let overrides = PageUrlOverrides::parse_pairs([
        "/about/=067dd719-a912-471e-a9a3-ac10710e7fdf",
        "contact=7a1c6a355f0b4a5e9b430c4c1a6a1c01",
    ])
    .unwrap();

    assert_eq!(overrides.len(), 2);
    assert_eq!(overrides.slug_for(&PageId::new(COMPACT)), Some("about"));
    assert_eq!(
        overrides.slug_for(&PageId::new("7a1c6a35-5f0b-4a5e-9b43-0c4c1a6a1c01")),
        Some("contact")
    );
    assert_eq!(overrides.slug_for(&PageId::new("ffff")), None);

    assert!(PageUrlOverrides::parse_pairs(["no-equals-sign"]).is_err());
    assert!(PageUrlOverrides::parse_pairs(["=067dd719a912471ea9a3ac10710e7fdf"]).is_err());
    assert!(PageUrlOverrides::parse_pairs(["about=not-an-id"]).is_err());
}

#[test]
fn auth_tokens_are_redacted() {
    let token = AuthToken::new("  v02%3Auser_secret_value ").unwrap();

    assert_eq!(token.as_str(), "v02%3Auser_secret_value");
    assert_eq!(token.to_string(), "v02%3A...");
    assert!(!format!("{:?}", token).contains("secret"));

    assert!(AuthToken::new("").is_err());
    assert!(AuthToken::new("two words").is_err());
    assert!(AuthToken::new("a;b").is_err());
}
