use super::*;

const BASE: &str = "https://lincolnshire.fsd.org.uk/kb5/lincs/fsd/";

#[test]
fn listing_url_appends_suffix_to_existing_query() {
    let url = listing_url(
        "https://lincolnshire.fsd.org.uk/kb5/lincs/fsd/results.action?qt=toddler&term=",
    )
    .unwrap();
    assert_eq!(
        url.as_str(),
        "https://lincolnshire.fsd.org.uk/kb5/lincs/fsd/results.action?qt=toddler&term=&sr=0&nh=10000"
    );
}

#[test]
fn listing_url_starts_query_when_missing() {
    let url = listing_url("https://lincolnshire.fsd.org.uk/kb5/lincs/fsd/results.action").unwrap();
    assert_eq!(url.query(), Some("sr=0&nh=10000"));
}

#[test]
fn listing_url_trims_surrounding_whitespace() {
    let url = listing_url("  https://example.org/results.action?qt=a \n").unwrap();
    assert_eq!(url.as_str(), "https://example.org/results.action?qt=a&sr=0&nh=10000");
}

#[test]
fn listing_url_drops_fragment_and_keeps_suffix_in_query() {
    let url = listing_url("https://example.org/results.action?qt=a#top").unwrap();
    assert_eq!(url.query(), Some("qt=a&sr=0&nh=10000"));
    assert_eq!(url.fragment(), None);
    assert_eq!(url.as_str(), "https://example.org/results.action?qt=a&sr=0&nh=10000");
}

#[test]
fn listing_url_handles_empty_query() {
    let url = listing_url("https://example.org/results.action?").unwrap();
    assert_eq!(url.query(), Some("sr=0&nh=10000"));
}

#[test]
fn listing_url_rejects_relative_input() {
    let err = listing_url("results.action?qt=toddler").unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { .. }),
        "expected InvalidUrl, got: {err:?}"
    );
}

#[test]
fn listing_url_rejects_non_http_scheme() {
    let err = listing_url("ftp://example.org/results?qt=a").unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { ref reason, .. } if reason.contains("ftp")),
        "expected InvalidUrl for ftp scheme, got: {err:?}"
    );
}

#[test]
fn resolve_detail_url_joins_relative_link_onto_base() {
    let base = Url::parse(BASE).unwrap();
    let url = resolve_detail_url(&base, "service.page?id=abc123&familychannel=0").unwrap();
    assert_eq!(
        url.as_str(),
        "https://lincolnshire.fsd.org.uk/kb5/lincs/fsd/service.page?id=abc123&familychannel=0"
    );
}

#[test]
fn resolve_detail_url_keeps_absolute_link() {
    let base = Url::parse(BASE).unwrap();
    let url = resolve_detail_url(&base, "https://other.example.org/service.page?id=1").unwrap();
    assert_eq!(url.host_str(), Some("other.example.org"));
}

#[test]
fn new_rejects_relative_detail_base() {
    let result = DirectoryClient::new(5, "lincsfsd-test/0.1", "kb5/lincs/fsd/");
    assert!(
        matches!(result, Err(ScraperError::InvalidUrl { .. })),
        "expected InvalidUrl for relative base"
    );
}

#[test]
fn detail_concurrency_is_at_least_one() {
    let client = DirectoryClient::new(5, "lincsfsd-test/0.1", BASE)
        .unwrap()
        .with_detail_concurrency(0);
    assert_eq!(client.detail_concurrency, 1);
    assert_eq!(client.detail_base.as_str(), BASE);
}

#[test]
fn from_config_applies_concurrency() {
    let config = AppConfig {
        env: lincsfsd_core::Environment::Test,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "debug".to_string(),
        request_timeout_secs: 5,
        user_agent: "lincsfsd-test/0.1".to_string(),
        detail_base_url: BASE.to_string(),
        detail_concurrency: 3,
        raw_html_log_path: None,
    };
    let client = DirectoryClient::from_config(&config).unwrap();
    assert_eq!(client.detail_concurrency, 3);
}
