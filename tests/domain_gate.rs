//! Integration tests for the domain gate and the fetch allowlist

use fetchguard::{FetchAllowlist, PolicyError, SecurityManager};

fn manager(document: &str) -> SecurityManager {
    SecurityManager::from_toml(document).unwrap()
}

#[test]
fn test_deny_list_exact_and_wildcard() {
    let manager = manager(
        r#"
        version = "1"
        [access_control]
        deny_domains = ["malicious-site.example", "*.ads.example"]
        "#,
    );

    assert!(manager.check_domain_access("malicious-site.example").is_err());
    assert!(manager.check_domain_access("ads.example").is_err());
    assert!(manager.check_domain_access("pixel.ads.example").is_err());
    assert!(manager.check_domain_access("a.b.ads.example").is_err());

    assert!(manager.check_domain_access("docs.example").is_ok());
    assert!(manager.check_domain_access("badads.example").is_ok());
}

#[test]
fn test_denial_names_domain_and_pattern() {
    let manager = manager(
        r#"
        version = "1"
        [access_control]
        deny_domains = ["*.ads.example"]
        "#,
    );

    match manager.check_domain_access("pixel.ads.example") {
        Err(PolicyError::AccessDenied { domain, pattern }) => {
            assert_eq!(domain, "pixel.ads.example");
            assert_eq!(pattern, "*.ads.example");
        }
        other => panic!("expected AccessDenied, got {:?}", other),
    }
}

#[test]
fn test_wildcard_reflexivity() {
    let manager = manager(
        r#"
        version = "1"
        [access_control]
        deny_domains = ["*.example.com"]
        "#,
    );

    assert!(manager.check_domain_access("example.com").is_err());
    assert!(manager.check_domain_access("api.example.com").is_err());
    assert!(manager.check_domain_access("api.v1.example.com").is_err());
    assert!(manager.check_domain_access("example.org").is_ok());
}

#[test]
fn test_whitespace_tolerant_pattern_lists() {
    let spaced = manager(
        r#"
        version = "1"
        [access_control]
        deny_domains = [" example.com ", " *.api.com "]
        "#,
    );
    let compact = manager(
        r#"
        version = "1"
        [access_control]
        deny_domains = ["example.com", "*.api.com"]
        "#,
    );

    for host in ["example.com", "api.com", "v1.api.com", "other.org"] {
        assert_eq!(
            spaced.check_domain_access(host).is_ok(),
            compact.check_domain_access(host).is_ok(),
            "divergence for {host}"
        );
    }
}

#[test]
fn test_trusted_domains_not_denied_are_reachable() {
    let manager = manager(
        r#"
        version = "1"
        trusted_domains = ["api.search.brave.com", "*.github.com"]
        "#,
    );

    assert!(manager.check_domain_access("api.search.brave.com").is_ok());
    assert!(manager.check_domain_access("github.com").is_ok());
    assert!(manager.check_domain_access("raw.github.com").is_ok());
}

#[test]
fn test_trusted_list_restricts_everything_else() {
    let manager = manager(
        r#"
        version = "1"
        trusted_domains = ["*.github.com"]
        "#,
    );

    match manager.check_domain_access("example.org") {
        Err(PolicyError::UntrustedDomain { domain }) => assert_eq!(domain, "example.org"),
        other => panic!("expected UntrustedDomain, got {:?}", other),
    }
}

#[test]
fn test_deny_wins_over_trust_for_same_host() {
    let manager = manager(
        r#"
        version = "1"
        trusted_domains = ["*.example.com"]
        [access_control]
        deny_domains = ["internal.example.com"]
        "#,
    );

    assert!(manager.check_domain_access("public.example.com").is_ok());
    assert!(matches!(
        manager.check_domain_access("internal.example.com"),
        Err(PolicyError::AccessDenied { .. })
    ));
}

#[test]
fn test_allowlist_and_gate_share_matching_semantics() {
    // The same pattern list must answer identically through both mechanisms.
    let patterns = " example.com , *.api.com ";

    let allowlist = FetchAllowlist::from_list(patterns);
    let gate = manager(&format!(
        r#"
        version = "1"
        trusted_domains = ["{patterns}"]
        "#
    ));

    for host in [
        "example.com",
        "api.com",
        "v1.api.com",
        "deep.v1.api.com",
        "evil.com",
        "EXAMPLE.com",
    ] {
        assert_eq!(
            allowlist.is_allowed(host),
            gate.check_domain_access(host).is_ok(),
            "mechanisms diverge for {host}"
        );
    }
}
