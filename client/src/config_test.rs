use super::*;

fn sample() -> BackendConfig {
    BackendConfig::parse(Some("https://demo.supabase.co/"), Some("anon-key"), None).unwrap()
}

#[test]
fn parse_trims_trailing_slash_and_defaults_bucket() {
    let config = sample();
    assert_eq!(config.url, "https://demo.supabase.co");
    assert_eq!(config.anon_key, "anon-key");
    assert_eq!(config.storage_bucket, DEFAULT_STORAGE_BUCKET);
}

#[test]
fn parse_keeps_explicit_bucket() {
    let config = BackendConfig::parse(Some("http://localhost:54321"), Some("k"), Some("photos")).unwrap();
    assert_eq!(config.storage_bucket, "photos");
}

#[test]
fn parse_reports_missing_values() {
    assert_eq!(
        BackendConfig::parse(None, Some("k"), None),
        Err(ConfigError::Missing { name: URL_ENV })
    );
    assert_eq!(
        BackendConfig::parse(Some("https://demo.supabase.co"), Some("   "), None),
        Err(ConfigError::Missing { name: ANON_KEY_ENV })
    );
}

#[test]
fn parse_rejects_non_http_urls() {
    assert!(matches!(
        BackendConfig::parse(Some("ftp://demo"), Some("k"), None),
        Err(ConfigError::InvalidUrl { .. })
    ));
    assert!(matches!(
        BackendConfig::parse(Some("not a url"), Some("k"), None),
        Err(ConfigError::InvalidUrl { .. })
    ));
}

#[test]
fn endpoints_are_built_from_base_url() {
    let config = sample();
    assert_eq!(config.auth_endpoint("/token"), "https://demo.supabase.co/auth/v1/token");
    assert_eq!(config.table_endpoint("Voyages"), "https://demo.supabase.co/rest/v1/Voyages");
    assert_eq!(
        config.object_endpoint("u1/4/a.jpg"),
        "https://demo.supabase.co/storage/v1/object/medias/u1/4/a.jpg"
    );
    assert_eq!(
        config.public_object_url("u1/4/a.jpg"),
        "https://demo.supabase.co/storage/v1/object/public/medias/u1/4/a.jpg"
    );
}
