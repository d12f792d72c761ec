use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use catalog_ripple::url::extract_host;
///
/// let url = Url::parse("https://MOBDISC.com/dw/1").unwrap();
/// assert_eq!(extract_host(&url), Some("mobdisc.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks if a host belongs to a site
///
/// A site owns its bare host and every subdomain of it, so `mobdisc.com`
/// matches `mobdisc.com`, `www.mobdisc.com` and `dl1.mobdisc.com`, but not
/// `notmobdisc.com`.
///
/// # Examples
///
/// ```
/// use catalog_ripple::url::host_matches;
///
/// assert!(host_matches("mobdisc.com", "mobdisc.com"));
/// assert!(host_matches("mobdisc.com", "www.mobdisc.com"));
/// assert!(!host_matches("mobdisc.com", "evilmobdisc.com"));
/// ```
pub fn host_matches(site_host: &str, candidate: &str) -> bool {
    let site_host = site_host.strip_prefix("www.").unwrap_or(site_host);
    candidate.eq_ignore_ascii_case(site_host)
        || candidate
            .to_ascii_lowercase()
            .ends_with(&format!(".{}", site_host.to_ascii_lowercase()))
}
