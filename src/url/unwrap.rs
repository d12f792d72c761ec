use crate::url::site::SiteLayout;
use percent_encoding::percent_decode_str;
use url::Url;

/// Host suffix used by the translation proxy's host-rewriting mode
const TRANSLATE_HOST_SUFFIX: &str = ".translate.goog";

/// Query parameters the translation proxy appends to rewritten URLs
const TRANSLATE_PARAM_PREFIX: &str = "_x_tr_";

/// Nested wrappers deeper than this are left as-is
const MAX_UNWRAP_LAYERS: usize = 4;

/// Returns true if the link is a BitTorrent magnet URI
pub fn is_magnet(link: &str) -> bool {
    link.trim_start()
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("magnet:"))
}

/// Extracts the original target from a translation-proxy wrapped URL
///
/// Handles both proxy modes:
/// - host rewriting (`https://pdalife-com.translate.goog/app/?_x_tr_sl=auto`)
/// - query-parameter wrapping (`https://translate.google.com/translate?u=...`
///   and `https://www.google.com/url?q=...`)
///
/// Hrefs that are percent-encoded as a whole are decoded first, nested
/// wrappers are peeled one layer at a time, and relative results are made
/// absolute against the site layout. Input that is not wrapped comes back
/// absolutized but otherwise unchanged.
///
/// # Examples
///
/// ```
/// use catalog_ripple::config::SiteConfig;
/// use catalog_ripple::url::{unwrap_proxy_url, SiteLayout};
///
/// let site = SiteLayout::from_config(&SiteConfig::default()).unwrap();
/// let unwrapped = unwrap_proxy_url(
///     "https://pdalife-com.translate.goog/dwn/42/?_x_tr_sl=auto&_x_tr_tl=en",
///     &site,
/// );
/// assert_eq!(unwrapped, "https://pdalife.com/dwn/42/");
/// ```
pub fn unwrap_proxy_url(href: &str, site: &SiteLayout) -> String {
    let mut current = decode_if_encoded(href.trim());

    for _ in 0..MAX_UNWRAP_LAYERS {
        if is_magnet(&current) {
            return current;
        }

        let Some(url) = site.absolutize(&current) else {
            return current;
        };

        match unwrap_once(&url) {
            Some(inner) => current = decode_if_encoded(inner.trim()),
            None => return url.to_string(),
        }
    }

    site.absolutize(&current)
        .map(|url| url.to_string())
        .unwrap_or(current)
}

/// Peels one proxy layer, or returns None if the URL is not wrapped
fn unwrap_once(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();

    if let Some(label) = host.strip_suffix(TRANSLATE_HOST_SUFFIX) {
        let mut target = url.clone();
        target.set_host(Some(&decode_translate_host(label))).ok()?;
        strip_translate_params(&mut target);
        return Some(target.to_string());
    }

    let wanted: &[&str] = if is_google_host(&host, "translate.google") {
        &["u"]
    } else if is_google_host(&host, "google") && url.path() == "/url" {
        &["q", "url"]
    } else {
        return None;
    };

    url.query_pairs()
        .find(|(key, value)| wanted.contains(&key.as_ref()) && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Reverses the proxy's host encoding: `-` stands for `.` and `--` for `-`
fn decode_translate_host(label: &str) -> String {
    label
        .split("--")
        .map(|part| part.replace('-', "."))
        .collect::<Vec<_>>()
        .join("-")
}

fn strip_translate_params(url: &mut Url) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !key.starts_with(TRANSLATE_PARAM_PREFIX))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
}

/// Matches `google.com`, `www.google.co.uk`, `translate.google.de` and so on
fn is_google_host(host: &str, prefix: &str) -> bool {
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Decodes hrefs like `https%3A%2F%2Fexample.com%2F...`
fn decode_if_encoded(href: &str) -> String {
    let lower = href.get(..10).unwrap_or(href).to_ascii_lowercase();
    if lower.starts_with("http%3a") || lower.starts_with("https%3a") || lower.starts_with("magnet%3a")
    {
        percent_decode_str(href).decode_utf8_lossy().into_owned()
    } else {
        href.to_string()
    }
}
