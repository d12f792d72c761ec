//! Link resolution against a mock catalog and CDN

use crate::common::{aggregator, detail_page, landing_page, listing_page, test_config, Origins};
use catalog_ripple::crawler::{Fetcher, LinkResolver};
use catalog_ripple::model::ResolvedLink;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, Origins, Fetcher) {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);
    let fetcher = Fetcher::new(&test_config(&origins)).expect("fetcher");
    (server, origins, fetcher)
}

#[tokio::test]
async fn test_magnet_passes_through_untouched() {
    let (server, _origins, fetcher) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let magnet = "magnet:?xt=urn:btih:c12fe1c06bba254a9dc9f519b335aa7c1367a88a&dn=App%20v1";
    let resolved = LinkResolver::new(&fetcher, 3).resolve(magnet).await;

    assert_eq!(resolved, ResolvedLink::Magnet(magnet.to_string()));
}

#[tokio::test]
async fn test_direct_cdn_file_needs_no_fetch() {
    let (server, origins, fetcher) = setup().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let link = format!("{}/fdl/7/app.apk", origins.cdn);
    let resolved = LinkResolver::new(&fetcher, 3).resolve(&link).await;

    assert_eq!(resolved, ResolvedLink::FileUrl(link));
}

#[tokio::test]
async fn test_proxy_wrapper_unwrapped_before_traversal() {
    let (server, origins, fetcher) = setup().await;
    let port = server.address().port();

    Mock::given(method("GET"))
        .and(path("/dw/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(landing_page(&["#/download/42/app.apk"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let wrapped = format!(
        "http://localhost.translate.goog:{}/dw/42?_x_tr_sl=auto&_x_tr_tl=en&_x_tr_hl=en",
        port
    );
    let resolved = LinkResolver::new(&fetcher, 3).resolve(&wrapped).await;

    assert_eq!(
        resolved,
        ResolvedLink::FileUrl(format!("{}/download/42/app.apk", origins.cdn))
    );
}

#[tokio::test]
async fn test_query_wrapped_file_link() {
    let (_server, origins, fetcher) = setup().await;

    let target = format!("{}/fdl/1/game.apk", origins.cdn);
    let wrapped = format!(
        "https://translate.google.com/translate?sl=auto&tl=en&u={}",
        target.replace(':', "%3A").replace('/', "%2F")
    );
    let resolved = LinkResolver::new(&fetcher, 3).resolve(&wrapped).await;

    assert_eq!(resolved, ResolvedLink::FileUrl(target));
}

#[tokio::test]
async fn test_multi_hop_traversal() {
    let (server, origins, fetcher) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dwn/5/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(landing_page(&[format!("{}/dw/step-2", origins.cdn).as_str()])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dw/step-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(landing_page(&[
                "https://telegram.me/catalog",
                "magnet:?xt=urn:btih:step2",
            ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolved = LinkResolver::new(&fetcher, 3).resolve("/dwn/5/").await;

    assert_eq!(resolved, ResolvedLink::Magnet("magnet:?xt=urn:btih:step2".to_string()));
}

#[tokio::test]
async fn test_hop_bound_yields_unresolved() {
    let (server, origins, fetcher) = setup().await;
    let looping = format!("{}/dw/loop", origins.cdn);

    Mock::given(method("GET"))
        .and(path("/dw/loop"))
        .respond_with(ResponseTemplate::new(200).set_body_string(landing_page(&[looping.as_str()])))
        .expect(3)
        .mount(&server)
        .await;

    let resolved = LinkResolver::new(&fetcher, 3).resolve(&looping).await;

    assert_eq!(resolved, ResolvedLink::Unresolved(looping));
}

#[tokio::test]
async fn test_cdn_failure_yields_unresolved() {
    let (server, origins, fetcher) = setup().await;
    let gone = format!("{}/dw/gone", origins.cdn);

    Mock::given(method("GET"))
        .and(path("/dw/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let resolved = LinkResolver::new(&fetcher, 3).resolve(&gone).await;

    assert_eq!(resolved, ResolvedLink::Unresolved(gone));
}

#[tokio::test]
async fn test_landing_without_button_yields_unresolved() {
    let (server, origins, fetcher) = setup().await;
    let ads = format!("{}/dw/ads", origins.cdn);

    Mock::given(method("GET"))
        .and(path("/dw/ads"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(landing_page(&["https://t.me/channel", "https://ads.example.com/"])),
        )
        .mount(&server)
        .await;

    let resolved = LinkResolver::new(&fetcher, 3).resolve(&ads).await;

    assert_eq!(resolved, ResolvedLink::Unresolved(ads));
}

#[tokio::test]
async fn test_unresolved_links_keep_entry() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);
    let gone = format!("{}/dw/gone", origins.cdn);

    Mock::given(method("GET"))
        .and(path("/search/minecraft"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["a"], Some(1))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a-android.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(detail_page(&[gone.as_str(), "magnet:?xt=urn:btih:a"], "2 GB")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dw/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = test_config(&origins);
    let response = aggregator(&config).run("minecraft", 1).await;

    assert!(response.success);
    assert_eq!(response.count, 1);
    assert_eq!(
        response.results[0].download,
        format!("{}, magnet:?xt=urn:btih:a", gone)
    );
}
