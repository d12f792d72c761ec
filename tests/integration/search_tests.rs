//! End-to-end searches: pagination, ordering and failure isolation

use crate::common::{
    aggregator, detail_page, empty_listing_page, landing_page, listing_page, magnet_detail_page,
    test_config, Origins,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_search_resolves_every_link() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);
    let slugs = ["a1", "a2", "a3", "a4", "a5"];

    Mock::given(method("GET"))
        .and(path("/search/minecraft"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&slugs, None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/minecraft/page-2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_listing_page()))
        .expect(0)
        .mount(&server)
        .await;

    for (i, slug) in slugs.iter().enumerate() {
        let magnet = format!("magnet:?xt=urn:btih:{}", slug);
        let redirect = format!("/dwn/{}/", i);
        mount_html(
            &server,
            &format!("/{}-android.html", slug),
            detail_page(&[redirect.as_str(), magnet.as_str()], "154.2 MB"),
        )
        .await;

        // The catalog redirect bounces to a CDN landing page
        Mock::given(method("GET"))
            .and(path(redirect.as_str()))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/dw/{}", origins.cdn, i).as_str()),
            )
            .mount(&server)
            .await;
        mount_html(
            &server,
            &format!("/dw/{}", i),
            landing_page(&["https://t.me/channel", format!("/fdl/{}/{}.apk", i, slug).as_str()]),
        )
        .await;
    }

    let config = test_config(&origins);
    let response = aggregator(&config).run("minecraft", 5).await;

    assert!(response.success);
    assert_eq!(response.query, "minecraft");
    assert_eq!(response.limit, 5);
    assert_eq!(response.count, 5);
    assert_eq!(response.results.len(), 5);

    for (i, (entry, slug)) in response.results.iter().zip(slugs).enumerate() {
        assert_eq!(entry.name, slug);
        assert_eq!(entry.link, format!("{}/{}-android.html", origins.catalog, slug));
        assert_eq!(entry.image, format!("{}/img/{}.webp", origins.catalog, slug));
        assert_eq!(entry.size, "154.2 MB");
        assert_eq!(
            entry.download,
            format!(
                "{}/fdl/{}/{}.apk, magnet:?xt=urn:btih:{}",
                origins.cdn, i, slug, slug
            )
        );
    }
}

#[tokio::test]
async fn test_pagination_stops_on_empty_page() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);

    mount_html(&server, "/search/minecraft", listing_page(&["a", "b", "c"], None)).await;
    Mock::given(method("GET"))
        .and(path("/search/minecraft/page-2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_listing_page()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/minecraft/page-3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["z"], None)))
        .expect(0)
        .mount(&server)
        .await;
    for slug in ["a", "b", "c"] {
        mount_html(
            &server,
            &format!("/{}-android.html", slug),
            magnet_detail_page(slug, "1 MB"),
        )
        .await;
    }

    let config = test_config(&origins);
    let response = aggregator(&config).run("minecraft", 10).await;

    assert!(response.success);
    assert_eq!(response.count, 3);
    let names: Vec<&str> = response.results.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_pagination_honors_last_page_hint() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);

    mount_html(&server, "/search/minecraft", listing_page(&["a", "b"], Some(2))).await;
    mount_html(&server, "/search/minecraft/page-2/", listing_page(&["c", "d"], Some(2))).await;
    Mock::given(method("GET"))
        .and(path("/search/minecraft/page-3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["e"], None)))
        .expect(0)
        .mount(&server)
        .await;
    for slug in ["a", "b", "c", "d"] {
        mount_html(
            &server,
            &format!("/{}-android.html", slug),
            magnet_detail_page(slug, "1 MB"),
        )
        .await;
    }

    let config = test_config(&origins);
    let response = aggregator(&config).run("minecraft", 10).await;

    let names: Vec<&str> = response.results.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    assert_eq!(response.count, 4);
}

#[tokio::test]
async fn test_results_keep_discovery_order() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);
    let slugs = ["slow", "medium", "fast"];

    mount_html(&server, "/search/minecraft", listing_page(&slugs, Some(1))).await;
    for (slug, delay_ms) in slugs.iter().zip([400u64, 200, 0]) {
        Mock::given(method("GET"))
            .and(path(format!("/{}-android.html", slug)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(magnet_detail_page(slug, ""))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&server)
            .await;
    }

    let config = test_config(&origins);
    let response = aggregator(&config).run("minecraft", 3).await;

    let names: Vec<&str> = response.results.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["slow", "medium", "fast"]);
    assert!(response.results.iter().all(|e| e.size.is_empty()));
}

#[tokio::test]
async fn test_failing_detail_drops_only_that_candidate() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);

    mount_html(&server, "/search/minecraft", listing_page(&["a", "broken", "c"], Some(1))).await;
    Mock::given(method("GET"))
        .and(path("/broken-android.html"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;
    for slug in ["a", "c"] {
        mount_html(
            &server,
            &format!("/{}-android.html", slug),
            magnet_detail_page(slug, "1 MB"),
        )
        .await;
    }

    let config = test_config(&origins);
    let response = aggregator(&config).run("minecraft", 5).await;

    assert!(response.success);
    assert_eq!(response.count, 2);
    let names: Vec<&str> = response.results.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c"]);
}

/// Serves magnet-only detail pages slowly and records when each request arrived
#[derive(Clone)]
struct SlowDetails {
    delay: Duration,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl Respond for SlowDetails {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        let slug = request
            .url
            .path()
            .trim_start_matches('/')
            .trim_end_matches("-android.html")
            .to_string();
        ResponseTemplate::new(200)
            .set_body_string(magnet_detail_page(&slug, "1 MB"))
            .set_delay(self.delay)
    }
}

/// Largest number of requests that arrived within `window` of one another
fn peak_in_flight(arrivals: &[Instant], window: Duration) -> usize {
    arrivals
        .iter()
        .map(|start| {
            arrivals
                .iter()
                .filter(|other| **other >= *start && other.duration_since(*start) < window)
                .count()
        })
        .max()
        .unwrap_or(0)
}

#[tokio::test]
async fn test_detail_fetches_respect_concurrency_bound() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);
    let slugs = ["a", "b", "c", "d", "e", "f", "g", "h"];
    let delay = Duration::from_millis(300);
    let responder = SlowDetails {
        delay,
        arrivals: Arc::new(Mutex::new(Vec::new())),
    };

    mount_html(&server, "/search/minecraft", listing_page(&slugs, Some(1))).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/[a-h]-android\.html$"))
        .respond_with(responder.clone())
        .expect(8)
        .mount(&server)
        .await;

    let mut config = test_config(&origins);
    config.crawler.max_concurrent_details = 2;
    let response = aggregator(&config).run("minecraft", 8).await;

    assert_eq!(response.count, 8);
    let names: Vec<&str> = response.results.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, slugs.to_vec());

    let arrivals = responder.arrivals.lock().unwrap().clone();
    assert_eq!(arrivals.len(), 8);
    assert_eq!(peak_in_flight(&arrivals, delay * 2 / 3), 2);
}

#[tokio::test]
async fn test_count_never_exceeds_limit() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);
    let slugs = ["a", "b", "c", "d", "e", "f"];

    mount_html(&server, "/search/minecraft", listing_page(&slugs, None)).await;
    for slug in slugs {
        mount_html(
            &server,
            &format!("/{}-android.html", slug),
            magnet_detail_page(slug, "1 MB"),
        )
        .await;
    }

    let config = test_config(&origins);
    let aggregator = aggregator(&config);

    for limit in [1, 3, 6, 9] {
        let response = aggregator.run("minecraft", limit).await;
        assert_eq!(response.count, response.results.len());
        assert!(response.count as i64 <= limit);
        assert_eq!(response.count, (limit as usize).min(slugs.len()));
    }
}

#[tokio::test]
async fn test_empty_search_reports_failure() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);

    Mock::given(method("GET"))
        .and(path("/search/zzzz"))
        .respond_with(ResponseTemplate::new(200).set_body_string(empty_listing_page()))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&origins);
    let response = aggregator(&config).run("zzzz", 5).await;

    assert!(!response.success);
    assert_eq!(response.count, 0);
    assert!(response.results.is_empty());
}

#[tokio::test]
async fn test_listing_outage_reports_failure() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);

    Mock::given(method("GET"))
        .and(path("/search/minecraft"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(&origins);
    let response = aggregator(&config).run("minecraft", 5).await;

    assert!(!response.success);
    assert_eq!(response.count, 0);
}

#[tokio::test]
async fn test_non_positive_limit_makes_no_requests() {
    let server = MockServer::start().await;
    let origins = Origins::of(&server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&origins);
    let response = aggregator(&config).run("minecraft", 0).await;

    assert!(response.success);
    assert_eq!(response.count, 0);
    assert_eq!(response.limit, 0);
}
