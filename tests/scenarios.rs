// tests/scenarios.rs
//! End-to-end browsing scenarios over a scripted backend.

mod common;

use common::{ok_json, pipeline, status, CountingCredentials, ScriptedTransport};
use hoppyhour::{
    Business, BusinessApi, BusinessFilter, BusinessId, Degrade, ImageProfile, ImageResolver,
    ValidatedUrl,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;

fn business(photos: serde_json::Value) -> Business {
    serde_json::from_value(json!({
        "id": "b1",
        "name": "The Tap Room",
        "latitude": 47.6,
        "longitude": -122.3,
        "address": "1 Pike St",
        "photos": photos,
        "dealInfo": []
    }))
    .unwrap()
}

fn api(transport: std::sync::Arc<ScriptedTransport>) -> BusinessApi {
    BusinessApi::new(pipeline(
        transport,
        CountingCredentials::anonymous(),
        3,
        Duration::from_millis(100),
    ))
}

#[test]
fn business_without_photos_shows_placeholder() {
    let image = ImageResolver::new(None).resolve(&business(json!([])));
    assert_eq!(image.url(), Some("/placeholder-image.jpg"));
}

#[test]
fn main_photo_medium_variant_wins() {
    let b = business(json!([
        { "id": "p0", "cdnUrls": { "small": "https://cdn/other.jpg" } },
        { "id": "p1", "mainPhoto": true, "cdnUrls": { "medium": "https://cdn/a.jpg" } }
    ]));
    assert_eq!(ImageResolver::new(None).resolve(&b).url(), Some("https://cdn/a.jpg"));
}

#[test]
fn hero_profile_prefers_large() {
    let b = business(json!([{
        "mainPhoto": true,
        "cdnUrls": { "medium": "https://cdn/m.jpg", "large": "https://cdn/l.jpg" }
    }]));
    let resolver = ImageResolver::new(None);
    assert_eq!(resolver.resolve(&b).url(), Some("https://cdn/m.jpg"));
    assert_eq!(
        resolver.with_profile(ImageProfile::Hero).resolve(&b).url(),
        Some("https://cdn/l.jpg")
    );
}

#[test]
fn storage_key_is_joined_with_cdn_base() {
    let b = business(json!([{ "mainPhoto": true, "s3KeyMedium": "/photos/b1/medium.jpg" }]));
    let resolver = ImageResolver::new(Some(ValidatedUrl::parse("https://images.example.com/").unwrap()));
    assert_eq!(
        resolver.resolve(&b).url(),
        Some("https://images.example.com/photos/b1/medium.jpg")
    );
}

#[tokio::test(start_paused = true)]
async fn missing_business_fails_after_one_attempt() {
    let transport = ScriptedTransport::always(status(404, r#"{"message":"not found"}"#));
    let api = api(transport.clone());

    let err = api
        .get_business(&BusinessId::parse("missing").unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.as_api_error().map(|e| e.status), Some(404));
    assert_eq!(transport.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn wrapped_list_payload_is_accepted() {
    let transport = ScriptedTransport::always(ok_json(json!({
        "data": [{ "id": "b9", "name": "Wrapped", "photos": [], "dealInfo": [] }]
    })));
    let businesses = api(transport.clone())
        .list_businesses(Some(1), Some(12), &BusinessFilter::default())
        .await
        .unwrap();

    assert_eq!(businesses.len(), 1);
    assert_eq!(businesses[0].name, "Wrapped");
    assert_eq!(
        transport.seen()[0].description,
        "GET /business?page=1&limit=12"
    );
}

#[tokio::test(start_paused = true)]
async fn failed_search_degrades_to_empty() {
    let transport = ScriptedTransport::always(status(500, ""));
    let businesses = api(transport.clone())
        .search_by_location(47.6, -122.3, Some(2.5))
        .await
        .or_empty("Location search");

    assert!(businesses.is_empty());
    assert_eq!(transport.attempts(), 3);
    assert_eq!(
        transport.seen()[0].description,
        "GET /business?lat=47.6&lng=-122.3&radius=2.5"
    );
}

#[tokio::test(start_paused = true)]
async fn pager_keeps_loaded_pages_across_a_failure() {
    let page = |first: u32| {
        ok_json(json!((first..first + 2)
            .map(|i| json!({ "id": format!("b{}", i), "name": "v", "photos": [], "dealInfo": [] }))
            .collect::<Vec<_>>()))
    };
    let transport = ScriptedTransport::new(vec![
        page(1),
        status(503, ""),
        status(503, ""),
        status(503, ""),
        page(3),
        ok_json(json!([])),
    ]);
    let mut pager = api(transport.clone())
        .pager(BusinessFilter::default())
        .with_page_size(2);

    assert_eq!(pager.load_more().await.unwrap(), 2);
    assert!(pager.load_more().await.is_err());
    assert!(pager.last_error().is_some());
    assert_eq!(pager.loaded().len(), 2);
    assert!(pager.has_more());

    // Retrying asks for the same page again.
    assert_eq!(pager.load_more().await.unwrap(), 2);
    assert!(pager.last_error().is_none());
    assert_eq!(pager.load_more().await.unwrap(), 0);
    assert!(!pager.has_more());

    let pages: Vec<String> = transport
        .seen()
        .into_iter()
        .map(|s| s.description)
        .collect();
    assert_eq!(pages[1], "GET /business?page=2&limit=2");
    assert_eq!(pages[4], "GET /business?page=2&limit=2");
    assert_eq!(pages[5], "GET /business?page=3&limit=2");
}

#[tokio::test(start_paused = true)]
async fn exhausted_candidates_fall_back_to_minted_url() {
    let transport = ScriptedTransport::always(ok_json(json!({ "url": "https://signed/b1.jpg" })));
    let api = api(transport.clone());
    let b = business(json!([{
        "mainPhoto": true,
        "fallbackUrl": "https://ext/b1.jpg",
        "s3Key": "photos/b1.jpg"
    }]));

    let mut image = ImageResolver::new(None).resolve(&b);
    assert_eq!(image.url(), Some("https://ext/b1.jpg"));
    assert_eq!(image.advance_or_mint(&api).await, Some("https://signed/b1.jpg"));
    assert_eq!(image.candidates().len(), 1);
    assert_eq!(
        transport.seen()[0].description,
        "GET /images/url?key=photos/b1.jpg"
    );

    assert_eq!(image.advance_or_mint(&api).await, None);
    assert_eq!(transport.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn health_uses_short_timeout_request() {
    let transport = ScriptedTransport::always(ok_json(json!({ "status": "ok", "db": "up" })));
    let health = api(transport.clone()).health().await.unwrap();
    assert!(health.is_healthy());

    let seen = transport.seen();
    assert_eq!(seen[0].description, "GET /health");
    assert_eq!(seen[0].timeout, Some(Duration::from_secs(5)));
}

#[tokio::test(start_paused = true)]
async fn list_requests_use_client_default_timeout() {
    let transport = ScriptedTransport::always(ok_json(json!([])));
    api(transport.clone())
        .list_businesses(Some(1), Some(12), &BusinessFilter::default())
        .await
        .unwrap();

    assert_eq!(transport.seen()[0].timeout, None);
}

#[tokio::test(start_paused = true)]
async fn malformed_record_names_the_bad_field() {
    let transport = ScriptedTransport::always(ok_json(json!({
        "data": [{
            "id": "b1",
            "name": "The Tap Room",
            "latitude": null,
            "longitude": -122.3,
            "address": "1 Pike St"
        }]
    })));

    let err = api(transport)
        .list_businesses(Some(1), Some(12), &BusinessFilter::default())
        .await
        .unwrap_err();

    match err {
        hoppyhour::AppError::MalformedResponse(message) => {
            assert!(message.contains("expected f64"), "{}", message);
        }
        other => panic!("expected a malformed response, got {:?}", other),
    }
}
