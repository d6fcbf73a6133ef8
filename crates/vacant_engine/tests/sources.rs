use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use vacant_core::Platform;
use vacant_engine::{
    fetch_listings, FailureKind, HhSource, ListingSource, SourceSettings, SuperJobSource,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    vacant_logging::initialize_for_tests();
}

fn hh_item(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Vacancy {id}"),
        "alternate_url": format!("https://hh.ru/vacancy/{id}"),
        "salary": null,
        "snippet": { "requirement": "r", "responsibility": "s" }
    })
}

#[tokio::test]
async fn hh_sends_search_parameters_and_returns_items() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .and(query_param("text", "rust"))
        .and(query_param("page", "0"))
        .and(query_param("per_page", "20"))
        .and(query_param("search_field", "name"))
        .and(header("HH-User-Agent", "Vacant/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [hh_item("1"), hh_item("2")],
            "found": 2,
            "pages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = HhSource::new(SourceSettings::default(), "Vacant/test")
        .unwrap()
        .with_base_url(format!("{}/vacancies", server.uri()));

    assert_eq!(source.platform(), Platform::HeadHunter);
    let items = source.fetch_page("rust", 0).await.expect("page ok");
    assert_eq!(items, vec![hh_item("1"), hh_item("2")]);
}

#[tokio::test]
async fn pages_are_fetched_in_order_and_concatenated() {
    init_logging();
    let server = MockServer::start().await;
    for (page, ids) in [("0", ["1", "2"]), ("1", ["3", "4"])] {
        Mock::given(method("GET"))
            .and(path("/vacancies"))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": ids.iter().map(|id| hh_item(id)).collect::<Vec<_>>()
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let settings = SourceSettings {
        page_size: 2,
        ..SourceSettings::default()
    };
    let source = HhSource::new(settings, "Vacant/test")
        .unwrap()
        .with_base_url(format!("{}/vacancies", server.uri()));

    // 3 wanted, 2 per page -> 2 pages.
    let items = fetch_listings(&source, "rust", 3).await.expect("fetch ok");
    let ids: Vec<_> = items.iter().map(|item| item["id"].clone()).collect();
    assert_eq!(ids, vec![json!("1"), json!("2"), json!("3"), json!("4")]);
}

#[tokio::test]
async fn zero_count_requests_nothing() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let source = HhSource::new(SourceSettings::default(), "Vacant/test")
        .unwrap()
        .with_base_url(format!("{}/vacancies", server.uri()));
    let items = fetch_listings(&source, "rust", 0).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn failing_page_aborts_the_fetch() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [hh_item("1")] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let settings = SourceSettings {
        page_size: 1,
        ..SourceSettings::default()
    };
    let source = HhSource::new(settings, "Vacant/test")
        .unwrap()
        .with_base_url(format!("{}/vacancies", server.uri()));

    let err = fetch_listings(&source, "rust", 2).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn superjob_sends_key_and_keyword_query() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2.0/vacancies/"))
        .and(query_param("keywords[0][keys]", "rust"))
        .and(query_param("keywords[0][srws]", "1"))
        .and(query_param("keywords[0][skwc]", "or"))
        .and(query_param("page", "0"))
        .and(query_param("count", "20"))
        .and(header("X-Api-App-Id", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [{ "id": 5, "profession": "Dev", "link": "l" }],
            "total": 1,
            "more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = SuperJobSource::new(SourceSettings::default(), Some("secret".to_string()))
        .unwrap()
        .with_base_url(format!("{}/2.0/vacancies/", server.uri()));

    let items = source.fetch_page("rust", 0).await.expect("page ok");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["profession"], json!("Dev"));
}

#[tokio::test]
async fn superjob_without_key_fails_before_any_request() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let source = SuperJobSource::new(SourceSettings::default(), None)
        .unwrap()
        .with_base_url(format!("{}/2.0/vacancies/", server.uri()));
    let err = source.fetch_page("rust", 0).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MissingCredentials);
}

#[tokio::test]
async fn non_json_body_is_a_decode_failure() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let source = HhSource::new(SourceSettings::default(), "Vacant/test")
        .unwrap()
        .with_base_url(format!("{}/vacancies", server.uri()));
    let err = source.fetch_page("rust", 0).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_source_times_out() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "items": [] })),
        )
        .mount(&server)
        .await;

    let settings = SourceSettings {
        request_timeout: Duration::from_millis(50),
        ..SourceSettings::default()
    };
    let source = HhSource::new(settings, "Vacant/test")
        .unwrap()
        .with_base_url(format!("{}/vacancies", server.uri()));
    let err = source.fetch_page("rust", 0).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"items\": [1, 2, 3, 4]}"))
        .mount(&server)
        .await;

    let settings = SourceSettings {
        max_bytes: 10,
        ..SourceSettings::default()
    };
    let source = HhSource::new(settings, "Vacant/test")
        .unwrap()
        .with_base_url(format!("{}/vacancies", server.uri()));
    let err = source.fetch_page("rust", 0).await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 10, .. }));
}
