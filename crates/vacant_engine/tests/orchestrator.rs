use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use vacant_core::{Platform, SalaryRange, VacancyRecord};
use vacant_engine::{
    FailureKind, ListingSource, Orchestrator, SearchRequest, SourceError,
};

fn init_logging() {
    vacant_logging::initialize_for_tests();
}

/// Serves canned pages and records which pages were asked for.
struct FakeSource {
    platform: Platform,
    page_size: usize,
    pages: Vec<Result<Vec<Value>, SourceError>>,
    delay: Duration,
    requested: Mutex<Vec<(String, usize)>>,
}

impl FakeSource {
    fn new(platform: Platform, page_size: usize, pages: Vec<Result<Vec<Value>, SourceError>>) -> Self {
        Self {
            platform,
            page_size,
            pages,
            delay: Duration::ZERO,
            requested: Mutex::new(Vec::new()),
        }
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn requested(&self) -> Vec<(String, usize)> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ListingSource for FakeSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    async fn fetch_page(&self, keyword: &str, page: usize) -> Result<Vec<Value>, SourceError> {
        self.requested
            .lock()
            .unwrap()
            .push((keyword.to_string(), page));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.pages
            .get(page)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn hh(id: &str, from: Option<i64>, to: Option<i64>) -> Value {
    json!({
        "id": id,
        "name": format!("HH {id}"),
        "alternate_url": format!("https://hh.ru/vacancy/{id}"),
        "salary": { "from": from, "to": to, "currency": "RUR" },
        "snippet": { "requirement": "Rust", "responsibility": null }
    })
}

fn sj(id: i64, from: i64, to: i64) -> Value {
    json!({
        "id": id,
        "profession": format!("SJ {id}"),
        "link": format!("https://superjob.ru/{id}"),
        "payment_from": from,
        "payment_to": to,
        "currency": "rub",
        "vacancyRichText": "Tokio"
    })
}

fn ids(records: &[VacancyRecord]) -> Vec<i64> {
    records.iter().map(VacancyRecord::vacancy_id).collect()
}

fn request(platforms: Vec<Platform>, count: usize, salary: SalaryRange) -> SearchRequest {
    SearchRequest {
        platforms,
        keyword: "rust".to_string(),
        count,
        salary,
    }
}

#[tokio::test]
async fn merges_filtered_results_per_platform() {
    init_logging();
    let hh_source = Arc::new(FakeSource::new(
        Platform::HeadHunter,
        2,
        vec![
            Ok(vec![hh("1", Some(40_000), None), hh("2", Some(50_000), Some(70_000))]),
            Ok(vec![hh("3", None, None), hh("4", None, Some(80_000))]),
        ],
    ));
    let sj_source = Arc::new(FakeSource::new(
        Platform::SuperJob,
        20,
        vec![Ok(vec![sj(10, 0, 60_000), sj(11, 90_000, 0)])],
    ));
    let orchestrator = Orchestrator::new()
        .with_source(hh_source.clone())
        .with_source(sj_source.clone());

    let outcome = orchestrator
        .search(&request(
            vec![Platform::HeadHunter, Platform::SuperJob],
            4,
            SalaryRange::new(Some(50_000), Some(80_000)),
        ))
        .await;

    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.skipped, 0);
    assert_eq!(ids(&outcome.vacancies["HH.ru"]), vec![2]);
    assert_eq!(ids(&outcome.vacancies["SuperJob.ru"]), vec![10]);

    assert_eq!(
        hh_source.requested(),
        vec![("rust".to_string(), 0), ("rust".to_string(), 1)]
    );
    assert_eq!(sj_source.requested(), vec![("rust".to_string(), 0)]);
}

#[tokio::test]
async fn unselected_platforms_are_not_queried() {
    init_logging();
    let hh_source = Arc::new(FakeSource::new(Platform::HeadHunter, 20, vec![]));
    let sj_source = Arc::new(FakeSource::new(
        Platform::SuperJob,
        20,
        vec![Ok(vec![sj(1, 10, 20)])],
    ));
    let orchestrator = Orchestrator::new()
        .with_source(hh_source.clone())
        .with_source(sj_source);

    let outcome = orchestrator
        .search(&request(vec![Platform::SuperJob], 20, SalaryRange::unbounded()))
        .await;

    assert!(hh_source.requested().is_empty());
    let keys: Vec<_> = outcome.vacancies.keys().cloned().collect();
    assert_eq!(keys, vec!["SuperJob.ru".to_string()]);
}

#[tokio::test]
async fn one_failing_platform_does_not_spoil_the_other() {
    init_logging();
    let hh_source = Arc::new(FakeSource::new(
        Platform::HeadHunter,
        1,
        vec![
            Ok(vec![hh("1", Some(100), None)]),
            Err(SourceError::new(FailureKind::HttpStatus(502), "Bad Gateway")),
        ],
    ));
    let sj_source = Arc::new(FakeSource::new(
        Platform::SuperJob,
        20,
        vec![Ok(vec![sj(7, 100, 200)])],
    ));
    let orchestrator = Orchestrator::new()
        .with_source(hh_source)
        .with_source(sj_source);

    let outcome = orchestrator
        .search(&request(
            vec![Platform::HeadHunter, Platform::SuperJob],
            2,
            SalaryRange::unbounded(),
        ))
        .await;

    assert_eq!(outcome.failures["HH.ru"].kind, FailureKind::HttpStatus(502));
    assert!(outcome.vacancies["HH.ru"].is_empty());
    assert_eq!(ids(&outcome.vacancies["SuperJob.ru"]), vec![7]);
}

#[tokio::test]
async fn unconvertible_listings_are_skipped_not_fatal() {
    init_logging();
    let source = Arc::new(FakeSource::new(
        Platform::HeadHunter,
        20,
        vec![Ok(vec![
            hh("1", Some(100), None),
            hh("not-a-number", Some(100), None),
            json!({ "name": "no id at all" }),
            hh("4", Some(200), None),
        ])],
    ));
    let orchestrator = Orchestrator::new().with_source(source);

    let outcome = orchestrator
        .search(&request(vec![Platform::HeadHunter], 20, SalaryRange::unbounded()))
        .await;

    assert_eq!(outcome.skipped, 2);
    assert_eq!(ids(&outcome.vacancies["HH.ru"]), vec![1, 4]);
}

#[tokio::test]
async fn platform_without_source_is_reported() {
    init_logging();
    let orchestrator = Orchestrator::new();
    let outcome = orchestrator
        .search(&request(vec![Platform::SuperJob], 20, SalaryRange::unbounded()))
        .await;
    assert_eq!(outcome.failures["SuperJob.ru"].kind, FailureKind::NoSource);
    assert!(outcome.vacancies["SuperJob.ru"].is_empty());
}

#[tokio::test]
async fn result_does_not_depend_on_completion_order() {
    init_logging();
    let build = |hh_delay: Duration, sj_delay: Duration| {
        Orchestrator::new()
            .with_source(Arc::new(
                FakeSource::new(
                    Platform::HeadHunter,
                    20,
                    vec![Ok(vec![hh("1", Some(10), None), hh("2", Some(20), None)])],
                )
                .delayed(hh_delay),
            ))
            .with_source(Arc::new(
                FakeSource::new(Platform::SuperJob, 20, vec![Ok(vec![sj(3, 30, 0)])])
                    .delayed(sj_delay),
            ))
    };
    let req = request(
        vec![Platform::SuperJob, Platform::HeadHunter],
        20,
        SalaryRange::unbounded(),
    );

    let slow_hh = build(Duration::from_millis(40), Duration::ZERO)
        .search(&req)
        .await;
    let slow_sj = build(Duration::ZERO, Duration::from_millis(40))
        .search(&req)
        .await;
    assert_eq!(slow_hh, slow_sj);
}

#[tokio::test]
async fn duplicate_platforms_are_searched_once() {
    init_logging();
    let source = Arc::new(FakeSource::new(
        Platform::HeadHunter,
        20,
        vec![Ok(vec![hh("1", Some(10), None)])],
    ));
    let orchestrator = Orchestrator::new().with_source(source.clone());
    orchestrator
        .search(&request(
            vec![Platform::HeadHunter, Platform::HeadHunter],
            20,
            SalaryRange::unbounded(),
        ))
        .await;
    assert_eq!(source.requested().len(), 1);
}
