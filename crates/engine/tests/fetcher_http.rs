use std::net::TcpListener;
use std::time::Duration;

use apifetch_engine::{DisplayOptions, DisplayOutcome, FetchState, Fetcher, FieldFilter};
use apifetch_registry::FetchConfig;
use apifetch_registry::builtin::{coingecko, jsonplaceholder, randomuser};
use apifetch_types::{FetchError, FetchErrorKind, Record};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CITIES: [&str; 10] = [
    "Gwenborough",
    "Wisokyburgh",
    "McKenziehaven",
    "South Elvis",
    "Roscoeview",
    "South Christy",
    "Howemouth",
    "Aliyaview",
    "Bartholomebury",
    "Lebsackbury",
];

fn stub_users() -> Value {
    let users: Vec<Value> = CITIES
        .iter()
        .enumerate()
        .map(|(index, city)| {
            let id = index + 1;
            json!({
                "id": id,
                "name": format!("Stub User {id}"),
                "username": format!("stub{id}"),
                "email": format!("stub{id}@example.org"),
                "address": { "street": "Kulas Light", "city": city }
            })
        })
        .collect();
    Value::Array(users)
}

async fn serve(route: &str, response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn quick_config() -> FetchConfig {
    FetchConfig::default().with_timeout(Duration::from_secs(5))
}

#[tokio::test(flavor = "multi_thread")]
async fn jsonplaceholder_end_to_end_with_limit() {
    let server = serve("/users", ResponseTemplate::new(200).set_body_json(stub_users())).await;
    let profile = jsonplaceholder().with_base_url(format!("{}/users", server.uri()));
    let mut fetcher = Fetcher::new(profile, quick_config());

    assert_eq!(fetcher.fetch(), Ok(10));
    assert_eq!(fetcher.count(), 10);

    let outcome = fetcher.display(&DisplayOptions::default().with_limit(5));
    let blocks = outcome.blocks();
    assert_eq!(blocks.len(), 5);
    for (index, block) in blocks.iter().enumerate() {
        let id = index + 1;
        assert_eq!(block.position, id);
        assert_eq!(block.heading, format!("User {id}:"));
        assert_eq!(block.value("Name"), Some(format!("Stub User {id}").as_str()));
        assert_eq!(block.value("Username"), Some(format!("stub{id}").as_str()));
        assert_eq!(block.value("Email"), Some(format!("stub{id}@example.org").as_str()));
        assert_eq!(block.value("City"), Some(CITIES[index]));
    }
}

#[tokio::test(flavor = "current_thread")]
async fn fetch_works_from_a_current_thread_runtime() {
    let server = serve("/users", ResponseTemplate::new(200).set_body_json(stub_users())).await;
    let mut fetcher = Fetcher::new(jsonplaceholder().with_base_url(format!("{}/users", server.uri())), quick_config());
    assert_eq!(fetcher.fetch(), Ok(10));
    assert_eq!(fetcher.count(), 10);
}

#[tokio::test(flavor = "multi_thread")]
async fn display_reuses_the_stored_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stub_users()))
        .expect(1)
        .mount(&server)
        .await;
    let mut fetcher = Fetcher::new(jsonplaceholder().with_base_url(format!("{}/users", server.uri())), quick_config());
    fetcher.fetch().expect("stub fetch");

    let all = fetcher.display(&DisplayOptions::default());
    assert_eq!(all.blocks().len(), 10);

    let city_filter: FieldFilter = "address.city^=S".parse().expect("filter");
    let southern = fetcher.display(&DisplayOptions::default().with_filter(city_filter));
    let positions: Vec<_> = southern.blocks().iter().map(|block| block.position).collect();
    assert_eq!(positions, vec![4, 6]);
    assert_eq!(fetcher.count(), 10, "count ignores filters");

    let closure = fetcher.display(
        &DisplayOptions::default().with_filter(|record: &Record| record.get("id").and_then(Value::as_u64).is_some_and(|id| id % 2 == 0)),
    );
    assert_eq!(closure.listing().map(|listing| listing.matched), Some(5));
}

#[tokio::test(flavor = "multi_thread")]
async fn randomuser_unwraps_nested_results_and_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("results", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "name": { "first": "Aino", "last": "Lampi" }, "email": "aino@example.com", "location": { "city": "Kemi", "country": "Finland" } },
                { "name": { "first": "Noah" }, "location": { "city": "Oslo" } },
                { "name": { "first": "Léa", "last": "Roux" }, "email": "lea@example.com" }
            ],
            "info": { "seed": "abc", "results": 3, "page": 1 }
        })))
        .mount(&server)
        .await;

    let mut fetcher = Fetcher::new(randomuser().with_base_url(format!("{}/api/", server.uri())), quick_config());
    assert_eq!(fetcher.fetch(), Ok(3));

    let DisplayOutcome::Listing(listing) = fetcher.display(&DisplayOptions::default()) else {
        panic!("expected a listing");
    };
    assert_eq!(listing.blocks.len(), 2, "the record without an email is skipped");
    assert_eq!(listing.skipped.len(), 1);
    assert_eq!(listing.skipped[0].position, 2);
    assert_eq!(listing.blocks[1].value("Name"), Some("Léa Roux"));
    assert_eq!(listing.blocks[1].value("Country"), Some("N/A"));
}

#[tokio::test(flavor = "multi_thread")]
async fn coingecko_sends_market_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/coins/markets"))
        .and(query_param("vs_currency", "usd"))
        .and(query_param("order", "market_cap_desc"))
        .and(query_param("per_page", "10"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "current_price": 64250.5, "market_cap": 1265000000000u64 },
            { "id": "ethereum", "symbol": "eth", "name": "Ethereum", "current_price": 3120.25, "market_cap": 375000000000u64 }
        ])))
        .mount(&server)
        .await;

    let mut fetcher = Fetcher::new(
        coingecko().with_base_url(format!("{}/api/v3/coins/markets", server.uri())),
        quick_config(),
    );
    assert_eq!(fetcher.fetch(), Ok(2));
    let outcome = fetcher.display(&DisplayOptions::default().with_limit(1));
    assert_eq!(
        outcome.blocks()[0].to_string(),
        "Crypto 1:\nName: Bitcoin\nSymbol: BTC\nCurrent Price: $64,250.50\nMarket Cap: $1,265,000,000,000"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_response_is_a_timeout() {
    let server = serve(
        "/users",
        ResponseTemplate::new(200)
            .set_body_json(stub_users())
            .set_delay(Duration::from_millis(1500)),
    )
    .await;
    let config = FetchConfig::default().with_timeout(Duration::from_millis(200));
    let mut fetcher = Fetcher::new(jsonplaceholder().with_base_url(format!("{}/users", server.uri())), config);

    let error = fetcher.fetch().expect_err("deadline exceeded");
    assert_eq!(error.kind(), FetchErrorKind::Timeout);
    assert!(matches!(error, FetchError::Timeout { timeout_ms: 200, .. }));
    assert_eq!(fetcher.display(&DisplayOptions::default()), DisplayOutcome::NoData);
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_is_an_http_status_failure() {
    let server = serve("/users", ResponseTemplate::new(500).set_body_string("upstream exploded")).await;
    let mut fetcher = Fetcher::new(jsonplaceholder().with_base_url(format!("{}/users", server.uri())), quick_config());

    let error = fetcher.fetch().expect_err("500");
    assert_eq!(error.kind(), FetchErrorKind::HttpStatus(500));
    let message = error.to_string();
    assert!(message.contains("Internal Server Error"), "{message}");
    assert!(message.contains("upstream exploded"), "{message}");
    assert_eq!(fetcher.count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn not_found_is_an_http_status_failure() {
    let server = MockServer::start().await;
    let mut fetcher = Fetcher::new(jsonplaceholder().with_base_url(format!("{}/users", server.uri())), quick_config());
    assert_eq!(fetcher.fetch().map_err(|error| error.kind()), Err(FetchErrorKind::HttpStatus(404)));
}

#[tokio::test(flavor = "multi_thread")]
async fn non_json_body_is_a_parse_error() {
    let server = serve(
        "/users",
        ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"),
    )
    .await;
    let mut fetcher = Fetcher::new(jsonplaceholder().with_base_url(format!("{}/users", server.uri())), quick_config());

    let error = fetcher.fetch().expect_err("html body");
    assert_eq!(error.kind(), FetchErrorKind::Parse);
    assert!(error.to_string().contains("maintenance"), "{error}");
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_body_is_a_parse_error() {
    let server = serve("/users", ResponseTemplate::new(200)).await;
    let mut fetcher = Fetcher::new(jsonplaceholder().with_base_url(format!("{}/users", server.uri())), quick_config());
    assert_eq!(fetcher.fetch().map_err(|error| error.kind()), Err(FetchErrorKind::Parse));
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_envelope_is_a_malformed_response() {
    let server = serve("/api/", ResponseTemplate::new(200).set_body_json(json!({ "error": "Uh oh, something has gone wrong." }))).await;
    let mut fetcher = Fetcher::new(randomuser().with_base_url(format!("{}/api/", server.uri())), quick_config());
    assert_eq!(fetcher.fetch().map_err(|error| error.kind()), Err(FetchErrorKind::MalformedResponse));
    assert!(matches!(fetcher.state(), FetchState::Failed(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_refetch_replaces_ready_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stub_users()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let mut fetcher = Fetcher::new(jsonplaceholder().with_base_url(format!("{}/users", server.uri())), quick_config());

    assert_eq!(fetcher.fetch(), Ok(10));
    assert_eq!(fetcher.count(), 10);

    assert_eq!(fetcher.fetch().map_err(|error| error.kind()), Err(FetchErrorKind::HttpStatus(503)));
    assert_eq!(fetcher.count(), 0);
    assert_eq!(fetcher.display(&DisplayOptions::default().with_limit(3)), DisplayOutcome::NoData);
}

#[test]
fn refused_connection_is_a_connection_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let address = listener.local_addr().expect("local addr");
    drop(listener);

    let profile = jsonplaceholder().with_base_url(format!("http://{address}/users"));
    let mut fetcher = Fetcher::new(profile, quick_config());
    let error = fetcher.fetch().expect_err("nothing is listening");
    assert_eq!(error.kind(), FetchErrorKind::ConnectionFailure);
    assert!(error.to_string().contains(&address.to_string()), "{error}");
}
