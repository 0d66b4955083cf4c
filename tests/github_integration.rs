//! Integration tests for the GitHub issue and manifest fetchers using wiremock

use base64::prelude::{BASE64_STANDARD, Engine as _};
use core::time::Duration;
use isitaccessible::facts::RepoRef;
use isitaccessible::facts::github::{Client, IssueFetcher, IssueState, ManifestFetcher, RESULT_CEILING};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new(Some("test-token"), server.uri(), Duration::from_secs(5)).expect("Failed to create client")
}

fn repo(full_name: &str) -> RepoRef {
    RepoRef::from_full_name(full_name).expect("valid repo name")
}

fn query_for(full_name: &str) -> String {
    format!("accessibility OR a11y OR aria OR screenreader repo:{full_name} type:issue")
}

/// A page of `count` issues starting at `first_id`, alternating open and closed.
fn issues_page(total_count: u64, first_id: u64, count: u64) -> Value {
    let items: Vec<Value> = (first_id..first_id + count)
        .map(|id| {
            if id % 2 == 0 {
                json!({
                    "id": id,
                    "html_url": format!("https://github.com/owner/repo/issues/{id}"),
                    "title": format!("Issue {id}"),
                    "state": "open",
                    "created_at": "2024-01-01T00:00:00Z",
                    "closed_at": null
                })
            } else {
                json!({
                    "id": id,
                    "html_url": format!("https://github.com/owner/repo/issues/{id}"),
                    "title": format!("Issue {id}"),
                    "state": "closed",
                    "created_at": "2024-01-01T00:00:00Z",
                    "closed_at": "2024-01-05T00:00:00Z"
                })
            }
        })
        .collect();

    json!({ "total_count": total_count, "incomplete_results": false, "items": items })
}

async fn mount_page(server: &MockServer, full_name: &str, page: u32, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", query_for(full_name)))
        .and(query_param("per_page", "100"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetches_all_pages() {
    let server = MockServer::start().await;

    mount_page(&server, "owner/repo", 1, issues_page(250, 0, 100), 1).await;
    mount_page(&server, "owner/repo", 2, issues_page(250, 100, 100), 1).await;
    mount_page(&server, "owner/repo", 3, issues_page(250, 200, 50), 1).await;

    let fetcher = IssueFetcher::new(client(&server));
    let fetch = fetcher.fetch_issues(&repo("owner/repo")).await;

    assert_eq!(fetch.requests, 3);
    assert_eq!(fetch.issues.len(), 250);
    assert_eq!(fetch.repo, repo("owner/repo"));

    // fetch order is preserved
    let ids: Vec<u64> = fetch.issues.iter().map(|i| i.id).collect();
    assert_eq!(ids, (0..250).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_stops_at_result_ceiling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues_page(5000, 0, 100)))
        .expect(10)
        .mount(&server)
        .await;

    let fetcher = IssueFetcher::new(client(&server));
    let fetch = fetcher.fetch_issues(&repo("owner/repo")).await;

    assert_eq!(fetch.requests, 10);
    assert_eq!(fetch.issues.len(), RESULT_CEILING);
}

#[tokio::test]
async fn test_failure_with_unchanged_name_keeps_first_page() {
    let server = MockServer::start().await;

    mount_page(&server, "owner/repo", 1, issues_page(250, 0, 100), 1).await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    mount_page(&server, "owner/repo", 3, issues_page(250, 200, 50), 0).await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "full_name": "owner/repo" })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = IssueFetcher::new(client(&server));
    let fetch = fetcher.fetch_issues(&repo("owner/repo")).await;

    assert_eq!(fetch.requests, 2);
    assert_eq!(fetch.issues.len(), 100);
    assert_eq!(fetch.repo, repo("owner/repo"));
}

#[tokio::test]
async fn test_failure_with_failed_lookup_keeps_accumulated_issues() {
    let server = MockServer::start().await;

    mount_page(&server, "owner/repo", 1, issues_page(250, 0, 100), 1).await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = IssueFetcher::new(client(&server));
    let fetch = fetcher.fetch_issues(&repo("owner/repo")).await;

    assert_eq!(fetch.issues.len(), 100);
}

#[tokio::test]
async fn test_renamed_repository_is_searched_from_the_start() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", query_for("old-owner/repo")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [{ "message": "The listed users and repositories cannot be searched" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/old-owner/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "full_name": "new-owner/repo" })))
        .expect(1)
        .mount(&server)
        .await;

    mount_page(&server, "new-owner/repo", 1, issues_page(150, 0, 100), 1).await;
    mount_page(&server, "new-owner/repo", 2, issues_page(150, 100, 50), 1).await;

    let fetcher = IssueFetcher::new(client(&server));
    let fetch = fetcher.fetch_issues(&repo("old-owner/repo")).await;

    assert_eq!(fetch.repo, repo("new-owner/repo"));
    assert_eq!(fetch.issues.len(), 150);
    assert_eq!(fetch.requests, 3);
}

#[tokio::test]
async fn test_rename_is_followed_only_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(422))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/old-owner/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "full_name": "new-owner/repo" })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = IssueFetcher::new(client(&server));
    let fetch = fetcher.fetch_issues(&repo("old-owner/repo")).await;

    assert!(fetch.issues.is_empty());
    assert_eq!(fetch.repo, repo("new-owner/repo"));
}

#[tokio::test]
async fn test_rate_limited_search_stops_without_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1704067200"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "full_name": "owner/repo" })))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = IssueFetcher::new(client(&server));
    let fetch = fetcher.fetch_issues(&repo("owner/repo")).await;

    assert!(fetch.issues.is_empty());
    assert_eq!(fetch.requests, 1);
}

#[tokio::test]
async fn test_issue_states_survive_decoding() {
    let server = MockServer::start().await;
    mount_page(&server, "owner/repo", 1, issues_page(4, 0, 4), 1).await;

    let fetcher = IssueFetcher::new(client(&server));
    let fetch = fetcher.fetch_issues(&repo("owner/repo")).await;

    let states: Vec<IssueState> = fetch.issues.iter().map(|i| i.state).collect();
    assert_eq!(states, vec![IssueState::Open, IssueState::Closed, IssueState::Open, IssueState::Closed]);
    assert!(fetch.issues.iter().all(|i| (i.state == IssueState::Closed) == i.closed_at.is_some()));
}

#[tokio::test]
async fn test_manifest_is_decoded() {
    let server = MockServer::start().await;

    let manifest = r#"{ "name": "monorepo-root", "private": true, "devDependencies": { "lerna": "^8.0.0" } }"#;
    let encoded = BASE64_STANDARD.encode(manifest);
    let wrapped = format!("{}\n{}", &encoded[..20], &encoded[20..]);

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/package.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "package.json",
            "path": "package.json",
            "encoding": "base64",
            "content": wrapped
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ManifestFetcher::new(client(&server));
    let manifest = fetcher.fetch_manifest(&repo("owner/repo")).await.expect("manifest should be found");

    assert_eq!(manifest.name(), Some("monorepo-root"));
    assert!(manifest.dependency_names().contains("lerna"));
}

#[tokio::test]
async fn test_missing_manifest_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/package.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ManifestFetcher::new(client(&server));
    assert!(fetcher.fetch_manifest(&repo("owner/repo")).await.is_none());
}

#[tokio::test]
async fn test_unparseable_manifest_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/contents/package.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "encoding": "base64",
            "content": BASE64_STANDARD.encode("this is not json")
        })))
        .mount(&server)
        .await;

    let fetcher = ManifestFetcher::new(client(&server));
    assert!(fetcher.fetch_manifest(&repo("owner/repo")).await.is_none());
}
