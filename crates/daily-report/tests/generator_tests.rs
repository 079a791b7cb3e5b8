//! End-to-end report tests against mock Jira and Teams endpoints.

use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;
use daily_report::{Generator, ReportArgs, ReportConfig, ReportError, ReportPublisher};
use jira::JiraClient;
use notify::TeamsChannel;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =========================================================================
// Helpers
// =========================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

fn config(server: &MockServer, extra: &[&str]) -> ReportConfig {
    let host = server.uri();
    let webhook = format!("{}/webhook", server.uri());
    let mut argv = vec![
        "jira-daily-report",
        "--jira-host",
        host.as_str(),
        "--jira-username",
        "me@example.com",
        "--jira-password",
        "api-token",
        "--webhook-url",
        webhook.as_str(),
    ];
    argv.extend_from_slice(extra);
    ReportArgs::try_parse_from(argv)
        .unwrap()
        .into_config()
        .unwrap()
}

fn generator(config: ReportConfig) -> Generator<JiraClient> {
    let client = JiraClient::with_timeout(
        config.jira_host.clone(),
        config.credentials.clone(),
        config.timeout,
    )
    .unwrap();
    Generator::new(client, config)
}

fn issue(key: &str, issue_type: &str, summary: &str, parent: Option<&str>) -> Value {
    let mut fields = json!({
        "summary": summary,
        "status": {"id": "3", "name": "In Progress"},
        "issuetype": {"id": "1", "name": issue_type, "subtask": issue_type == "Sub-task"},
        "comment": {"comments": [], "total": 0},
        "worklog": {"worklogs": [], "total": 0}
    });
    if let Some(parent) = parent {
        fields["parent"] = json!({"id": parent, "key": parent});
    }
    json!({"id": key, "key": key, "fields": fields})
}

fn adf(text: &str) -> Value {
    json!({
        "type": "doc",
        "version": 1,
        "content": [{"type": "paragraph", "content": [{"type": "text", "text": text}]}]
    })
}

async fn mount_issue(server: &MockServer, key: &str, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/api/3/issue/{key}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, issues: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path("/rest/api/3/search/jql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isLast": true,
            "issues": issues
        })))
        .expect(1)
        .mount(server)
        .await;
}

// =========================================================================
// Generation
// =========================================================================

#[tokio::test]
async fn test_report_groups_subtask_under_parent_and_epic() {
    let server = MockServer::start().await;

    let mut subtask = issue("PAY-3", "Sub-task", "Fix retry flake", Some("PAY-2"));
    subtask["fields"]["comment"]["comments"] = json!([{
        "id": "1",
        "author": {"accountId": "a", "displayName": "Ann"},
        "body": adf("Retries are green again"),
        "created": "2024-01-15T11:00:00.000+0000"
    }]);
    let mut bug = issue("PAY-9", "Bug", "Crash on empty cart", None);
    bug["fields"]["worklog"]["worklogs"] = json!([{
        "id": "7",
        "author": {"accountId": "b", "displayName": "Bob"},
        "comment": "profiling",
        "created": "2024-01-15T10:00:00.000+0000",
        "timeSpent": "3h"
    }]);
    let mut stale = issue("PAY-4", "Task", "Old work", None);
    stale["fields"]["comment"]["comments"] = json!([{
        "id": "2",
        "body": "two days ago",
        "created": "2024-01-13T09:00:00.000+0000"
    }]);

    Mock::given(method("POST"))
        .and(path("/rest/api/3/search/jql"))
        .and(body_partial_json(json!({
            "jql": "project = PAY AND updated >= -24h ORDER BY updated DESC",
            "maxResults": 100
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isLast": true,
            "issues": [subtask, bug, stale]
        })))
        .expect(1)
        .mount(&server)
        .await;
    // Projection lookup plus the full fetch that synthesizes the parent
    mount_issue(
        &server,
        "PAY-2",
        issue("PAY-2", "Story", "Checkout retries", Some("PAY-1")),
        2,
    )
    .await;
    mount_issue(&server, "PAY-1", issue("PAY-1", "Epic", "Payments", None), 1).await;

    let report = generator(config(&server, &["--jira-project", "PAY"]))
        .generate_at(now())
        .await
        .unwrap();

    let base = server.uri();
    let expected = format!(
        "\
# Daily Report 15-Jan-2024

From last updates in the last 24 hours of project PAY

## [PAY-1 In Progress: Payments]({base}/browse/PAY-1)

### [Story | PAY-2 In Progress: Checkout retries]({base}/browse/PAY-2)

1. [Sub-task | PAY-3 In Progress: Fix retry flake]({base}/browse/PAY-3)
   - 11:00 → Ann commented: Retries are green again

## Anything else

### [Bug | PAY-9 In Progress: Crash on empty cart]({base}/browse/PAY-9)

1. 10:00 → Bob log work 3h: profiling

"
    );
    assert_eq!(report.markdown, expected);
    assert_eq!(report.document.issue_count(), 3);
}

#[tokio::test]
async fn test_report_times_follow_configured_timezone() {
    let server = MockServer::start().await;

    let mut bug = issue("OPS-1", "Bug", "Pager noise", None);
    bug["fields"]["comment"]["comments"] = json!([{
        "id": "1",
        "author": {"displayName": "Ann"},
        "body": "muted",
        "created": "2024-01-15T11:45:00.000+0000"
    }]);
    mount_search(&server, vec![bug]).await;

    let report = generator(config(
        &server,
        &["--jira-project", "OPS", "--timezone", "Asia/Ho_Chi_Minh"],
    ))
    .generate_at(now())
    .await
    .unwrap();

    assert!(report.markdown.contains("1. 18:45 → Ann commented: muted"));
}

#[tokio::test]
async fn test_broken_parent_lookup_degrades_to_standalone() {
    let server = MockServer::start().await;

    let mut subtask = issue("PAY-5", "Sub-task", "Orphaned", Some("PAY-404"));
    subtask["fields"]["comment"]["comments"] = json!([{
        "id": "1",
        "author": {"displayName": "Ann"},
        "body": "still here",
        "created": "2024-01-15T08:00:00.000+0000"
    }]);
    mount_search(&server, vec![subtask]).await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/issue/PAY-404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Issue does not exist"))
        .expect(1)
        .mount(&server)
        .await;

    let report = generator(config(&server, &["--jira-project", "PAY"]))
        .generate_at(now())
        .await
        .unwrap();

    let groups = &report.document.groups;
    assert_eq!(groups.len(), 1);
    assert!(groups[0].epic.is_none());
    assert_eq!(groups[0].issues[0].key, "PAY-5");
}

#[tokio::test]
async fn test_saved_filter_drives_search_and_subtitle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/3/filter/10042"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "10042",
            "name": "Team board",
            "jql": "project = OPS AND sprint in openSprints()"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/api/3/search/jql"))
        .and(body_partial_json(json!({
            "jql": "project = OPS AND sprint in openSprints()"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"isLast": true, "issues": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = generator(config(
        &server,
        &["--query-type", "filter", "--filter-id", "10042"],
    ))
    .generate_at(now())
    .await
    .unwrap();

    assert_eq!(report.document.subtitle, "From saved filter: Team board");
    assert!(report.document.is_empty());
}

#[tokio::test]
async fn test_custom_jql_sent_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/search/jql"))
        .and(body_partial_json(json!({"jql": "assignee = currentUser()"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"isLast": true, "issues": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = generator(config(
        &server,
        &["--query-type", "custom-jql", "--custom-jql", "assignee = currentUser()"],
    ))
    .generate_at(now())
    .await
    .unwrap();

    assert_eq!(report.document.subtitle, "From custom JQL: assignee = currentUser()");
}

#[tokio::test]
async fn test_search_failure_aborts_report() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/search/jql"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let err = generator(config(&server, &["--jira-project", "PAY"]))
        .generate_at(now())
        .await
        .unwrap_err();

    match err {
        ReportError::Search(inner) => assert_eq!(inner.status().map(|s| s.as_u16()), Some(401)),
        other => panic!("unexpected error: {other}"),
    }
}

// =========================================================================
// Publishing
// =========================================================================

#[tokio::test]
async fn test_generated_card_posted_to_webhook() {
    let server = MockServer::start().await;

    let mut bug = issue("PAY-9", "Bug", "Crash", None);
    bug["fields"]["comment"]["comments"] = json!([{
        "id": "1",
        "author": {"displayName": "Ann"},
        "body": "fixed",
        "created": "2024-01-15T11:00:00.000+0000"
    }]);
    mount_search(&server, vec![bug]).await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_partial_json(json!({
            "type": "message",
            "attachments": [{"contentType": "application/vnd.microsoft.card.adaptive"}]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server, &["--jira-project", "PAY"]);
    let channel = TeamsChannel::with_timeout(config.webhook_url.clone(), config.timeout).unwrap();
    let publisher = ReportPublisher::new(channel, config.webhook_format);
    let report = generator(config).generate_at(now()).await.unwrap();

    publisher.publish(&report).await.unwrap();
}

#[tokio::test]
async fn test_html_webhook_failure_is_publish_error() {
    let server = MockServer::start().await;

    mount_search(&server, vec![]).await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(
        &server,
        &["--jira-project", "PAY", "--webhook-format", "html"],
    );
    let publisher = ReportPublisher::new(
        TeamsChannel::new(config.webhook_url.clone()),
        config.webhook_format,
    );
    let report = generator(config).generate_at(now()).await.unwrap();

    let err = publisher.publish(&report).await.unwrap_err();
    assert_eq!(err.phase(), "publish");
    // The rendered report survives the failed post
    assert!(report.html.starts_with("<h1>Daily Report 15-Jan-2024</h1>"));
}
