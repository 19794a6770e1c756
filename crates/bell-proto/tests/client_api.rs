mod common;

use axum::http::StatusCode;
use bell_proto::config::ServerConfig;
use bell_proto::protocol::NotificationId;
use bell_proto::{ClientError, NotificationClient};
use common::fake_api::{dead_base_url, record, scenario_a_items, Endpoint, FakeApi, CSRF_TOKEN};

#[tokio::test]
async fn list_returns_items_and_server_total() {
    let api = FakeApi::start(scenario_a_items()).await.unwrap();
    let list = api.client().list_notifications().await.unwrap();
    assert_eq!(list.unread_total, 2);
    assert_eq!(list.items.len(), 3);
    assert_eq!(list.items[0].navigation_target(), Some("/chat/ana/"));
}

#[tokio::test]
async fn count_reports_unread_total() {
    let api = FakeApi::start(scenario_a_items()).await.unwrap();
    assert_eq!(api.client().count_unread().await.unwrap().unread_total, 2);
}

#[tokio::test]
async fn mark_read_uses_form_token_and_caches_it() {
    let api = FakeApi::start(scenario_a_items()).await.unwrap();
    let client = api.client();

    let first = client.mark_read(NotificationId(3)).await.unwrap();
    assert_eq!(first.unread_total, 1);
    assert!(first.success);
    let second = client.mark_read(NotificationId(1)).await.unwrap();
    assert_eq!(second.unread_total, 0);

    assert_eq!(api.hits(Endpoint::FormPage), 1);
    assert_eq!(
        api.state().csrf_headers,
        vec![Some(CSRF_TOKEN.to_string()), Some(CSRF_TOKEN.to_string())]
    );
}

#[tokio::test]
async fn csrf_cookie_is_preferred_and_url_decoded() {
    let api = FakeApi::start(scenario_a_items()).await.unwrap();
    api.state().csrf_cookie_on_api = true;
    let client = api.client();

    // Any response may carry the cookie; a GET picks it up.
    client.count_unread().await.unwrap();
    let marked = client.mark_all_read().await.unwrap();
    assert_eq!(marked.unread_total, 0);

    assert_eq!(api.hits(Endpoint::FormPage), 0);
    assert_eq!(api.state().csrf_headers, vec![Some(CSRF_TOKEN.to_string())]);
}

#[tokio::test]
async fn post_without_any_token_is_rejected() {
    let api = FakeApi::start(scenario_a_items()).await.unwrap();
    api.state().form_field = false;
    let err = api.client().mark_read(NotificationId(1)).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(api.state().csrf_headers, vec![None]);
    // Nothing was changed server-side.
    assert!(!api.state().items[0].read);
}

#[tokio::test]
async fn form_fallback_can_be_disabled() {
    let api = FakeApi::start(scenario_a_items()).await.unwrap();
    let client = NotificationClient::new(&ServerConfig {
        csrf_form_page: String::new(),
        ..api.config()
    })
    .unwrap();
    let err = client.mark_all_read().await.unwrap_err();
    assert!(matches!(err, ClientError::Http { status: 403 }));
    assert_eq!(api.hits(Endpoint::FormPage), 0);
}

#[tokio::test]
async fn mark_read_unknown_id_is_http_404() {
    let api = FakeApi::start(scenario_a_items()).await.unwrap();
    let err = api.client().mark_read(NotificationId(999)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn count_404_and_403_are_expected_for_polling() {
    let api = FakeApi::start(Vec::new()).await.unwrap();
    let client = api.client();

    api.fail(Endpoint::Count, StatusCode::NOT_FOUND);
    assert!(client.count_unread().await.unwrap_err().is_expected_for_background_poll());

    api.fail(Endpoint::Count, StatusCode::FORBIDDEN);
    assert!(client.count_unread().await.unwrap_err().is_expected_for_background_poll());

    api.fail(Endpoint::Count, StatusCode::INTERNAL_SERVER_ERROR);
    let err = client.count_unread().await.unwrap_err();
    assert!(!err.is_expected_for_background_poll());
    assert_eq!(err.to_string(), "HTTP error! status: 500");

    api.heal(Endpoint::Count);
    assert_eq!(client.count_unread().await.unwrap().unread_total, 0);
}

#[tokio::test]
async fn missing_session_is_forbidden() {
    let api = FakeApi::start(scenario_a_items()).await.unwrap();
    let client = NotificationClient::new(&ServerConfig {
        session_cookie: String::new(),
        ..api.config()
    })
    .unwrap();
    assert_eq!(client.list_notifications().await.unwrap_err().status(), Some(403));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let api = FakeApi::start(Vec::new()).await.unwrap();
    api.state().count_body = Some("<html>login</html>".into());
    let err = api.client().count_unread().await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)), "got {err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = NotificationClient::new(&ServerConfig {
        base_url: dead_base_url().await,
        ..ServerConfig::default()
    })
    .unwrap();
    let err = client.count_unread().await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "got {err:?}");
    assert!(!err.is_expected_for_background_poll());
}

#[tokio::test]
async fn empty_list_is_ok() {
    let api = FakeApi::start(vec![record(5, true, None)]).await.unwrap();
    api.state().items.clear();
    let list = api.client().list_notifications().await.unwrap();
    assert_eq!(list.unread_total, 0);
    assert!(list.items.is_empty());
}
