//! Calls made with the bearer token from a login instead of the admin key.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dtk_access::{AdminSession, ApiClient, ApiKey, Authenticator, CredentialStore, Session};

const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJqZG9lIn0.c2ln";

fn admin(server: &MockServer) -> AdminSession {
    let api = ApiClient::new(&server.uri(), Duration::from_secs(5), "dtk-test").unwrap();
    Session::new(api, ApiKey::new("odt_admin").unwrap())
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/user/login"))
        .and(body_string_contains("username=jdoe&"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOKEN))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn stored_token_authorises_team_calls() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let bearer = format!("Bearer {TOKEN}");
    // Anything sent with the admin key would land here instead.
    Mock::given(header_exists("X-API-Key"))
        .and(path("/api/v1/team"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/team"))
        .and(header("Authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"uuid": "u1", "name": "Security"}
        ])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/team/u1/key"))
        .and(header("Authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "odt_user_issued"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = admin(&server);
    let mut store = CredentialStore::new(Some(session.credential().clone()));
    assert!(store.user_session(session.api()).is_none());

    let outcome = Authenticator::new(&session)
        .login_into(&mut store, "jdoe", "s3cret")
        .await
        .unwrap();
    assert_eq!(store.bearer(), Some(&outcome.token));

    let user = store.user_session(session.api()).unwrap();
    let teams = user.list_teams().await.unwrap();
    assert_eq!(teams[0].name, "Security");

    let issued = user.issue_team_key("security").await.unwrap();
    assert_eq!(issued.expose(), "odt_user_issued");
}

#[tokio::test]
async fn login_outcome_opens_user_session_directly() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/team"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let session = admin(&server);
    let outcome = Authenticator::new(&session)
        .login("jdoe", "s3cret")
        .await
        .unwrap();

    let teams = outcome.user_session(&session).list_teams().await.unwrap();
    assert!(teams.is_empty());
}

#[tokio::test]
async fn failed_login_leaves_store_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/user/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = admin(&server);
    let mut store = CredentialStore::new(Some(session.credential().clone()));
    let result = Authenticator::new(&session)
        .login_into(&mut store, "jdoe", "wrong")
        .await;

    assert!(result.is_err());
    assert!(store.bearer().is_none());
}
