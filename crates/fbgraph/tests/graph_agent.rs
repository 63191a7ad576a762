use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use fbgraph::oauth::{AuthClient, ClientConfig, SessionToken};
use fbgraph::{ClientError, GraphAgent, PictureSize};
use fbgraph_common::http_client::HttpClient;
use http::{Request, Response, StatusCode};

#[derive(Clone, Default)]
struct MockClient {
    queue: Arc<tokio::sync::Mutex<VecDeque<Response<Vec<u8>>>>>,
    sent: Arc<tokio::sync::Mutex<Vec<Request<Vec<u8>>>>>,
}

impl MockClient {
    async fn push(&self, status: StatusCode, body: &str) {
        let resp = Response::builder()
            .status(status)
            .body(body.as_bytes().to_vec())
            .unwrap();
        self.queue.lock().await.push_back(resp);
    }

    async fn sent(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Path and decoded query of the most recent request.
    async fn last(&self) -> (String, HashMap<String, String>) {
        let sent = self.sent.lock().await;
        let req = sent.last().expect("no request sent");
        let query = serde_html_form::from_str(req.uri().query().unwrap_or_default()).unwrap();
        (req.uri().path().to_owned(), query)
    }
}

impl HttpClient for MockClient {
    type Error = std::convert::Infallible;
    fn send_http(
        &self,
        request: Request<Vec<u8>>,
    ) -> impl core::future::Future<Output = core::result::Result<Response<Vec<u8>>, Self::Error>>
    + Send {
        let queue = self.queue.clone();
        let sent = self.sent.clone();
        async move {
            sent.lock().await.push(request);
            Ok(queue.lock().await.pop_front().expect("no queued response"))
        }
    }
}

fn config() -> ClientConfig {
    ClientConfig::new(
        "111",
        "s3cret",
        "http://localhost:4000/auth/callback",
        ["public_profile", "email"],
    )
    .unwrap()
}

fn agent() -> (MockClient, GraphAgent<MockClient>) {
    let mock = MockClient::default();
    let auth = AuthClient::with_http(config(), mock.clone());
    (mock, GraphAgent::from(auth))
}

async fn logged_in() -> (MockClient, GraphAgent<MockClient>) {
    let (mock, agent) = agent();
    let token = SessionToken::new("TOK", Utc::now(), TimeDelta::hours(1)).unwrap();
    agent.set_session(token).await;
    (mock, agent)
}

const INTROSPECTION: &str = r#"{"data":{"app_id":"111","type":"USER","application":"Demo","data_access_expires_at":1707776000,"expires_at":1700000000,"is_valid":true,"issued_at":1694816000,"scopes":["email","public_profile"],"user_id":"222"}}"#;

#[tokio::test]
async fn login_then_read_profile_and_picture() {
    let (mock, agent) = agent();

    let url = agent.authorization_url(Some("st4te"));
    assert!(url.starts_with("https://www.facebook.com/dialog/oauth?"));
    assert!(url.contains("scope=public_profile%2Cemail"));

    mock.push(StatusCode::OK, "access_token=TOK&expires=5183944")
        .await;
    let params = fbgraph::oauth::CallbackParams::from_query("code=the-code&state=st4te").unwrap();
    let token = agent.callback(params, Some("st4te")).await.unwrap();
    assert_eq!(token.access_token, "TOK");
    let (path, query) = mock.last().await;
    assert_eq!(path, "/oauth/access_token");
    assert_eq!(query["code"], "the-code");
    assert_eq!(query["redirect_uri"], "http://localhost:4000/auth/callback");

    mock.push(StatusCode::OK, INTROSPECTION).await;
    let info = agent.introspect_session().await.unwrap();
    assert!(info.is_valid);
    assert!(info.has_scope("email"));
    assert_eq!(info.token_kind.as_deref(), Some("USER"));
    let (path, query) = mock.last().await;
    assert_eq!(path, "/debug_token");
    assert_eq!(query["input_token"], "TOK");
    assert_eq!(query["access_token"], "111|s3cret");

    mock.push(
        StatusCode::OK,
        r#"{"id":"222","name":"Ada Lovelace","email":"ada@example.com"}"#,
    )
    .await;
    let me = agent.user().await.unwrap();
    assert_eq!(me.id, "222");
    assert_eq!(me.name.as_deref(), Some("Ada Lovelace"));
    let (path, query) = mock.last().await;
    assert_eq!(path, "/222");
    assert_eq!(query["access_token"], "TOK");
    assert!(!query.contains_key("fields"));

    mock.push(
        StatusCode::OK,
        r#"{"data":{"height":50,"is_silhouette":false,"url":"https://cdn.example.com/p.jpg","width":50}}"#,
    )
    .await;
    let picture = agent.picture(50, 50, "square").await.unwrap();
    assert_eq!(picture.data.url, "https://cdn.example.com/p.jpg");
    assert_eq!(picture.data.height, Some(50));
    let (path, query) = mock.last().await;
    assert_eq!(path, "/222/picture");
    assert_eq!(query["redirect"], "false");
    assert_eq!(query["type"], "square");
}

#[tokio::test]
async fn reads_need_a_session() {
    let (mock, agent) = agent();
    assert!(matches!(
        agent.user().await.unwrap_err(),
        ClientError::Validation(_)
    ));
    assert!(matches!(
        agent.picture(0, 0, "").await.unwrap_err(),
        ClientError::Validation(_)
    ));
    assert_eq!(mock.sent().await, 0);
}

#[tokio::test]
async fn user_defaults_to_me_and_learns_the_id() {
    let (mock, agent) = logged_in().await;
    mock.push(StatusCode::OK, r#"{"id":"333","first_name":"Grace"}"#)
        .await;
    let me = agent.user_with_fields(&["id", "first_name"]).await.unwrap();
    assert_eq!(me.first_name.as_deref(), Some("Grace"));
    let (path, query) = mock.last().await;
    assert_eq!(path, "/me");
    assert_eq!(query["fields"], "id,first_name");

    assert_eq!(agent.session().await.unwrap().user_id.as_deref(), Some("333"));
    mock.push(StatusCode::OK, r#"{"id":"333"}"#).await;
    agent.user().await.unwrap();
    assert_eq!(mock.last().await.0, "/333");
}

#[tokio::test]
async fn picture_rejects_unknown_size_offline() {
    let (mock, agent) = logged_in().await;
    let err = agent.picture(0, 0, "huge").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(mock.sent().await, 0);
}

#[tokio::test]
async fn picture_omits_zero_dimensions() {
    let (mock, agent) = logged_in().await;
    mock.push(
        StatusCode::OK,
        r#"{"data":{"is_silhouette":true,"url":"https://cdn.example.com/s.jpg"}}"#,
    )
    .await;
    let picture = agent.picture(100, 0, "square").await.unwrap();
    assert!(picture.data.is_silhouette);
    assert_eq!(picture.data.width, None);

    let (path, query) = mock.last().await;
    assert_eq!(path, "/me/picture");
    assert_eq!(query["height"], "100");
    assert!(!query.contains_key("width"));
    assert_eq!(query["type"], PictureSize::Square.as_str());
    assert_eq!(query["access_token"], "TOK");

    mock.push(
        StatusCode::OK,
        r#"{"data":{"is_silhouette":false,"url":"https://cdn.example.com/d.jpg"}}"#,
    )
    .await;
    agent.picture(0, 0, "").await.unwrap();
    let (_, query) = mock.last().await;
    assert!(!query.contains_key("height"));
    assert!(!query.contains_key("type"));
}

#[tokio::test]
async fn expired_token_surfaces_provider_error() {
    let (mock, agent) = logged_in().await;
    mock.push(
        StatusCode::BAD_REQUEST,
        r#"{"error":{"message":"Error validating access token: Session has expired","type":"OAuthException","code":190,"error_subcode":463,"fbtrace_id":"AbC"}}"#,
    )
    .await;
    let err = agent.user().await.unwrap_err();
    let ClientError::Provider(provider) = err else {
        panic!("expected provider error, got {err:?}");
    };
    assert_eq!(provider.code, Some(190));
    assert_eq!(provider.subcode, Some(463));
    assert_eq!(provider.kind.as_deref(), Some("OAuthException"));
    // the session stays; the caller decides whether to log in again
    assert!(agent.session().await.is_some());
}

#[tokio::test]
async fn profile_that_is_not_json_is_malformed() {
    let (mock, agent) = logged_in().await;
    mock.push(StatusCode::OK, "<html>maintenance</html>").await;
    let err = agent.user().await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
}
