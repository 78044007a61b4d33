//! REST client for the placement content API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::instrument;

use placement_core::bank::{BankOwner, BankSummary, QuestionBank};
use placement_core::curriculum::{Level, Unit};
use placement_core::model::Id;
use placement_core::traits::{ContentApi, ListFilter, Resource};
use placement_core::ApiError;

use crate::config::ApiConfig;
use crate::error::{check_status, transport_error};
use crate::session::{Credentials, SessionStore};

/// Page-following stops after this many pages.
const MAX_PAGES: usize = 100;

/// HTTP client for the content API.
///
/// With a refresh token attached, a request rejected with 401 is retried
/// once after renewing the access token; the renewed pair is written back
/// to the session store when one is attached.
pub struct ApiClient {
    base_url: String,
    token: RwLock<Option<String>>,
    refresh_token: Option<String>,
    session: Option<SessionStore>,
    refreshed: AtomicBool,
    timeout_secs: u64,
    client: reqwest::Client,
}

/// List endpoints answer either a bare array or a paginated envelope.
#[derive(Deserialize)]
#[serde(untagged, bound = "R: DeserializeOwned")]
enum ListPayload<R> {
    Plain(Vec<R>),
    Paged {
        results: Vec<R>,
        #[serde(default)]
        next: Option<String>,
    },
}

#[derive(Deserialize)]
struct RefreshedToken {
    access: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            refresh_token: None,
            session: None,
            refreshed: AtomicBool::new(false),
            timeout_secs,
            client,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.timeout_secs)
    }

    /// Send `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = RwLock::new(Some(token.into()));
        self
    }

    /// Renew the access token with `refresh` when the API rejects it.
    pub fn with_refresh_token(mut self, refresh: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh.into());
        self
    }

    /// Save renewed tokens to `store`.
    pub fn with_session(mut self, store: SessionStore) -> Self {
        self.session = Some(store);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.current_token().is_some()
    }

    fn current_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    fn set_token(&self, access: &str) {
        if let Ok(mut token) = self.token.write() {
            *token = Some(access.to_string());
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Whether `url` points into this API, so it may carry the token.
    fn is_own_url(&self, url: &str) -> bool {
        match url.strip_prefix(self.base_url.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
            None => false,
        }
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.current_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn dispatch(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        self.authorized(builder)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let retry = self.refresh_token.as_ref().and_then(|_| builder.try_clone());
        let sent_with = self.current_token();
        let response = self.dispatch(builder).await?;

        // At most one renewal per client; later 401s are returned as-is.
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            if let (Some(refresh), Some(retry)) = (&self.refresh_token, retry) {
                let renewed_elsewhere = self.current_token() != sent_with;
                if renewed_elsewhere || !self.refreshed.swap(true, Ordering::SeqCst) {
                    if !renewed_elsewhere {
                        self.renew(refresh).await?;
                    }
                    let response = self.dispatch(retry).await?;
                    return check_status(response, what).await;
                }
            }
        }
        check_status(response, what).await
    }

    async fn renew(&self, refresh: &str) -> Result<(), ApiError> {
        tracing::info!("access token rejected; renewing with the refresh token");
        let credentials = self.refresh(refresh).await?;
        self.set_token(&credentials.access);
        if let Some(store) = &self.session {
            if let Err(e) = store.renew(&self.base_url, &credentials) {
                tracing::warn!("could not save renewed session: {e:#}");
            }
        }
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Exchange username and password for a token pair.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Credentials, ApiError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let response = self
            .client
            .post(self.url("token/"))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;
        let response = check_status(response, "token endpoint").await?;
        Self::decode(response).await
    }

    /// Trade a refresh token for a new access token.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh: &str) -> Result<Credentials, ApiError> {
        let response = self
            .client
            .post(self.url("token/refresh/"))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;
        let response = check_status(response, "token refresh endpoint").await?;
        let token: RefreshedToken = Self::decode(response).await?;
        Ok(Credentials {
            access: token.access,
            refresh: Some(refresh.to_string()),
        })
    }

    /// All items of a collection matching `filter`, following pagination.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn list<R: Resource>(&self, filter: &ListFilter) -> Result<Vec<R>, ApiError> {
        let mut items = Vec::new();
        let query: Vec<String> = filter
            .query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let mut first = self.url(&format!("{}/", R::COLLECTION));
        if !query.is_empty() {
            first = format!("{first}?{}", query.join("&"));
        }
        let mut next = Some(self.client.get(first));

        for _ in 0..MAX_PAGES {
            let Some(request) = next.take() else { break };
            let response = self.send(request, R::COLLECTION).await?;
            match Self::decode::<ListPayload<R>>(response).await? {
                ListPayload::Plain(page) => items.extend(page),
                ListPayload::Paged { results, next: url } => {
                    items.extend(results);
                    next = match url {
                        Some(url) if self.is_own_url(&url) => Some(self.client.get(url)),
                        Some(url) => {
                            tracing::warn!(
                                next = %url,
                                "next page is outside {}; not following it",
                                self.base_url
                            );
                            None
                        }
                        None => None,
                    };
                }
            }
        }
        if next.is_some() {
            tracing::warn!(
                collection = R::COLLECTION,
                "stopped after {MAX_PAGES} pages; list is truncated"
            );
        }

        tracing::debug!(count = items.len(), "listed {}", R::COLLECTION);
        Ok(items)
    }

    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn get<R: Resource>(&self, id: Id) -> Result<R, ApiError> {
        let request = self
            .client
            .get(self.url(&format!("{}/{id}/", R::COLLECTION)));
        let response = self.send(request, &format!("{} {id}", R::LABEL)).await?;
        Self::decode(response).await
    }

    /// Create an item. Drafts failing local validation are never sent.
    #[instrument(skip_all, fields(collection = R::COLLECTION))]
    pub async fn create<R: Resource>(&self, draft: &R) -> Result<R, ApiError> {
        let problems = draft.validate();
        if !problems.is_empty() {
            return Err(ApiError::Validation(problems));
        }

        let request = self
            .client
            .post(self.url(&format!("{}/", R::COLLECTION)))
            .json(draft);
        let response = self.send(request, R::COLLECTION).await?;
        let created: R = Self::decode(response).await?;
        tracing::info!(id = ?created.id(), "created {}", R::LABEL);
        Ok(created)
    }

    /// Replace an existing item.
    #[instrument(skip_all, fields(collection = R::COLLECTION))]
    pub async fn update<R: Resource>(&self, item: &R) -> Result<R, ApiError> {
        let Some(id) = item.id() else {
            return Err(ApiError::Validation(vec![
                placement_core::validation::FieldError::new("id", "cannot update an unsaved item"),
            ]));
        };
        let problems = item.validate();
        if !problems.is_empty() {
            return Err(ApiError::Validation(problems));
        }

        let request = self
            .client
            .put(self.url(&format!("{}/{id}/", R::COLLECTION)))
            .json(item);
        let response = self.send(request, &format!("{} {id}", R::LABEL)).await?;
        Self::decode(response).await
    }

    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn delete<R: Resource>(&self, id: Id) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url(&format!("{}/{id}/", R::COLLECTION)));
        self.send(request, &format!("{} {id}", R::LABEL)).await?;
        tracing::info!(id, "deleted {}", R::LABEL);
        Ok(())
    }
}

#[async_trait]
impl ContentApi for ApiClient {
    fn name(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self), fields(owner = %owner))]
    async fn bank_summary(&self, owner: BankOwner) -> Result<BankSummary, ApiError> {
        let request = self.client.get(self.url(&format!(
            "{}/{}/question-bank/",
            owner.collection(),
            owner.id()
        )));
        let response = self
            .send(request, &format!("question bank for {owner}"))
            .await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn question_bank(&self, id: Id) -> Result<QuestionBank, ApiError> {
        let request = self.client.get(self.url(&format!("question-banks/{id}/")));
        let response = self.send(request, &format!("question bank {id}")).await?;
        Self::decode(response).await
    }

    async fn list_levels(&self) -> Result<Vec<Level>, ApiError> {
        self.list(&ListFilter::default()).await
    }

    async fn list_units(&self, level: Id) -> Result<Vec<Unit>, ApiError> {
        let filter = ListFilter {
            level: Some(level),
            ..Default::default()
        };
        self.list(&filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placement_core::content::PlacementTest;
    use placement_core::model::Category;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), 5).unwrap().with_token("tok")
    }

    #[tokio::test]
    async fn login_returns_token_pair() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token/"))
            .and(body_json(json!({"username": "admin", "password": "pw"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access": "a1", "refresh": "r1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let creds = ApiClient::new(&server.uri(), 5)
            .unwrap()
            .login("admin", "pw")
            .await
            .unwrap();
        assert_eq!(creds.access, "a1");
        assert_eq!(creds.refresh.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn login_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                json!({"detail": "No active account found with the given credentials"}),
            ))
            .mount(&server)
            .await;

        let err = ApiClient::new(&server.uri(), 5)
            .unwrap()
            .login("admin", "wrong")
            .await
            .unwrap_err();
        match err {
            ApiError::Unauthorized(msg) => assert!(msg.contains("No active account")),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bank_summary_for_unit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/units/7/question-bank/"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "questions": {"vocabulary": 3, "grammar": "2", "reading": -1,
                              "listening": 0, "speaking": 1, "writing": 1, "total": 99},
                "required_for_exam": {"vocabulary": 2, "grammar": 2, "reading": 0,
                                      "listening": 0, "speaking": 1, "writing": 1},
                "ready_status": {"vocabulary": true, "grammar": true, "reading": true,
                                 "listening": true, "speaking": true, "writing": true},
                "is_ready_for_exam": true
            })))
            .mount(&server)
            .await;

        let summary = client(&server)
            .bank_summary(BankOwner::Unit(7))
            .await
            .unwrap();
        assert_eq!(summary.questions.get(Category::Grammar), 2);
        assert_eq!(summary.questions.get(Category::Reading), 0);
        assert_eq!(summary.questions.total(), 7);
        assert!(summary.evaluate().is_ready_for_exam());
    }

    #[tokio::test]
    async fn question_bank_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/question-banks/3/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3, "unit": null, "level": 2, "questions": []
            })))
            .mount(&server)
            .await;

        let bank = client(&server).question_bank(3).await.unwrap();
        assert_eq!(bank.owner, BankOwner::Level(2));
    }

    #[tokio::test]
    async fn missing_bank_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/levels/9/question-bank/"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
            .mount(&server)
            .await;

        let err = client(&server)
            .bank_summary(BankOwner::Level(9))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref what) if what == "question bank for level 9"));
        assert!(err.is_permanent());
    }

    #[tokio::test]
    async fn list_follows_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/units/"))
            .and(query_param("level", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "next": format!("{}/api/units/page2/", server.uri()),
                "results": [{"id": 1, "level": 1, "title": "Greetings", "order": 1}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/units/page2/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "next": null,
                "results": [{"id": 2, "level": 1, "title": "Travel", "order": 2}]
            })))
            .mount(&server)
            .await;

        let units = client(&server).list_units(1).await.unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].title, "Travel");
    }

    #[tokio::test]
    async fn list_stays_on_own_host() {
        let server = MockServer::start().await;
        let elsewhere = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/levels/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "next": format!("{}/api/levels/", elsewhere.uri()),
                "results": [{"id": 1, "code": "A1", "name": "Beginner"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&elsewhere)
            .await;

        let levels = client(&server).list_levels().await.unwrap();
        assert_eq!(levels.len(), 1);
    }

    #[test]
    fn own_url_requires_path_boundary() {
        let api = ApiClient::new("http://api.test/", 5).unwrap();
        assert!(api.is_own_url("http://api.test/api/units/?page=2"));
        assert!(api.is_own_url("http://api.test"));
        assert!(!api.is_own_url("http://api.test.evil/api/units/"));
        assert!(!api.is_own_url("https://cdn.test/api/units/"));
    }

    fn stored(store: &SessionStore, base_url: &str, access: &str) {
        store
            .save(&crate::session::StoredSession {
                base_url: base_url.into(),
                username: "admin".into(),
                credentials: Credentials {
                    access: access.into(),
                    refresh: Some("r1".into()),
                },
            })
            .unwrap();
    }

    #[tokio::test]
    async fn expired_token_is_renewed_once_and_saved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/levels/"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"detail": "Given token not valid for any token type"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/levels/"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "code": "A1", "name": "Beginner"}
            ])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .and(body_json(json!({"refresh": "r1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh"})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        stored(&store, &server.uri(), "stale");

        let api = ApiClient::new(&server.uri(), 5)
            .unwrap()
            .with_token("stale")
            .with_refresh_token("r1")
            .with_session(store.clone());

        assert_eq!(api.list_levels().await.unwrap()[0].code, "A1");
        assert_eq!(api.list_levels().await.unwrap().len(), 1);

        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.credentials.access, "fresh");
        assert_eq!(saved.credentials.refresh.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn rejected_refresh_requires_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/levels/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "Token is blacklisted"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::new(&server.uri(), 5)
            .unwrap()
            .with_token("stale")
            .with_refresh_token("r1");

        let err = api.list_levels().await.unwrap_err();
        assert!(err.requires_login());
        // No second refresh attempt once one has been made.
        let err = api.list_levels().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(ref msg) if msg == "expired"));
    }

    #[tokio::test]
    async fn unauthorized_without_refresh_token_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/levels/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server).list_levels().await.unwrap_err();
        assert!(err.requires_login());
    }

    #[tokio::test]
    async fn list_accepts_plain_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/levels/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "code": "A1", "name": "Beginner"}
            ])))
            .mount(&server)
            .await;

        let levels = client(&server).list_levels().await.unwrap();
        assert_eq!(levels[0].code, "A1");
    }

    #[tokio::test]
    async fn create_rejects_invalid_draft_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let draft = PlacementTest::new("");
        let err = client(&server).create(&draft).await.unwrap_err();
        match err {
            ApiError::Validation(fields) => assert!(fields.iter().any(|f| f.field == "title")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_surfaces_server_field_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tests/"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"title": ["test with this title already exists."]})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .create(&PlacementTest::new("Entry test"))
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields[0].field, "title");
                assert!(fields[0].message.contains("already exists"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_returns_saved_item() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tests/"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 12, "title": "Entry test", "description": "",
                "duration_minutes": 45, "is_active": true
            })))
            .mount(&server)
            .await;

        let created = client(&server)
            .create(&PlacementTest::new("Entry test"))
            .await
            .unwrap();
        assert_eq!(created.id, Some(12));
        assert_eq!(created.duration_minutes, 45);
    }

    #[tokio::test]
    async fn update_requires_id() {
        let server = MockServer::start().await;
        let err = client(&server)
            .update(&PlacementTest::new("Entry test"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_and_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/tests/4/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/tests/5/"))
            .respond_with(ResponseTemplate::new(403).set_body_json(
                json!({"detail": "You do not have permission to perform this action."}),
            ))
            .mount(&server)
            .await;

        let api = client(&server);
        api.delete::<PlacementTest>(4).await.unwrap();
        let err = api.delete::<PlacementTest>(5).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn rate_limit_and_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/levels/"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "2"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/units/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let api = client(&server);
        let err = api.list_levels().await.unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(2000));

        let err = api.list_units(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 500, ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/question-banks/1/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server).question_bank(1).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
