use crate::api::types::{Context, NewStatus, Status};
use crate::api::{ApiClientError, KronkClient, encode_segment};

impl KronkClient {
    /// Fetch a single status by ID.
    pub async fn get_status(&self, status_id: &str) -> Result<Status, ApiClientError> {
        self.get(&format!("/api/v1/statuses/{}", encode_segment(status_id)))
            .await
    }

    /// Fetch the ancestors and descendants of a status.
    pub async fn get_status_context(&self, status_id: &str) -> Result<Context, ApiClientError> {
        self.get(&format!(
            "/api/v1/statuses/{}/context",
            encode_segment(status_id)
        ))
        .await
    }

    /// Publish a new status.
    pub async fn post_status(&self, new_status: &NewStatus) -> Result<Status, ApiClientError> {
        self.post_json("/api/v1/statuses", new_status).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::types::Visibility;
    use crate::api::{ApiClientError, KronkClient};
    use crate::auth::AuthProvider;
    use crate::auth::credentials::CredentialSet;

    fn status_json(id: &str, parent: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "created_at": "2024-03-01T12:00:00.000Z",
            "in_reply_to_id": parent,
            "visibility": "public",
            "content": "<p>hello</p>",
            "account": {"id": "9", "username": "bob", "acct": "bob"}
        })
    }

    fn signed_in() -> AuthProvider {
        AuthProvider::new(CredentialSet {
            access_token: Some("secret".into()),
            instance_url: None,
        })
    }

    #[tokio::test]
    async fn fetches_context_descendants() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/statuses/1/context"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ancestors": [],
                "descendants": [status_json("2", Some("1")), status_json("3", Some("2"))]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = KronkClient::new(&server.uri(), AuthProvider::default());
        let ctx = client.get_status_context("1").await.unwrap();
        let ids: Vec<_> = ctx.descendants.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["2", "3"]);
    }

    #[tokio::test]
    async fn posts_reply_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/statuses"))
            .and(header("Authorization", "Bearer secret"))
            .and(body_json(json!({
                "status": "@bob thanks",
                "in_reply_to_id": "1",
                "visibility": "unlisted"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_json("7", Some("1"))))
            .expect(1)
            .mount(&server)
            .await;

        let client = KronkClient::new(&server.uri(), signed_in());
        let created = client
            .post_status(&crate::api::types::NewStatus {
                status: "@bob thanks".into(),
                in_reply_to_id: "1".into(),
                visibility: Visibility::Unlisted,
            })
            .await
            .unwrap();
        assert_eq!(created.id, "7");
    }

    #[tokio::test]
    async fn post_without_token_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = KronkClient::new(&server.uri(), AuthProvider::default());
        let err = client
            .post_status(&crate::api::types::NewStatus {
                status: "hi".into(),
                in_reply_to_id: "1".into(),
                visibility: Visibility::Public,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiClientError::Auth(_)));
    }

    #[tokio::test]
    async fn surfaces_server_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/statuses/404"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Record not found"})),
            )
            .mount(&server)
            .await;

        let client = KronkClient::new(&server.uri(), AuthProvider::default());
        match client.get_status("404").await {
            Err(ApiClientError::ApiError { status, detail }) => {
                assert_eq!(status, 404);
                assert_eq!(detail, "Record not found");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn maps_429_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("x-ratelimit-reset", "2030-01-01T00:00:00.000Z"),
            )
            .mount(&server)
            .await;

        let client = KronkClient::new(&server.uri(), AuthProvider::default());
        let err = client.get_status_context("1").await.unwrap_err();
        match err {
            ApiClientError::RateLimited { reset_at } => {
                assert_eq!(reset_at.to_rfc3339(), "2030-01-01T00:00:00+00:00");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
