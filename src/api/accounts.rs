use crate::api::types::Account;
use crate::api::{ApiClientError, KronkClient};
use crate::auth::AuthError;

impl KronkClient {
    /// Return the signed-in account, caching after the first call.
    pub async fn verify_credentials(&mut self) -> Result<Account, ApiClientError> {
        if let Some(ref me) = self.me {
            return Ok(me.clone());
        }
        if !self.signed_in() {
            return Err(AuthError::MissingToken.into());
        }
        let me: Account = self.get("/api/v1/accounts/verify_credentials").await?;
        self.me = Some(me.clone());
        Ok(me)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::KronkClient;
    use crate::auth::AuthProvider;
    use crate::auth::credentials::CredentialSet;

    #[tokio::test]
    async fn caches_signed_in_account() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/verify_credentials"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "1", "username": "me", "acct": "me", "display_name": "Me"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = KronkClient::new(
            &server.uri(),
            AuthProvider::new(CredentialSet {
                access_token: Some("tok".into()),
                instance_url: None,
            }),
        );
        assert_eq!(client.verify_credentials().await.unwrap().acct, "me");
        assert_eq!(client.verify_credentials().await.unwrap().name(), "Me");
    }

    #[tokio::test]
    async fn anonymous_client_is_rejected_locally() {
        let mut client = KronkClient::new("http://127.0.0.1:9", AuthProvider::default());
        assert!(client.verify_credentials().await.is_err());
    }
}
