// OAuth2 client-credentials against a mocked authentication service.

#[cfg(test)]
mod test {

    use base64::{engine::general_purpose::STANDARD, Engine};
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    use crate::auth::provider::{AccessTokenProvider, AuthenticationService, TokenProvider};
    use crate::config::authentication::{AuthenticationConfiguration, ClientAuthentication, SecretValue};
    use crate::config::settings::RetryConfig;
    use crate::error::ComposeError;
    use crate::tests::common::build_reqwest_client;

    fn auth_config(token_url: String, client_authentication: ClientAuthentication) -> AuthenticationConfiguration {
        AuthenticationConfiguration {
            token_url,
            client_id: SecretValue::Plain("dashboard".into()),
            client_secret: SecretValue::Literal { value: "s3cr3t".into() },
            scope: Some("persons.read".into()),
            audience: None,
            client_authentication,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn post_credentials_yield_the_access_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/realms/obs/protocol/openid-connect/token")
                    .form_urlencoded_tuple("grant_type", "client_credentials")
                    .form_urlencoded_tuple("client_id", "dashboard")
                    .form_urlencoded_tuple("client_secret", "s3cr3t")
                    .form_urlencoded_tuple("scope", "persons.read");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"access_token": "tok123", "expires_in": 300, "token_type": "Bearer"}));
            })
            .await;

        let service = AuthenticationService::new(
            auth_config(server.url("/realms/obs/protocol/openid-connect/token"), ClientAuthentication::Post),
            build_reqwest_client(),
        );

        let token = service.get_access_token(&CancellationToken::new()).await.unwrap();
        assert_eq!(token.as_str(), "tok123");
        assert!(token.expires_at().is_some());
        mock.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn basic_credentials_go_into_the_authorization_header() {
        let server = MockServer::start_async().await;
        let expected = format!("Basic {}", STANDARD.encode("dashboard:s3cr3t"));
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .header("authorization", expected.as_str())
                    .form_urlencoded_tuple("grant_type", "client_credentials");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"access_token": "basic-tok"}));
            })
            .await;

        let service = AuthenticationService::new(
            auth_config(server.url("/token"), ClientAuthentication::Basic),
            build_reqwest_client(),
        );

        let token = service.get_access_token(&CancellationToken::new()).await.unwrap();
        assert_eq!(token.as_str(), "basic-tok");
        mock.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn non_success_status_is_an_authentication_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(401).body(r#"{"error":"invalid_client"}"#);
            })
            .await;

        let service = AuthenticationService::new(
            auth_config(server.url("/token"), ClientAuthentication::Post),
            build_reqwest_client(),
        );

        match service.get_access_token(&CancellationToken::new()).await {
            Err(ComposeError::Authentication(cause)) => {
                assert!(cause.to_string().contains("401"));
                assert!(cause.to_string().contains("invalid_client"));
            }
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_service_is_an_authentication_error() {
        let service = AuthenticationService::new(
            auth_config("http://127.0.0.1:9/token".into(), ClientAuthentication::Post),
            build_reqwest_client(),
        );

        let result = service.get_access_token(&CancellationToken::new()).await;
        assert!(matches!(result, Err(ComposeError::Authentication(_))));
    }

    #[tokio::test]
    async fn cancellation_wins_over_the_request() {
        let service = AuthenticationService::new(
            auth_config("http://127.0.0.1:9/token".into(), ClientAuthentication::Post),
            build_reqwest_client(),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = service.get_access_token(&cancel).await;
        assert!(matches!(result, Err(ComposeError::Cancelled)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn retrying_provider_gives_up_after_configured_attempts() {
        let server = MockServer::start_async().await;
        let failing = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(503);
            })
            .await;

        let provider = TokenProvider::from_config(
            &auth_config(server.url("/token"), ClientAuthentication::Post),
            Some(&RetryConfig { attempts: Some(3), base_delay_ms: Some(10), max_delay_ms: Some(20) }),
            build_reqwest_client(),
        );
        assert!(matches!(provider, TokenProvider::Retrying(_)));

        let result = provider.get_access_token(&CancellationToken::new()).await;
        assert!(matches!(result, Err(ComposeError::Authentication(_))));
        failing.assert_hits_async(3).await;
    }

    #[tokio::test]
    async fn without_retry_config_the_service_is_used_directly() {
        let provider = TokenProvider::from_config(
            &auth_config("http://127.0.0.1:9/token".into(), ClientAuthentication::Post),
            None,
            build_reqwest_client(),
        );
        assert!(matches!(provider, TokenProvider::Direct(_)));
    }

    #[tokio::test]
    async fn missing_secret_is_a_configuration_error_without_a_request() {
        let mut config = auth_config("http://127.0.0.1:9/token".into(), ClientAuthentication::Post);
        config.client_secret = SecretValue::FromEnv { from_env: "DASHBOARD_COMPOSER_TEST_UNSET_SECRET".into() };
        let service = AuthenticationService::new(config, build_reqwest_client());

        let result = service.get_access_token(&CancellationToken::new()).await;
        assert!(matches!(result, Err(ComposeError::Configuration(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn zero_lifetime_token_is_handed_out_as_expired() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"access_token": "short-lived", "expires_in": 0}));
            })
            .await;

        let service = AuthenticationService::new(
            auth_config(server.url("/token"), ClientAuthentication::Post),
            build_reqwest_client(),
        );

        let token = service.get_access_token(&CancellationToken::new()).await.unwrap();
        assert_eq!(token.as_str(), "short-lived");
        assert!(token.is_expired());
    }

    #[tokio::test]
    async fn unset_token_url_is_a_configuration_error() {
        let service = AuthenticationService::new(
            auth_config(String::new(), ClientAuthentication::Post),
            build_reqwest_client(),
        );

        let result = service.get_access_token(&CancellationToken::new()).await;
        assert!(matches!(result, Err(ComposeError::Configuration(msg)) if msg.contains("TokenUrl")));
    }
}
