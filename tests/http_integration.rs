//! Integration tests for the shop backend client using wiremock
//!
//! These tests check request shapes and the handling of backend status
//! codes and bodies.

use serde_json::json;
use tfp_example::{Article, ClientError, ShopClient};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod create {
    use super::*;

    /// POST sends the article without id and keeps the returned id
    #[tokio::test]
    async fn test_create_posts_article() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/articles"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "name": "Princess Rosalea",
                "description": "Child Shampoo & Conditioner"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 17,
                "name": "Princess Rosalea",
                "description": "Child Shampoo & Conditioner"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        let created = assert_ok!(
            client
                .create_article(&Article::new("Princess Rosalea", "Child Shampoo & Conditioner"))
                .await
        );

        assert_eq!(created.id, Some(17));
        assert_eq!(created.name, "Princess Rosalea");
    }

    /// A create response without id is rejected
    #[tokio::test]
    async fn test_create_without_id_fails() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/articles"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"name": "a", "description": "b"})),
            )
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        let err = assert_err!(client.create_article(&Article::new("a", "b")).await);
        assert!(matches!(err, ClientError::MissingId));
    }

    /// 500 surfaces the status and the body
    #[tokio::test]
    async fn test_create_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/articles"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        let err = assert_err!(client.create_article(&Article::new("a", "b")).await);

        match err {
            ClientError::BadStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "database unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

mod read_update {
    use super::*;

    #[tokio::test]
    async fn test_get_article() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/articles/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "name": "Princess Rosalea",
                "description": "Child Shampoo & Conditioner"
            })))
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(format!("{}/", server.uri())));
        let article = assert_ok!(client.get_article(3).await);
        assert_eq!(article.description, "Child Shampoo & Conditioner");
    }

    /// 404 is an error like any other status >= 400
    #[tokio::test]
    async fn test_get_missing_article() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/articles/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        let err = assert_err!(client.get_article(404).await);
        assert_eq!(err.to_string(), "Backend returned bad status 404: not found");
    }

    #[tokio::test]
    async fn test_get_invalid_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/articles/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        let err = assert_err!(client.get_article(1).await);
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(err.to_string().starts_with("Json unmarshalling error"));
    }

    #[tokio::test]
    async fn test_update_puts_article() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/articles/3"))
            .and(body_json(json!({"name": "a", "description": "new"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 3, "name": "a", "description": "new"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        let updated = assert_ok!(client.update_article(3, &Article::new("a", "new")).await);
        assert_eq!(updated.id, Some(3));
        assert_eq!(updated.description, "new");
    }
}

mod status_boundary {
    use super::*;

    /// 400 is the first status treated as an error
    #[tokio::test]
    async fn test_put_bad_request_fails() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/articles/3"))
            .respond_with(ResponseTemplate::new(400).set_body_string("name is immutable"))
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        let err = assert_err!(client.update_article(3, &Article::new("a", "b")).await);

        match err {
            ClientError::BadStatus { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, "name is immutable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Any 2xx below 400 is accepted, not only 200/201
    #[tokio::test]
    async fn test_put_accepted_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/articles/3"))
            .respond_with(
                ResponseTemplate::new(202)
                    .set_body_json(json!({"id": 3, "name": "a", "description": "b"})),
            )
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        let updated = assert_ok!(client.update_article(3, &Article::new("a", "b")).await);
        assert_eq!(updated.id, Some(3));
        assert_eq!(updated.description, "b");
    }

    #[tokio::test]
    async fn test_get_non_authoritative_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/articles/3"))
            .respond_with(
                ResponseTemplate::new(203)
                    .set_body_json(json!({"id": 3, "name": "a", "description": "b"})),
            )
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        let article = assert_ok!(client.get_article(3).await);
        assert_eq!(article.name, "a");
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn test_delete_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/articles/8"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        assert_ok!(client.delete_article(8).await);
    }

    /// Only 204 counts as a successful delete
    #[tokio::test]
    async fn test_delete_ok_is_unexpected() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/articles/8"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = assert_ok!(ShopClient::new(server.uri()));
        let err = assert_err!(client.delete_article(8).await);
        assert!(err
            .to_string()
            .ends_with("returned not the expected result code. Should be 204 but was 200"));
    }
}

mod transport {
    use super::*;

    #[tokio::test]
    async fn test_connection_refused() {
        let client = assert_ok!(ShopClient::new("http://127.0.0.1:1"));
        let err = assert_err!(client.get_article(5).await);

        assert!(matches!(err, ClientError::Request { .. }));
        assert!(err
            .to_string()
            .starts_with("HTTP GET Error with URL [http://127.0.0.1:1/articles/5]"));
    }
}
