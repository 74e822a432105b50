//! Lifecycle tests for the `tfp_example_shop_article` resource against a
//! mocked backend.

use serde_json::{json, Value};
use tfp_example::testing::{
    assert_error_contains, assert_plan_creates, assert_plan_replaces, ProviderTester,
};
use tfp_example::{ExampleProvider, ProviderError, ProviderService};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = "tfp_example_shop_article";
const NAME: &str = "Princess Rosalea";
const DESCRIPTION: &str = "Child Shampoo & Conditioner";
const UPDATED_DESCRIPTION: &str =
    "Child Shampoo & Conditioner. Soft on the skin, soft on the environment.";

async fn configured_tester(server: &MockServer) -> ProviderTester<ExampleProvider> {
    let tester = ProviderTester::new(ExampleProvider::with_env(|_| None));
    assert_ok!(tester.configure(json!({"host": server.uri()})).await);
    tester
}

fn article_json(id: i64, description: &str) -> Value {
    json!({"id": id, "name": NAME, "description": description})
}

#[tokio::test]
async fn test_full_lifecycle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/articles"))
        .and(body_json(json!({"name": NAME, "description": DESCRIPTION})))
        .respond_with(ResponseTemplate::new(201).set_body_json(article_json(1, DESCRIPTION)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/articles/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_json(1, DESCRIPTION)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/articles/1"))
        .and(body_json(json!({"name": NAME, "description": UPDATED_DESCRIPTION})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(article_json(1, UPDATED_DESCRIPTION)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/articles/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(article_json(1, UPDATED_DESCRIPTION)),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/articles/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;

    let created = assert_ok!(
        tester
            .lifecycle_create(ARTICLE, json!({"name": NAME, "description": DESCRIPTION}))
            .await
    );
    assert_eq!(created, article_json(1, DESCRIPTION));

    let updated = assert_ok!(
        tester
            .lifecycle_update(
                ARTICLE,
                created,
                json!({"name": NAME, "description": UPDATED_DESCRIPTION}),
            )
            .await
    );
    assert_eq!(updated, article_json(1, UPDATED_DESCRIPTION));

    assert_ok!(tester.lifecycle_delete(ARTICLE, updated).await);
}

#[tokio::test]
async fn test_update_keeps_prior_id_when_response_has_none() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/articles/9"))
        .and(body_json(json!({"name": NAME, "description": UPDATED_DESCRIPTION})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": NAME, "description": UPDATED_DESCRIPTION})),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/articles/9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": NAME, "description": UPDATED_DESCRIPTION})),
        )
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;

    let state = assert_ok!(
        tester
            .update(
                ARTICLE,
                article_json(9, DESCRIPTION),
                article_json(9, UPDATED_DESCRIPTION),
            )
            .await
    );
    assert_eq!(state, article_json(9, UPDATED_DESCRIPTION));

    let refreshed = assert_ok!(
        tester
            .lifecycle_update(
                ARTICLE,
                article_json(9, DESCRIPTION),
                json!({"name": NAME, "description": UPDATED_DESCRIPTION}),
            )
            .await
    );
    assert_eq!(refreshed["id"], 9);
}

#[tokio::test]
async fn test_plan_create_leaves_id_unknown() {
    let server = MockServer::start().await;
    let tester = configured_tester(&server).await;

    let plan = assert_ok!(
        tester
            .plan_create(ARTICLE, json!({"name": NAME, "description": DESCRIPTION}))
            .await
    );
    assert_plan_creates(&plan);
    assert_eq!(plan.planned_state["id"], Value::Null);
}

#[tokio::test]
async fn test_name_change_requires_replace() {
    let server = MockServer::start().await;
    let tester = configured_tester(&server).await;

    let plan = assert_ok!(
        tester
            .plan_update(
                ARTICLE,
                article_json(1, DESCRIPTION),
                json!({"name": "Prince Rupert", "description": DESCRIPTION}),
            )
            .await
    );
    assert_plan_replaces(&plan);
    assert_eq!(plan.planned_state["id"], Value::Null);
}

#[tokio::test]
async fn test_create_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/articles"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let err = assert_err!(
        tester
            .create(ARTICLE, json!({"id": null, "name": NAME, "description": DESCRIPTION}))
            .await
    );

    let diagnostic = err.to_diagnostic();
    assert_error_contains(&[diagnostic.clone()], "Error during article Create");
    assert_eq!(
        diagnostic.detail.as_deref(),
        Some("Backend returned bad status 500: internal error")
    );
}

#[tokio::test]
async fn test_delete_requires_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/articles/4"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let err = assert_err!(tester.delete(ARTICLE, article_json(4, DESCRIPTION)).await);

    assert_eq!(err.to_diagnostic().summary, "Error during article Delete");
    assert!(err.to_string().contains("Should be 204 but was 200"));
}

#[tokio::test]
async fn test_read_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let err = assert_err!(tester.read(ARTICLE, article_json(2, DESCRIPTION)).await);

    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.summary, "Error during article Read");
    assert!(diagnostic
        .detail
        .unwrap_or_default()
        .starts_with("Json unmarshalling error"));
}

#[tokio::test]
async fn test_import_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/articles/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_json(42, DESCRIPTION)))
        .mount(&server)
        .await;

    let tester = configured_tester(&server).await;
    let imported = assert_ok!(tester.import_resource(ARTICLE, "42").await);

    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].resource_type, ARTICLE);
    assert_eq!(imported[0].state, article_json(42, DESCRIPTION));

    let err = assert_err!(tester.import_resource(ARTICLE, "forty-two").await);
    assert!(matches!(err, ProviderError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_requires_configure() {
    let tester = ProviderTester::new(ExampleProvider::with_env(|_| None));
    let err = assert_err!(tester.read(ARTICLE, article_json(1, DESCRIPTION)).await);

    assert!(matches!(err, ProviderError::NotConfigured));
    assert_eq!(err.to_diagnostic().summary, "Provider is not configured");
}

#[tokio::test]
async fn test_invalid_host_config() {
    let tester = ProviderTester::new(ExampleProvider::with_env(|_| None));
    let err = assert_err!(tester.configure(json!({"host": "localhost:8080"})).await);

    assert_error_contains(err.diagnostics(), "Invalid Host URL");
    assert!(!tester.provider().is_configured().await);
}

#[tokio::test]
async fn test_transport_error() {
    let tester = ProviderTester::new(ExampleProvider::with_env(|_| None));
    assert_ok!(tester.configure(json!({"host": "http://127.0.0.1:1"})).await);

    let err = assert_err!(tester.read(ARTICLE, article_json(5, DESCRIPTION)).await);
    assert!(err
        .to_diagnostic()
        .detail
        .unwrap_or_default()
        .starts_with("HTTP GET Error with URL [http://127.0.0.1:1/articles/5]"));
}

#[tokio::test]
async fn test_metadata_lists_resource() {
    let provider = ExampleProvider::with_env(|_| None);
    let metadata = provider.metadata();
    assert_eq!(metadata.type_name, "tfp_example");
    assert_eq!(metadata.resources, vec![ARTICLE.to_string()]);
}
