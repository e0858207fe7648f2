use std::sync::Arc;

use serde_json::json;
use textgen::model::{ErrorKind, ModelProvider, ModelProviderError};
use textgen::vertex::{
    Error as VertexError, StaticCredentials, VertexConfigBuilder,
    VertexProvider,
};
use textgen::{Error, Provider, ProviderConfig, ProviderKind, TextGenerator};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gemini_server(prompt: &str, text: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_gemini_from_config() {
    let server = gemini_server("hello", "Hello from Gemini").await;
    let config: ProviderConfig = serde_json::from_value(json!({
        "provider": "gemini",
        "api_key": "test-key",
        "model": "gemini-1.5-pro",
        "base_url": server.uri()
    }))
    .unwrap();

    let provider = Provider::from_config(config).await.unwrap();
    assert_eq!(provider.kind(), ProviderKind::Gemini);
    assert_eq!(provider.env_var_name(), "GEMINI_API_KEY");
    let Provider::Gemini(gemini) = &provider else {
        panic!("unexpected provider: {provider:?}");
    };
    assert_eq!(gemini.config().model(), "gemini-1.5-pro");
    assert_eq!(gemini.config().base_url(), server.uri());
    assert_eq!(
        provider.generate_content("hello").await.unwrap(),
        "Hello from Gemini"
    );
}

#[tokio::test]
async fn test_openai_from_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached", "type": "requests" }
        })))
        .mount(&server)
        .await;

    let provider = Provider::from_config(ProviderConfig::OpenAI {
        api_key: "sk-test".to_owned(),
        model: None,
        base_url: Some(server.uri()),
    })
    .await
    .unwrap();
    assert_eq!(provider.kind(), ProviderKind::OpenAI);
    assert_eq!(provider.env_var_name(), "OPENAI_API_KEY");
    let Provider::OpenAI(openai) = &provider else {
        panic!("unexpected provider: {provider:?}");
    };
    assert_eq!(openai.config().model(), "gpt-4o-mini");

    let err = provider.generate_content("hello").await.unwrap_err();
    assert!(matches!(err, Error::OpenAI(_)));
    assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    assert_eq!(err.to_string(), "HTTP 429: Rate limit reached");
}

#[cfg(feature = "vertex-adc")]
#[tokio::test]
async fn test_vertex_placeholder_project_is_rejected() {
    for project_id in ["", "your-gcp-project-id"] {
        let config = ProviderConfig::Vertex {
            project_id: project_id.to_owned(),
            location: "us-central1".to_owned(),
            model: None,
            base_url: None,
        };
        let err = Provider::from_config(config).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Vertex(VertexError::InvalidProjectId { .. })
        ));
        assert!(err.kind().is_configuration());
    }
}

#[tokio::test]
async fn test_vertex_dispatch() {
    let server = MockServer::start().await;
    let model_path = "/v1/projects/acme-prod/locations/us-central1\
                      /publishers/google/models/gemini-2.0-flash:generateContent";
    Mock::given(method("POST"))
        .and(path(model_path))
        .and(header("authorization", "Bearer t"))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "Hello from Vertex\n" }] } }]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(model_path))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "Permission denied on resource project acme-prod.",
                "status": "PERMISSION_DENIED"
            }
        })))
        .mount(&server)
        .await;

    let config = VertexConfigBuilder::new("acme-prod", "us-central1")
        .with_base_url(server.uri())
        .build();
    let vertex = VertexProvider::with_credentials(
        config,
        Arc::new(StaticCredentials::new("t")),
    )
    .unwrap();
    assert_eq!(vertex.config().project_id(), "acme-prod");
    let provider = Provider::from(vertex);
    assert_eq!(provider.kind(), ProviderKind::Vertex);
    assert_eq!(provider.env_var_name(), "GOOGLE_CLOUD_PROJECT");

    assert_eq!(
        provider.generate_content("hello").await.unwrap(),
        "Hello from Vertex\n"
    );

    let err = provider.generate_content("other prompt").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Vertex(VertexError::Request { .. })
    ));
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert!(!err.kind().is_configuration());
    assert_eq!(
        err.to_string(),
        "HTTP 403: Permission denied on resource project acme-prod."
    );
}

#[tokio::test]
async fn test_env_var_names_match_kinds() {
    let providers = [
        Provider::from_config(ProviderConfig::Gemini {
            api_key: "k".to_owned(),
            model: None,
            base_url: None,
        })
        .await
        .unwrap(),
        Provider::from_config(ProviderConfig::OpenAI {
            api_key: "k".to_owned(),
            model: None,
            base_url: None,
        })
        .await
        .unwrap(),
    ];
    for provider in providers {
        assert_eq!(provider.env_var_name(), provider.kind().env_var_name());
    }
}

#[tokio::test]
async fn test_generator_over_provider() {
    let prompt = "multi\nline ünïcode ✓";
    let server = gemini_server(prompt, "done").await;
    let provider = Provider::from_config(ProviderConfig::Gemini {
        api_key: "test-key".to_owned(),
        model: Some("gemini-1.5-pro".to_owned()),
        base_url: Some(server.uri()),
    })
    .await
    .unwrap();

    let generator = TextGenerator::new(provider);
    assert_eq!(generator.env_var_name(), "GEMINI_API_KEY");
    assert_eq!(generator.generate(prompt).await.unwrap(), "done");
}
