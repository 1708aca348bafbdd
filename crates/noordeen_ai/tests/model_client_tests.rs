//! ModelClient against a mocked OpenAI-compatible endpoint

use mockito::{Matcher, Server};
use noordeen_ai::{
    get_system_prompt, Dispatcher, DispatchError, GenerationRequest, Language, Mode, ModelClient,
    ModelConfig, ProviderError, TextProvider,
};
use serde_json::json;
use std::time::Duration;

fn completion_body(content: Option<&str>) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000u32,
        "model": "gemini-test",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn client_for(server: &Server, api_key: &str) -> ModelClient {
    ModelClient::new(ModelConfig::new(server.url(), "gemini-test").with_api_key(api_key))
}

#[tokio::test]
async fn generate_sends_instruction_and_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "model": "gemini-test" })),
            Matcher::Regex("Keep it concise".to_string()),
            Matcher::Regex("নামাজের গুরুত্ব".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(Some("Prayer is important.")))
        .create_async()
        .await;

    let client = client_for(&server, "test-key");
    let request = GenerationRequest::new(get_system_prompt(Mode::Concise), "নামাজের গুরুত্ব কী?");

    let text = client.generate(&request).await.unwrap();

    assert_eq!(text.as_deref(), Some("Prayer is important."));
    mock.assert_async().await;
}

#[tokio::test]
async fn null_content_becomes_no_answer() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(None))
        .create_async()
        .await;

    let config = ModelConfig::new(server.url(), "gemini-test").with_api_key("test-key");
    let dispatcher = Dispatcher::new(move || ModelClient::new(config.clone()));

    let err = dispatcher
        .try_dispatch("What is wudu?", Mode::Detailed)
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::NoAnswer));
}

#[tokio::test]
async fn missing_credential_degrades_to_fallback() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "message": "API key not valid",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "401"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let url = server.url();
    let dispatcher = Dispatcher::new(move || {
        ModelClient::new(ModelConfig::new(url.clone(), "gemini-test").with_api_key(""))
    })
    .with_lang(Language::English);

    let answer = dispatcher.dispatch("What is zakat?", Mode::Scholarly).await;

    assert_eq!(answer, "An error occurred. Please try again.");
    assert!(dispatcher.is_initialized());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_reports_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(Some("Hi")))
        .create_async()
        .await;

    assert!(client_for(&server, "test-key").test_connection().await.is_ok());
}

#[tokio::test]
async fn rate_limited_request_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "message": "Resource has been exhausted",
                    "type": "rate_limit_error",
                    "param": null,
                    "code": "429"
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let config = ModelConfig::new(server.url(), "gemini-test").with_api_key("test-key");
    // The timeout only guards against a hang; a single attempt returns well before it.
    let dispatcher = Dispatcher::new(move || ModelClient::new(config.clone()))
        .with_lang(Language::English)
        .with_timeout(Duration::from_secs(10));

    let err = dispatcher
        .try_dispatch("What is tawbah?", Mode::Concise)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Provider(ProviderError::Request(_))
    ));

    mock.assert_async().await;
}

#[tokio::test]
async fn rate_limited_dispatch_returns_retry_fallback() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"slow down","type":"rate_limit_error","param":null,"code":null}}"#)
        .expect(1)
        .create_async()
        .await;

    let url = server.url();
    let dispatcher = Dispatcher::new(move || {
        ModelClient::new(ModelConfig::new(url.clone(), "gemini-test").with_api_key("test-key"))
    })
    .with_lang(Language::English)
    .with_timeout(Duration::from_secs(10));

    let answer = dispatcher.dispatch("What is tawbah?", Mode::Detailed).await;

    assert_eq!(answer, "An error occurred. Please try again.");
    mock.assert_async().await;
}
