//! `AnthropicClient` against a local mock of the Messages API.

use biaslens_core::prompts::{critique_request, ANSWERER_SYSTEM_PROMPT, CRITIC_SYSTEM_PROMPT};
use biaslens_core::provider::{AnthropicClient, ApiKey, ClientConfig, Provider};
use biaslens_core::ProviderError;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const MODEL: &str = "claude-test-model";
const KEY: &str = "sk-ant-test";

fn client(base_url: String) -> AnthropicClient {
    let mut config = ClientConfig::new(ApiKey::new(KEY).unwrap());
    config.model = MODEL.to_owned();
    config.base_url = base_url;
    AnthropicClient::new(config).unwrap()
}

fn text_reply(text: &str) -> String {
    json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn"
    })
    .to_string()
}

async fn failing_call(server: &mut ServerGuard, status: usize, body: &str) -> ProviderError {
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let err = client(server.url()).answer("Why?").await.unwrap_err();
    mock.assert_async().await;
    err
}

#[tokio::test]
async fn answer_call_sends_headers_and_answer_settings() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", KEY)
        .match_header("anthropic-version", "2023-06-01")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": MODEL,
            "max_tokens": 2048,
            "temperature": 0.7,
            "system": ANSWERER_SYSTEM_PROMPT,
            "messages": [{ "role": "user", "content": "What is the capital of France?" }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_reply("Paris."))
        .create_async()
        .await;

    let answer = client(server.url())
        .answer("What is the capital of France?")
        .await
        .unwrap();

    assert_eq!(answer, "Paris.");
    mock.assert_async().await;
}

#[tokio::test]
async fn critique_call_uses_critic_prompt_and_settings() {
    let mut server = Server::new_async().await;
    let question = "Is coffee healthy?";
    let answer = "Everyone should drink coffee.";
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", KEY)
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::PartialJson(json!({
            "model": MODEL,
            "max_tokens": 4096,
            "temperature": 0.3,
            "system": CRITIC_SYSTEM_PROMPT,
            "messages": [{ "role": "user", "content": critique_request(question, answer) }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_reply("{\"segments\": []}"))
        .create_async()
        .await;

    let payload = client(server.url()).critique(question, answer).await.unwrap();

    assert_eq!(payload, "{\"segments\": []}");
    mock.assert_async().await;
}

#[tokio::test]
async fn trailing_slash_on_base_url_is_trimmed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_reply("ok"))
        .create_async()
        .await;

    let answer = client(format!("{}/", server.url())).answer("hi").await.unwrap();

    assert_eq!(answer, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn first_text_block_is_returned() {
    let mut server = Server::new_async().await;
    let body = json!({
        "content": [
            { "type": "thinking", "thinking": "hmm" },
            { "type": "text", "text": "second block" }
        ]
    });
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    assert_eq!(client(server.url()).answer("hi").await.unwrap(), "second block");
    mock.assert_async().await;
}

#[tokio::test]
async fn reply_without_text_is_an_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content": []}"#)
        .create_async()
        .await;

    let err = client(server.url()).answer("hi").await.unwrap_err();

    assert_eq!(err, ProviderError::Other("No text content in response".to_owned()));
    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_maps_to_invalid_credentials() {
    let mut server = Server::new_async().await;
    let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;

    let err = failing_call(&mut server, 401, body).await;

    assert_eq!(err, ProviderError::InvalidCredentials);
    assert_eq!(err.to_string(), "Invalid API key. Please check your Anthropic API key.");
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limited() {
    let mut server = Server::new_async().await;
    let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#;

    let err = failing_call(&mut server, 429, body).await;

    assert_eq!(err, ProviderError::RateLimited);
}

#[tokio::test]
async fn bad_request_maps_to_bad_request() {
    let mut server = Server::new_async().await;
    let body = r#"{"type":"error","error":{"type":"invalid_request_error","message":"max_tokens too large"}}"#;

    let err = failing_call(&mut server, 400, body).await;

    assert_eq!(err, ProviderError::BadRequest);
    assert_eq!(err.to_string(), "Invalid request. Please try a different question.");
}

#[tokio::test]
async fn server_error_carries_the_error_message() {
    let mut server = Server::new_async().await;
    let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;

    let err = failing_call(&mut server, 529, body).await;

    assert_eq!(err, ProviderError::Other("Overloaded".to_owned()));
    assert_eq!(err.to_string(), "API error: Overloaded");
}

#[tokio::test]
async fn server_error_without_json_body_reports_the_status() {
    let mut server = Server::new_async().await;

    let err = failing_call(&mut server, 500, "<html>upstream failed</html>").await;

    assert_eq!(err, ProviderError::Other("unexpected status 500".to_owned()));
}
