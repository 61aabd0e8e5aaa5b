//! End-to-end chat turn tests against a mocked completion client.

use std::io::Write;
use std::sync::Arc;

use safetychat::{
    AppConfig, ChatMessage, ChatSession, MockCompletionClient, MockFailure, Role,
    SendMessageUseCase, SYSTEM_PROMPT,
};

fn use_case_with(client: Arc<MockCompletionClient>) -> SendMessageUseCase {
    SendMessageUseCase::new(client, "llama-3.1-8b-instant")
}

#[tokio::test]
async fn test_n_successful_turns_alternate_user_and_assistant() {
    let replies: Vec<String> = (0..5).map(|i| format!("reply {i}")).collect();
    let client = Arc::new(MockCompletionClient::with_replies(replies));
    let use_case = use_case_with(client);
    let mut session = ChatSession::new();

    for i in 0..5 {
        use_case
            .execute(&mut session, &format!("question {i}"))
            .await
            .expect("turn should succeed");
    }

    let transcript = session.transcript().all();
    assert_eq!(transcript.len(), 10);
    for (i, pair) in transcript.chunks(2).enumerate() {
        assert_eq!(pair[0], ChatMessage::user(format!("question {i}")));
        assert_eq!(pair[1], ChatMessage::assistant(format!("reply {i}")));
    }
}

#[tokio::test]
async fn test_failing_client_leaves_single_user_entry() {
    for failure in [
        MockFailure::Network,
        MockFailure::Authentication,
        MockFailure::RateLimited,
        MockFailure::Provider,
    ] {
        let client = Arc::new(MockCompletionClient::failing(failure));
        let use_case = use_case_with(client);
        let mut session = ChatSession::new();

        let result = use_case.execute(&mut session, "is it safe?").await;

        assert!(result.is_err(), "{failure:?} should surface an error");
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript().all()[0].role(), Role::User);
    }
}

#[tokio::test]
async fn test_system_prompt_always_leads_payload() {
    let client = Arc::new(MockCompletionClient::new());
    let use_case = use_case_with(client.clone());
    let mut session = ChatSession::new();

    for prompt in ["one", "two", "three"] {
        use_case.execute(&mut session, prompt).await.unwrap();
    }

    let requests = client.requests().await;
    assert_eq!(requests.len(), 3);
    for (i, request) in requests.iter().enumerate() {
        assert_eq!(request.messages()[0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(request.messages()[0].content(), "You are a helpful assistant");
        // system + every prior turn + the new prompt
        assert_eq!(request.messages().len(), 1 + 2 * i + 1);
        assert_eq!(
            request.messages().iter().filter(|m| m.role() == Role::System).count(),
            1
        );
    }
}

#[tokio::test]
async fn test_hi_hello_round() {
    let client = Arc::new(MockCompletionClient::with_replies(["hello"]));
    let use_case = use_case_with(client);
    let mut session = ChatSession::new();

    use_case.execute(&mut session, "hi").await.unwrap();

    assert_eq!(
        session.transcript().all(),
        &[ChatMessage::user("hi"), ChatMessage::assistant("hello")]
    );
}

#[tokio::test]
async fn test_consecutive_failures_are_not_rolled_back() {
    let client = Arc::new(MockCompletionClient::failing(MockFailure::Network));
    let use_case = use_case_with(client);
    let mut session = ChatSession::new();

    let _ = use_case.execute(&mut session, "first").await;
    let _ = use_case.execute(&mut session, "second").await;

    let roles: Vec<_> = session.transcript().iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec![Role::User, Role::User]);
}

#[test]
fn test_missing_api_key_fails_config_load() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"model": "llama-3.1-8b-instant"}}"#).unwrap();

    let err = AppConfig::load(file.path()).unwrap_err();

    assert!(err.is_config_error());
}

#[test]
fn test_missing_config_file_fails_config_load() {
    let dir = tempfile::tempdir().expect("temp dir");

    let err = AppConfig::load(dir.path().join("config.json")).unwrap_err();

    assert!(err.is_config_error());
    assert!(err.to_string().contains("config.json"));
}

#[test]
fn test_valid_config_file_loads() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"GROQ_API_KEY": "gsk_test"}}"#).unwrap();

    let config = AppConfig::load(file.path()).unwrap();

    assert_eq!(config.api_key(), "gsk_test");
    assert_eq!(config.model(), "llama-3.1-8b-instant");
}
