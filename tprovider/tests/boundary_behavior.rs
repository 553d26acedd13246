use std::time::Duration;

use tprovider::{
    ChatModel, ChatModelAdapter, FnModel, LanguageModel, Message, ModelRequest, ProviderError,
    ProviderErrorKind, Role, ScriptedModel, classify_failure, is_system_prompt_rejection,
    parse_retry_after,
};

#[test]
fn status_codes_take_precedence_over_message_text() {
    let cases = [
        (Some(401), "rate limit exceeded", ProviderErrorKind::Authentication),
        (Some(403), "", ProviderErrorKind::Authentication),
        (Some(429), "invalid api key", ProviderErrorKind::RateLimited),
        (Some(503), "", ProviderErrorKind::Connection),
        (Some(504), "", ProviderErrorKind::Connection),
        (Some(500), "network unreachable", ProviderErrorKind::Connection),
        (Some(500), "internal error", ProviderErrorKind::Other),
        (None, "Connection reset by peer", ProviderErrorKind::Connection),
        (None, "SSL certificate problem", ProviderErrorKind::Connection),
        (None, "model overloaded", ProviderErrorKind::Other),
    ];

    for (status, message, expected) in cases {
        assert_eq!(
            classify_failure(status, message),
            expected,
            "{status:?} {message}"
        );
    }
}

#[test]
fn system_prompt_rejections_are_recognised_before_auth_keywords() {
    let message = "401: developer instruction is not enabled for models/gemma";
    assert!(is_system_prompt_rejection(message));
    assert_eq!(
        classify_failure(None, message),
        ProviderErrorKind::SystemPromptUnsupported
    );
    assert_eq!(
        classify_failure(None, "System role not supported"),
        ProviderErrorKind::SystemPromptUnsupported
    );
    assert!(!is_system_prompt_rejection("system overloaded"));
}

#[test]
fn rate_limit_errors_carry_retry_hints() {
    let error = ProviderError::from_signal(None, "Too many requests, retry after 30 seconds");
    assert_eq!(error.kind, ProviderErrorKind::RateLimited);
    assert_eq!(error.retry_after, Some(Duration::from_secs(30)));

    assert_eq!(parse_retry_after("Retry-After: 7"), Some(Duration::from_secs(7)));
    assert_eq!(parse_retry_after("retry later"), None);

    let timeout = ProviderError::from_signal(None, "timeout, retry after 5");
    assert_eq!(timeout.kind, ProviderErrorKind::Connection);
    assert_eq!(timeout.retry_after, None);
}

#[test]
fn display_includes_kind_and_status() {
    let error = ProviderError::from_signal(Some(429), "slow down");
    assert_eq!(error.to_string(), "RateLimited [status=429]: slow down");
    assert_eq!(
        ProviderError::connection("refused").to_string(),
        "Connection: refused"
    );
}

#[test]
fn fn_model_forwards_system_and_user_text() {
    let model = FnModel::new(|system: &str, user: &str| {
        Ok::<_, String>(format!("{system}/{user}"))
    });

    assert_eq!(model.name(), "fn-model");
    assert_eq!(
        model
            .complete(&ModelRequest::with_system("rules", "question"))
            .expect("reply"),
        "rules/question"
    );
}

#[test]
fn fn_model_rejects_requests_without_a_user_message() {
    let model = FnModel::new(|_: &str, _: &str| Ok::<_, String>("unreachable"));
    let error = model
        .complete(&ModelRequest::new(vec![Message::system("only rules")]))
        .expect_err("user message is required");
    assert_eq!(error.kind, ProviderErrorKind::Other);
}

struct WrongRoleChat;

impl ChatModel for WrongRoleChat {
    fn name(&self) -> &str {
        "wrong-role"
    }

    fn invoke(&self, _messages: &[Message]) -> Result<Message, ProviderError> {
        Ok(Message::new(Role::User, "echo"))
    }
}

struct UnclassifiedChat;

impl ChatModel for UnclassifiedChat {
    fn invoke(&self, _messages: &[Message]) -> Result<Message, ProviderError> {
        Err(ProviderError::other("Network is unreachable"))
    }
}

#[test]
fn chat_adapter_requires_assistant_replies() {
    let adapter = ChatModelAdapter::new(WrongRoleChat);
    assert_eq!(adapter.name(), "wrong-role");

    let error = adapter
        .complete(&ModelRequest::user_only("hi"))
        .expect_err("user reply is rejected");
    assert_eq!(error.kind, ProviderErrorKind::Other);
}

#[test]
fn chat_adapter_classifies_generic_errors() {
    let adapter = ChatModelAdapter::new(UnclassifiedChat);
    assert_eq!(adapter.name(), "chat-model");

    let error = adapter
        .complete(&ModelRequest::user_only("hi"))
        .expect_err("network failure");
    assert_eq!(error.kind, ProviderErrorKind::Connection);
    assert!(error.is_terminal());
}

#[test]
fn scripted_model_records_requests_and_repeats_its_last_step() {
    let model = ScriptedModel::failing(ProviderError::rate_limited("quota"));
    let request = ModelRequest::with_system("rules", "hi");

    for _ in 0..3 {
        let error = model.complete(&request).expect_err("always fails");
        assert_eq!(error.kind, ProviderErrorKind::RateLimited);
    }

    assert_eq!(model.calls(), 3);
    assert_eq!(model.requests()[0].system(), Some("rules"));
    assert_eq!(model.requests()[0].user(), "hi");
}
