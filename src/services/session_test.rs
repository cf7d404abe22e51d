use super::*;

#[test]
fn context_renders_alternating_speaker_lines() {
    let store = SessionStore::new();
    store.append("s", TurnRole::User, "a");
    store.append("s", TurnRole::Bot, "b");
    assert_eq!(store.context("s"), "You: a\nBot: b");
}

#[test]
fn context_preserves_insertion_order() {
    let store = SessionStore::new();
    store.append("s", TurnRole::User, "first question");
    store.append("s", TurnRole::Bot, "first answer");
    store.append("s", TurnRole::User, "second question");
    assert_eq!(store.context("s"), "You: first question\nBot: first answer\nYou: second question");
}

#[test]
fn unknown_session_renders_empty() {
    let store = SessionStore::new();
    assert_eq!(store.context("missing"), "");
    assert_eq!(store.turn_count("missing"), 0);
}

#[test]
fn sessions_are_independent() {
    let store = SessionStore::new();
    store.append("a", TurnRole::User, "hello from a");
    store.append("b", TurnRole::User, "hello from b");
    assert_eq!(store.context("a"), "You: hello from a");
    assert_eq!(store.context("b"), "You: hello from b");
    assert_eq!(store.turn_count("a"), 1);
}

#[test]
fn failed_exchanges_keep_the_question_only() {
    // The pipeline appends the user turn before the LLM call; on failure no
    // bot turn follows. The transcript must still carry the question.
    let store = SessionStore::new();
    store.append("s", TurnRole::User, "what sales are on?");
    assert_eq!(store.context("s"), "You: what sales are on?");

    store.append("s", TurnRole::User, "retry");
    assert_eq!(store.turn_count("s"), 2);
}
