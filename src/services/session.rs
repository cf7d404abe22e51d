//! Session memory — per-session conversational transcripts.
//!
//! DESIGN
//! ======
//! One ordered transcript per session id (authenticated user id, else client
//! key). The pipeline appends exactly one user turn before each LLM call and
//! one bot turn after a successful call; a failed call leaves the question
//! recorded without an answer so the next attempt keeps its context.
//!
//! Transcripts grow without bound and live for the process lifetime. A
//! capped window of recent turns is the obvious extension if this outgrows
//! the demo.

use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    User,
    Bot,
}

#[derive(Debug, Clone)]
struct Turn {
    role: TurnRole,
    content: String,
}

pub struct SessionStore {
    sessions: Mutex<HashMap<String, Vec<Turn>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self { sessions: Mutex::new(HashMap::new()) }
    }

    /// Append one turn to the session's transcript, creating the session on
    /// first use.
    pub fn append(&self, session_id: &str, role: TurnRole, content: &str) {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        sessions
            .entry(session_id.to_owned())
            .or_default()
            .push(Turn { role, content: content.to_owned() });
    }

    /// Render the transcript as alternating `You:` / `Bot:` lines in
    /// insertion order. Unknown sessions render empty.
    pub fn context(&self, session_id: &str) -> String {
        let sessions = self
            .sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let Some(turns) = sessions.get(session_id) else {
            return String::new();
        };
        turns
            .iter()
            .map(|turn| {
                let speaker = match turn.role {
                    TurnRole::User => "You",
                    TurnRole::Bot => "Bot",
                };
                format!("{speaker}: {}", turn.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of turns recorded for the session.
    #[must_use]
    pub fn turn_count(&self, session_id: &str) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(session_id)
            .map_or(0, Vec::len)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
