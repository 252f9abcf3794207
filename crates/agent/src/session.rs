//! Chat session state.
//!
//! A session owns its conversation log and the document (if any) the user
//! is chatting about. It is passed explicitly to each workflow call; there
//! is no ambient or global session.

use chrono::{DateTime, Utc};
use docchat_core::message::{ConversationId, ConversationLog, Message};
use docchat_documents::LoadedDocument;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ChatSession {
    id: ConversationId,
    log: ConversationLog,
    document: Option<LoadedDocument>,
    started_at: DateTime<Utc>,
}

/// What is left of a session after it ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    /// Number of messages in the log at the end.
    pub turns: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new() -> Self {
        let session = Self {
            id: ConversationId::new(),
            log: ConversationLog::new(),
            document: None,
            started_at: Utc::now(),
        };
        info!(session = %session.id, "Chat session started");
        session
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.log.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.log.push(Message::assistant(content));
    }

    /// Attach a document, replacing any previous one. History is kept.
    pub fn attach_document(&mut self, document: LoadedDocument) {
        info!(session = %self.id, document = %document.name, "Document attached");
        self.document = Some(document);
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    /// Start a fresh log. The attached document stays.
    pub fn clear_history(&mut self) {
        self.log = ConversationLog::new();
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn end(self) -> SessionSummary {
        let summary = SessionSummary {
            id: self.id.to_string(),
            turns: self.log.len(),
            started_at: self.started_at,
            ended_at: Utc::now(),
        };
        info!(session = %summary.id, turns = summary.turns, "Chat session ended");
        summary
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::message::Role;
    use docchat_documents::DocumentKind;

    fn doc(name: &str) -> LoadedDocument {
        LoadedDocument {
            name: name.into(),
            kind: DocumentKind::PlainText,
            text: "contents".into(),
        }
    }

    #[test]
    fn new_session_is_empty() {
        let a = ChatSession::new();
        let b = ChatSession::new();
        assert!(a.log().is_empty());
        assert!(a.document().is_none());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn pushes_keep_order_and_roles() {
        let mut s = ChatSession::new();
        s.push_user("q1");
        s.push_assistant("a1");
        s.push_user("q2");

        let roles: Vec<Role> = s.log().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(s.log().last().unwrap().content, "q2");
    }

    #[test]
    fn clear_history_keeps_document() {
        let mut s = ChatSession::new();
        s.attach_document(doc("a.txt"));
        s.push_user("q");
        s.clear_history();

        assert!(s.log().is_empty());
        assert_eq!(s.document().unwrap().name, "a.txt");
    }

    #[test]
    fn attaching_replaces_document() {
        let mut s = ChatSession::new();
        s.attach_document(doc("a.txt"));
        s.attach_document(doc("b.txt"));
        assert_eq!(s.document().unwrap().name, "b.txt");
    }

    #[test]
    fn end_reports_turns() {
        let mut s = ChatSession::new();
        let id = s.id().to_string();
        s.push_user("q");
        s.push_assistant("a");

        let summary = s.end();
        assert_eq!(summary.id, id);
        assert_eq!(summary.turns, 2);
        assert!(summary.ended_at >= summary.started_at);
    }
}
