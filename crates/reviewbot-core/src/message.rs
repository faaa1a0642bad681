//! UI-agnostic chat message types
//!
//! Messages are shared between the session and whatever renders it. A bot
//! reply that carries a classification keeps its three display segments
//! apart, so renderers never have to re-parse a flattened string.

use serde::{Deserialize, Serialize};

use crate::verdict::Verdict;

pub const GREETING: &str = "안녕하세요! 배달 어플 리뷰를 입력하시면 긍정인지 부정인지 분류해 드립니다. 모호한 내용은 포함하지 마시고 한 문장으로 입력해주세요.";

pub const CONNECTION_FAILURE_NOTICE: &str =
    "❌ 서버 연결에 실패했습니다. FastAPI 서버 상태를 확인하세요.";

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// What a message displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MessageBody {
    Text(String),
    Verdict(Verdict),
}

/// A single entry in the conversation log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    body: MessageBody,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            body: MessageBody::Text(content.into()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            body: MessageBody::Text(content.into()),
        }
    }

    pub fn verdict(verdict: Verdict) -> Self {
        Self {
            role: Role::Assistant,
            body: MessageBody::Verdict(verdict),
        }
    }

    pub fn greeting() -> Self {
        Self::assistant(GREETING)
    }

    pub fn connection_failure() -> Self {
        Self::assistant(CONNECTION_FAILURE_NOTICE)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    /// Flat text of the message, with verdict segments joined in order
    pub fn content(&self) -> String {
        match &self.body {
            MessageBody::Text(text) => text.clone(),
            MessageBody::Verdict(verdict) => verdict.segments().concat(),
        }
    }
}
