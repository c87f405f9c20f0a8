//! Response envelopes returned by the adapter.
//!
//! Every remote operation answers with a numeric status code plus an
//! optional message id and payload. The code equal to
//! [`StatusCode::Success`] is the only success signal; everything else is
//! a failure regardless of what else the envelope carries.

use serde::{Deserialize, Serialize};

use crate::chain::MessageId;

/// Status code reported by the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum StatusCode {
    /// The operation succeeded.
    Success,
    /// The verify key was wrong.
    InvalidVerifyKey,
    /// The bot account does not exist.
    BotNotFound,
    /// The session expired or does not exist.
    SessionInvalid,
    /// The session was not verified.
    SessionUnverified,
    /// The target contact does not exist.
    TargetNotFound,
    /// The referenced file does not exist.
    FileNotFound,
    /// The bot lacks the permission for this operation.
    PermissionDenied,
    /// The bot is muted in the target group.
    BotMuted,
    /// The message exceeded the length limit.
    MessageTooLong,
    /// Malformed request.
    BadRequest,
    /// A code this crate does not name.
    Other(i32),
}

impl StatusCode {
    /// Whether this is [`StatusCode::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::InvalidVerifyKey,
            2 => Self::BotNotFound,
            3 => Self::SessionInvalid,
            4 => Self::SessionUnverified,
            5 => Self::TargetNotFound,
            6 => Self::FileNotFound,
            10 => Self::PermissionDenied,
            20 => Self::BotMuted,
            30 => Self::MessageTooLong,
            400 => Self::BadRequest,
            other => Self::Other(other),
        }
    }
}

impl From<StatusCode> for i32 {
    fn from(code: StatusCode) -> Self {
        match code {
            StatusCode::Success => 0,
            StatusCode::InvalidVerifyKey => 1,
            StatusCode::BotNotFound => 2,
            StatusCode::SessionInvalid => 3,
            StatusCode::SessionUnverified => 4,
            StatusCode::TargetNotFound => 5,
            StatusCode::FileNotFound => 6,
            StatusCode::PermissionDenied => 10,
            StatusCode::BotMuted => 20,
            StatusCode::MessageTooLong => 30,
            StatusCode::BadRequest => 400,
            StatusCode::Other(other) => other,
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", i32::from(*self))
    }
}

/// Result envelope of one remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T = ()> {
    /// Status code; success iff [`StatusCode::Success`].
    pub code: StatusCode,
    /// Human-readable status text.
    #[serde(default)]
    pub msg: String,
    /// Id assigned to a sent message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    /// Operation payload.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Response<T> {
    /// A bare success envelope.
    #[must_use]
    pub fn success() -> Self {
        Self::with_code(StatusCode::Success)
    }

    /// An envelope with the given code and nothing else.
    #[must_use]
    pub fn with_code(code: StatusCode) -> Self {
        Self {
            code,
            msg: String::new(),
            message_id: None,
            data: None,
        }
    }

    /// A success envelope carrying `data`.
    #[must_use]
    pub fn with_data(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::success()
        }
    }

    /// A success envelope reporting a sent message id.
    #[must_use]
    pub fn sent(message_id: MessageId) -> Self {
        Self {
            message_id: Some(message_id),
            ..Self::success()
        }
    }

    /// Whether the code is the success sentinel.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// The payload, if the operation succeeded and carried one.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        if self.is_success() { self.data } else { None }
    }

    /// The reported message id, if present and valid.
    ///
    /// The status code is deliberately not consulted: the id alone decides
    /// whether the remote side accepted the message.
    #[must_use]
    pub fn valid_message_id(&self) -> Option<MessageId> {
        self.message_id.filter(|id| id.is_valid())
    }

    /// Converts the payload type, keeping code, text and id.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            code: self.code,
            msg: self.msg,
            message_id: self.message_id,
            data: self.data.map(f),
        }
    }
}
