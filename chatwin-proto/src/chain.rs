//! Message units, message chains and outbound input normalization.
//!
//! A [`MessageChain`] is the only message shape the adapter ever sees.
//! Callers may hand a window any of the accepted input shapes (plain text,
//! one [`MessageUnit`], a list of units, or an already-built chain); the
//! `From` impls in this module fold every one of them into a chain.
//! [`MessageInput`] covers the same shapes for dynamically typed input
//! such as JSON.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a message by the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    /// Wraps a raw remote message id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether the remote side actually assigned this id.
    ///
    /// A rejected send is reported with `-1`; `0` is never assigned and
    /// also means no id.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Millisecond-precision UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp for the current instant.
    #[must_use]
    pub fn now() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    /// Creates a timestamp from milliseconds since the UNIX epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as milliseconds since the UNIX epoch.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// One element of a message chain.
///
/// Serialized as `{"type": "<Variant>", ...}` with camelCase fields, the
/// shape the bot HTTP API uses on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum MessageUnit {
    /// Metadata unit leading every received chain.
    Source {
        /// Message id of the chain.
        id: i64,
        /// Send time in seconds since the UNIX epoch.
        time: i64,
    },
    /// Reply reference to an earlier message.
    Quote {
        /// Id of the quoted message.
        id: i64,
        /// Group the quoted message was sent in (0 for private chats).
        group_id: i64,
        /// Author of the quoted message.
        sender_id: i64,
        /// Receiver of the quoted message.
        target_id: i64,
        /// Content of the quoted message.
        origin: Vec<MessageUnit>,
    },
    /// Mention of a group member.
    At {
        /// Mentioned member id.
        target: i64,
        /// Text rendered for the mention.
        #[serde(default)]
        display: String,
    },
    /// Mention of every group member.
    AtAll,
    /// Built-in emoticon.
    Face {
        /// Numeric face id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        face_id: Option<i32>,
        /// Face name, used when the id is absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Plain text.
    Plain {
        /// Text content.
        text: String,
    },
    /// Image, referenced by id, URL or local path.
    Image {
        /// Server-side image id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_id: Option<String>,
        /// Remote URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        /// Local path relative to the adapter's asset directory.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// Image that can only be viewed once.
    FlashImage {
        /// Server-side image id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_id: Option<String>,
        /// Remote URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        /// Local path relative to the adapter's asset directory.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// Voice clip.
    Voice {
        /// Server-side voice id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        voice_id: Option<String>,
        /// Remote URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        /// Local path relative to the adapter's asset directory.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// XML rich message.
    Xml {
        /// Raw XML document.
        xml: String,
    },
    /// JSON rich message.
    Json {
        /// Raw JSON document.
        json: String,
    },
    /// Mini-app card.
    App {
        /// Raw card content.
        content: String,
    },
    /// Poke gesture embedded in a chain.
    Poke {
        /// Poke name, e.g. `"ChuoYiChuo"`.
        name: String,
    },
    /// Dice roll.
    Dice {
        /// Rolled value, 1 through 6.
        value: u8,
    },
}

impl MessageUnit {
    /// Builds a [`MessageUnit::Plain`] unit.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    /// Builds a [`MessageUnit::At`] unit with no display override.
    #[must_use]
    pub const fn at(target: i64) -> Self {
        Self::At {
            target,
            display: String::new(),
        }
    }

    /// Builds a [`MessageUnit::Face`] unit from a face id.
    #[must_use]
    pub const fn face(face_id: i32) -> Self {
        Self::Face {
            face_id: Some(face_id),
            name: None,
        }
    }

    /// Builds a [`MessageUnit::Image`] unit from a remote URL.
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::Image {
            image_id: None,
            url: Some(url.into()),
            path: None,
        }
    }

    /// Builds a [`MessageUnit::Image`] unit from a server-side image id.
    pub fn image_id(image_id: impl Into<String>) -> Self {
        Self::Image {
            image_id: Some(image_id.into()),
            url: None,
            path: None,
        }
    }

    /// Text this unit contributes to a plain-text rendering of a chain.
    fn summary(&self) -> Option<std::borrow::Cow<'_, str>> {
        use std::borrow::Cow;
        match self {
            Self::Plain { text } => Some(Cow::Borrowed(text)),
            Self::At { target, display } if display.is_empty() => {
                Some(Cow::Owned(format!("@{target}")))
            }
            Self::At { display, .. } => Some(Cow::Borrowed(display)),
            Self::AtAll => Some(Cow::Borrowed("@all")),
            Self::Face { .. } => Some(Cow::Borrowed("[face]")),
            Self::Image { .. } => Some(Cow::Borrowed("[image]")),
            Self::FlashImage { .. } => Some(Cow::Borrowed("[flash image]")),
            Self::Voice { .. } => Some(Cow::Borrowed("[voice]")),
            Self::Dice { value } => Some(Cow::Owned(format!("[dice {value}]"))),
            Self::Source { .. }
            | Self::Quote { .. }
            | Self::Xml { .. }
            | Self::Json { .. }
            | Self::App { .. }
            | Self::Poke { .. } => None,
        }
    }
}

/// An ordered sequence of message units forming one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageChain(Vec<MessageUnit>);

impl MessageChain {
    /// Creates an empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a unit to the end of the chain.
    pub fn push(&mut self, unit: MessageUnit) {
        self.0.push(unit);
    }

    /// Builder-style [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, unit: MessageUnit) -> Self {
        self.0.push(unit);
        self
    }

    /// Returns the units in order.
    #[must_use]
    pub fn units(&self) -> &[MessageUnit] {
        &self.0
    }

    /// Number of units in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the chain has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the units in order.
    pub fn iter(&self) -> std::slice::Iter<'_, MessageUnit> {
        self.0.iter()
    }

    /// Consumes the chain, returning its units.
    #[must_use]
    pub fn into_units(self) -> Vec<MessageUnit> {
        self.0
    }

    /// Renders a short human-readable text form, used in log lines.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.0.iter().filter_map(MessageUnit::summary).collect()
    }
}

impl From<&str> for MessageChain {
    fn from(text: &str) -> Self {
        Self(vec![MessageUnit::plain(text)])
    }
}

impl From<String> for MessageChain {
    fn from(text: String) -> Self {
        Self(vec![MessageUnit::Plain { text }])
    }
}

impl From<MessageUnit> for MessageChain {
    fn from(unit: MessageUnit) -> Self {
        Self(vec![unit])
    }
}

impl From<Vec<MessageUnit>> for MessageChain {
    fn from(units: Vec<MessageUnit>) -> Self {
        Self(units)
    }
}

impl From<&[MessageUnit]> for MessageChain {
    fn from(units: &[MessageUnit]) -> Self {
        Self(units.to_vec())
    }
}

impl<const N: usize> From<[MessageUnit; N]> for MessageChain {
    fn from(units: [MessageUnit; N]) -> Self {
        Self(units.into())
    }
}

impl FromIterator<MessageUnit> for MessageChain {
    fn from_iter<I: IntoIterator<Item = MessageUnit>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for MessageChain {
    type Item = MessageUnit;
    type IntoIter = std::vec::IntoIter<MessageUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageChain {
    type Item = &'a MessageUnit;
    type IntoIter = std::slice::Iter<'a, MessageUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Any accepted outbound message shape, for input that is not statically typed.
///
/// Deserializes from a JSON string (text), a JSON object (one unit) or a
/// JSON array (list of units). A [`MessageInput::Chain`] can only be built
/// in code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawInput")]
pub enum MessageInput {
    /// Plain text.
    Text(String),
    /// A single unit.
    Unit(MessageUnit),
    /// A list of units, kept in order.
    Units(Vec<MessageUnit>),
    /// An already-built chain.
    Chain(MessageChain),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInput {
    Text(String),
    Unit(MessageUnit),
    Units(Vec<MessageUnit>),
}

impl From<RawInput> for MessageInput {
    fn from(raw: RawInput) -> Self {
        match raw {
            RawInput::Text(text) => Self::Text(text),
            RawInput::Unit(unit) => Self::Unit(unit),
            RawInput::Units(units) => Self::Units(units),
        }
    }
}

impl MessageInput {
    /// Folds the input into a single chain.
    #[must_use]
    pub fn normalize(self) -> MessageChain {
        match self {
            Self::Text(text) => MessageChain::from(text),
            Self::Unit(unit) => MessageChain::from(unit),
            Self::Units(units) => MessageChain::from(units),
            Self::Chain(chain) => chain,
        }
    }
}

impl From<MessageInput> for MessageChain {
    fn from(input: MessageInput) -> Self {
        input.normalize()
    }
}

/// Tag under which a sent message is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Sent to a friend.
    FriendMessage,
    /// Sent to a group.
    GroupMessage,
    /// Sent to a group member through a temporary session.
    TempMessage,
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FriendMessage => write!(f, "FriendMessage"),
            Self::GroupMessage => write!(f, "GroupMessage"),
            Self::TempMessage => write!(f, "TempMessage"),
        }
    }
}
