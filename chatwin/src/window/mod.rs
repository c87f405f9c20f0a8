//! Chat windows: one facade over friend, group and temporary chats.
//!
//! A window binds one contact and routes outbound messages to the adapter
//! operation matching that contact's variant. Every outbound message is
//! first folded into a [`MessageChain`]; once the adapter reports a valid
//! message id the send is recorded through the context's
//! [`ResilientRecorder`], if one is configured.
//!
//! Remote failures never escape as errors. A non-success status code, a
//! missing payload or an [`AdapterError`](crate::adapter::AdapterError)
//! all become `false`, `None` or an empty list, after being logged.
//!
//! Windows are cheap to create and hold only shared handles, so callers
//! open them on demand through [`ChatWindow::open`] or the per-variant
//! constructors.

pub mod friend;
pub mod group;
pub mod temp;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chatwin_proto::chain::{MessageChain, MessageId, MessageKind};
use chatwin_proto::contact::Contact;
use chatwin_proto::payload::NudgeKind;

use crate::adapter::{Adapter, AdapterResult};
use crate::store::{InMemoryStore, MessageRecord, MessageStore, ResilientRecorder};

pub use friend::FriendChatWindow;
pub use group::GroupChatWindow;
pub use temp::TempChatWindow;

/// Mute length used when the caller does not give one.
pub const DEFAULT_MUTE_DURATION: Duration = Duration::from_secs(60);

/// Page size used when listing group files without an explicit query.
pub const DEFAULT_FILE_PAGE_SIZE: u32 = 100;

/// Which window variant a window is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowType {
    /// Bound to a friend.
    FriendChatWindow,
    /// Bound to a group.
    GroupChatWindow,
    /// Bound to a group member reached through the group.
    TempChatWindow,
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FriendChatWindow => write!(f, "FriendChatWindow"),
            Self::GroupChatWindow => write!(f, "GroupChatWindow"),
            Self::TempChatWindow => write!(f, "TempChatWindow"),
        }
    }
}

/// Fallback values for optional operation arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDefaults {
    /// Mute length for [`GroupChatWindow::mute`] without a duration.
    pub mute_duration: Duration,
    /// Message shown to a member kicked without one.
    pub kick_message: String,
    /// Page size for [`GroupChatWindow::file_list`] without a query.
    pub file_page_size: u32,
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            mute_duration: DEFAULT_MUTE_DURATION,
            kick_message: String::new(),
            file_page_size: DEFAULT_FILE_PAGE_SIZE,
        }
    }
}

/// Where a send primitive delivers a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendTarget {
    /// A friend, by account number.
    Friend(i64),
    /// A group, by group number.
    Group(i64),
    /// A member of a group, through a temporary session.
    Temp {
        /// Member account number.
        member: i64,
        /// Group the member is reached through.
        group: i64,
    },
}

impl SendTarget {
    /// The id recorded as the receiver of a sent message.
    #[must_use]
    pub const fn receiver_id(self) -> i64 {
        match self {
            Self::Friend(id) | Self::Group(id) | Self::Temp { member: id, .. } => id,
        }
    }

    /// The tag recorded with a sent message.
    #[must_use]
    pub const fn kind(self) -> MessageKind {
        match self {
            Self::Friend(_) => MessageKind::FriendMessage,
            Self::Group(_) => MessageKind::GroupMessage,
            Self::Temp { .. } => MessageKind::TempMessage,
        }
    }
}

/// Shared handles every window carries: the adapter, the optional
/// recorder, the bot's own account and the argument defaults.
pub struct WindowContext<A: Adapter, S: MessageStore = InMemoryStore> {
    adapter: Arc<A>,
    recorder: Option<Arc<ResilientRecorder<S>>>,
    own_id: i64,
    defaults: Arc<WindowDefaults>,
}

impl<A: Adapter, S: MessageStore> Clone for WindowContext<A, S> {
    fn clone(&self) -> Self {
        Self {
            adapter: Arc::clone(&self.adapter),
            recorder: self.recorder.clone(),
            own_id: self.own_id,
            defaults: Arc::clone(&self.defaults),
        }
    }
}

impl<A: Adapter> WindowContext<A> {
    /// A context that does not persist sent messages.
    pub fn new(adapter: Arc<A>, own_id: i64) -> Self {
        Self {
            adapter,
            recorder: None,
            own_id,
            defaults: Arc::new(WindowDefaults::default()),
        }
    }
}

impl<A: Adapter, S: MessageStore> WindowContext<A, S> {
    /// A context recording sent messages into `store`.
    pub fn with_store(adapter: Arc<A>, store: S, own_id: i64) -> Self {
        Self::with_recorder(adapter, Arc::new(ResilientRecorder::new(store)), own_id)
    }

    /// A context recording through an existing, possibly shared, recorder.
    pub fn with_recorder(adapter: Arc<A>, recorder: Arc<ResilientRecorder<S>>, own_id: i64) -> Self {
        Self {
            adapter,
            recorder: Some(recorder),
            own_id,
            defaults: Arc::new(WindowDefaults::default()),
        }
    }

    /// Replaces the argument defaults.
    #[must_use]
    pub fn with_defaults(mut self, defaults: WindowDefaults) -> Self {
        self.defaults = Arc::new(defaults);
        self
    }

    /// The adapter handle.
    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The recorder, if sent messages are persisted.
    #[must_use]
    pub fn recorder(&self) -> Option<&ResilientRecorder<S>> {
        self.recorder.as_deref()
    }

    /// The bot's own account number.
    #[must_use]
    pub const fn own_id(&self) -> i64 {
        self.own_id
    }

    /// Argument defaults.
    #[must_use]
    pub fn defaults(&self) -> &WindowDefaults {
        &self.defaults
    }

    /// Sends `chain` to `target` and records it on success.
    ///
    /// Returns the id assigned by the remote side, or `None` if it did not
    /// assign a valid one. Empty chains are not dispatched.
    pub(crate) async fn send_to(
        &self,
        target: SendTarget,
        chain: MessageChain,
        quote: Option<MessageId>,
    ) -> Option<MessageId> {
        if chain.is_empty() {
            tracing::warn!(to = ?target, "refusing to send an empty message chain");
            return None;
        }

        tracing::debug!(
            to = ?target,
            units = chain.len(),
            text = %chain.plain_text(),
            quote = ?quote,
            "sending message"
        );

        let kept = self.recorder.as_ref().map(|_| chain.clone());
        let result = match target {
            SendTarget::Friend(id) => self.adapter.send_friend_message(id, chain, quote).await,
            SendTarget::Group(id) => self.adapter.send_group_message(id, chain, quote).await,
            SendTarget::Temp { member, group } => {
                self.adapter
                    .send_temp_message(member, group, chain, quote)
                    .await
            }
        };

        let message_id = match result {
            Ok(response) => {
                let id = response.valid_message_id();
                if id.is_none() {
                    tracing::warn!(
                        to = ?target,
                        code = %response.code,
                        msg = %response.msg,
                        "send was not assigned a message id"
                    );
                }
                id
            }
            Err(err) => {
                tracing::warn!(to = ?target, error = %err, "send failed");
                None
            }
        }?;

        if let (Some(recorder), Some(chain)) = (&self.recorder, kept) {
            let record = MessageRecord::new(
                message_id,
                chain,
                self.own_id,
                target.receiver_id(),
                target.kind(),
            );
            recorder.record(record).await;
        }

        Some(message_id)
    }

    /// Recalls a sent message.
    pub(crate) async fn recall(&self, message_id: MessageId) -> bool {
        succeeded("recall", self.adapter.recall(message_id).await)
    }

    /// Nudges `target` in the `subject` context.
    pub(crate) async fn nudge(&self, target: i64, subject: i64, kind: NudgeKind) -> bool {
        tracing::debug!(target_id = target, subject, %kind, "sending nudge");
        succeeded("nudge", self.adapter.send_nudge(target, subject, kind).await)
    }
}

/// Whether an operation reported the success code. Failures are logged.
pub(crate) fn succeeded<T>(operation: &'static str, result: AdapterResult<T>) -> bool {
    match result {
        Ok(response) if response.is_success() => true,
        Ok(response) => {
            tracing::warn!(operation, code = %response.code, msg = %response.msg, "operation rejected");
            false
        }
        Err(err) => {
            tracing::warn!(operation, error = %err, "operation failed");
            false
        }
    }
}

/// The payload of a successful operation. Failures and missing payloads
/// are logged.
pub(crate) fn payload<T>(operation: &'static str, result: AdapterResult<T>) -> Option<T> {
    match result {
        Ok(response) if response.is_success() => {
            if response.data.is_none() {
                tracing::warn!(operation, "operation succeeded without a payload");
            }
            response.data
        }
        Ok(response) => {
            tracing::warn!(operation, code = %response.code, msg = %response.msg, "operation rejected");
            None
        }
        Err(err) => {
            tracing::warn!(operation, error = %err, "operation failed");
            None
        }
    }
}

/// A window over any contact variant.
pub enum ChatWindow<A: Adapter, S: MessageStore = InMemoryStore> {
    /// Friend chat.
    Friend(FriendChatWindow<A, S>),
    /// Group chat.
    Group(GroupChatWindow<A, S>),
    /// Temporary chat with a group member.
    Temp(TempChatWindow<A, S>),
}

impl<A: Adapter, S: MessageStore> ChatWindow<A, S> {
    /// Opens the window variant matching the contact: friends get a friend
    /// window, groups a group window and group members a temp window.
    pub fn open(context: WindowContext<A, S>, contact: impl Into<Contact>) -> Self {
        match contact.into() {
            Contact::Friend(friend) => Self::Friend(FriendChatWindow::new(context, friend)),
            Contact::Group(group) => Self::Group(GroupChatWindow::new(context, group)),
            Contact::Member(member) => Self::Temp(TempChatWindow::new(context, member)),
        }
    }

    /// The variant tag.
    #[must_use]
    pub const fn window_type(&self) -> WindowType {
        match self {
            Self::Friend(_) => WindowType::FriendChatWindow,
            Self::Group(_) => WindowType::GroupChatWindow,
            Self::Temp(_) => WindowType::TempChatWindow,
        }
    }

    /// The bound contact.
    #[must_use]
    pub fn contact(&self) -> Contact {
        match self {
            Self::Friend(window) => Contact::Friend(window.contact().clone()),
            Self::Group(window) => Contact::Group(window.contact().clone()),
            Self::Temp(window) => Contact::Member(window.contact().clone()),
        }
    }

    /// Id of the bound contact.
    #[must_use]
    pub const fn contact_id(&self) -> i64 {
        match self {
            Self::Friend(window) => window.contact().id,
            Self::Group(window) => window.contact().id(),
            Self::Temp(window) => window.contact().id,
        }
    }

    /// Sends a message, optionally quoting an earlier one.
    ///
    /// Accepts text, a single unit, a list of units or a chain. Returns the
    /// id assigned by the remote side; `None` means the send failed.
    pub async fn send(
        &self,
        message: impl Into<MessageChain>,
        quote: Option<MessageId>,
    ) -> Option<MessageId> {
        match self {
            Self::Friend(window) => window.send(message, quote).await,
            Self::Group(window) => window.send(message, quote).await,
            Self::Temp(window) => window.send(message, quote).await,
        }
    }

    /// Nudges `target`, or the variant's default target.
    ///
    /// Group windows have no default target: without one this returns
    /// `false` and nothing is sent.
    pub async fn send_nudge(&self, target: Option<i64>) -> bool {
        match self {
            Self::Friend(window) => window.send_nudge(target).await,
            Self::Temp(window) => window.send_nudge(target).await,
            Self::Group(window) => match target {
                Some(target) => window.send_nudge(target).await,
                None => {
                    tracing::warn!(
                        group = window.contact().id(),
                        "group nudge needs a target member"
                    );
                    false
                }
            },
        }
    }

    /// Recalls a sent message.
    pub async fn recall(&self, message_id: MessageId) -> bool {
        self.context().recall(message_id).await
    }

    /// The friend window, if this is one.
    #[must_use]
    pub const fn as_friend(&self) -> Option<&FriendChatWindow<A, S>> {
        match self {
            Self::Friend(window) => Some(window),
            _ => None,
        }
    }

    /// The group window, if this is one.
    #[must_use]
    pub const fn as_group(&self) -> Option<&GroupChatWindow<A, S>> {
        match self {
            Self::Group(window) => Some(window),
            _ => None,
        }
    }

    /// The temp window, if this is one.
    #[must_use]
    pub const fn as_temp(&self) -> Option<&TempChatWindow<A, S>> {
        match self {
            Self::Temp(window) => Some(window),
            _ => None,
        }
    }

    const fn context(&self) -> &WindowContext<A, S> {
        match self {
            Self::Friend(window) => &window.context,
            Self::Group(window) => &window.context,
            Self::Temp(window) => &window.context,
        }
    }
}
