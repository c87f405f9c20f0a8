//! Window bound to a friend.

use chatwin_proto::chain::{MessageChain, MessageId};
use chatwin_proto::contact::Friend;
use chatwin_proto::payload::{NudgeKind, Profile};

use super::{SendTarget, WindowContext, WindowType, payload, succeeded};
use crate::adapter::Adapter;
use crate::store::{InMemoryStore, MessageStore};

/// Chat with a friend of the bot account.
pub struct FriendChatWindow<A: Adapter, S: MessageStore = InMemoryStore> {
    pub(super) context: WindowContext<A, S>,
    contact: Friend,
}

impl<A: Adapter, S: MessageStore> FriendChatWindow<A, S> {
    /// Binds a window to `friend`.
    pub const fn new(context: WindowContext<A, S>, friend: Friend) -> Self {
        Self {
            context,
            contact: friend,
        }
    }

    /// Always [`WindowType::FriendChatWindow`].
    #[must_use]
    pub const fn window_type(&self) -> WindowType {
        WindowType::FriendChatWindow
    }

    /// The bound friend.
    #[must_use]
    pub const fn contact(&self) -> &Friend {
        &self.contact
    }

    /// Sends a message to the friend; recorded as a `FriendMessage`.
    pub async fn send(
        &self,
        message: impl Into<MessageChain>,
        quote: Option<MessageId>,
    ) -> Option<MessageId> {
        self.context
            .send_to(SendTarget::Friend(self.contact.id), message.into(), quote)
            .await
    }

    /// Nudges `target`, defaulting to the friend.
    pub async fn send_nudge(&self, target: Option<i64>) -> bool {
        let id = self.contact.id;
        self.context
            .nudge(target.unwrap_or(id), id, NudgeKind::Friend)
            .await
    }

    /// Recalls a sent message.
    pub async fn recall(&self, message_id: MessageId) -> bool {
        self.context.recall(message_id).await
    }

    /// Fetches the friend's profile.
    pub async fn profile(&self) -> Option<Profile> {
        let result = self.context.adapter().friend_profile(self.contact.id).await;
        payload("friend_profile", result)
    }

    /// Removes the friend.
    pub async fn delete(&self) -> bool {
        let result = self.context.adapter().delete_friend(self.contact.id).await;
        succeeded("delete_friend", result)
    }
}
