//! Window bound to a group member reached through the group, for members
//! who are not friends of the bot.

use chatwin_proto::chain::{MessageChain, MessageId};
use chatwin_proto::contact::GroupMember;
use chatwin_proto::payload::{MemberInfo, NudgeKind, Profile};

use super::{SendTarget, WindowContext, WindowType, payload, succeeded};
use crate::adapter::Adapter;
use crate::store::{InMemoryStore, MessageStore};

/// Temporary chat with a group member.
pub struct TempChatWindow<A: Adapter, S: MessageStore = InMemoryStore> {
    pub(super) context: WindowContext<A, S>,
    contact: GroupMember,
}

impl<A: Adapter, S: MessageStore> TempChatWindow<A, S> {
    /// Binds a window to `member`.
    pub const fn new(context: WindowContext<A, S>, member: GroupMember) -> Self {
        Self {
            context,
            contact: member,
        }
    }

    /// Always [`WindowType::TempChatWindow`].
    #[must_use]
    pub const fn window_type(&self) -> WindowType {
        WindowType::TempChatWindow
    }

    /// The bound member.
    #[must_use]
    pub const fn contact(&self) -> &GroupMember {
        &self.contact
    }

    const fn group_id(&self) -> i64 {
        self.contact.group.id()
    }

    fn target(&self) -> SendTarget {
        SendTarget::Temp {
            member: self.contact.id,
            group: self.group_id(),
        }
    }

    /// Sends a message to the member; recorded as a `TempMessage`.
    pub async fn send(
        &self,
        message: impl Into<MessageChain>,
        quote: Option<MessageId>,
    ) -> Option<MessageId> {
        self.context.send_to(self.target(), message.into(), quote).await
    }

    /// Nudges `target`, defaulting to the member.
    pub async fn send_nudge(&self, target: Option<i64>) -> bool {
        self.context
            .nudge(
                target.unwrap_or(self.contact.id),
                self.group_id(),
                NudgeKind::Stranger,
            )
            .await
    }

    /// Recalls a sent message.
    pub async fn recall(&self, message_id: MessageId) -> bool {
        self.context.recall(message_id).await
    }

    /// Fetches the member's profile.
    pub async fn profile(&self) -> Option<Profile> {
        let result = self
            .context
            .adapter()
            .member_profile(self.group_id(), self.contact.id)
            .await;
        payload("member_profile", result)
    }

    /// Fetches the member's current group-scoped info.
    pub async fn info(&self) -> Option<GroupMember> {
        let result = self
            .context
            .adapter()
            .member_info(self.group_id(), self.contact.id)
            .await;
        payload("member_info", result)
    }

    /// Updates the member's group-scoped info.
    pub async fn set_info(&self, info: &MemberInfo) -> bool {
        let result = self
            .context
            .adapter()
            .set_member_info(self.contact.id, self.group_id(), info)
            .await;
        succeeded("set_member_info", result)
    }
}
