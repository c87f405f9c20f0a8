//! Window bound to a group: messaging, moderation, settings and the
//! group file store.

use std::time::Duration;

use chatwin_proto::chain::{MessageChain, MessageId};
use chatwin_proto::contact::{Group, Permission};
use chatwin_proto::payload::{FileListQuery, FileOverview, GroupConfig, NudgeKind};

use super::{SendTarget, WindowContext, WindowType, payload, succeeded};
use crate::adapter::Adapter;
use crate::store::{InMemoryStore, MessageStore};

/// Seconds in `time`, rounded up.
const fn whole_seconds(time: Duration) -> u64 {
    if time.subsec_nanos() > 0 {
        time.as_secs().saturating_add(1)
    } else {
        time.as_secs()
    }
}

/// Chat with a group the bot account belongs to.
pub struct GroupChatWindow<A: Adapter, S: MessageStore = InMemoryStore> {
    pub(super) context: WindowContext<A, S>,
    contact: Group,
}

impl<A: Adapter, S: MessageStore> GroupChatWindow<A, S> {
    /// Binds a window to `group`.
    pub const fn new(context: WindowContext<A, S>, group: Group) -> Self {
        Self {
            context,
            contact: group,
        }
    }

    /// Always [`WindowType::GroupChatWindow`].
    #[must_use]
    pub const fn window_type(&self) -> WindowType {
        WindowType::GroupChatWindow
    }

    /// The bound group.
    #[must_use]
    pub const fn contact(&self) -> &Group {
        &self.contact
    }

    /// The bot's permission in the group, read from the contact on every
    /// call.
    #[must_use]
    pub fn permission(&self) -> Permission {
        self.contact.permission()
    }

    const fn group_id(&self) -> i64 {
        self.contact.id()
    }

    /// Sends a message to the group; recorded as a `GroupMessage`.
    pub async fn send(
        &self,
        message: impl Into<MessageChain>,
        quote: Option<MessageId>,
    ) -> Option<MessageId> {
        self.context
            .send_to(SendTarget::Group(self.group_id()), message.into(), quote)
            .await
    }

    /// Nudges a member of the group.
    pub async fn send_nudge(&self, target: i64) -> bool {
        self.context
            .nudge(target, self.group_id(), NudgeKind::Group)
            .await
    }

    /// Recalls a sent message.
    pub async fn recall(&self, message_id: MessageId) -> bool {
        self.context.recall(message_id).await
    }

    // ---------------------------------------------------------------------
    // Moderation
    // ---------------------------------------------------------------------

    /// Mutes a member, for the configured default duration when `time`
    /// is `None`. The remote side counts whole seconds, so any fraction
    /// rounds up: a 500 ms mute lasts one second.
    pub async fn mute(&self, member: i64, time: Option<Duration>) -> bool {
        let time = time.unwrap_or(self.context.defaults().mute_duration);
        let result = self
            .context
            .adapter()
            .mute_member(member, self.group_id(), whole_seconds(time))
            .await;
        succeeded("mute_member", result)
    }

    /// Lifts a member's mute.
    pub async fn unmute(&self, member: i64) -> bool {
        let result = self
            .context
            .adapter()
            .unmute_member(member, self.group_id())
            .await;
        succeeded("unmute_member", result)
    }

    /// Removes a member, showing them `message` or the configured default.
    pub async fn kick(&self, member: i64, message: Option<&str>) -> bool {
        let message = message.unwrap_or(&self.context.defaults().kick_message);
        let result = self
            .context
            .adapter()
            .kick_member(member, self.group_id(), message)
            .await;
        succeeded("kick_member", result)
    }

    /// Leaves the group.
    pub async fn quit(&self) -> bool {
        let result = self.context.adapter().quit_group(self.group_id()).await;
        succeeded("quit_group", result)
    }

    /// Turns on whole-group mute.
    pub async fn mute_all(&self) -> bool {
        let result = self.context.adapter().mute_all(self.group_id()).await;
        succeeded("mute_all", result)
    }

    /// Turns off whole-group mute.
    pub async fn unmute_all(&self) -> bool {
        let result = self.context.adapter().unmute_all(self.group_id()).await;
        succeeded("unmute_all", result)
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Current group settings.
    pub async fn config(&self) -> Option<GroupConfig> {
        let result = self.context.adapter().group_config(self.group_id()).await;
        payload("group_config", result)
    }

    /// Applies the fields set in `config`.
    pub async fn set_config(&self, config: &GroupConfig) -> bool {
        let result = self
            .context
            .adapter()
            .set_group_config(self.group_id(), config)
            .await;
        succeeded("set_group_config", result)
    }

    // ---------------------------------------------------------------------
    // Files
    // ---------------------------------------------------------------------

    /// Lists one page of a directory; `None` lists the root with the
    /// configured page size. Failures yield an empty list.
    pub async fn file_list(&self, query: Option<FileListQuery>) -> Vec<FileOverview> {
        let query = query
            .unwrap_or_else(|| FileListQuery::default().size(self.context.defaults().file_page_size));
        let result = self
            .context
            .adapter()
            .group_file_list(self.group_id(), &query.path, query.offset, query.size)
            .await;
        payload("group_file_list", result).unwrap_or_default()
    }

    /// Fetches one file or directory entry.
    pub async fn file_info(&self, file_id: &str) -> Option<FileOverview> {
        let result = self
            .context
            .adapter()
            .group_file_info(self.group_id(), file_id)
            .await;
        payload("group_file_info", result)
    }

    /// Creates a directory under `parent`, or under the root when `None`.
    pub async fn create_directory(&self, name: &str, parent: Option<&str>) -> Option<FileOverview> {
        let result = self
            .context
            .adapter()
            .create_group_directory(self.group_id(), parent.unwrap_or_default(), name)
            .await;
        payload("create_group_directory", result)
    }

    /// Deletes a file or directory.
    pub async fn delete_file(&self, file_id: &str) -> bool {
        let result = self
            .context
            .adapter()
            .delete_group_file(self.group_id(), file_id)
            .await;
        succeeded("delete_group_file", result)
    }

    /// Moves a file into the directory `to`, or into the root when `None`.
    pub async fn move_file(&self, file_id: &str, to: Option<&str>) -> bool {
        let result = self
            .context
            .adapter()
            .move_group_file(self.group_id(), file_id, to.unwrap_or_default())
            .await;
        succeeded("move_group_file", result)
    }

    /// Renames a file.
    ///
    /// This issues the move-file request with `name` in the destination
    /// directory slot; the remote side has no separate rename operation
    /// wired here. A server that validates the destination will reject it.
    // TODO: switch to a dedicated rename request once the adapter grows one.
    pub async fn rename_file(&self, file_id: &str, name: &str) -> bool {
        let result = self
            .context
            .adapter()
            .move_group_file(self.group_id(), file_id, name)
            .await;
        succeeded("rename_group_file", result)
    }
}

impl<A: Adapter> GroupChatWindow<A> {
    /// Marks a group message as essence.
    ///
    /// The remote side derives the group from the message id, so this
    /// needs only an adapter, not a window.
    pub async fn set_essence(adapter: &A, message_id: MessageId) -> bool {
        succeeded("set_essence", adapter.set_essence(message_id).await)
    }
}
