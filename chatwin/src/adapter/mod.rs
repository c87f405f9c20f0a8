//! Adapter abstraction for `chatwin`.
//!
//! Defines the [`Adapter`] trait through which windows reach the remote
//! bot API. The adapter owns the network connection and session; this
//! crate only calls it and interprets the returned [`Response`] envelopes.
//! Concrete implementations include:
//! - [`recording::RecordingAdapter`]: in-process adapter that records every
//!   call and answers with scripted envelopes (tests, dry runs)

pub mod recording;

use std::future::Future;

use chatwin_proto::chain::{MessageChain, MessageId};
use chatwin_proto::contact::GroupMember;
use chatwin_proto::payload::{FileOverview, GroupConfig, MemberInfo, NudgeKind, Profile};
use chatwin_proto::response::Response;

/// Errors an adapter can raise instead of returning an envelope.
///
/// Windows treat every one of these as "no response".
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The connection to the bot API is gone.
    #[error("adapter disconnected")]
    Disconnected,

    /// The request did not complete in time.
    #[error("adapter request timed out")]
    Timeout,

    /// The remote side answered with something that is not an envelope.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// An underlying I/O error occurred.
    #[error("adapter I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand for what every adapter operation returns.
pub type AdapterResult<T = ()> = Result<Response<T>, AdapterError>;

/// Async bot API surface consumed by the chat windows.
///
/// Argument order mirrors the remote API: the acted-upon entity first,
/// then the context it lives in (e.g. member id, then group id).
pub trait Adapter: Send + Sync {
    /// Sends a chain to a friend.
    fn send_friend_message(
        &self,
        target: i64,
        chain: MessageChain,
        quote: Option<MessageId>,
    ) -> impl Future<Output = AdapterResult> + Send;

    /// Sends a chain to a group.
    fn send_group_message(
        &self,
        group: i64,
        chain: MessageChain,
        quote: Option<MessageId>,
    ) -> impl Future<Output = AdapterResult> + Send;

    /// Sends a chain to a group member through a temporary session.
    fn send_temp_message(
        &self,
        member: i64,
        group: i64,
        chain: MessageChain,
        quote: Option<MessageId>,
    ) -> impl Future<Output = AdapterResult> + Send;

    /// Recalls a previously sent message.
    fn recall(&self, message_id: MessageId) -> impl Future<Output = AdapterResult> + Send;

    /// Nudges `target` inside the `subject` context.
    fn send_nudge(
        &self,
        target: i64,
        subject: i64,
        kind: NudgeKind,
    ) -> impl Future<Output = AdapterResult> + Send;

    /// Mutes a member for `seconds`.
    fn mute_member(
        &self,
        member: i64,
        group: i64,
        seconds: u64,
    ) -> impl Future<Output = AdapterResult> + Send;

    /// Lifts a member's mute.
    fn unmute_member(&self, member: i64, group: i64) -> impl Future<Output = AdapterResult> + Send;

    /// Removes a member from a group, with a message shown to them.
    fn kick_member(
        &self,
        member: i64,
        group: i64,
        message: &str,
    ) -> impl Future<Output = AdapterResult> + Send;

    /// Makes the bot leave a group.
    fn quit_group(&self, group: i64) -> impl Future<Output = AdapterResult> + Send;

    /// Turns on whole-group mute.
    fn mute_all(&self, group: i64) -> impl Future<Output = AdapterResult> + Send;

    /// Turns off whole-group mute.
    fn unmute_all(&self, group: i64) -> impl Future<Output = AdapterResult> + Send;

    /// Marks a group message as essence. The group is implied by the id.
    fn set_essence(&self, message_id: MessageId) -> impl Future<Output = AdapterResult> + Send;

    /// Fetches a friend's profile.
    fn friend_profile(&self, friend: i64) -> impl Future<Output = AdapterResult<Profile>> + Send;

    /// Fetches a group member's profile.
    fn member_profile(
        &self,
        group: i64,
        member: i64,
    ) -> impl Future<Output = AdapterResult<Profile>> + Send;

    /// Removes a friend.
    fn delete_friend(&self, friend: i64) -> impl Future<Output = AdapterResult> + Send;

    /// Fetches group settings.
    fn group_config(&self, group: i64) -> impl Future<Output = AdapterResult<GroupConfig>> + Send;

    /// Updates group settings; unset fields stay unchanged.
    fn set_group_config(
        &self,
        group: i64,
        config: &GroupConfig,
    ) -> impl Future<Output = AdapterResult> + Send;

    /// Lists one page of a group directory.
    fn group_file_list(
        &self,
        group: i64,
        path: &str,
        offset: u32,
        size: u32,
    ) -> impl Future<Output = AdapterResult<Vec<FileOverview>>> + Send;

    /// Fetches one group file entry.
    fn group_file_info(
        &self,
        group: i64,
        file_id: &str,
    ) -> impl Future<Output = AdapterResult<FileOverview>> + Send;

    /// Creates a directory under `parent` (empty for the root).
    fn create_group_directory(
        &self,
        group: i64,
        parent: &str,
        name: &str,
    ) -> impl Future<Output = AdapterResult<FileOverview>> + Send;

    /// Deletes a group file or directory.
    fn delete_group_file(
        &self,
        group: i64,
        file_id: &str,
    ) -> impl Future<Output = AdapterResult> + Send;

    /// Moves a group file into the directory `move_to` (empty for the root).
    fn move_group_file(
        &self,
        group: i64,
        file_id: &str,
        move_to: &str,
    ) -> impl Future<Output = AdapterResult> + Send;

    /// Fetches a member's group-scoped info.
    fn member_info(
        &self,
        group: i64,
        member: i64,
    ) -> impl Future<Output = AdapterResult<GroupMember>> + Send;

    /// Updates a member's group-scoped info.
    fn set_member_info(
        &self,
        member: i64,
        group: i64,
        info: &MemberInfo,
    ) -> impl Future<Output = AdapterResult> + Send;
}
