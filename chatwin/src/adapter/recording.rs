//! In-process adapter that records calls and answers from fixtures.
//!
//! [`RecordingAdapter`] never touches the network. Every call is appended
//! to a log that tests (and the `chatwin` dry-run binary) can inspect, and
//! the answer is built from a configurable status code plus fixture
//! payloads. Sends are assigned increasing message ids starting from
//! [`RecordingAdapter::with_next_message_id`].

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::Serialize;

use chatwin_proto::chain::{MessageChain, MessageId};
use chatwin_proto::contact::GroupMember;
use chatwin_proto::payload::{FileOverview, GroupConfig, MemberInfo, NudgeKind, Profile};
use chatwin_proto::response::{Response, StatusCode};

use super::{Adapter, AdapterError, AdapterResult};

/// One recorded adapter invocation with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AdapterCall {
    /// Message to a friend.
    SendFriendMessage {
        target: i64,
        chain: MessageChain,
        quote: Option<MessageId>,
    },
    /// Message to a group.
    SendGroupMessage {
        group: i64,
        chain: MessageChain,
        quote: Option<MessageId>,
    },
    /// Temporary message to a group member.
    SendTempMessage {
        member: i64,
        group: i64,
        chain: MessageChain,
        quote: Option<MessageId>,
    },
    /// Recall of a sent message.
    Recall {
        message_id: MessageId,
    },
    /// Nudge of `target`, delivered in the friend or group `subject`.
    SendNudge {
        target: i64,
        subject: i64,
        kind: NudgeKind,
    },
    /// Mute of one member for `seconds`.
    MuteMember {
        member: i64,
        group: i64,
        seconds: u64,
    },
    /// Lifted mute of one member.
    UnmuteMember {
        member: i64,
        group: i64,
    },
    /// Removal of a member, shown `message`.
    KickMember {
        member: i64,
        group: i64,
        message: String,
    },
    /// The bot leaving a group.
    QuitGroup {
        group: i64,
    },
    /// Whole-group mute turned on.
    MuteAll {
        group: i64,
    },
    /// Whole-group mute turned off.
    UnmuteAll {
        group: i64,
    },
    /// Message marked as essence.
    SetEssence {
        message_id: MessageId,
    },
    /// Profile lookup of a friend.
    FriendProfile {
        friend: i64,
    },
    /// Profile lookup of a group member.
    MemberProfile {
        group: i64,
        member: i64,
    },
    /// Friend removal.
    DeleteFriend {
        friend: i64,
    },
    /// Read of group settings.
    GroupConfig {
        group: i64,
    },
    /// Partial update of group settings.
    SetGroupConfig {
        group: i64,
        config: GroupConfig,
    },
    /// One page of a file store directory listing.
    GroupFileList {
        group: i64,
        path: String,
        offset: u32,
        size: u32,
    },
    /// Lookup of one file store entry.
    GroupFileInfo {
        group: i64,
        file_id: String,
    },
    /// Directory creation; an empty `parent` is the root.
    CreateGroupDirectory {
        group: i64,
        parent: String,
        name: String,
    },
    /// File or directory deletion.
    DeleteGroupFile {
        group: i64,
        file_id: String,
    },
    /// File move; an empty `move_to` is the root.
    MoveGroupFile {
        group: i64,
        file_id: String,
        move_to: String,
    },
    /// Read of a member's group card.
    MemberInfo {
        group: i64,
        member: i64,
    },
    /// Update of a member's group card.
    SetMemberInfo {
        member: i64,
        group: i64,
        info: MemberInfo,
    },
}

/// Payloads handed back by the read operations.
#[derive(Debug, Default)]
struct Fixtures {
    profile: Option<Profile>,
    group_config: Option<GroupConfig>,
    files: Vec<FileOverview>,
    /// Last sequence number used in a created directory id.
    next_file_seq: u64,
    member: Option<GroupMember>,
}

/// Adapter double that records calls and replies from fixtures.
pub struct RecordingAdapter {
    calls: Mutex<Vec<AdapterCall>>,
    code: Mutex<StatusCode>,
    /// `None` makes successful sends omit the message id.
    next_message_id: Mutex<Option<i64>>,
    offline: AtomicBool,
    fixtures: Mutex<Fixtures>,
}

impl Default for RecordingAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingAdapter {
    /// Creates an adapter answering every call with success, numbering
    /// sent messages from 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            code: Mutex::new(StatusCode::Success),
            next_message_id: Mutex::new(Some(1)),
            offline: AtomicBool::new(false),
            fixtures: Mutex::new(Fixtures::default()),
        }
    }

    /// Sets the id the next successful send is assigned.
    #[must_use]
    pub fn with_next_message_id(self, id: i64) -> Self {
        *self.next_message_id.lock() = Some(id);
        self
    }

    /// Sets the status code of every subsequent envelope.
    pub fn set_code(&self, code: StatusCode) {
        *self.code.lock() = code;
    }

    /// When `true`, successful sends carry no message id.
    pub fn omit_message_ids(&self, omit: bool) {
        let mut next = self.next_message_id.lock();
        *next = match (omit, *next) {
            (true, _) => None,
            (false, None) => Some(1),
            (false, current) => current,
        };
    }

    /// When `true`, every call fails with [`AdapterError::Disconnected`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Profile returned by profile lookups.
    pub fn set_profile(&self, profile: Profile) {
        self.fixtures.lock().profile = Some(profile);
    }

    /// Settings returned by group config lookups.
    pub fn set_group_config(&self, config: GroupConfig) {
        self.fixtures.lock().group_config = Some(config);
    }

    /// Entries served by the group file operations.
    pub fn set_files(&self, files: Vec<FileOverview>) {
        self.fixtures.lock().files = files;
    }

    /// Member returned by member info lookups.
    pub fn set_member(&self, member: GroupMember) {
        self.fixtures.lock().member = Some(member);
    }

    /// Snapshot of every call made so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().clone()
    }

    /// The most recent call, if any.
    #[must_use]
    pub fn last_call(&self) -> Option<AdapterCall> {
        self.calls.lock().last().cloned()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: AdapterCall) -> Result<StatusCode, AdapterError> {
        tracing::trace!(?call, "recording adapter call");
        self.calls.lock().push(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(AdapterError::Disconnected);
        }
        Ok(*self.code.lock())
    }

    fn respond<T>(
        &self,
        call: AdapterCall,
        data: impl FnOnce(&mut Fixtures) -> Option<T>,
    ) -> AdapterResult<T> {
        let code = self.record(call)?;
        let mut response = Response::with_code(code);
        if code.is_success() {
            response.data = data(&mut *self.fixtures.lock());
        }
        Ok(response)
    }

    fn respond_sent(&self, call: AdapterCall) -> AdapterResult {
        let code = self.record(call)?;
        let mut response = Response::with_code(code);
        if code.is_success() {
            let mut next = self.next_message_id.lock();
            if let Some(id) = *next {
                response.message_id = Some(MessageId::new(id));
                *next = Some(id + 1);
            }
        } else {
            response.message_id = Some(MessageId::new(-1));
        }
        Ok(response)
    }

    fn respond_bare(&self, call: AdapterCall) -> AdapterResult {
        self.respond(call, |_| None)
    }
}

impl Adapter for RecordingAdapter {
    async fn send_friend_message(
        &self,
        target: i64,
        chain: MessageChain,
        quote: Option<MessageId>,
    ) -> AdapterResult {
        self.respond_sent(AdapterCall::SendFriendMessage {
            target,
            chain,
            quote,
        })
    }

    async fn send_group_message(
        &self,
        group: i64,
        chain: MessageChain,
        quote: Option<MessageId>,
    ) -> AdapterResult {
        self.respond_sent(AdapterCall::SendGroupMessage {
            group,
            chain,
            quote,
        })
    }

    async fn send_temp_message(
        &self,
        member: i64,
        group: i64,
        chain: MessageChain,
        quote: Option<MessageId>,
    ) -> AdapterResult {
        self.respond_sent(AdapterCall::SendTempMessage {
            member,
            group,
            chain,
            quote,
        })
    }

    async fn recall(&self, message_id: MessageId) -> AdapterResult {
        self.respond_bare(AdapterCall::Recall { message_id })
    }

    async fn send_nudge(&self, target: i64, subject: i64, kind: NudgeKind) -> AdapterResult {
        self.respond_bare(AdapterCall::SendNudge {
            target,
            subject,
            kind,
        })
    }

    async fn mute_member(&self, member: i64, group: i64, seconds: u64) -> AdapterResult {
        self.respond_bare(AdapterCall::MuteMember {
            member,
            group,
            seconds,
        })
    }

    async fn unmute_member(&self, member: i64, group: i64) -> AdapterResult {
        self.respond_bare(AdapterCall::UnmuteMember { member, group })
    }

    async fn kick_member(&self, member: i64, group: i64, message: &str) -> AdapterResult {
        self.respond_bare(AdapterCall::KickMember {
            member,
            group,
            message: message.to_string(),
        })
    }

    async fn quit_group(&self, group: i64) -> AdapterResult {
        self.respond_bare(AdapterCall::QuitGroup { group })
    }

    async fn mute_all(&self, group: i64) -> AdapterResult {
        self.respond_bare(AdapterCall::MuteAll { group })
    }

    async fn unmute_all(&self, group: i64) -> AdapterResult {
        self.respond_bare(AdapterCall::UnmuteAll { group })
    }

    async fn set_essence(&self, message_id: MessageId) -> AdapterResult {
        self.respond_bare(AdapterCall::SetEssence { message_id })
    }

    async fn friend_profile(&self, friend: i64) -> AdapterResult<Profile> {
        self.respond(AdapterCall::FriendProfile { friend }, |f| f.profile.clone())
    }

    async fn member_profile(&self, group: i64, member: i64) -> AdapterResult<Profile> {
        self.respond(AdapterCall::MemberProfile { group, member }, |f| f.profile.clone())
    }

    async fn delete_friend(&self, friend: i64) -> AdapterResult {
        self.respond_bare(AdapterCall::DeleteFriend { friend })
    }

    async fn group_config(&self, group: i64) -> AdapterResult<GroupConfig> {
        self.respond(AdapterCall::GroupConfig { group }, |f| f.group_config.clone())
    }

    async fn set_group_config(&self, group: i64, config: &GroupConfig) -> AdapterResult {
        self.respond_bare(AdapterCall::SetGroupConfig {
            group,
            config: config.clone(),
        })
    }

    async fn group_file_list(
        &self,
        group: i64,
        path: &str,
        offset: u32,
        size: u32,
    ) -> AdapterResult<Vec<FileOverview>> {
        let call = AdapterCall::GroupFileList {
            group,
            path: path.to_string(),
            offset,
            size,
        };
        self.respond(call, |f| {
            let in_dir = f.files.iter().filter(|file| {
                let parent_id = file.parent.as_ref().and_then(|p| p.id.as_deref());
                parent_id.unwrap_or_default() == path
            });
            Some(
                in_dir
                    .skip(offset as usize)
                    .take(size as usize)
                    .cloned()
                    .collect(),
            )
        })
    }

    async fn group_file_info(&self, group: i64, file_id: &str) -> AdapterResult<FileOverview> {
        let call = AdapterCall::GroupFileInfo {
            group,
            file_id: file_id.to_string(),
        };
        let mut response = self.respond(call, |f| {
            f.files
                .iter()
                .find(|file| file.id.as_deref() == Some(file_id))
                .cloned()
        })?;
        if response.is_success() && response.data.is_none() {
            response.code = StatusCode::FileNotFound;
        }
        Ok(response)
    }

    async fn create_group_directory(
        &self,
        group: i64,
        parent: &str,
        name: &str,
    ) -> AdapterResult<FileOverview> {
        let call = AdapterCall::CreateGroupDirectory {
            group,
            parent: parent.to_string(),
            name: name.to_string(),
        };
        self.respond(call, |f| {
            let parent_entry = f
                .files
                .iter()
                .find(|file| file.id.as_deref() == Some(parent))
                .cloned();
            let parent_path = parent_entry.as_ref().map_or("", |p| p.path.as_str());
            f.next_file_seq += 1;
            let directory = FileOverview {
                name: name.to_string(),
                id: Some(format!("/{name}-{}", f.next_file_seq)),
                path: format!("{parent_path}/{name}"),
                parent: parent_entry.map(Box::new),
                is_file: false,
                is_directory: true,
                size: 0,
                download_info: None,
            };
            f.files.push(directory.clone());
            Some(directory)
        })
    }

    async fn delete_group_file(&self, group: i64, file_id: &str) -> AdapterResult {
        let call = AdapterCall::DeleteGroupFile {
            group,
            file_id: file_id.to_string(),
        };
        let mut found = false;
        let mut response = self.respond(call, |f| {
            let before = f.files.len();
            f.files.retain(|file| file.id.as_deref() != Some(file_id));
            found = f.files.len() != before;
            None::<()>
        })?;
        if response.is_success() && !found {
            response.code = StatusCode::FileNotFound;
        }
        Ok(response)
    }

    async fn move_group_file(&self, group: i64, file_id: &str, move_to: &str) -> AdapterResult {
        let call = AdapterCall::MoveGroupFile {
            group,
            file_id: file_id.to_string(),
            move_to: move_to.to_string(),
        };
        let mut found = false;
        let mut response = self.respond(call, |f| {
            found = f.files.iter().any(|file| file.id.as_deref() == Some(file_id));
            None::<()>
        })?;
        if response.is_success() && !found {
            response.code = StatusCode::FileNotFound;
        }
        Ok(response)
    }

    async fn member_info(&self, group: i64, member: i64) -> AdapterResult<GroupMember> {
        self.respond(AdapterCall::MemberInfo { group, member }, |f| f.member.clone())
    }

    async fn set_member_info(&self, member: i64, group: i64, info: &MemberInfo) -> AdapterResult {
        self.respond_bare(AdapterCall::SetMemberInfo {
            member,
            group,
            info: info.clone(),
        })
    }
}
