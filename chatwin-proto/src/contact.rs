//! Contacts a chat window can be bound to.
//!
//! Ids are the numeric account/group numbers used by the remote side and
//! never change for the lifetime of a contact value. The bot's permission
//! inside a group is the one piece of live state: it is held in a shared
//! cell so every clone of a [`Group`] (and therefore every window bound to
//! it) observes updates made through any other clone.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Role of an account inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// Group owner.
    Owner,
    /// Group administrator.
    Administrator,
    /// Regular member.
    #[default]
    Member,
}

impl Permission {
    /// Whether this role may mute, kick or change settings.
    #[must_use]
    pub const fn can_moderate(self) -> bool {
        matches!(self, Self::Owner | Self::Administrator)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "OWNER"),
            Self::Administrator => write!(f, "ADMINISTRATOR"),
            Self::Member => write!(f, "MEMBER"),
        }
    }
}

/// A friend of the bot account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    /// Account number.
    pub id: i64,
    /// Nickname chosen by the friend.
    #[serde(default)]
    pub nickname: String,
    /// Remark set by the bot account.
    #[serde(default)]
    pub remark: String,
}

impl Friend {
    /// Creates a friend with empty nickname and remark.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            nickname: String::new(),
            remark: String::new(),
        }
    }
}

/// A group the bot account belongs to.
///
/// Cloning shares the permission cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "GroupRecord", into = "GroupRecord")]
pub struct Group {
    id: i64,
    name: String,
    permission: Arc<RwLock<Permission>>,
}

#[derive(Serialize, Deserialize)]
struct GroupRecord {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    permission: Permission,
}

impl From<GroupRecord> for Group {
    fn from(record: GroupRecord) -> Self {
        Self::new(record.id, record.name, record.permission)
    }
}

impl From<Group> for GroupRecord {
    fn from(group: Group) -> Self {
        Self {
            permission: group.permission(),
            id: group.id,
            name: group.name,
        }
    }
}

impl Group {
    /// Creates a group contact.
    pub fn new(id: i64, name: impl Into<String>, permission: Permission) -> Self {
        Self {
            id,
            name: name.into(),
            permission: Arc::new(RwLock::new(permission)),
        }
    }

    /// Group number.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Group display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bot's current permission in this group.
    #[must_use]
    pub fn permission(&self) -> Permission {
        *self.permission.read()
    }

    /// Updates the bot's permission; visible to every clone of this group.
    pub fn set_permission(&self, permission: Permission) {
        *self.permission.write() = permission;
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name && self.permission() == other.permission()
    }
}

impl Eq for Group {}

/// A member of a group, reachable through that group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    /// Account number.
    pub id: i64,
    /// Name card inside the group.
    #[serde(default)]
    pub member_name: String,
    /// Title granted by the group owner.
    #[serde(default)]
    pub special_title: String,
    /// Role of the member in the group.
    #[serde(default)]
    pub permission: Permission,
    /// Join time, seconds since the UNIX epoch.
    #[serde(default)]
    pub join_timestamp: i64,
    /// Last message time, seconds since the UNIX epoch.
    #[serde(default)]
    pub last_speak_timestamp: i64,
    /// Seconds of mute left, 0 when not muted.
    #[serde(default)]
    pub mute_time_remaining: i64,
    /// The group this member was reached through.
    pub group: Group,
}

impl GroupMember {
    /// Creates a regular member of `group` with empty profile fields.
    #[must_use]
    pub const fn new(id: i64, group: Group) -> Self {
        Self {
            id,
            member_name: String::new(),
            special_title: String::new(),
            permission: Permission::Member,
            join_timestamp: 0,
            last_speak_timestamp: 0,
            mute_time_remaining: 0,
            group,
        }
    }
}

/// Discriminant of a [`Contact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// A friend.
    Friend,
    /// A group.
    Group,
    /// A group member.
    Member,
}

/// Any addressable remote entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contact {
    /// A friend.
    Friend(Friend),
    /// A group.
    Group(Group),
    /// A member reached through a group.
    Member(GroupMember),
}

impl Contact {
    /// Account or group number.
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Friend(friend) => friend.id,
            Self::Group(group) => group.id,
            Self::Member(member) => member.id,
        }
    }

    /// Which variant this is.
    #[must_use]
    pub const fn kind(&self) -> ContactKind {
        match self {
            Self::Friend(_) => ContactKind::Friend,
            Self::Group(_) => ContactKind::Group,
            Self::Member(_) => ContactKind::Member,
        }
    }
}

impl From<Friend> for Contact {
    fn from(friend: Friend) -> Self {
        Self::Friend(friend)
    }
}

impl From<Group> for Contact {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl From<GroupMember> for Contact {
    fn from(member: GroupMember) -> Self {
        Self::Member(member)
    }
}
