//! Payload types carried inside response envelopes, and request shapes
//! for the administration operations.

use serde::{Deserialize, Serialize};

/// Gender reported in a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    /// Not disclosed.
    #[default]
    Unknown,
    /// Male.
    Male,
    /// Female.
    Female,
}

/// Public profile of an account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Display nickname.
    #[serde(default)]
    pub nickname: String,
    /// Contact email, often empty.
    #[serde(default)]
    pub email: String,
    /// Age in years.
    #[serde(default)]
    pub age: u32,
    /// Account level.
    #[serde(default)]
    pub level: u32,
    /// Personal signature.
    #[serde(default)]
    pub sign: String,
    /// Reported gender.
    #[serde(default)]
    pub sex: Sex,
}

/// Group settings. Every field is optional so a partial update only
/// touches what is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConfig {
    /// Group name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Group announcement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement: Option<String>,
    /// Whether anonymous confessions are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confess_talk: Option<bool>,
    /// Whether members may invite others.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_member_invite: Option<bool>,
    /// Whether join requests are approved automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_approve: Option<bool>,
    /// Whether anonymous chat is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_chat: Option<bool>,
}

/// Download details of a group file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInfo {
    /// Hex SHA-1 of the file contents.
    #[serde(default)]
    pub sha1: String,
    /// Hex MD5 of the file contents.
    #[serde(default)]
    pub md5: String,
    /// How many times the file was downloaded.
    #[serde(default)]
    pub download_times: u32,
    /// Account that uploaded the file.
    #[serde(default)]
    pub uploader_id: i64,
    /// Seconds since the UNIX epoch.
    #[serde(default)]
    pub upload_time: i64,
    /// Seconds since the UNIX epoch.
    #[serde(default)]
    pub last_modify_time: i64,
    /// Temporary download URL.
    #[serde(default)]
    pub url: String,
}

/// A file or directory in a group's file store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOverview {
    /// Entry name.
    pub name: String,
    /// Entry id, absent for the root directory.
    #[serde(default)]
    pub id: Option<String>,
    /// Full path inside the file store.
    #[serde(default)]
    pub path: String,
    /// Containing directory, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<FileOverview>>,
    /// Set for regular files.
    #[serde(default)]
    pub is_file: bool,
    /// Set for directories.
    #[serde(default)]
    pub is_directory: bool,
    /// Size in bytes, 0 for directories.
    #[serde(default)]
    pub size: u64,
    /// Present only when download info was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_info: Option<DownloadInfo>,
}

/// Page request for listing a group directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListQuery {
    /// Directory id to list; empty for the root.
    pub path: String,
    /// Index of the first entry to return.
    pub offset: u32,
    /// Maximum number of entries to return.
    pub size: u32,
}

impl Default for FileListQuery {
    fn default() -> Self {
        Self {
            path: String::new(),
            offset: 0,
            size: 100,
        }
    }
}

impl FileListQuery {
    /// Lists the directory with the given id, first page.
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Builder-style offset override.
    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Builder-style page size override.
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }
}

/// Editable member fields. Unset fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    /// Name card inside the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Special title; only the owner may set it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_title: Option<String>,
}

/// Relationship context of a nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NudgeKind {
    /// Between friends.
    Friend,
    /// Inside a group.
    Group,
    /// Through a temporary session.
    Stranger,
}

impl std::fmt::Display for NudgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Friend => write!(f, "Friend"),
            Self::Group => write!(f, "Group"),
            Self::Stranger => write!(f, "Stranger"),
        }
    }
}
