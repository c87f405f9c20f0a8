//! Integration tests for group file management through the group window.

use std::sync::Arc;

use chatwin::adapter::recording::{AdapterCall, RecordingAdapter};
use chatwin::window::{GroupChatWindow, WindowContext, WindowDefaults};

use chatwin_proto::contact::{Group, Permission};
use chatwin_proto::payload::{FileListQuery, FileOverview};
use chatwin_proto::response::StatusCode;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn entry(id: &str, name: &str, parent: Option<&FileOverview>, is_file: bool) -> FileOverview {
    let parent_path = parent.map_or("", |p| p.path.as_str());
    FileOverview {
        name: name.to_string(),
        id: Some(id.to_string()),
        path: format!("{parent_path}/{name}"),
        parent: parent.cloned().map(Box::new),
        is_file,
        is_directory: !is_file,
        size: if is_file { 128 } else { 0 },
        download_info: None,
    }
}

/// Root holds `docs/` and `a.txt`; `docs/` holds `b.txt`.
fn fixture_files() -> Vec<FileOverview> {
    let docs = entry("/docs", "docs", None, false);
    let a = entry("/a.txt", "a.txt", None, true);
    let b = entry("/docs/b.txt", "b.txt", Some(&docs), true);
    vec![docs, a, b]
}

fn setup() -> (Arc<RecordingAdapter>, GroupChatWindow<RecordingAdapter>) {
    let adapter = Arc::new(RecordingAdapter::new());
    adapter.set_files(fixture_files());
    let context = WindowContext::new(Arc::clone(&adapter), 10_000);
    let window = GroupChatWindow::new(context, Group::new(555, "g", Permission::Owner));
    (adapter, window)
}

fn names(files: &[FileOverview]) -> Vec<&str> {
    files.iter().map(|f| f.name.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn default_listing_is_root_first_page() {
    let (adapter, window) = setup();

    let files = window.file_list(None).await;
    assert_eq!(names(&files), ["docs", "a.txt"]);
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::GroupFileList {
            group: 555,
            path: String::new(),
            offset: 0,
            size: 100,
        })
    );
}

#[tokio::test]
async fn listing_uses_configured_page_size() {
    let adapter = Arc::new(RecordingAdapter::new());
    adapter.set_files(fixture_files());
    let context = WindowContext::new(Arc::clone(&adapter), 10_000).with_defaults(WindowDefaults {
        file_page_size: 1,
        ..WindowDefaults::default()
    });
    let window = GroupChatWindow::new(context, Group::new(555, "g", Permission::Owner));

    assert_eq!(names(&window.file_list(None).await), ["docs"]);
}

#[tokio::test]
async fn listing_a_subdirectory_with_paging() {
    let (adapter, window) = setup();

    let files = window.file_list(Some(FileListQuery::dir("/docs"))).await;
    assert_eq!(names(&files), ["b.txt"]);

    let files = window
        .file_list(Some(FileListQuery::default().offset(1).size(5)))
        .await;
    assert_eq!(names(&files), ["a.txt"]);
    assert!(matches!(
        adapter.last_call(),
        Some(AdapterCall::GroupFileList {
            offset: 1,
            size: 5,
            ..
        })
    ));
}

#[tokio::test]
async fn listing_failure_is_empty() {
    let (adapter, window) = setup();
    adapter.set_code(StatusCode::PermissionDenied);
    assert!(window.file_list(None).await.is_empty());

    adapter.set_code(StatusCode::Success);
    adapter.set_offline(true);
    assert!(window.file_list(None).await.is_empty());
}

// ---------------------------------------------------------------------------
// Single entries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn file_info_finds_entry() {
    let (adapter, window) = setup();

    let info = window.file_info("/docs/b.txt").await.unwrap();
    assert_eq!(info.path, "/docs/b.txt");
    assert!(info.is_file);
    assert_eq!(info.parent.as_deref().map(|p| p.name.as_str()), Some("docs"));
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::GroupFileInfo {
            group: 555,
            file_id: "/docs/b.txt".to_string(),
        })
    );
}

#[tokio::test]
async fn file_info_missing_is_none() {
    let (_adapter, window) = setup();
    assert!(window.file_info("/nope").await.is_none());
}

#[tokio::test]
async fn create_directory_defaults_to_root() {
    let (adapter, window) = setup();

    let dir = window.create_directory("music", None).await.unwrap();
    assert!(dir.is_directory);
    assert_eq!(dir.path, "/music");
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::CreateGroupDirectory {
            group: 555,
            parent: String::new(),
            name: "music".to_string(),
        })
    );

    let listed = window.file_list(None).await;
    assert!(names(&listed).contains(&"music"));
}

#[tokio::test]
async fn create_directory_under_parent() {
    let (_adapter, window) = setup();
    let dir = window.create_directory("old", Some("/docs")).await.unwrap();
    assert_eq!(dir.path, "/docs/old");
}

#[tokio::test]
async fn directory_ids_stay_unique_across_deletes() {
    let (_adapter, window) = setup();

    let first = window.create_directory("x", None).await.unwrap();
    let second = window.create_directory("x", None).await.unwrap();
    assert!(window.delete_file(first.id.as_deref().unwrap()).await);
    let third = window.create_directory("x", None).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_ne!(second.id, third.id);
    assert_ne!(first.id, third.id);

    // Deleting one directory leaves its namesakes in place.
    assert!(window.delete_file(third.id.as_deref().unwrap()).await);
    assert!(window.file_info(second.id.as_deref().unwrap()).await.is_some());
}

#[tokio::test]
async fn create_directory_failure_is_none() {
    let (adapter, window) = setup();
    adapter.set_code(StatusCode::PermissionDenied);
    assert!(window.create_directory("music", None).await.is_none());
}

#[tokio::test]
async fn delete_file_reports_outcome() {
    let (adapter, window) = setup();

    assert!(window.delete_file("/a.txt").await);
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::DeleteGroupFile {
            group: 555,
            file_id: "/a.txt".to_string(),
        })
    );
    assert!(window.file_info("/a.txt").await.is_none());

    assert!(!window.delete_file("/a.txt").await);
}

#[tokio::test]
async fn move_file_defaults_to_root() {
    let (adapter, window) = setup();

    assert!(window.move_file("/docs/b.txt", None).await);
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::MoveGroupFile {
            group: 555,
            file_id: "/docs/b.txt".to_string(),
            move_to: String::new(),
        })
    );

    assert!(window.move_file("/a.txt", Some("/docs")).await);
    assert!(matches!(
        adapter.last_call(),
        Some(AdapterCall::MoveGroupFile { ref move_to, .. }) if move_to == "/docs"
    ));

    assert!(!window.move_file("/missing", None).await);
}

#[tokio::test]
async fn rename_file_issues_move_with_name_as_destination() {
    let (adapter, window) = setup();

    assert!(window.rename_file("/a.txt", "renamed.txt").await);
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::MoveGroupFile {
            group: 555,
            file_id: "/a.txt".to_string(),
            move_to: "renamed.txt".to_string(),
        })
    );

    adapter.set_code(StatusCode::FileNotFound);
    assert!(!window.rename_file("/a.txt", "renamed.txt").await);
}
