//! Integration tests for the group chat window: messaging, moderation and
//! settings.
//!
//! Every boolean operation is checked against both the success code and a
//! representative failure code.

use std::sync::Arc;
use std::time::Duration;

use chatwin::adapter::recording::{AdapterCall, RecordingAdapter};
use chatwin::store::InMemoryStore;
use chatwin::window::{GroupChatWindow, WindowContext, WindowDefaults, WindowType};

use chatwin_proto::chain::{MessageId, MessageKind, MessageUnit};
use chatwin_proto::contact::{Group, Permission};
use chatwin_proto::payload::{GroupConfig, NudgeKind};
use chatwin_proto::response::StatusCode;

const OWN_ID: i64 = 10_000;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Context = WindowContext<RecordingAdapter, InMemoryStore>;

fn setup() -> (
    Arc<RecordingAdapter>,
    Context,
    GroupChatWindow<RecordingAdapter, InMemoryStore>,
) {
    let adapter = Arc::new(RecordingAdapter::new().with_next_message_id(9001));
    let context = WindowContext::with_store(Arc::clone(&adapter), InMemoryStore::new(), OWN_ID);
    let group = Group::new(555, "rustaceans", Permission::Administrator);
    let window = GroupChatWindow::new(context.clone(), group);
    (adapter, context, window)
}

// ---------------------------------------------------------------------------
// Messaging
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_is_recorded_as_group_message() {
    let (adapter, context, window) = setup();

    let chain = vec![MessageUnit::AtAll, MessageUnit::plain(" meeting at 5")];
    assert_eq!(window.send(chain, None).await, Some(MessageId::new(9001)));

    assert!(matches!(
        adapter.last_call(),
        Some(AdapterCall::SendGroupMessage { group: 555, .. })
    ));

    let records = context.recorder().unwrap().store().records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].receiver_id, 555);
    assert_eq!(records[0].sender_id, OWN_ID);
    assert_eq!(records[0].kind, MessageKind::GroupMessage);
}

#[tokio::test]
async fn nudge_targets_member_in_group() {
    let (adapter, _context, window) = setup();

    assert!(window.send_nudge(222).await);
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::SendNudge {
            target: 222,
            subject: 555,
            kind: NudgeKind::Group,
        })
    );

    adapter.set_code(StatusCode::TargetNotFound);
    assert!(!window.send_nudge(222).await);
}

#[tokio::test]
async fn window_type_is_group() {
    let (_adapter, _context, window) = setup();
    assert_eq!(window.window_type(), WindowType::GroupChatWindow);
    assert_eq!(window.contact().id(), 555);
}

#[tokio::test]
async fn permission_is_read_live() {
    let (_adapter, _context, window) = setup();
    assert_eq!(window.permission(), Permission::Administrator);

    window.contact().set_permission(Permission::Member);
    assert_eq!(window.permission(), Permission::Member);
}

#[tokio::test]
async fn permission_follows_updates_to_a_shared_group() {
    let adapter = Arc::new(RecordingAdapter::new());
    let group = Group::new(555, "rustaceans", Permission::Member);
    let window = GroupChatWindow::new(WindowContext::new(adapter, OWN_ID), group.clone());

    group.set_permission(Permission::Owner);
    assert_eq!(window.permission(), Permission::Owner);
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mute_sends_whole_seconds() {
    let (adapter, _context, window) = setup();

    assert!(window.mute(222, Some(Duration::from_secs(30))).await);
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::MuteMember {
            member: 222,
            group: 555,
            seconds: 30,
        })
    );

    adapter.set_code(StatusCode::PermissionDenied);
    assert!(!window.mute(222, Some(Duration::from_secs(30))).await);
}

#[tokio::test]
async fn sub_second_mute_rounds_up() {
    let (adapter, _context, window) = setup();

    assert!(window.mute(222, Some(Duration::from_millis(500))).await);
    assert!(matches!(
        adapter.last_call(),
        Some(AdapterCall::MuteMember { seconds: 1, .. })
    ));

    assert!(window.mute(222, Some(Duration::from_millis(30_250))).await);
    assert!(matches!(
        adapter.last_call(),
        Some(AdapterCall::MuteMember { seconds: 31, .. })
    ));
}

#[tokio::test]
async fn mute_defaults_to_sixty_seconds() {
    let (adapter, _context, window) = setup();
    assert!(window.mute(222, None).await);
    assert!(matches!(
        adapter.last_call(),
        Some(AdapterCall::MuteMember { seconds: 60, .. })
    ));
}

#[tokio::test]
async fn configured_defaults_apply() {
    let adapter = Arc::new(RecordingAdapter::new());
    let context = WindowContext::new(Arc::clone(&adapter), OWN_ID).with_defaults(WindowDefaults {
        mute_duration: Duration::from_secs(600),
        kick_message: "bye".to_string(),
        file_page_size: 10,
    });
    let window = GroupChatWindow::new(context, Group::new(555, "", Permission::Owner));

    window.mute(222, None).await;
    assert!(matches!(
        adapter.last_call(),
        Some(AdapterCall::MuteMember { seconds: 600, .. })
    ));

    window.kick(222, None).await;
    assert!(matches!(
        adapter.last_call(),
        Some(AdapterCall::KickMember { ref message, .. }) if message == "bye"
    ));
}

#[tokio::test]
async fn unmute_reports_success_code() {
    let (adapter, _context, window) = setup();
    assert!(window.unmute(222).await);
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::UnmuteMember {
            member: 222,
            group: 555
        })
    );

    adapter.set_code(StatusCode::PermissionDenied);
    assert!(!window.unmute(222).await);
}

#[tokio::test]
async fn kick_uses_given_or_empty_message() {
    let (adapter, _context, window) = setup();

    assert!(window.kick(222, None).await);
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::KickMember {
            member: 222,
            group: 555,
            message: String::new(),
        })
    );

    assert!(window.kick(222, Some("spam")).await);
    assert!(matches!(
        adapter.last_call(),
        Some(AdapterCall::KickMember { ref message, .. }) if message == "spam"
    ));

    adapter.set_code(StatusCode::PermissionDenied);
    assert!(!window.kick(222, None).await);
}

#[tokio::test]
async fn quit_reports_success_code() {
    let (adapter, _context, window) = setup();
    assert!(window.quit().await);
    assert_eq!(adapter.last_call(), Some(AdapterCall::QuitGroup { group: 555 }));

    adapter.set_code(StatusCode::PermissionDenied);
    assert!(!window.quit().await);
}

#[tokio::test]
async fn mute_all_and_unmute_all() {
    let (adapter, _context, window) = setup();

    assert!(window.mute_all().await);
    assert_eq!(adapter.last_call(), Some(AdapterCall::MuteAll { group: 555 }));
    assert!(window.unmute_all().await);
    assert_eq!(adapter.last_call(), Some(AdapterCall::UnmuteAll { group: 555 }));

    adapter.set_code(StatusCode::PermissionDenied);
    assert!(!window.mute_all().await);
    assert!(!window.unmute_all().await);
}

#[tokio::test]
async fn set_essence_needs_no_window() {
    let adapter = RecordingAdapter::new();

    assert!(GroupChatWindow::set_essence(&adapter, MessageId::new(42)).await);
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::SetEssence {
            message_id: MessageId::new(42)
        })
    );

    adapter.set_code(StatusCode::PermissionDenied);
    assert!(!GroupChatWindow::set_essence(&adapter, MessageId::new(42)).await);
}

#[tokio::test]
async fn offline_adapter_fails_moderation() {
    let (adapter, _context, window) = setup();
    adapter.set_offline(true);

    assert!(!window.mute(222, None).await);
    assert!(!window.quit().await);
    assert_eq!(adapter.calls().len(), 2);
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn config_round_trip_through_adapter() {
    let (adapter, _context, window) = setup();
    let config = GroupConfig {
        name: Some("rustaceans".to_string()),
        confess_talk: Some(false),
        ..GroupConfig::default()
    };
    adapter.set_group_config(config.clone());

    assert_eq!(window.config().await, Some(config));
    assert_eq!(adapter.last_call(), Some(AdapterCall::GroupConfig { group: 555 }));
}

#[tokio::test]
async fn config_is_none_on_failure() {
    let (adapter, _context, window) = setup();
    adapter.set_group_config(GroupConfig::default());
    adapter.set_code(StatusCode::PermissionDenied);
    assert_eq!(window.config().await, None);
}

#[tokio::test]
async fn set_config_sends_only_given_fields() {
    let (adapter, _context, window) = setup();
    let update = GroupConfig {
        announcement: Some("be kind".to_string()),
        ..GroupConfig::default()
    };

    assert!(window.set_config(&update).await);
    assert_eq!(
        adapter.last_call(),
        Some(AdapterCall::SetGroupConfig {
            group: 555,
            config: update.clone(),
        })
    );

    adapter.set_code(StatusCode::PermissionDenied);
    assert!(!window.set_config(&update).await);
}
