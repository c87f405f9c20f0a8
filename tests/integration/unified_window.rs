//! Integration tests for the unified [`ChatWindow`] facade.
//!
//! Covers variant selection, per-variant send routing, nudges without a
//! target, offline adapters and history writes that fail after a send.

use std::sync::Arc;

use chatwin::adapter::recording::{AdapterCall, RecordingAdapter};
use chatwin::store::jsonl::JsonlStore;
use chatwin::store::{InMemoryStore, MessageRecord, MessageStore, StoreError};
use chatwin::window::{ChatWindow, WindowContext, WindowType};

use chatwin_proto::chain::{MessageChain, MessageId, MessageInput, MessageKind, MessageUnit};
use chatwin_proto::contact::{Contact, Friend, Group, GroupMember, Permission};

const OWN_ID: i64 = 10_000;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn group() -> Group {
    Group::new(555, "rustaceans", Permission::Member)
}

fn contacts() -> Vec<Contact> {
    vec![
        Friend::new(111).into(),
        group().into(),
        GroupMember::new(222, group()).into(),
    ]
}

/// A store whose writes fail until `recover` is called.
struct FlakyStore {
    inner: InMemoryStore,
    healthy: std::sync::atomic::AtomicBool,
}

impl FlakyStore {
    fn broken() -> Self {
        Self {
            inner: InMemoryStore::new(),
            healthy: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn recover(&self) {
        self.healthy
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

impl MessageStore for FlakyStore {
    async fn save(&self, record: &MessageRecord) -> Result<(), StoreError> {
        if self.healthy.load(std::sync::atomic::Ordering::SeqCst) {
            self.inner.save(record).await
        } else {
            Err(StoreError::Unavailable("disk offline".to_string()))
        }
    }

    async fn by_receiver(
        &self,
        receiver_id: i64,
        limit: usize,
    ) -> Result<Vec<MessageRecord>, StoreError> {
        self.inner.by_receiver(receiver_id, limit).await
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn each_contact_routes_to_its_send_primitive() {
    let adapter = Arc::new(RecordingAdapter::new().with_next_message_id(1));
    let context = WindowContext::with_store(Arc::clone(&adapter), InMemoryStore::new(), OWN_ID);

    for contact in contacts() {
        let window = ChatWindow::open(context.clone(), contact);
        assert!(window.send("hello", None).await.is_some());
    }

    let calls = adapter.calls();
    assert!(matches!(calls[0], AdapterCall::SendFriendMessage { target: 111, .. }));
    assert!(matches!(calls[1], AdapterCall::SendGroupMessage { group: 555, .. }));
    assert!(matches!(
        calls[2],
        AdapterCall::SendTempMessage {
            member: 222,
            group: 555,
            ..
        }
    ));

    let store = context.recorder().unwrap().store();
    let kinds: Vec<MessageKind> = store.records().await.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        [
            MessageKind::FriendMessage,
            MessageKind::GroupMessage,
            MessageKind::TempMessage
        ]
    );
}

#[tokio::test]
async fn contact_and_type_are_fixed_at_open() {
    let adapter = Arc::new(RecordingAdapter::new());
    let context = WindowContext::new(adapter, OWN_ID);

    let window = ChatWindow::open(context, GroupMember::new(222, group()));
    assert_eq!(window.window_type(), WindowType::TempChatWindow);
    assert_eq!(window.contact_id(), 222);
    assert!(matches!(window.contact(), Contact::Member(m) if m.group.id() == 555));
}

#[tokio::test]
async fn every_input_shape_yields_the_same_units() {
    let adapter = Arc::new(RecordingAdapter::new());
    let window = ChatWindow::open(WindowContext::new(Arc::clone(&adapter), OWN_ID), Friend::new(111));
    let units = vec![MessageUnit::at(222), MessageUnit::plain(" hi")];

    window.send("text", None).await;
    window.send(MessageUnit::Dice { value: 4 }, None).await;
    window.send(units.clone(), None).await;
    window.send(MessageChain::from(units.clone()), None).await;
    let parsed: MessageInput =
        serde_json::from_str(r#"[{"type":"At","target":222},{"type":"Plain","text":" hi"}]"#)
            .unwrap();
    window.send(parsed, None).await;

    let chains: Vec<MessageChain> = adapter
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            AdapterCall::SendFriendMessage { chain, .. } => Some(chain),
            _ => None,
        })
        .collect();

    assert_eq!(chains[0].units(), [MessageUnit::plain("text")]);
    assert_eq!(chains[1].units(), [MessageUnit::Dice { value: 4 }]);
    assert_eq!(chains[2].units(), units.as_slice());
    assert_eq!(chains[3].units(), units.as_slice());
    assert_eq!(chains[4].units(), units.as_slice());
}

// ---------------------------------------------------------------------------
// Nudge and recall
// ---------------------------------------------------------------------------

#[tokio::test]
async fn group_nudge_without_target_is_false_and_silent() {
    let adapter = Arc::new(RecordingAdapter::new());
    let window = ChatWindow::open(WindowContext::new(Arc::clone(&adapter), OWN_ID), group());

    assert!(!window.send_nudge(None).await);
    assert!(adapter.calls().is_empty());

    assert!(window.send_nudge(Some(222)).await);
    assert_eq!(adapter.calls().len(), 1);
}

#[tokio::test]
async fn recall_works_for_every_variant() {
    let adapter = Arc::new(RecordingAdapter::new());
    let context = WindowContext::new(Arc::clone(&adapter), OWN_ID);

    for contact in contacts() {
        let window = ChatWindow::open(context.clone(), contact);
        assert!(window.recall(MessageId::new(7)).await);
    }
    assert_eq!(adapter.calls().len(), 3);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn offline_adapter_yields_negative_outcomes() {
    let adapter = Arc::new(RecordingAdapter::new());
    adapter.set_offline(true);
    let context = WindowContext::with_store(Arc::clone(&adapter), InMemoryStore::new(), OWN_ID);
    let window = ChatWindow::open(context.clone(), Friend::new(111));

    assert_eq!(window.send("hi", None).await, None);
    assert!(!window.send_nudge(None).await);
    assert!(!window.recall(MessageId::new(1)).await);
    assert!(context.recorder().unwrap().store().records().await.is_empty());
}

#[tokio::test]
async fn failed_history_write_does_not_undo_send() {
    let adapter = Arc::new(RecordingAdapter::new().with_next_message_id(9001));
    let context = WindowContext::with_store(Arc::clone(&adapter), FlakyStore::broken(), OWN_ID);
    let window = ChatWindow::open(context.clone(), Friend::new(111));

    assert_eq!(window.send("hi", None).await, Some(MessageId::new(9001)));

    let recorder = context.recorder().unwrap();
    assert_eq!(recorder.pending_count().await, 1);

    recorder.store().recover();
    assert_eq!(recorder.flush_pending().await, 1);
    assert_eq!(recorder.pending_count().await, 0);

    let saved = recorder.store().by_receiver(111, 10).await.unwrap();
    assert_eq!(saved[0].message_id, MessageId::new(9001));
}

#[tokio::test]
async fn sends_can_be_recorded_to_a_jsonl_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sent.jsonl");
    let adapter = Arc::new(RecordingAdapter::new().with_next_message_id(9001));
    let context = WindowContext::with_store(Arc::clone(&adapter), JsonlStore::new(&path), OWN_ID);

    let window = ChatWindow::open(context, group());
    window.send("to the file", None).await;

    let reopened = JsonlStore::new(&path);
    let records = reopened.by_receiver(555, 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].chain, MessageChain::from("to the file"));
    assert_eq!(records[0].kind, MessageKind::GroupMessage);
}
