//! `chatwin`: dry-run a chat window.
//!
//! Normalizes a message, sends it through the window matching the chosen
//! contact over a recording adapter, and prints the resulting chain and
//! adapter calls as JSON. Nothing leaves the machine; sent messages are
//! appended to the history file when one is configured.
//!
//! ```bash
//! cargo run --bin chatwin -- --friend 111 hi
//! cargo run --bin chatwin -- --member 222 --member-group 555 --quote 9000 hello
//! cargo run --bin chatwin -- --group 555 --json '[{"type":"AtAll"},{"type":"Plain","text":" hi"}]'
//! ```

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use chatwin::adapter::recording::RecordingAdapter;
use chatwin::config::{ChatwinConfig, CliArgs};
use chatwin::store::MessageStore;
use chatwin::store::jsonl::JsonlStore;
use chatwin::window::{ChatWindow, WindowContext};
use chatwin_proto::chain::{MessageChain, MessageId, MessageInput};
use chatwin_proto::contact::{Contact, Friend, Group, GroupMember, Permission};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match ChatwinConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    let Some(contact) = contact_from_args(&cli) else {
        eprintln!("Error: one of --friend, --group or --member/--member-group is required");
        return ExitCode::FAILURE;
    };

    let chain = match parse_message(&cli) {
        Ok(chain) => chain,
        Err(e) => {
            eprintln!("Error: message is not a valid JSON message: {e}");
            return ExitCode::FAILURE;
        }
    };

    let adapter = Arc::new(RecordingAdapter::new());
    let quote = cli.quote.map(MessageId::new);

    let sent = if let Some(path) = config.history_file() {
        tracing::info!(path = %path.display(), "recording sent messages");
        let context =
            WindowContext::with_store(Arc::clone(&adapter), JsonlStore::new(path), config.account_id)
                .with_defaults(config.to_defaults());
        send(context, contact, chain.clone(), quote).await
    } else {
        let context = WindowContext::new(Arc::clone(&adapter), config.account_id)
            .with_defaults(config.to_defaults());
        send(context, contact, chain.clone(), quote).await
    };

    let report = serde_json::json!({
        "chain": chain,
        "messageId": sent,
        "calls": adapter.calls(),
    });
    match serde_json::to_string_pretty(&report) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error: failed to render report: {e}");
            return ExitCode::FAILURE;
        }
    }

    if sent.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Initialize logging to stderr, or to `file_path` when given.
///
/// Returns a [`WorkerGuard`] for file logging that must be held until
/// shutdown so buffered entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some(log_path) = file_path else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .init();
        return None;
    };

    let log_dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

fn contact_from_args(cli: &CliArgs) -> Option<Contact> {
    if let Some(id) = cli.friend {
        return Some(Friend::new(id).into());
    }
    if let Some(id) = cli.group {
        return Some(Group::new(id, "", Permission::Member).into());
    }
    let group = Group::new(cli.member_group?, "", Permission::Member);
    Some(GroupMember::new(cli.member?, group).into())
}

fn parse_message(cli: &CliArgs) -> Result<MessageChain, serde_json::Error> {
    let text = cli.message.join(" ");
    if cli.json {
        Ok(serde_json::from_str::<MessageInput>(&text)?.into())
    } else {
        Ok(MessageChain::from(text))
    }
}

async fn send<S: MessageStore>(
    context: WindowContext<RecordingAdapter, S>,
    contact: Contact,
    chain: MessageChain,
    quote: Option<MessageId>,
) -> Option<MessageId> {
    let handle = context.clone();
    let window = ChatWindow::open(context, contact);
    tracing::debug!(window = %window.window_type(), contact = window.contact_id(), "opened window");

    let sent = window.send(chain, quote).await;

    if let Some(recorder) = handle.recorder() {
        let pending = recorder.pending_count().await;
        if pending > 0 {
            let flushed = recorder.flush_pending().await;
            tracing::warn!(pending, flushed, "retried failed history writes");
        }
    }
    sent
}
