//! Billing Client, §4.7: the biller connection state machine, the
//! authentication gate with its pending/interrupted auth window, keepalive,
//! chat relay, command forwarding, banner upload, score persistence, and
//! graceful shutdown.

pub mod banner;
pub mod chat;
pub mod command;
pub mod config;
pub mod player;
pub mod session;
pub mod shutdown;
pub mod state;

pub use banner::BannerUploadQueue;
pub use chat::{resolve_squad_targets, should_relay_outbound, InboundChatAction, OutboundChatKind};
pub use command::{format_command, rewrite_staff_chat, should_forward_command};
pub use config::BillingConfig;
pub use player::PlayerRecord;
pub use session::{AuthCompletion, BillingSession, GateDecision};
pub use shutdown::{ShutdownHandshake, ShutdownPhase};
pub use state::BillingState;
