//! Arena runtime: player/freq data model, the arena lock, the capability
//! registry, advisor veto chains, the config-authorization advisor, and
//! greet/idle bookkeeping. Every other zone-server crate (`teams`,
//! `balls`, `bricks`, `security`, `assets`, `billing`) depends on this one
//! for `Player`, `Arena`, `ExtraData`, and the capability traits; none of
//! those crates are depended on here, so there are no cycles.

pub mod advisor;
pub mod arena;
pub mod cfgauth;
pub mod extradata;
pub mod freq;
pub mod messages;
pub mod player;
pub mod registry;

pub use advisor::{run_veto_chain, Authenticator, BallsAdvisor, Balancer, BillingFallback, BrickModeProvider, FreqEnforcer, Verdict};
pub use arena::{Arena, ArenaState};
pub use cfgauth::ConfigAuthAdvisor;
pub use extradata::{ExtraData, ExtraDataKey};
pub use freq::{Freq, FreqFlags};
pub use player::{ClientKind, FreqNum, NetworkFlags, Player, PlayerId, Ship};
pub use registry::CapabilityRegistry;
