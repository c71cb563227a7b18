//! Chat relay, §4.7: which outbound chat events get forwarded to the
//! biller, and how inbound biller chat packets fan out to players.

use arena::player::PlayerId;

/// The kinds of outbound chat the local server recognizes; only these two
/// get forwarded to the biller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundChatKind {
    PublicChannel,
    RemotePrivateToUnknownPlayer,
    /// Anything else (team chat, freq chat, local private to a known
    /// local player) stays local.
    Local,
}

pub fn should_relay_outbound(kind: OutboundChatKind) -> bool {
    matches!(kind, OutboundChatKind::PublicChannel | OutboundChatKind::RemotePrivateToUnknownPlayer)
}

/// What an inbound biller chat packet should produce locally, §4.7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundChatAction {
    SendArenaMessage { text: String },
    RemotePrivate { to: PlayerId, text: String },
    SquadChannel { squad: String, text: String, targets: Vec<PlayerId> },
}

/// Resolves a squad-targeted channel message into the set of currently
/// connected players carrying that squad tag.
pub fn resolve_squad_targets(squad: &str, players: &[(PlayerId, &str)]) -> Vec<PlayerId> {
    players
        .iter()
        .filter(|(_, player_squad)| player_squad.eq_ignore_ascii_case(squad))
        .map(|(id, _)| *id)
        .collect()
}
