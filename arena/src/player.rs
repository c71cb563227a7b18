//! Player identity and lifecycle, §3.

use crate::extradata::ExtraData;

pub type PlayerId = u32;
pub type FreqNum = u16;

/// Ship slots 1..8 plus the non-participating spectator ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ship {
    Numbered(u8),
    Spec,
}

impl Ship {
    pub const MIN_INDEX: u8 = 1;
    pub const MAX_INDEX: u8 = 8;

    pub fn from_index(index: u8) -> Option<Ship> {
        if (Self::MIN_INDEX..=Self::MAX_INDEX).contains(&index) {
            Some(Ship::Numbered(index))
        } else {
            None
        }
    }

    pub fn is_spec(&self) -> bool {
        matches!(self, Ship::Spec)
    }

    pub fn index(&self) -> Option<u8> {
        match self {
            Ship::Numbered(i) => Some(*i),
            Ship::Spec => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    GameBinaryA,
    GameBinaryB,
    ChatText,
    Fake,
}

impl ClientKind {
    /// Continuum ("game binary B") always wants the map filename list;
    /// VIE ("game binary A") only wants it when it raises the "want all
    /// LVZ" flag (§4.5).
    pub fn always_wants_filename_list(&self) -> bool {
        matches!(self, ClientKind::GameBinaryB)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkFlags {
    pub want_all_lvz: bool,
    pub suppress_security: bool,
    pub bypass_security: bool,
}

impl Default for NetworkFlags {
    fn default() -> Self {
        NetworkFlags {
            want_all_lvz: false,
            suppress_security: false,
            bypass_security: false,
        }
    }
}

pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub squad: String,
    pub client_kind: ClientKind,
    pub ship: Ship,
    pub freq: FreqNum,
    pub flags: NetworkFlags,
    pub extra: ExtraData,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, client_kind: ClientKind, spec_freq: FreqNum) -> Self {
        Player {
            id,
            name: name.into(),
            squad: String::new(),
            client_kind,
            ship: Ship::Spec,
            freq: spec_freq,
            flags: NetworkFlags::default(),
            extra: ExtraData::new(),
        }
    }

    pub fn is_spectating(&self) -> bool {
        self.ship.is_spec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_from_index_rejects_out_of_range() {
        assert!(Ship::from_index(0).is_none());
        assert!(Ship::from_index(9).is_none());
        assert_eq!(Ship::from_index(1), Some(Ship::Numbered(1)));
        assert_eq!(Ship::from_index(8), Some(Ship::Numbered(8)));
    }

    #[test]
    fn new_player_starts_spectating_on_spec_freq() {
        let player = Player::new(1, "neon", ClientKind::GameBinaryB, 9999);
        assert!(player.is_spectating());
        assert_eq!(player.freq, 9999);
    }
}
