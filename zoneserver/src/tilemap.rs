//! Placeholder map-tile provider standing in for the external tileset
//! collaborator (the real map's tile data is outside this crate's scope).
//! Treats every tile as empty and non-goal, matching the `OpenMap` stub
//! the brick engine's own tests use.

pub struct OpenMap;

impl balls::TileMap for OpenMap {
    fn nearest_empty_tile(&self, x: i16, y: i16) -> Option<(i16, i16)> {
        Some((x, y))
    }

    fn is_goal_tile(&self, _x: i16, _y: i16) -> bool {
        false
    }
}

impl bricks::TileMap for OpenMap {
    fn is_empty(&self, _x: i16, _y: i16) -> bool {
        true
    }
}
