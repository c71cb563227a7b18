//! The per-arena asset list and the two client-facing queries: the
//! filename announce and `MapRequest`, §4.5.

use crate::catalog::MapAsset;
use wire::assets::MapFileEntry;

#[derive(Default)]
pub struct AssetList {
    assets: Vec<MapAsset>,
}

impl AssetList {
    pub fn new(assets: Vec<MapAsset>) -> Self {
        AssetList { assets }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Assets visible to a client: non-optional ones, plus optional ones
    /// when the client flagged "want all LVZ" (§4.5).
    pub fn visible(&self, want_all_lvz: bool) -> impl Iterator<Item = &MapAsset> {
        self.assets.iter().filter(move |a| want_all_lvz || !a.is_optional)
    }

    /// §4.5 `GetMapFilename list`: one entry per visible asset.
    pub fn filename_entries(&self, want_all_lvz: bool) -> Vec<MapFileEntry> {
        self.visible(want_all_lvz)
            .map(|a| MapFileEntry { filename: a.filename.clone(), crc32: a.crc32, size: a.payload_len() as u32 })
            .collect()
    }

    /// §4.5 `MapRequest(idx)`: `idx` selects the `idx`-th visible asset.
    pub fn visible_by_index(&self, idx: usize, want_all_lvz: bool) -> Option<&MapAsset> {
        self.visible(want_all_lvz).nth(idx)
    }
}
