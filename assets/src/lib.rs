//! Asset Streamer, §4.5: the per-arena map/LVZ catalog, the emergency
//! fallback map, the visible-asset list served to clients, and the news
//! watcher.

pub mod catalog;
pub mod emergency;
pub mod list;
pub mod news;

pub use catalog::{build_asset, MapAsset, WARN_COMPRESSED_SIZE};
pub use emergency::{emergency_map_asset, EMERGENCY_MAP_FILENAME};
pub use list::AssetList;
pub use news::{read_with_retry, reload_if_changed, NewsBlob, RELOAD_MAX_ATTEMPTS, RELOAD_RETRY_DELAY};
