//! Bidirectional sized-transfer engine shared by asset delivery, uploads,
//! and admin file commands, §4.6.

pub mod download;
pub mod upload;
pub mod workdir;

pub use download::{Download, DownloadError};
pub use upload::{UploadChunk, UploadIngress, UploadWorker};
pub use workdir::{PathEscapesRoot, WorkingDirectory};
