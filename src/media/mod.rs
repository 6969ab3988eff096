//! Media orchestration
//!
//! The four steps behind the web page:
//! - URL normalization (`url`)
//! - Flat playlist listing with field backfill (`listing`)
//! - Batch audio download into a per-job workspace (`fetcher`)
//! - Zipping and publishing the workspace (`archive`)
//!
//! plus the retention sweep for published archives (`retention`).

pub mod archive;
pub mod fetcher;
pub mod listing;
pub mod retention;
pub mod url;

pub use archive::{publish_archive, zip_folder};
pub use fetcher::fetch_audio;
pub use listing::{list_videos, VideoDescriptor};
pub use retention::sweep_download_dir;
pub use self::url::normalize_url;
