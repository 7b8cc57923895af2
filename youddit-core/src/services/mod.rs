pub mod playlist_sync;

pub use playlist_sync::{PlaylistSyncService, SyncReport, SyncRequest};
