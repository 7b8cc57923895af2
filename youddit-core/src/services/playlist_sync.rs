// File: youddit-core/src/services/playlist_sync.rs

use tracing::{info, warn};

use crate::Error;
use crate::models::VideoId;
use crate::platforms::{PlaylistStore, SortOrder, SubmissionSource};

#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub playlist_id: String,
    pub subreddit: String,
    pub order: SortOrder,
    pub max_videos: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub existing: usize,
    pub candidates: usize,
    pub to_add: usize,
    pub added: Vec<VideoId>,
    pub failed: Vec<VideoId>,
}

/// Copies YouTube links posted to a subreddit into a playlist.
pub struct PlaylistSyncService<S, P> {
    source: S,
    playlist: P,
}

impl<S: SubmissionSource, P: PlaylistStore> PlaylistSyncService<S, P> {
    pub fn new(source: S, playlist: P) -> Self {
        Self { source, playlist }
    }

    /// Inserts every candidate not already in the playlist.
    ///
    /// A failed insert is logged and skipped, except `QuotaExceeded`, which ends the
    /// run: every following insert would fail the same way.
    pub async fn sync(&self, request: &SyncRequest) -> Result<SyncReport, Error> {
        let current = self.playlist.list_video_ids(&request.playlist_id).await?;
        info!("Found {} items in the Youtube playlist", current.len());

        let candidates = self
            .source
            .fetch_video_ids(&request.subreddit, request.order, request.max_videos)
            .await?;
        info!("Found {} candidate submissions", candidates.len());

        let to_add: Vec<VideoId> = candidates
            .iter()
            .filter(|id| !current.contains(*id))
            .cloned()
            .collect();
        info!("Found {} videos to add", to_add.len());

        let mut report = SyncReport {
            existing: current.len(),
            candidates: candidates.len(),
            to_add: to_add.len(),
            ..Default::default()
        };

        for video in to_add {
            info!("Adding video '{}' to playlist", video);
            match self.playlist.insert_video(&request.playlist_id, &video).await {
                Ok(()) => report.added.push(video),
                Err(e @ Error::QuotaExceeded(_)) => {
                    warn!("Failed to add '{}' to playlist: {}", video, e);
                    info!("Hit a quota limit, so that's all we can do for today");
                    return Err(e);
                }
                Err(e) => {
                    warn!("Failed to add '{}' to playlist: {}", video, e);
                    report.failed.push(video);
                }
            }
        }

        info!("Finished adding videos");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use mockall::predicate::*;
    use mockall::Sequence;
    use crate::models::Platform;
    use crate::platforms::{MockPlaylistStore, MockSubmissionSource};

    fn ids(list: &[&str]) -> Vec<VideoId> {
        list.iter().map(|s| VideoId::from(*s)).collect()
    }

    fn request() -> SyncRequest {
        SyncRequest {
            playlist_id: "PL1".into(),
            subreddit: "videos".into(),
            order: SortOrder::Top,
            max_videos: 5,
        }
    }

    #[tokio::test]
    async fn inserts_only_missing_videos_in_listing_order() -> Result<(), Error> {
        let mut source = MockSubmissionSource::new();
        source
            .expect_fetch_video_ids()
            .with(eq("videos"), eq(SortOrder::Top), eq(5))
            .times(1)
            .returning(|_, _, _| Ok(ids(&["c", "a", "b"])));

        let mut playlist = MockPlaylistStore::new();
        playlist
            .expect_list_video_ids()
            .with(eq("PL1"))
            .times(1)
            .returning(|_| Ok(ids(&["a", "z"]).into_iter().collect::<HashSet<_>>()));

        let mut seq = Sequence::new();
        for expected in ["c", "b"] {
            playlist
                .expect_insert_video()
                .withf(move |pl, v| pl == "PL1" && v.as_str() == expected)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
        }

        let report = PlaylistSyncService::new(source, playlist).sync(&request()).await?;
        assert_eq!(report.existing, 2);
        assert_eq!(report.candidates, 3);
        assert_eq!(report.to_add, 2);
        assert_eq!(report.added, ids(&["c", "b"]));
        assert!(report.failed.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn nothing_to_add_makes_no_inserts() -> Result<(), Error> {
        let mut source = MockSubmissionSource::new();
        source.expect_fetch_video_ids().returning(|_, _, _| Ok(ids(&["a"])));

        let mut playlist = MockPlaylistStore::new();
        playlist
            .expect_list_video_ids()
            .returning(|_| Ok(ids(&["a"]).into_iter().collect()));
        playlist.expect_insert_video().never();

        let report = PlaylistSyncService::new(source, playlist).sync(&request()).await?;
        assert_eq!(report.to_add, 0);
        assert!(report.added.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn ordinary_insert_failure_is_skipped() -> Result<(), Error> {
        let mut source = MockSubmissionSource::new();
        source.expect_fetch_video_ids().returning(|_, _, _| Ok(ids(&["gone", "ok"])));

        let mut playlist = MockPlaylistStore::new();
        playlist.expect_list_video_ids().returning(|_| Ok(HashSet::new()));
        playlist
            .expect_insert_video()
            .withf(|_, v| v.as_str() == "gone")
            .returning(|_, _| {
                Err(Error::Api {
                    platform: Platform::YouTube,
                    status: 404,
                    reason: Some("videoNotFound".into()),
                    message: "Video not found.".into(),
                })
            });
        playlist
            .expect_insert_video()
            .withf(|_, v| v.as_str() == "ok")
            .returning(|_, _| Ok(()));

        let report = PlaylistSyncService::new(source, playlist).sync(&request()).await?;
        assert_eq!(report.added, ids(&["ok"]));
        assert_eq!(report.failed, ids(&["gone"]));
        Ok(())
    }

    #[tokio::test]
    async fn quota_exhaustion_stops_the_run() {
        let mut source = MockSubmissionSource::new();
        source.expect_fetch_video_ids().returning(|_, _, _| Ok(ids(&["a", "b", "c"])));

        let mut playlist = MockPlaylistStore::new();
        playlist.expect_list_video_ids().returning(|_| Ok(HashSet::new()));
        playlist
            .expect_insert_video()
            .times(1)
            .returning(|_, _| Err(Error::QuotaExceeded(Platform::YouTube)));

        let result = PlaylistSyncService::new(source, playlist).sync(&request()).await;
        assert!(matches!(result, Err(Error::QuotaExceeded(Platform::YouTube))));
    }

    #[tokio::test]
    async fn playlist_listing_failure_aborts_before_reddit() {
        let mut source = MockSubmissionSource::new();
        source.expect_fetch_video_ids().never();

        let mut playlist = MockPlaylistStore::new();
        playlist
            .expect_list_video_ids()
            .returning(|_| Err(Error::Platform("boom".into())));

        let result = PlaylistSyncService::new(source, playlist).sync(&request()).await;
        assert!(matches!(result, Err(Error::Platform(_))));
    }
}
