//! Getting an image onto the TV and making it the displayed art.
//!
//! The sequence is: wait for the TV, upload, wait for the new content to
//! show up, then select it. Frame TVs coming out of standby drop requests
//! and answer slowly, so every step retries on its own schedule, and the
//! final selection falls back through several strategies before giving
//! up.
//!
//! ## Rust concepts
//! - Generic struct over the `ArtRemote` trait (fake in tests, real TV
//!   in production)
//! - Async closures passed to [`crate::retry::run`] that borrow `self`
//! - `tokio::time` sleeps, which paused-clock tests skip through

use crate::error::{PublishError, TvError};
use crate::retry::{self, RetryPolicy};
use crate::tv::{ArtMode, ArtRemote, ContentItem, FileType, KEY_ART};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{Instant, sleep};

pub const REACHABLE_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_secs(5);
const POLL_TIMEOUT: Duration = Duration::from_secs(60);
/// Conservative upload speed used for time estimates.
const UPLOAD_BYTES_PER_SEC: f64 = 2.0 * 1024.0 * 1024.0;

// ── Content ID store ─────────────────────────────────────────────────

/// The last uploaded content ID, kept on disk as a fallback for
/// selection.
#[derive(Clone, Debug)]
pub struct ContentIdStore {
    path: PathBuf,
}

impl ContentIdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Could not read stored content ID: {}", e);
                None
            }
        }
    }

    pub fn save(&self, content_id: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content_id)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Check the file exists and has a type the TV takes, then read it.
pub async fn read_image(path: &Path) -> Result<(Vec<u8>, FileType), PublishError> {
    if !path.is_file() {
        return Err(PublishError::ImageNotFound(path.to_path_buf()));
    }
    let file_type = FileType::from_path(path).ok_or_else(|| {
        PublishError::UnsupportedType(
            path.extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })?;
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| PublishError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok((data, file_type))
}

fn expected_upload_secs(bytes: usize) -> f64 {
    bytes as f64 / UPLOAD_BYTES_PER_SEC
}

/// Time the TV gets to ingest an upload before anything else is asked
/// of it.
pub fn processing_delay(expected_upload_secs: f64) -> Duration {
    Duration::from_secs(((expected_upload_secs / 3.0) as u64).clamp(10, 15))
}

/// The image to fall back on: ours if the TV lists it, else the stored
/// one, else the newest.
pub fn choose_target(content: &[ContentItem], ours: &str, stored: Option<&str>) -> Option<String> {
    let listed = |id: &str| content.iter().any(|item| item.content_id == id);

    if listed(ours) {
        tracing::info!("Found our content ID in the list: {}", ours);
        return Some(ours.to_string());
    }
    if let Some(stored) = stored.filter(|s| listed(s)) {
        tracing::info!("Found the stored content ID in the list: {}", stored);
        return Some(stored.to_string());
    }
    let newest = content.first()?.content_id.clone();
    tracing::info!("Our content IDs are not in the list, using most recent: {}", newest);
    Some(newest)
}

// ── Publisher ────────────────────────────────────────────────────────

pub struct Publisher<R> {
    tv: R,
    ids: ContentIdStore,
}

impl<R: ArtRemote> Publisher<R> {
    pub fn new(tv: R, ids: ContentIdStore) -> Self {
        Self { tv, ids }
    }

    pub fn tv(&mut self) -> &mut R {
        &mut self.tv
    }

    pub fn into_inner(self) -> R {
        self.tv
    }

    /// Upload `path`, wait for the TV to list it and, if `select`, make
    /// it the displayed art. Returns the content ID.
    pub async fn publish(&mut self, path: &Path, select: bool) -> Result<String, PublishError> {
        self.ensure_available().await?;
        let content_id = self.upload(path).await?;
        self.wait_for_content(&content_id).await;
        if select {
            self.set_active_art(&content_id).await?;
        }
        Ok(content_id)
    }

    pub async fn ensure_available(&mut self) -> Result<(), PublishError> {
        tracing::info!("Connecting to Samsung TV at {}...", self.tv.host());
        retry::run(
            &RetryPolicy::CONNECT,
            "TV connection",
            async || {
                if self.tv.is_reachable(REACHABLE_TIMEOUT).await {
                    Ok(())
                } else {
                    Err(TvError::Unreachable(self.tv.host().to_string()))
                }
            },
            TvError::is_retryable,
        )
        .await?;
        tracing::info!("TV is reachable");
        Ok(())
    }

    pub async fn upload(&mut self, path: &Path) -> Result<String, PublishError> {
        let (data, file_type) = read_image(path).await?;
        let expected = expected_upload_secs(data.len());
        tracing::info!(
            "Uploading {} ({:.2} MB, expected upload time approximately {:.1} seconds)",
            path.display(),
            data.len() as f64 / (1024.0 * 1024.0),
            expected
        );

        let content_id = retry::run(
            &RetryPolicy::UPLOAD,
            "Upload",
            async || {
                let result = self.tv.upload(&data, file_type).await;
                if let Err(e) = &result {
                    if e.is_timeout() {
                        self.log_recent_content().await;
                    }
                }
                result
            },
            TvError::is_retryable,
        )
        .await?;
        tracing::info!("Uploaded image without matte, content ID: {}", content_id);

        let delay = processing_delay(expected);
        tracing::info!("Waiting {} seconds for TV to process the image...", delay.as_secs());
        sleep(delay).await;

        match self.ids.save(&content_id) {
            Ok(()) => tracing::info!(
                "Saved content ID '{}' to {}",
                content_id,
                self.ids.path().display()
            ),
            Err(e) => tracing::warn!("Could not save content ID to file: {}", e),
        }
        Ok(content_id)
    }

    /// After a timed-out upload, show what the TV does have. The image
    /// may have landed anyway.
    async fn log_recent_content(&mut self) {
        tracing::info!("Timeout during upload. Checking whether the upload completed...");
        sleep(POLL_INTERVAL).await;
        match self.tv.content_list().await {
            Ok(items) => {
                let ids: Vec<&str> = items.iter().take(5).map(|i| i.content_id.as_str()).collect();
                tracing::info!("Found content IDs: {:?}", ids);
                tracing::warn!(
                    "Upload may have been interrupted by the timeout. Consider a smaller image."
                );
            }
            Err(e) => tracing::debug!("Content list check failed: {}", e),
        }
    }

    /// Poll the content list until `content_id` shows up. Returns whether
    /// it did; not finding it is not fatal.
    pub async fn wait_for_content(&mut self, content_id: &str) -> bool {
        let deadline = Instant::now() + POLL_TIMEOUT;
        loop {
            match self.tv.content_list().await {
                Ok(items) if items.iter().any(|i| i.content_id == content_id) => {
                    tracing::info!("Content {} is available on the TV", content_id);
                    return true;
                }
                Ok(_) => tracing::debug!("Content {} not listed yet", content_id),
                Err(e) => tracing::debug!("Content list failed while waiting: {}", e),
            }

            if Instant::now() + POLL_INTERVAL > deadline {
                tracing::warn!(
                    "Content {} did not appear within {}s; continuing",
                    content_id,
                    POLL_TIMEOUT.as_secs()
                );
                return false;
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Try the API, then the art key twice. Returns whether any of them
    /// went through.
    async fn switch_to_art_mode(&mut self) -> bool {
        match self.tv.art_mode().await {
            Ok(ArtMode::On) => {
                tracing::info!("TV is already in Art Mode, skipping mode switch");
                return true;
            }
            Ok(mode) => tracing::info!("Art mode is {}, switching now", mode),
            Err(e) => tracing::warn!("Could not check current Art Mode status: {}", e),
        }

        match self.tv.set_art_mode(true).await {
            Ok(()) => {
                sleep(Duration::from_secs(10)).await;
                tracing::info!("Set TV to Art Mode");
                return true;
            }
            Err(e) if e.is_already_in_state() => {
                tracing::info!("TV reports it is already in Art Mode");
                return true;
            }
            Err(e) => tracing::warn!("Could not set Art Mode via API: {}", e),
        }

        tracing::info!("Trying to set Art Mode with {}...", KEY_ART);
        match self.tv.send_key(KEY_ART).await {
            Ok(()) => {
                sleep(Duration::from_secs(12)).await;
                tracing::info!("Sent {} to TV", KEY_ART);
                return true;
            }
            Err(e) => tracing::warn!("Could not send {}: {}", KEY_ART, e),
        }

        tracing::info!("Final attempt to set Art Mode with {}...", KEY_ART);
        sleep(Duration::from_secs(3)).await;
        match self.tv.send_key(KEY_ART).await {
            Ok(()) => {
                sleep(Duration::from_secs(15)).await;
                tracing::info!("Sent second {} to TV", KEY_ART);
                true
            }
            Err(e) => {
                tracing::warn!("Could not send second {}: {}", KEY_ART, e);
                false
            }
        }
    }

    async fn select_once(&mut self, content_id: &str) -> Result<(), TvError> {
        match self.tv.art_mode().await {
            Ok(ArtMode::On) => {}
            Ok(mode) => {
                tracing::info!("Art mode is {}, switching before selecting...", mode);
                if let Err(e) = self.tv.set_art_mode(true).await {
                    if !e.is_already_in_state() {
                        tracing::warn!("Could not switch to Art Mode: {}", e);
                    }
                }
                sleep(Duration::from_secs(5)).await;
            }
            Err(e) => tracing::warn!("Could not check art mode status: {}", e),
        }

        self.tv.select_image(content_id).await?;
        sleep(Duration::from_secs(3)).await;
        tracing::info!("Selected image {} as active", content_id);
        Ok(())
    }

    async fn select_with_retry(&mut self, content_id: &str) -> Result<(), TvError> {
        tracing::info!("Selecting image {} (with retries)", content_id);
        retry::run(
            &RetryPolicy::SELECT,
            "Select image",
            async || self.select_once(content_id).await,
            TvError::is_retryable,
        )
        .await
    }

    async fn remove_matte(&mut self, content_id: &str) {
        match self.tv.change_matte(content_id).await {
            Ok(()) => {
                tracing::info!("Removed matte for content ID {}", content_id);
                sleep(Duration::from_secs(5)).await;
            }
            Err(e) => tracing::warn!("Could not remove matte for {}: {}", content_id, e),
        }
    }

    async fn log_current_artwork(&mut self) {
        match self.tv.current_artwork().await {
            Ok(Some(item)) => tracing::info!("Current displayed image: {}", item.content_id),
            Ok(None) => tracing::info!("TV did not report the current image"),
            Err(e) => tracing::debug!("Could not verify current image: {}", e),
        }
    }

    /// Make `content_id` the displayed art, falling back through
    /// progressively blunter strategies.
    pub async fn set_active_art(&mut self, content_id: &str) -> Result<(), PublishError> {
        tracing::info!("Setting content ID {} as active art", content_id);

        let stored = self.ids.load();
        if let Some(stored) = stored.as_deref().filter(|s| *s != content_id) {
            tracing::warn!(
                "Content ID mismatch: stored {}, requested {}. Keeping the stored one as fallback",
                stored,
                content_id
            );
        }

        if !self.tv.is_reachable(REACHABLE_TIMEOUT).await {
            tracing::warn!("TV appears to be unreachable, reconnecting...");
            self.ensure_available().await?;
        }

        if !self.switch_to_art_mode().await {
            tracing::warn!("Could not confirm TV is in Art Mode, proceeding anyway");
        }

        let mut content = match self.tv.content_list().await {
            Ok(items) => {
                tracing::info!("Found {} items in the content list", items.len());
                if items.iter().any(|i| i.content_id == content_id) {
                    tracing::info!("Confirmed {} is in the content list", content_id);
                } else {
                    tracing::warn!("Content ID {} not found in content list", content_id);
                }
                items
            }
            Err(e) => {
                tracing::warn!("Could not get content list for verification: {}", e);
                Vec::new()
            }
        };

        self.remove_matte(content_id).await;
        tracing::info!("Waiting 15 seconds before setting active art...");
        sleep(Duration::from_secs(15)).await;

        tracing::info!("Attempt 1: selecting {} directly", content_id);
        match self.select_with_retry(content_id).await {
            Ok(()) => {
                self.log_current_artwork().await;
                return Ok(());
            }
            Err(e) => tracing::warn!("Primary method to set image failed: {}", e),
        }

        tracing::info!("Attempt 2: looking for the image in the content list...");
        if content.is_empty() {
            content = self.tv.content_list().await.unwrap_or_else(|e| {
                tracing::warn!("Could not get content list: {}", e);
                Vec::new()
            });
        }
        let listed: Vec<&str> = content.iter().take(10).map(|i| i.content_id.as_str()).collect();
        tracing::info!("Available content IDs (up to 10): {}", listed.join(", "));
        match choose_target(&content, content_id, stored.as_deref()) {
            Some(target) => {
                self.remove_matte(&target).await;
                match self.select_with_retry(&target).await {
                    Ok(()) => return Ok(()),
                    Err(e) => tracing::warn!("Could not set {} as active: {}", target, e),
                }
            }
            None => tracing::error!("No content available in the list"),
        }

        if let Some(stored) = stored.as_deref().filter(|s| *s != content_id) {
            tracing::info!("Attempt 3: final try with stored content ID {}", stored);
            match self.tv.select_image(stored).await {
                Ok(()) => {
                    tracing::info!("Set stored image {} as active", stored);
                    return Ok(());
                }
                Err(e) => tracing::warn!("Stored ID fallback failed: {}", e),
            }
        }

        tracing::info!("Final attempt: sending select commands with delays...");
        let mut any_selected = false;
        for attempt in 1..=3 {
            tracing::info!("Select attempt {}/3 for ID {}", attempt, content_id);
            match self.tv.select_image(content_id).await {
                Ok(()) => {
                    any_selected = true;
                    sleep(Duration::from_secs(10)).await;
                }
                Err(e) => {
                    tracing::warn!("Select attempt {} failed: {}", attempt, e);
                    sleep(Duration::from_secs(5)).await;
                }
            }
        }
        if any_selected {
            tracing::info!("Image {} selected on a final attempt", content_id);
            return Ok(());
        }

        tracing::error!("All methods to set active art failed");
        Err(PublishError::SelectFailed(content_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tv::fake::{FakeTv, art_error, item};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        image: PathBuf,
        store: ContentIdStore,
    }

    fn fixture(name: &str) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let image = tmp.path().join(name);
        std::fs::write(&image, vec![0u8; 4096]).unwrap();
        let store = ContentIdStore::new(tmp.path().join("state/last_uploaded_id.txt"));
        Fixture {
            _tmp: tmp,
            image,
            store,
        }
    }

    fn errors(n: usize) -> std::collections::VecDeque<TvError> {
        (0..n).map(|_| art_error("select_image", "-1")).collect()
    }

    #[rstest]
    #[case(0.0, 10)]
    #[case(36.0, 12)]
    #[case(300.0, 15)]
    fn processing_delay_is_clamped(#[case] expected: f64, #[case] secs: u64) {
        assert_eq!(processing_delay(expected), Duration::from_secs(secs));
    }

    #[test]
    fn store_round_trip() {
        let f = fixture("a.png");
        assert_eq!(f.store.load(), None);
        f.store.save("MY_F0042").unwrap();
        assert_eq!(f.store.load().as_deref(), Some("MY_F0042"));
    }

    #[rstest]
    #[case(&["MY_F3", "MY_F2", "MY_F1"], "MY_F2", Some("MY_F1"), Some("MY_F2"))]
    #[case(&["MY_F3", "MY_F1"], "MY_F2", Some("MY_F1"), Some("MY_F1"))]
    #[case(&["MY_F3", "MY_F1"], "MY_F2", Some("MY_F9"), Some("MY_F3"))]
    #[case(&[], "MY_F2", None, None)]
    fn target_choice(
        #[case] listed: &[&str],
        #[case] ours: &str,
        #[case] stored: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let content: Vec<ContentItem> = listed.iter().map(|id| item(id)).collect();
        assert_eq!(choose_target(&content, ours, stored).as_deref(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_and_selects() {
        let f = fixture("art.png");
        let mut publisher = Publisher::new(FakeTv::online().with_content(&["MY_F0100"]), f.store.clone());

        let id = publisher.publish(&f.image, true).await.unwrap();

        assert_eq!(id, "MY_F0001");
        assert_eq!(f.store.load().as_deref(), Some("MY_F0001"));
        let tv = publisher.into_inner();
        assert_eq!(tv.selected.as_deref(), Some("MY_F0001"));
        assert_eq!(tv.called("upload"), 1);
        assert_eq!(tv.called("matte:MY_F0001"), 1);
        assert_eq!(tv.called("set_art_mode:on"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn skip_select_leaves_display_alone() {
        let f = fixture("art.jpg");
        let mut publisher = Publisher::new(FakeTv::online(), f.store.clone());
        publisher.publish(&f.image, false).await.unwrap();
        assert_eq!(publisher.into_inner().selected, None);
    }

    #[tokio::test]
    async fn rejects_unsupported_type_before_touching_tv() {
        let f = fixture("art.webp");
        let mut publisher = Publisher::new(FakeTv::online(), f.store.clone());

        let err = publisher.upload(&f.image).await.unwrap_err();
        assert!(matches!(err, PublishError::UnsupportedType(ext) if ext == "webp"));
        assert!(publisher.into_inner().calls.is_empty());
    }

    #[tokio::test]
    async fn missing_image_is_reported() {
        let f = fixture("art.png");
        let mut publisher = Publisher::new(FakeTv::online(), f.store.clone());
        let missing = f.image.with_file_name("nope.png");
        assert!(matches!(
            publisher.upload(&missing).await,
            Err(PublishError::ImageNotFound(p)) if p == missing
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_tv_to_come_up() {
        let f = fixture("art.png");
        let mut tv = FakeTv::online();
        tv.reachable_script = [false, false].into();
        let mut publisher = Publisher::new(tv, f.store.clone());

        publisher.ensure_available().await.unwrap();
        assert_eq!(publisher.into_inner().called("reachable"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_when_tv_stays_down() {
        let f = fixture("art.png");
        let mut tv = FakeTv::online();
        tv.reachable = false;
        let mut publisher = Publisher::new(tv, f.store.clone());

        let err = publisher.ensure_available().await.unwrap_err();
        assert!(matches!(err, PublishError::Tv(TvError::Unreachable(_))));
        assert_eq!(publisher.into_inner().called("reachable"), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn upload_retries_transport_failures() {
        let f = fixture("art.png");
        let mut tv = FakeTv::online();
        tv.upload_errors = [TvError::Closed, TvError::Timeout(Duration::from_secs(300))].into();
        let mut publisher = Publisher::new(tv, f.store.clone());

        let id = publisher.upload(&f.image).await.unwrap();
        assert_eq!(id, "MY_F0001");
        let tv = publisher.into_inner();
        assert_eq!(tv.called("upload"), 3);
        // the timeout triggers a look at the content list
        assert_eq!(tv.called("content_list"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn upload_does_not_retry_authorization_failure() {
        let f = fixture("art.png");
        let mut tv = FakeTv::online();
        tv.upload_errors = [TvError::Unauthorized("ms.channel.unauthorized".into())].into();
        let mut publisher = Publisher::new(tv, f.store.clone());

        assert!(publisher.upload(&f.image).await.is_err());
        assert_eq!(publisher.into_inner().called("upload"), 1);
        assert_eq!(f.store.load(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_content_is_listed() {
        let f = fixture("art.png");
        let mut tv = FakeTv::online();
        tv.hidden_for = 2;
        let mut publisher = Publisher::new(tv, f.store.clone());

        let id = publisher.upload(&f.image).await.unwrap();
        assert!(publisher.wait_for_content(&id).await);
        assert_eq!(publisher.into_inner().called("content_list"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_content_is_only_a_warning() {
        let f = fixture("art.png");
        let mut publisher = Publisher::new(FakeTv::online(), f.store.clone());

        let started = Instant::now();
        assert!(!publisher.wait_for_content("MY_F9999").await);
        assert!(started.elapsed() >= POLL_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn switches_art_mode_on_before_selecting() {
        let f = fixture("art.png");
        let mut tv = FakeTv::online().with_content(&["MY_F0007"]);
        tv.art_on = Some(false);
        let mut publisher = Publisher::new(tv, f.store.clone());

        publisher.set_active_art("MY_F0007").await.unwrap();
        let tv = publisher.into_inner();
        assert_eq!(tv.called("set_art_mode:on"), 1);
        assert_eq!(tv.selected.as_deref(), Some("MY_F0007"));
    }

    #[tokio::test(start_paused = true)]
    async fn falls_back_to_art_key() {
        let f = fixture("art.png");
        let mut tv = FakeTv::online().with_content(&["MY_F0007"]);
        tv.art_on = Some(false);
        tv.set_art_mode_errors = [art_error("set_artmode_status", "-1")].into();
        let mut publisher = Publisher::new(tv, f.store.clone());

        publisher.set_active_art("MY_F0007").await.unwrap();
        assert_eq!(publisher.into_inner().called("key:KEY_ART"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stored_id_is_the_third_resort() {
        let f = fixture("art.png");
        f.store.save("MY_F0005").unwrap();
        let mut tv = FakeTv::online().with_content(&["MY_F0007", "MY_F0005"]);
        // attempts 1 and 2 each retry the select policy in full
        tv.select_errors = errors(30);
        let mut publisher = Publisher::new(tv, f.store.clone());

        publisher.set_active_art("MY_F0007").await.unwrap();
        let tv = publisher.into_inner();
        assert_eq!(tv.called("select:MY_F0007"), 30);
        assert_eq!(tv.selected.as_deref(), Some("MY_F0005"));
    }

    #[tokio::test(start_paused = true)]
    async fn any_final_select_counts() {
        let f = fixture("art.png");
        let mut tv = FakeTv::online().with_content(&["MY_F0007"]);
        tv.select_errors = errors(32);
        let mut publisher = Publisher::new(tv, f.store.clone());

        publisher.set_active_art("MY_F0007").await.unwrap();
        let tv = publisher.into_inner();
        assert_eq!(tv.called("select:MY_F0007"), 33);
        assert_eq!(tv.selected.as_deref(), Some("MY_F0007"));
    }

    #[tokio::test(start_paused = true)]
    async fn fails_when_every_strategy_fails() {
        let f = fixture("art.png");
        let mut tv = FakeTv::online().with_content(&["MY_F0007"]);
        tv.select_errors = errors(33);
        let mut publisher = Publisher::new(tv, f.store.clone());

        let err = publisher.set_active_art("MY_F0007").await.unwrap_err();
        assert_eq!(err.to_string(), "all methods to set active art failed for MY_F0007");
    }
}
