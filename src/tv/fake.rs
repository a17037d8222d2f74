//! In-memory TV for exercising publish and power logic.

use super::{ArtMode, ArtRemote, ContentItem, FileType, KEY_ART, KEY_POWER};
use crate::error::TvError;
use std::collections::VecDeque;
use std::time::Duration;

/// Each `*_errors` queue is drained one error per call before the
/// operation starts succeeding.
#[derive(Default)]
pub struct FakeTv {
    pub reachable: bool,
    /// Answers consumed before falling back to `reachable`.
    pub reachable_script: VecDeque<bool>,
    pub art_on: Option<bool>,
    pub content: Vec<ContentItem>,
    /// Uploads stay out of the content list for this many list calls.
    pub hidden_for: usize,
    pub next_id: u32,
    pub selected: Option<String>,
    pub calls: Vec<String>,

    pub art_mode_errors: VecDeque<TvError>,
    pub set_art_mode_errors: VecDeque<TvError>,
    pub upload_errors: VecDeque<TvError>,
    pub select_errors: VecDeque<TvError>,
    pub matte_errors: VecDeque<TvError>,
    pub key_errors: VecDeque<TvError>,
    pub list_errors: VecDeque<TvError>,

    pending: Vec<(usize, ContentItem)>,
}

impl FakeTv {
    pub fn online() -> Self {
        Self {
            reachable: true,
            art_on: Some(true),
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn with_content(mut self, ids: &[&str]) -> Self {
        self.content = ids.iter().map(|id| item(id)).collect();
        self
    }

    pub fn called(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    fn fail(queue: &mut VecDeque<TvError>) -> Result<(), TvError> {
        queue.pop_front().map_or(Ok(()), Err)
    }
}

pub fn item(id: &str) -> ContentItem {
    ContentItem {
        content_id: id.to_string(),
        category_id: Some("MY-C0002".into()),
    }
}

pub fn art_error(request: &str, code: &str) -> TvError {
    TvError::Art {
        request: request.into(),
        code: code.into(),
    }
}

impl ArtRemote for FakeTv {
    fn host(&self) -> &str {
        "fake-tv"
    }

    async fn is_reachable(&mut self, _timeout: Duration) -> bool {
        self.calls.push("reachable".into());
        self.reachable_script.pop_front().unwrap_or(self.reachable)
    }

    async fn art_mode(&mut self) -> Result<ArtMode, TvError> {
        self.calls.push("art_mode".into());
        Self::fail(&mut self.art_mode_errors)?;
        Ok(match self.art_on {
            Some(true) => ArtMode::On,
            Some(false) => ArtMode::Off,
            None => ArtMode::Unknown("missing".into()),
        })
    }

    async fn set_art_mode(&mut self, on: bool) -> Result<(), TvError> {
        self.calls.push(format!("set_art_mode:{}", if on { "on" } else { "off" }));
        Self::fail(&mut self.set_art_mode_errors)?;
        self.art_on = Some(on);
        Ok(())
    }

    async fn content_list(&mut self) -> Result<Vec<ContentItem>, TvError> {
        self.calls.push("content_list".into());
        Self::fail(&mut self.list_errors)?;

        for (remaining, item) in std::mem::take(&mut self.pending) {
            if remaining == 0 {
                self.content.insert(0, item);
            } else {
                self.pending.push((remaining - 1, item));
            }
        }
        Ok(self.content.clone())
    }

    async fn current_artwork(&mut self) -> Result<Option<ContentItem>, TvError> {
        self.calls.push("current_artwork".into());
        Ok(self.selected.as_deref().map(item))
    }

    async fn upload(&mut self, _data: &[u8], _file_type: FileType) -> Result<String, TvError> {
        self.calls.push("upload".into());
        Self::fail(&mut self.upload_errors)?;

        let id = format!("MY_F{:04}", self.next_id);
        self.next_id += 1;
        if self.hidden_for == 0 {
            self.content.insert(0, item(&id));
        } else {
            self.pending.push((self.hidden_for, item(&id)));
        }
        Ok(id)
    }

    async fn select_image(&mut self, content_id: &str) -> Result<(), TvError> {
        self.calls.push(format!("select:{content_id}"));
        Self::fail(&mut self.select_errors)?;
        self.selected = Some(content_id.to_string());
        Ok(())
    }

    async fn change_matte(&mut self, content_id: &str) -> Result<(), TvError> {
        self.calls.push(format!("matte:{content_id}"));
        Self::fail(&mut self.matte_errors)
    }

    async fn send_key(&mut self, key: &str) -> Result<(), TvError> {
        self.calls.push(format!("key:{key}"));
        Self::fail(&mut self.key_errors)?;
        match key {
            KEY_ART => self.art_on = Some(true),
            KEY_POWER => self.reachable = false,
            _ => {}
        }
        Ok(())
    }

    async fn hold_key(&mut self, key: &str, _duration: Duration) -> Result<(), TvError> {
        self.calls.push(format!("hold:{key}"));
        Self::fail(&mut self.key_errors)?;
        if key == KEY_POWER {
            self.reachable = false;
        }
        Ok(())
    }
}
