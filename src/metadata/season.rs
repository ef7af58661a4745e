use std::collections::HashMap;
use std::sync::RwLock;

use super::recover;

/// One season of a show: episode number (string key) -> title.
#[derive(Debug)]
pub struct Season {
    number: String,
    episodes: RwLock<HashMap<String, String>>,
}

impl Season {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            episodes: RwLock::new(HashMap::new()),
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// Title of `episode`, or `None` if it was never set.
    pub fn get_title(&self, episode: &str) -> Option<String> {
        recover(self.episodes.read()).get(episode).cloned()
    }

    /// Insert or replace the title for `episode` (last write wins).
    pub fn set_episode(&self, episode: impl Into<String>, title: impl Into<String>) {
        recover(self.episodes.write()).insert(episode.into(), title.into());
    }

    pub fn episode_count(&self) -> usize {
        recover(self.episodes.read()).len()
    }
}
