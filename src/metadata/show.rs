use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Season, recover};

/// A show and its seasons, keyed by season number as a string.
#[derive(Debug)]
pub struct Show {
    id: u64,
    name: String,
    source_id: String,
    seasons: RwLock<HashMap<String, Arc<Season>>>,
}

impl Show {
    pub fn new(id: u64, name: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            source_id: source_id.into(),
            seasons: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the show in the metadata source that supplied it.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn get_season(&self, number: &str) -> Option<Arc<Season>> {
        recover(self.seasons.read()).get(number).cloned()
    }

    /// Insert or replace a season under its own number.
    pub fn set_season(&self, season: Season) -> Arc<Season> {
        let season = Arc::new(season);
        recover(self.seasons.write()).insert(season.number().to_string(), Arc::clone(&season));
        season
    }

    /// Existing season `number`, or a fresh empty one registered under it.
    pub fn season_or_insert(&self, number: &str) -> Arc<Season> {
        if let Some(s) = self.get_season(number) {
            return s;
        }
        let mut seasons = recover(self.seasons.write());
        Arc::clone(
            seasons
                .entry(number.to_string())
                .or_insert_with(|| Arc::new(Season::new(number))),
        )
    }

    pub fn episode_title(&self, season: &str, episode: &str) -> Option<String> {
        self.get_season(season)?.get_title(episode)
    }

    pub fn season_count(&self) -> usize {
        recover(self.seasons.read()).len()
    }
}
