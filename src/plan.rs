//! Turning user input into `MoveJob`s.
//!
//! Batch files are UTF-8, one job per line, fields separated by TABs:
//!
//! ```text
//! # comment
//! /incoming/a.mkv<TAB>/tv/Show/Season 01/Show - S01E01 - Pilot.mkv
//! /incoming/b.mkv<TAB>Show<TAB>1<TAB>2<TAB>Title
//! /incoming/c.mkv<TAB>Show<TAB>1<TAB>2
//! ```
//!
//! Two fields give an explicit destination (relative ones are resolved under
//! the library base). Four or five fields describe an episode; its title is
//! recorded in the [`ShowRegistry`] and, when omitted, looked up there.

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::errors::EpisodeMoverError;
use crate::fs_ops::io_error_with_help;
use crate::metadata::ShowRegistry;
use crate::naming::destination_for;
use crate::orchestrator::MoveJob;

/// Episode coordinates as given by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRef<'a> {
    pub show: &'a str,
    pub season: u32,
    pub episode: u32,
    pub title: Option<&'a str>,
}

/// Record the episode in `registry` and compute its library destination.
pub fn plan_episode(
    source: &Path,
    ep: &EpisodeRef<'_>,
    library_base: &Path,
    registry: &ShowRegistry,
) -> MoveJob {
    let show = registry.by_name(ep.show, "");
    let season_key = ep.season.to_string();
    let episode_key = ep.episode.to_string();
    let season = show.season_or_insert(&season_key);
    if let Some(title) = ep.title.map(str::trim).filter(|t| !t.is_empty()) {
        season.set_episode(episode_key.as_str(), title);
    }
    let title = season.get_title(&episode_key).unwrap_or_default();
    let dest = destination_for(
        library_base,
        show.name(),
        ep.season,
        ep.episode,
        &title,
        source,
    );
    MoveJob::new(source, dest)
}

pub fn parse_batch(
    text: &str,
    library_base: &Path,
    registry: &ShowRegistry,
) -> Result<Vec<MoveJob>, EpisodeMoverError> {
    let mut jobs = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim_end_matches('\r');
        if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        let bad = |reason: String| EpisodeMoverError::BatchLine { line, reason };

        let source = Path::new(fields[0]);
        if fields[0].is_empty() {
            return Err(bad("empty source path".into()));
        }

        match fields.len() {
            2 => {
                if fields[1].is_empty() {
                    return Err(bad("empty destination path".into()));
                }
                jobs.push(MoveJob::new(source, library_base.join(fields[1])));
            }
            4 | 5 => {
                if fields[1].is_empty() {
                    return Err(bad("empty show name".into()));
                }
                let number = |what: &str, s: &str| {
                    s.parse::<u32>()
                        .map_err(|_| bad(format!("{what} '{s}' is not a number")))
                };
                let ep = EpisodeRef {
                    show: fields[1],
                    season: number("season", fields[2])?,
                    episode: number("episode", fields[3])?,
                    title: fields.get(4).copied(),
                };
                jobs.push(plan_episode(source, &ep, library_base, registry));
            }
            n => {
                return Err(bad(format!(
                    "expected 2 fields (source, destination) or 4-5 (source, show, season, episode[, title]); got {n}"
                )));
            }
        }
    }
    Ok(jobs)
}

pub fn load_batch(path: &Path, library_base: &Path, registry: &ShowRegistry) -> Result<Vec<MoveJob>> {
    let text = fs::read_to_string(path).map_err(io_error_with_help("read batch file", path))?;
    Ok(parse_batch(&text, library_base, registry)?)
}
