use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Show, recover};

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<u64, Arc<Show>>,
    by_name: HashMap<String, u64>,
    next_id: u64,
}

/// Process-lifetime cache of shows. No eviction.
#[derive(Debug, Default)]
pub struct ShowRegistry {
    inner: RwLock<Inner>,
}

impl ShowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u64) -> Option<Arc<Show>> {
        recover(self.inner.read()).by_id.get(&id).cloned()
    }

    /// Cached show `id`, or a new one built from `name` and `source_id`.
    /// An existing entry is returned unchanged.
    pub fn get_or_insert(&self, id: u64, name: &str, source_id: &str) -> Arc<Show> {
        if let Some(show) = self.get(id) {
            return show;
        }
        let mut inner = recover(self.inner.write());
        if let Some(show) = inner.by_id.get(&id) {
            return Arc::clone(show);
        }
        let show = Arc::new(Show::new(id, name, source_id));
        inner.by_id.insert(id, Arc::clone(&show));
        inner.by_name.entry(name_key(name)).or_insert(id);
        inner.next_id = inner.next_id.max(id.saturating_add(1));
        show
    }

    /// Show called `name` (case-insensitive, surrounding whitespace ignored),
    /// registered under the next free id when unknown.
    pub fn by_name(&self, name: &str, source_id: &str) -> Arc<Show> {
        let key = name_key(name);
        let mut inner = recover(self.inner.write());
        if let Some(show) = inner.by_name.get(&key).and_then(|id| inner.by_id.get(id)) {
            return Arc::clone(show);
        }
        let mut id = inner.next_id;
        while inner.by_id.contains_key(&id) {
            id += 1;
        }
        inner.next_id = id + 1;
        let show = Arc::new(Show::new(id, name.trim(), source_id));
        inner.by_id.insert(id, Arc::clone(&show));
        inner.by_name.insert(key, id);
        show
    }

    pub fn len(&self) -> usize {
        recover(self.inner.read()).by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
