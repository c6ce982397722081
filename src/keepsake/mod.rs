//! Page-side helpers around the effect: persisted posts, media, counters and
//! events, countdown arithmetic and the lightbox markup. Nothing in here
//! touches the heart animation.

pub mod countdown;
pub mod markup;
pub mod records;
pub mod store;

pub use countdown::{LocalDateTime, MsParts, counter_ms, ms_parts, next_upcoming_event, pad2};
pub use markup::{escape_html, lightbox_html, uid};
pub use records::{Counter, CounterMode, Event, MediaItem, MediaKind, Post, default_counters};
pub use store::{KeyValueStore, MemoryStore, safe_load, safe_save};

#[cfg(target_arch = "wasm32")]
pub use store::LocalStore;

use crate::error::Result;

/// Storage keys, versioned like the page's existing data.
pub mod keys {
    pub const POSTS: &str = "love_posts_v4";
    pub const MEDIA: &str = "love_media_v1";
    pub const COUNTERS: &str = "love_counters_v2";
    pub const EVENTS: &str = "love_events_v2";
    /// Session flag set by the entry page once the passphrase is accepted.
    pub const UNLOCKED: &str = "unlocked";
}

/// Whether the entry page has unlocked this session. Read errors count as locked.
pub fn is_unlocked(session: &dyn KeyValueStore) -> bool {
    matches!(session.get(keys::UNLOCKED), Ok(Some(flag)) if flag == "yes")
}

/// Typed access to the page's records in one store.
pub struct Keepsake<K: KeyValueStore> {
    store: K,
}

impl<K: KeyValueStore> Keepsake<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn load_posts(&self) -> Vec<Post> {
        safe_load(&self.store, keys::POSTS, Vec::new())
    }

    pub fn save_posts(&mut self, posts: &[Post]) -> Result<()> {
        safe_save(&mut self.store, keys::POSTS, posts)
    }

    pub fn load_media(&self) -> Vec<MediaItem> {
        safe_load(&self.store, keys::MEDIA, Vec::new())
    }

    pub fn save_media(&mut self, media: &[MediaItem]) -> Result<()> {
        safe_save(&mut self.store, keys::MEDIA, media)
    }

    /// All media, newest first.
    pub fn all_media(&self) -> Vec<MediaItem> {
        let mut media = self.load_media();
        media.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        media
    }

    pub fn load_events(&self) -> Vec<Event> {
        safe_load(&self.store, keys::EVENTS, Vec::new())
    }

    pub fn save_events(&mut self, events: &[Event]) -> Result<()> {
        safe_save(&mut self.store, keys::EVENTS, events)
    }

    /// Stored counters; an absent or empty list is replaced by the defaults,
    /// which are persisted.
    pub fn load_counters(&mut self) -> Vec<Counter> {
        let stored: Vec<Counter> = safe_load(&self.store, keys::COUNTERS, Vec::new());
        if !stored.is_empty() {
            return stored;
        }
        let defaults = default_counters();
        if let Err(err) = safe_save(&mut self.store, keys::COUNTERS, &defaults) {
            log::warn!("keepsake: could not seed counters: {err}");
        }
        defaults
    }

    pub fn save_counters(&mut self, counters: &[Counter]) -> Result<()> {
        safe_save(&mut self.store, keys::COUNTERS, counters)
    }

    pub fn next_upcoming_event(&self, now_local_ms: i64) -> Option<Event> {
        let events = self.load_events();
        next_upcoming_event(&events, now_local_ms).cloned()
    }
}
