//! Image preload bookkeeping.
//!
//! Tracks the load state of every image URI requested this session.  The
//! cache performs no I/O itself: [`ImageCache::request`] queues a URI the
//! first time it is seen, a loader drains the queue with
//! [`ImageCache::take_pending`], and reports back through
//! [`ImageCache::complete`].
//!
//! Loaded images stay loaded for the session.  Failures are sticky and are
//! never retried; [`ImageCache::display_uri`] substitutes the fallback image
//! for a failed URI.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
enum Entry<T> {
    Pending,
    Loaded(T),
    Failed,
}

impl<T> Entry<T> {
    fn state(&self) -> LoadState {
        match self {
            Entry::Pending => LoadState::Pending,
            Entry::Loaded(_) => LoadState::Loaded,
            Entry::Failed => LoadState::Failed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageCache<T> {
    entries: HashMap<String, Entry<T>>,
    queued: Vec<String>,
    fallback: String,
}

impl<T> ImageCache<T> {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            queued: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Current state of `uri`, scheduling a load on first sight.
    pub fn request(&mut self, uri: &str) -> LoadState {
        if let Some(entry) = self.entries.get(uri) {
            return entry.state();
        }
        self.entries.insert(uri.to_string(), Entry::Pending);
        self.queued.push(uri.to_string());
        LoadState::Pending
    }

    /// State of `uri` without scheduling anything.
    pub fn state(&self, uri: &str) -> Option<LoadState> {
        self.entries.get(uri).map(Entry::state)
    }

    /// URIs requested since the last call, in request order.
    pub fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.queued)
    }

    /// Record the outcome of a load.  Only pending entries change; a late
    /// duplicate report for a settled URI is ignored.
    pub fn complete<E: std::fmt::Display>(&mut self, uri: &str, result: Result<T, E>) {
        let Some(entry) = self.entries.get_mut(uri) else {
            return;
        };
        if !matches!(entry, Entry::Pending) {
            return;
        }
        *entry = match result {
            Ok(image) => {
                tracing::debug!(uri, "image loaded");
                Entry::Loaded(image)
            }
            Err(e) => {
                tracing::warn!(uri, error = %e, "image failed to load");
                Entry::Failed
            }
        };
    }

    pub fn get(&self, uri: &str) -> Option<&T> {
        match self.entries.get(uri) {
            Some(Entry::Loaded(image)) => Some(image),
            _ => None,
        }
    }

    /// URI to put on screen for `uri`: itself unless it failed.
    pub fn display_uri<'a>(&'a self, uri: &'a str) -> &'a str {
        match self.state(uri) {
            Some(LoadState::Failed) => &self.fallback,
            _ => uri,
        }
    }

    /// `true` once every URI in `uris` is loaded or failed.
    pub fn all_settled<'a>(&self, uris: impl IntoIterator<Item = &'a str>) -> bool {
        uris.into_iter()
            .all(|uri| matches!(self.state(uri), Some(LoadState::Loaded | LoadState::Failed)))
    }

    pub fn loaded_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, Entry::Loaded(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_queues_exactly_once() {
        let mut cache: ImageCache<u8> = ImageCache::new("hero.jpg");
        assert_eq!(cache.request("a.jpg"), LoadState::Pending);
        assert_eq!(cache.request("a.jpg"), LoadState::Pending);
        assert_eq!(cache.request("b.jpg"), LoadState::Pending);
        assert_eq!(cache.take_pending(), vec!["a.jpg", "b.jpg"]);
        assert!(cache.take_pending().is_empty());
    }

    #[test]
    fn loaded_images_are_kept() {
        let mut cache: ImageCache<u8> = ImageCache::new("hero.jpg");
        cache.request("a.jpg");
        cache.complete::<String>("a.jpg", Ok(7));
        assert_eq!(cache.request("a.jpg"), LoadState::Loaded);
        assert_eq!(cache.get("a.jpg"), Some(&7));
        assert_eq!(cache.loaded_count(), 1);
        assert_eq!(cache.take_pending().len(), 1);
    }

    #[test]
    fn failure_is_sticky_and_uses_fallback() {
        let mut cache: ImageCache<u8> = ImageCache::new("hero.jpg");
        cache.request("broken.jpg");
        cache.take_pending();
        cache.complete("broken.jpg", Err("404"));
        assert_eq!(cache.request("broken.jpg"), LoadState::Failed);
        assert!(cache.take_pending().is_empty());
        assert_eq!(cache.display_uri("broken.jpg"), "hero.jpg");
        assert_eq!(cache.display_uri("other.jpg"), "other.jpg");
    }

    #[test]
    fn late_reports_do_not_override_settled_state() {
        let mut cache: ImageCache<u8> = ImageCache::new("hero.jpg");
        cache.request("a.jpg");
        cache.complete::<String>("a.jpg", Ok(1));
        cache.complete("a.jpg", Err("late failure"));
        assert_eq!(cache.state("a.jpg"), Some(LoadState::Loaded));
        // never requested: ignored
        cache.complete::<String>("ghost.jpg", Ok(2));
        assert_eq!(cache.state("ghost.jpg"), None);
    }

    #[test]
    fn settled_when_everything_resolved() {
        let mut cache: ImageCache<u8> = ImageCache::new("hero.jpg");
        let uris = ["a.jpg", "b.jpg"];
        for uri in uris {
            cache.request(uri);
        }
        assert!(!cache.all_settled(uris));
        cache.complete::<String>("a.jpg", Ok(1));
        cache.complete("b.jpg", Err("boom"));
        assert!(cache.all_settled(uris));
    }
}
