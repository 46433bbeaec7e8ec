use std::num::NonZeroUsize;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use super::price_window::PriceWindow;

type SharedWindow = Arc<Mutex<PriceWindow>>;

/// Owner of every symbol's price window.
///
/// Windows are created on the first observation of a symbol and live as long
/// as the store. Each window sits behind its own mutex: work on one symbol
/// is serialized, work on different symbols never waits on the other's
/// window. The map itself is only locked (per shard) for the lookup or the
/// atomic insert of a new window, never while a window is being updated.
#[derive(Debug)]
pub struct WindowStore {
    capacity: NonZeroUsize,
    windows: DashMap<String, SharedWindow>,
}

impl WindowStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            windows: DashMap::new(),
        }
    }

    /// Return the window of `symbol`, inserting an empty one if none exists.
    /// Concurrent first observations of one symbol all get the same window.
    fn resolve(&self, symbol: &str) -> SharedWindow {
        if let Some(existing) = self.windows.get(symbol) {
            return Arc::clone(existing.value());
        }

        let capacity = self.capacity;
        let entry = self.windows.entry(symbol.to_string()).or_insert_with(|| {
            debug!(symbol, capacity = capacity.get(), "creating price window");
            Arc::new(Mutex::new(PriceWindow::new(capacity)))
        });
        Arc::clone(entry.value())
    }

    /// Run `f` on the window of `symbol` while holding that symbol's lock,
    /// creating the window first if the symbol is new.
    pub fn with_window<R>(&self, symbol: &str, f: impl FnOnce(&mut PriceWindow) -> R) -> R {
        let window = self.resolve(symbol);
        let mut guard = window.lock();
        f(&mut *guard)
    }

    /// Read the window of `symbol` under its lock. Never creates a window.
    pub fn peek<R>(&self, symbol: &str, f: impl FnOnce(&PriceWindow) -> R) -> Option<R> {
        let window = self.windows.get(symbol).map(|w| Arc::clone(w.value()))?;
        let guard = window.lock();
        Some(f(&*guard))
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of symbols seen so far
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Symbols seen so far, sorted
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.windows.iter().map(|e| e.key().clone()).collect();
        symbols.sort();
        symbols
    }
}
