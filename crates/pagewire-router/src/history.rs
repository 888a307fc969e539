//! URL/history providers.
//!
//! The navigation loop doesn't own the address bar; it asks a
//! [`HistoryProvider`] for the current path and subscribes to changes.
//! [`MemoryHistory`] is an in-memory stack with browser-like push, replace,
//! back and forward.

use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::path::normalize_path;

/// How a navigation changed the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationType {
    /// A new entry was pushed.
    Push,
    /// The current entry was replaced.
    Replace,
    /// The user moved back or forward through existing entries.
    Pop,
}

/// Emitted whenever the current path changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    /// The path before the navigation.
    pub from: String,
    /// The path navigated to, normalized.
    pub to: String,
    pub kind: NavigationType,
}

/// Supplies the current path and announces path changes.
pub trait HistoryProvider: Send + Sync {
    /// Returns the current path.
    fn current_path(&self) -> String;

    /// Subscribes to navigation events, in the order they happen.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<NavigationEvent>;
}

#[derive(Debug)]
struct Stack {
    entries: Vec<String>,
    index: usize,
    listeners: Vec<mpsc::UnboundedSender<NavigationEvent>>,
}

impl Stack {
    fn current(&self) -> &str {
        &self.entries[self.index]
    }

    fn notify(&mut self, from: String, kind: NavigationType) {
        let event = NavigationEvent {
            from,
            to: self.current().to_string(),
            kind,
        };
        self.listeners
            .retain(|listener| listener.send(event.clone()).is_ok());
    }
}

/// An in-memory history stack.
///
/// # Examples
///
/// ```
/// use pagewire_router::history::{HistoryProvider, MemoryHistory};
///
/// let history = MemoryHistory::new("/");
/// history.push("/blog");
/// history.push("/blog/hello");
/// assert!(history.back());
/// assert_eq!(history.current_path(), "/blog");
/// assert!(history.forward());
/// assert_eq!(history.current_path(), "/blog/hello");
/// ```
#[derive(Debug)]
pub struct MemoryHistory {
    stack: Mutex<Stack>,
}

impl MemoryHistory {
    /// Creates a history whose only entry is `initial`.
    pub fn new(initial: &str) -> Self {
        Self {
            stack: Mutex::new(Stack {
                entries: vec![normalize_path(initial).into_owned()],
                index: 0,
                listeners: Vec::new(),
            }),
        }
    }

    fn stack(&self) -> std::sync::MutexGuard<'_, Stack> {
        self.stack.lock().expect("history lock poisoned")
    }

    /// Pushes `path`, discarding any forward entries.
    pub fn push(&self, path: &str) {
        let mut stack = self.stack();
        let from = stack.current().to_string();
        let next = stack.index + 1;
        stack.entries.truncate(next);
        stack.entries.push(normalize_path(path).into_owned());
        stack.index = next;
        stack.notify(from, NavigationType::Push);
    }

    /// Replaces the current entry with `path`.
    pub fn replace(&self, path: &str) {
        let mut stack = self.stack();
        let from = stack.current().to_string();
        let index = stack.index;
        stack.entries[index] = normalize_path(path).into_owned();
        stack.notify(from, NavigationType::Replace);
    }

    /// Moves `delta` entries through the stack. Returns `false` (and does
    /// nothing) if that would leave the stack or `delta` is zero.
    pub fn go(&self, delta: isize) -> bool {
        let mut stack = self.stack();
        let Some(target) = stack.index.checked_add_signed(delta) else {
            return false;
        };
        if delta == 0 || target >= stack.entries.len() {
            return false;
        }
        let from = stack.current().to_string();
        stack.index = target;
        stack.notify(from, NavigationType::Pop);
        true
    }

    /// Moves one entry back.
    pub fn back(&self) -> bool {
        self.go(-1)
    }

    /// Moves one entry forward.
    pub fn forward(&self) -> bool {
        self.go(1)
    }

    pub fn can_go_back(&self) -> bool {
        self.stack().index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        let stack = self.stack();
        stack.index + 1 < stack.entries.len()
    }

    /// Returns every entry, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.stack().entries.clone()
    }

    /// Returns the position of the current entry.
    pub fn index(&self) -> usize {
        self.stack().index
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl HistoryProvider for MemoryHistory {
    fn current_path(&self) -> String {
        self.stack().current().to_string()
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<NavigationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.stack().listeners.push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_path_is_normalized() {
        let history = MemoryHistory::new("about/?ref=nav");
        assert_eq!(history.current_path(), "/about");
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let history = MemoryHistory::default();
        history.push("/a");
        history.push("/b");
        assert!(history.back());
        history.push("/c");
        assert_eq!(history.entries(), vec!["/", "/a", "/c"]);
        assert_eq!(history.index(), 2);
        assert!(!history.forward());
    }

    #[test]
    fn test_replace_keeps_position() {
        let history = MemoryHistory::default();
        history.push("/blog");
        history.replace("/blog/first");
        assert_eq!(history.entries(), vec!["/", "/blog/first"]);
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn test_go_bounds() {
        let history = MemoryHistory::default();
        history.push("/a");
        assert!(!history.go(0));
        assert!(!history.go(-2));
        assert!(!history.go(1));
        assert!(history.go(-1));
        assert_eq!(history.current_path(), "/");
    }

    #[tokio::test]
    async fn test_subscribers_receive_events_in_order() {
        let history = MemoryHistory::default();
        let mut events = history.subscribe();

        history.push("/contact");
        history.replace("/about");
        history.back();

        let kinds: Vec<(String, String, NavigationType)> = [
            events.recv().await.unwrap(),
            events.recv().await.unwrap(),
            events.recv().await.unwrap(),
        ]
        .into_iter()
        .map(|e| (e.from, e.to, e.kind))
        .collect();

        assert_eq!(
            kinds,
            vec![
                ("/".into(), "/contact".into(), NavigationType::Push),
                ("/contact".into(), "/about".into(), NavigationType::Replace),
                ("/about".into(), "/".into(), NavigationType::Pop),
            ]
        );
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let history = MemoryHistory::default();
        drop(history.subscribe());
        history.push("/a");
        assert!(history.stack().listeners.is_empty());
    }
}
