// --- File: crates/salonsync_common/src/live.rs ---
//! Live collections: the latest whole-list snapshot of a stored collection.
//!
//! Subscribers never see partial updates. Every change replaces the list.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared snapshot type handed out to readers.
pub type Snapshot<T> = Arc<Vec<T>>;

/// A collection whose current contents can be read or watched.
#[derive(Debug)]
pub struct LiveCollection<T> {
    tx: Arc<watch::Sender<Snapshot<T>>>,
}

impl<T> Clone for LiveCollection<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T> Default for LiveCollection<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LiveCollection<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<T>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(items));
        Self { tx: Arc::new(tx) }
    }

    /// The current list. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.tx.borrow().clone()
    }

    /// A receiver that is notified whenever the list is replaced.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }

    /// Replaces the list. Subscribers are only woken when it differs.
    ///
    /// Returns whether a new snapshot was published.
    pub fn replace(&self, items: Vec<T>) -> bool {
        self.tx.send_if_modified(|current| {
            if current.as_slice() == items.as_slice() {
                false
            } else {
                *current = Arc::new(items);
                true
            }
        })
    }

    /// Applies `f` to a copy of the current list and publishes the result.
    ///
    /// Not atomic against concurrent writers; callers serialize their writes.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let mut items = self.snapshot().as_ref().clone();
        let result = f(&mut items);
        self.replace(items);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_sees_whole_list() {
        let live = LiveCollection::with_items(vec![1, 2]);
        let mut rx = live.subscribe();

        assert!(live.replace(vec![1, 2, 3]));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_identical_list_is_not_published() {
        let live = LiveCollection::with_items(vec!["a".to_string()]);
        let rx = live.subscribe();
        assert!(!live.replace(vec!["a".to_string()]));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_update_returns_closure_value() {
        let live = LiveCollection::with_items(vec![1, 2, 3]);
        let removed = live.update(|items| {
            let before = items.len();
            items.retain(|i| *i != 2);
            before - items.len()
        });
        assert_eq!(removed, 1);
        assert_eq!(live.snapshot().as_slice(), &[1, 3]);
    }
}
