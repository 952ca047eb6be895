use futures::stream::{self, BoxStream, StreamExt};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Single-owner current value with fan-out to any number of subscribers.
///
/// Every clone shares the same cell. Readers always observe a complete value;
/// writers replace it wholesale.
pub struct Property<T> {
    sender: Arc<watch::Sender<T>>,
    name: Arc<str>,
}

/// Read-only handle on a [`Property`].
///
/// Holding a subscriber never keeps the owner alive: once every clone of the
/// property is dropped, [`PropertySubscriber::changed`] returns `false`.
pub struct PropertySubscriber<T> {
    receiver: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> Property<T> {
    pub fn new(initial_value: T, name: impl Into<String>) -> Self {
        let (sender, _) = watch::channel(initial_value);
        Self {
            sender: Arc::new(sender),
            name: Arc::from(name.into()),
        }
    }

    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    pub fn set(&self, new_value: T) {
        self.sender.send_replace(new_value);
    }

    /// Replace the value only when it differs, so subscribers are not woken
    /// for no-op writes. Returns whether a change was published.
    pub fn set_if_changed(&self, new_value: T) -> bool
    where
        T: PartialEq,
    {
        self.sender.send_if_modified(|current| {
            if *current == new_value {
                false
            } else {
                *current = new_value;
                true
            }
        })
    }

    /// Atomically derive the next value from the current one and publish it.
    pub fn update<F>(&self, updater: F) -> T
    where
        F: FnOnce(&T) -> T,
    {
        let mut published = None;
        self.sender.send_modify(|current| {
            *current = updater(current);
            published = Some(current.clone());
        });
        published.unwrap_or_else(|| self.get())
    }

    pub fn subscribe(&self) -> PropertySubscriber<T> {
        PropertySubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Derived property that recomputes whenever this one changes.
    pub fn map<U, F>(&self, f: F) -> ComputedProperty<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let target = Property::new(f(self.get()), format!("{}.map", self.name));
        let target_clone = target.clone();
        let mut subscriber = self.subscribe();

        let task = tokio::spawn(async move {
            while subscriber.changed().await {
                target_clone.set(f(subscriber.get()));
            }
        });

        ComputedProperty {
            property: target,
            task,
        }
    }

    /// Only publish once the source has been quiet for `duration`.
    pub fn debounce(&self, duration: Duration) -> ComputedProperty<T> {
        let target = Property::new(self.get(), format!("{}.debounced", self.name));
        let target_clone = target.clone();
        let mut subscriber = self.subscribe();

        let task = tokio::spawn(async move {
            loop {
                if !subscriber.changed().await {
                    break;
                }

                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(duration) => {
                            target_clone.set(subscriber.get());
                            break;
                        }
                        changed = subscriber.changed() => {
                            if !changed {
                                target_clone.set(subscriber.get());
                                return;
                            }
                        }
                    }
                }
            }
        });

        ComputedProperty {
            property: target,
            task,
        }
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            name: self.name.clone(),
        }
    }
}

impl<T: Debug> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("value", &*self.sender.borrow())
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> PropertySubscriber<T> {
    pub fn get(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published value. Returns `false` once the owning
    /// property has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Stream of snapshots: the current value first, then each new one.
    /// Intermediate values may be skipped by a slow consumer; the latest is
    /// always delivered.
    pub fn into_stream(self) -> BoxStream<'static, T> {
        stream::unfold((self.receiver, true), |(mut receiver, first)| async move {
            if !first {
                receiver.changed().await.ok()?;
            }
            let value = receiver.borrow_and_update().clone();
            Some((value, (receiver, false)))
        })
        .boxed()
    }
}

impl<T> Clone for PropertySubscriber<T> {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.clone(),
        }
    }
}

impl<T: Debug> Debug for PropertySubscriber<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySubscriber")
            .field("value", &*self.receiver.borrow())
            .finish()
    }
}

/// A property fed by a background task. The task is aborted on drop.
pub struct ComputedProperty<T> {
    property: Property<T>,
    task: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> ComputedProperty<T> {
    pub fn get(&self) -> T {
        self.property.get()
    }

    pub fn subscribe(&self) -> PropertySubscriber<T> {
        self.property.subscribe()
    }

    pub fn name(&self) -> &str {
        self.property.name()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn map<U, F>(&self, f: F) -> ComputedProperty<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.property.map(f)
    }

    pub fn debounce(&self, duration: Duration) -> ComputedProperty<T> {
        self.property.debounce(duration)
    }
}

impl<T> Drop for ComputedProperty<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<T: Debug> Debug for ComputedProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputedProperty")
            .field("property", &self.property)
            .finish()
    }
}
