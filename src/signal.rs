use std::{
    cell::{Cell, RefCell},
    mem::replace,
    rc::Rc,
};

use derive_ex::derive_ex;
use serde::{Deserialize, Serialize};
use slabmap::SlabMap;

use crate::Subscription;


type Subscriber<T> = Rc<dyn Fn(&T)>;

/// An observable value.
///
/// The value is held as an immutable snapshot. Writing replaces the snapshot and
/// synchronously notifies every subscriber with the new value.
///
/// Cloning a `Signal` clones the handle, not the value.
#[derive_ex(Clone, bound())]
pub struct Signal<T: 'static>(Rc<SignalNode<T>>);

impl<T: 'static> Signal<T> {
    /// Create a new `Signal` with the given initial value.
    pub fn new(value: T) -> Self {
        Self(Rc::new(SignalNode {
            value: RefCell::new(Rc::new(value)),
            version: Cell::new(0),
            subscribers: RefCell::new(SlabMap::new()),
        }))
    }

    /// Returns the current snapshot.
    pub fn value(&self) -> Rc<T> {
        self.0.value.borrow().clone()
    }

    /// Gets a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        T::clone(&*self.value())
    }

    /// Calls `f` with a reference to the current value.
    ///
    /// `f` may write to this signal.
    pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        f(&*self.value())
    }

    /// Replaces the value and notifies the subscribers.
    ///
    /// If a subscriber writes again, the remaining subscribers receive only the newer value.
    pub fn set(&self, value: T) {
        let value = Rc::new(value);
        let old = replace(&mut *self.0.value.borrow_mut(), value.clone());
        drop(old);
        let version = self.0.version.get().wrapping_add(1);
        self.0.version.set(version);
        self.0.notify(&value, version);
    }

    /// Computes a new value from the current one, then writes it.
    ///
    /// Exactly one read and one write, with no notification in between.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let value = f(&*self.value());
        self.set(value);
    }

    /// Registers `f` to be called with the value on every write.
    ///
    /// `f` is called once immediately with the current value.
    ///
    /// If the returned [`Subscription`] is dropped, `f` will not be called again.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let f: Subscriber<T> = Rc::new(f);
        let key = self.0.subscribers.borrow_mut().insert(f.clone());
        tracing::trace!(key, "signal subscribe");
        let s = Subscription::from_weak_fn(Rc::downgrade(&self.0), move |node| {
            node.unsubscribe(key)
        });
        f(&*self.value());
        s
    }

    /// Returns the number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.0.subscribers.borrow().len()
    }
}
impl<T: Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.value.try_borrow() {
            Ok(value) => std::fmt::Debug::fmt(&**value, f),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
}
impl<T> Serialize for Signal<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self.0.value.try_borrow() {
            Ok(value) => T::serialize(&**value, serializer),
            Err(_) => Err(serde::ser::Error::custom("borrowed")),
        }
    }
}
impl<'de, T> Deserialize<'de> for Signal<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Signal<T>, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Signal::new)
    }
}

struct SignalNode<T: 'static> {
    value: RefCell<Rc<T>>,
    version: Cell<u64>,
    subscribers: RefCell<SlabMap<Subscriber<T>>>,
}
impl<T: 'static> SignalNode<T> {
    fn notify(&self, value: &T, version: u64) {
        // Snapshot, so callbacks may subscribe, unsubscribe or write.
        let subscribers: Vec<Subscriber<T>> =
            self.subscribers.borrow().values().cloned().collect();
        tracing::trace!(version, subscribers = subscribers.len(), "signal write");
        for f in subscribers {
            if self.version.get() != version {
                // A nested write already delivered a newer value.
                tracing::trace!(version, "signal write superseded");
                break;
            }
            f(value);
        }
    }
    fn unsubscribe(&self, key: usize) {
        let f = self.subscribers.borrow_mut().remove(key);
        tracing::trace!(key, "signal unsubscribe");
        drop(f);
    }
}
