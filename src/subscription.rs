use std::{
    mem::{forget, take},
    rc::{Rc, Weak},
};


/// Handle to a registered subscriber.
///
/// Dropping the handle unsubscribes.
#[derive(Default)]
#[must_use]
pub struct Subscription(RawSubscription);

impl Subscription {
    pub fn empty() -> Self {
        Subscription(RawSubscription::Empty)
    }
    pub fn from_fn(f: impl FnOnce() + 'static) -> Self {
        Subscription(RawSubscription::Fn(Box::new(f)))
    }
    pub fn from_weak_fn<T: 'static>(
        this: Weak<T>,
        unsubscribe: impl FnOnce(Rc<T>) + 'static,
    ) -> Self {
        Self::from_fn(move || {
            if let Some(this) = this.upgrade() {
                unsubscribe(this)
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.0, RawSubscription::Empty)
    }

    /// Unsubscribes now. Same as dropping the handle.
    pub fn unsubscribe(self) {}

    /// Keeps the subscriber registered for as long as its source lives.
    pub fn detach(self) {
        forget(self)
    }
}
impl Drop for Subscription {
    fn drop(&mut self) {
        match take(&mut self.0) {
            RawSubscription::Empty => {}
            RawSubscription::Fn(f) => f(),
        }
    }
}
impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            RawSubscription::Empty => write!(f, "Subscription(empty)"),
            RawSubscription::Fn(_) => write!(f, "Subscription(active)"),
        }
    }
}

#[derive(Default)]
enum RawSubscription {
    #[default]
    Empty,
    Fn(Box<dyn FnOnce() + 'static>),
}
