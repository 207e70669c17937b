use derive_ex::Ex;
use parse_display::Display;
use serde::{Deserialize, Serialize};

use crate::Signal;

#[cfg(test)]
mod tests;

/// Snapshot of an asynchronous request.
///
/// The fields are independent. A retry keeps the previous `error` while `pending` is set,
/// and `data` from an earlier success survives a new request.
///
/// Values are never modified in place. Each transition builds a new value from the previous one,
/// so a `RequestState` is normally held in a [`Signal`] and replaced through
/// [`start`](Self::start), [`fail`](Self::fail) and [`succeed`](Self::succeed).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Ex)]
#[derive_ex(Default(bound()))]
pub struct RequestState<T, E> {
    /// `true` while a request is in flight.
    pub pending: bool,
    /// Payload of the last successful request.
    pub data: Option<T>,
    /// Error of the last failed request, until a request succeeds.
    pub error: Option<E>,
}

impl<T, E> RequestState<T, E> {
    /// Initial state with no data.
    pub fn new() -> Self {
        Self::from_initial(None)
    }

    /// Initial state holding `data`.
    pub fn with_data(data: T) -> Self {
        Self::from_initial(Some(data))
    }

    pub fn from_initial(data: Option<T>) -> Self {
        Self {
            pending: false,
            data,
            error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
    pub fn error(&self) -> Option<&E> {
        self.error.as_ref()
    }

    pub fn status(&self) -> RequestStatus {
        if self.pending {
            RequestStatus::Pending
        } else if self.error.is_some() {
            RequestStatus::Failed
        } else if self.data.is_some() {
            RequestStatus::Succeeded
        } else {
            RequestStatus::Idle
        }
    }

    /// Returns a copy of this state with `pending` set. `data` and `error` are kept.
    pub fn started(&self) -> Self
    where
        T: Clone,
        E: Clone,
    {
        Self {
            pending: true,
            ..self.clone()
        }
    }

    /// Returns a copy of this state with `error` set and `pending` cleared. `data` is kept.
    pub fn failed(&self, error: E) -> Self
    where
        T: Clone,
    {
        Self {
            pending: false,
            data: self.data.clone(),
            error: Some(error),
        }
    }

    /// Returns a state holding only `data`.
    ///
    /// Unlike [`started`](Self::started) and [`failed`](Self::failed),
    /// nothing of the previous state survives.
    pub fn succeeded(data: T) -> Self {
        Self {
            pending: false,
            data: Some(data),
            error: None,
        }
    }
}

impl<T: 'static, E: 'static> RequestState<T, E> {
    /// Marks the request held by `signal` as in flight.
    pub fn start(signal: &Signal<Self>)
    where
        T: Clone,
        E: Clone,
    {
        signal.update(|s| s.started())
    }

    /// Stores `error` in the request held by `signal` and clears `pending`.
    pub fn fail(signal: &Signal<Self>, error: E)
    where
        T: Clone,
    {
        signal.update(|s| s.failed(error))
    }

    /// Replaces the request held by `signal` with a successful one.
    pub fn succeed(signal: &Signal<Self>, data: T) {
        signal.set(Self::succeeded(data))
    }
}

/// Method form of the [`RequestState`] transitions.
pub trait RequestSignalExt<T, E> {
    fn start(&self);
    fn fail(&self, error: E);
    fn succeed(&self, data: T);
}
impl<T, E> RequestSignalExt<T, E> for Signal<RequestState<T, E>>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn start(&self) {
        RequestState::start(self)
    }
    fn fail(&self, error: E) {
        RequestState::fail(self, error)
    }
    fn succeed(&self, data: T) {
        RequestState::succeed(self, data)
    }
}

/// Coarse classification of a [`RequestState`].
///
/// `pending` takes precedence over `error`, and `error` over `data`.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[display(style = "snake_case")]
pub enum RequestStatus {
    Idle,
    Pending,
    Failed,
    Succeeded,
}
