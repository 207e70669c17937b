//! Request lifecycle state held in observable signals.
//!
//! - [`Signal`] is an observable value. Writes replace the value and notify subscribers
//!   synchronously.
//! - [`RequestState`] is the pending / success / error snapshot of an asynchronous request,
//!   with the transitions [`start`](RequestState::start), [`fail`](RequestState::fail) and
//!   [`succeed`](RequestState::succeed).
//! - [`wait_once`] calls a function once, the first time a signal becomes truthy.
mod request_state;
mod signal;
mod spawn;
mod subscription;
mod wait_once;

pub use request_state::*;
pub use signal::*;
pub use spawn::*;
pub use subscription::*;
pub use wait_once::*;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
mod tests_readme {}
