use std::{cell::RefCell, future::Future, rc::Rc};

use futures::task::{LocalSpawn, LocalSpawnExt};
use parse_display::Display;

use crate::{current_local_spawn, Signal, Subscription};


/// Values that can trigger [`wait_once`].
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}
impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}
impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}
impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        T::is_truthy(self)
    }
}

/// Call `f` once, the first time `signal` holds a truthy value.
///
/// The current value counts: if it is already truthy, `f` is called immediately.
/// The future returned by `f` is spawned with the spawner set by
/// [`set_current_local_spawn`](crate::set_current_local_spawn).
///
/// `f` is never called again, even if the value becomes truthy while the future is running.
/// The subscription to `signal` is released when the future finishes, panics or is dropped.
pub fn wait_once<C, Fut>(signal: &Signal<C>, f: impl FnOnce() -> Fut + 'static)
where
    C: Truthy + 'static,
    Fut: Future<Output = ()> + 'static,
{
    wait_once_with(signal, f, current_local_spawn())
}

/// Call `f` once, the first time `signal` holds a truthy value, with the spawner specified.
///
/// See [`wait_once`].
pub fn wait_once_with<C, F, Fut>(signal: &Signal<C>, f: F, sp: impl LocalSpawn + 'static)
where
    C: Truthy + 'static,
    F: FnOnce() -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let node = Rc::new(WaitOnceNode {
        data: RefCell::new(WaitOnceData {
            phase: Phase::Armed,
            f: Some(f),
            subscription: None,
        }),
        sp,
    });
    tracing::debug!("wait_once armed");
    let this = node.clone();
    let subscription = signal.subscribe(move |value| this.on_notify(value.is_truthy()));
    node.set_subscription(subscription);
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[display(style = "snake_case")]
enum Phase {
    Armed,
    Firing,
    Fired,
}

struct WaitOnceData<F> {
    phase: Phase,
    f: Option<F>,
    subscription: Option<Subscription>,
}

struct WaitOnceNode<F, Sp> {
    data: RefCell<WaitOnceData<F>>,
    sp: Sp,
}
impl<F, Fut, Sp> WaitOnceNode<F, Sp>
where
    F: FnOnce() -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
    Sp: LocalSpawn + 'static,
{
    fn on_notify(self: &Rc<Self>, is_truthy: bool) {
        let f = {
            let mut d = self.data.borrow_mut();
            if d.phase != Phase::Armed {
                tracing::trace!(phase = %d.phase, "wait_once notification discarded");
                return;
            }
            if !is_truthy {
                return;
            }
            d.phase = Phase::Firing;
            d.f.take()
        };
        let Some(f) = f else {
            return;
        };
        tracing::debug!("wait_once firing");
        let guard = ReleaseOnDrop(self.clone());
        let fut = f();
        let result = self.sp.spawn_local(async move {
            let _guard = guard;
            fut.await;
        });
        if let Err(e) = result {
            tracing::error!(%e, "wait_once could not spawn callback");
        }
    }

    fn set_subscription(&self, subscription: Subscription) {
        let mut d = self.data.borrow_mut();
        if d.phase == Phase::Fired {
            drop(d);
            drop(subscription);
        } else {
            d.subscription = Some(subscription);
        }
    }
}
impl<F, Sp> WaitOnceNode<F, Sp> {
    fn release(&self) {
        let subscription = {
            let mut d = self.data.borrow_mut();
            d.phase = Phase::Fired;
            d.subscription.take()
        };
        tracing::debug!("wait_once fired");
        drop(subscription);
    }
}

struct ReleaseOnDrop<F, Sp>(Rc<WaitOnceNode<F, Sp>>);

impl<F, Sp> Drop for ReleaseOnDrop<F, Sp> {
    fn drop(&mut self) {
        self.0.release();
    }
}
