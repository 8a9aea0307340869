//! Shared readiness cell for one CRS.
//!
//! A handle starts pending, is claimed by exactly one initializer and is
//! settled once. Continuations queued before that run in enqueue order, on
//! the settling thread, with no lock held.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::channel::oneshot;
use parking_lot::Mutex;

use crate::crs::Crs;
use crate::error::ProjError;

pub type Continuation = Box<dyn FnOnce(Result<Arc<Crs>, ProjError>) + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleState {
    /// Nobody is initializing yet
    Pending,
    /// Claimed; definition or algorithm may still be in flight
    Initializing,
    Ready,
    Failed,
}

enum Slot {
    Pending {
        claimed: bool,
        queue: Vec<Continuation>,
    },
    Settled(Result<Arc<Crs>, ProjError>),
}

pub struct CrsHandle {
    code: String,
    slot: Mutex<Slot>,
}

impl CrsHandle {
    pub(crate) fn pending(code: &str) -> Arc<Self> {
        Arc::new(Self {
            code: code.to_string(),
            slot: Mutex::new(Slot::Pending {
                claimed: false,
                queue: Vec::new(),
            }),
        })
    }

    /// An already ready handle.
    pub fn from_crs(crs: Arc<Crs>) -> Arc<Self> {
        Arc::new(Self {
            code: crs.srs_code().to_string(),
            slot: Mutex::new(Slot::Settled(Ok(crs))),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn state(&self) -> HandleState {
        match &*self.slot.lock() {
            Slot::Pending { claimed: false, .. } => HandleState::Pending,
            Slot::Pending { claimed: true, .. } => HandleState::Initializing,
            Slot::Settled(Ok(_)) => HandleState::Ready,
            Slot::Settled(Err(_)) => HandleState::Failed,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == HandleState::Ready
    }

    /// The CRS, once ready.
    pub fn get(&self) -> Option<Arc<Crs>> {
        match &*self.slot.lock() {
            Slot::Settled(Ok(crs)) => Some(Arc::clone(crs)),
            _ => None,
        }
    }

    /// Run `f` with the outcome: immediately when settled, otherwise after
    /// every continuation queued before it.
    pub fn when_ready<F>(&self, f: F)
    where
        F: FnOnce(Result<Arc<Crs>, ProjError>) + Send + 'static,
    {
        let outcome = {
            let mut slot = self.slot.lock();
            match &mut *slot {
                Slot::Pending { queue, .. } => {
                    queue.push(Box::new(f));
                    return;
                }
                Slot::Settled(outcome) => outcome.clone(),
            }
        };
        f(outcome);
    }

    /// Future resolving with the outcome.
    pub fn ready(&self) -> impl Future<Output = Result<Arc<Crs>, ProjError>> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        self.when_ready(move |outcome| {
            // the receiver may have been dropped
            let _ = tx.send(outcome);
        });
        let code = self.code.clone();
        async move {
            match rx.await {
                Ok(outcome) => outcome,
                Err(_) => Err(ProjError::NotReady(code)),
            }
        }
    }

    /// Become the initializer. Only the first caller on a pending handle
    /// gets `true`.
    pub(crate) fn claim(&self) -> bool {
        match &mut *self.slot.lock() {
            Slot::Pending { claimed, .. } if !*claimed => {
                *claimed = true;
                true
            }
            _ => false,
        }
    }

    /// Record the outcome and drain the queue. Later calls are ignored.
    pub(crate) fn settle(&self, outcome: Result<Arc<Crs>, ProjError>) {
        let queue = {
            let mut slot = self.slot.lock();
            if let Slot::Settled(_) = &*slot {
                log::warn!("CRS handle '{}' settled twice; keeping the first outcome", self.code);
                return;
            }
            match std::mem::replace(&mut *slot, Slot::Settled(outcome.clone())) {
                Slot::Pending { queue, .. } => queue,
                Slot::Settled(_) => Vec::new(),
            }
        };

        match &outcome {
            Ok(_) => log::debug!("CRS '{}' ready, {} queued", self.code, queue.len()),
            Err(err) => log::debug!("CRS '{}' failed: {err}", self.code),
        }
        for continuation in queue {
            continuation(outcome.clone());
        }
    }
}

impl fmt::Debug for CrsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrsHandle")
            .field("code", &self.code)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn wgs84() -> Arc<Crs> {
        Crs::wgs84()
    }

    #[test]
    fn test_queue_runs_in_order_once() {
        let handle = CrsHandle::pending("EPSG:4326");
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..3 {
            let order = Arc::clone(&order);
            handle.when_ready(move |outcome| {
                assert!(outcome.is_ok());
                order.lock().push(i);
            });
        }
        assert!(order.lock().is_empty());
        assert_eq!(handle.state(), HandleState::Pending);

        assert!(handle.claim());
        assert!(!handle.claim());
        assert_eq!(handle.state(), HandleState::Initializing);

        handle.settle(Ok(wgs84()));
        assert_eq!(*order.lock(), vec![0, 1, 2]);
        // a second settle neither replaces the outcome nor reruns anything
        handle.settle(Err(ProjError::Resource("late".to_string())));
        assert_eq!(*order.lock(), vec![0, 1, 2]);
        assert!(handle.is_ready());
    }

    #[test]
    fn test_late_continuation_runs_immediately() {
        let handle = CrsHandle::from_crs(wgs84());
        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        handle.when_ready(move |_| *flag.lock() = true);
        assert!(*ran.lock());
        assert_eq!(handle.code(), "WGS84");
    }

    #[test]
    fn test_failure_reaches_every_waiter() {
        let handle = CrsHandle::pending("EPSG:9999");
        let first = handle.ready();
        let second = handle.ready();
        handle.settle(Err(ProjError::Resource("no algorithm".to_string())));
        assert!(matches!(block_on(first), Err(ProjError::Resource(_))));
        assert!(matches!(block_on(second), Err(ProjError::Resource(_))));
        assert_eq!(handle.state(), HandleState::Failed);
        assert!(handle.get().is_none());
    }

    #[test]
    fn test_ready_future() {
        let handle = CrsHandle::pending("WGS84");
        let waiter = handle.ready();
        handle.settle(Ok(wgs84()));
        let crs = block_on(waiter).unwrap();
        assert!(crs.is_geographic());
    }
}
