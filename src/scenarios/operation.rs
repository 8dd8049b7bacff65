//! The unit of work the orchestrator drives.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::error::AccessResult;
use crate::simulation::{DelayBounds, DelaySimulator};

/// A named asynchronous check that yields a result string or fails.
///
/// Implementations are invoked fresh for every attempt, so `run` must not
/// depend on state left behind by an earlier call. The returned future is
/// `'static` because a timed-out attempt keeps running after the
/// orchestrator stops waiting on it.
pub trait Operation: Send + Sync {
    fn name(&self) -> &str;

    fn run(&self) -> BoxFuture<'static, AccessResult<String>>;
}

/// An access check backed by a [`DelaySimulator`].
#[derive(Debug, Clone)]
pub struct SimulatedAuth {
    name: String,
    simulator: DelaySimulator,
    success_message: String,
}

impl SimulatedAuth {
    pub fn new(name: impl Into<String>, bounds: DelayBounds, success_message: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            simulator: DelaySimulator::new(name.clone(), bounds),
            name,
            success_message: success_message.into(),
        }
    }
}

impl Operation for SimulatedAuth {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> BoxFuture<'static, AccessResult<String>> {
        let simulator = self.simulator.clone();
        let message = self.success_message.clone();
        async move {
            simulator.simulate().await?;
            Ok(message)
        }
        .boxed()
    }
}

/// Adapts a closure returning a future into an [`Operation`].
pub struct FnOperation<F> {
    name: String,
    f: F,
}

impl<F, Fut> FnOperation<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AccessResult<String>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    pub fn shared(name: impl Into<String>, f: F) -> Arc<dyn Operation> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Operation for FnOperation<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AccessResult<String>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> BoxFuture<'static, AccessResult<String>> {
        (self.f)().boxed()
    }
}
