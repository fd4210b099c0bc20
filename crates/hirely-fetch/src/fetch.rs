use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::FetchError;
use crate::scope::ViewScope;
use crate::state::FetchState;

type Operation<A, T, E> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// Handle around one async operation.
///
/// Triggers are independent: a second trigger while one is pending runs
/// alongside it, and whichever completes last writes state last.
pub struct Fetch<A, T, E> {
    op: Operation<A, T, E>,
    state: Arc<watch::Sender<FetchState<T, E>>>,
    last_args: Arc<Mutex<Option<A>>>,
    token: CancellationToken,
}

impl<A, T, E> Clone for Fetch<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            op: Arc::clone(&self.op),
            state: Arc::clone(&self.state),
            last_args: Arc::clone(&self.last_args),
            token: self.token.clone(),
        }
    }
}

impl<A, T, E> Fetch<A, T, E>
where
    A: Clone,
    T: Clone,
{
    pub fn new<F, Fut>(scope: &ViewScope, op: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            op: Arc::new(move |args| -> BoxFuture<'static, Result<T, E>> { Box::pin(op(args)) }),
            state: Arc::new(state),
            last_args: Arc::new(Mutex::new(None)),
            token: scope.token(),
        }
    }

    /// Receiver notified on every state write.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T, E>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FetchState<T, E> {
        self.state.borrow().clone()
    }

    /// Run the operation with `args`.
    ///
    /// The result is stored in state and also returned. A failure keeps the
    /// previous data. Cancellation returns [`FetchError::Cancelled`] and leaves
    /// state as it was before the trigger.
    pub async fn trigger(&self, args: A) -> Result<T, FetchError<E>> {
        if self.token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        *self.last_args.lock().await = Some(args.clone());
        self.state.send_modify(FetchState::begin);

        let call = (self.op)(args);
        let outcome = tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                debug!("Fetch cancelled in flight");
                self.state.send_modify(FetchState::finish);
                return Err(FetchError::Cancelled);
            }
            outcome = call => outcome,
        };

        match outcome {
            Ok(value) => {
                self.state.send_modify(|s| {
                    s.finish();
                    s.data = Some(value.clone());
                    s.error = None;
                });
                Ok(value)
            }
            Err(err) => {
                let err = Arc::new(err);
                self.state.send_modify(|s| {
                    s.finish();
                    s.error = Some(Arc::clone(&err));
                });
                Err(FetchError::Failed(err))
            }
        }
    }

    /// Re-issue the most recent trigger with the same arguments.
    pub async fn refresh(&self) -> Result<T, FetchError<E>> {
        let args = self.last_args.lock().await.clone();
        match args {
            Some(args) => self.trigger(args).await,
            None => Err(FetchError::NeverTriggered),
        }
    }

    /// Show `optimistic` as data right away, then confirm or roll back.
    ///
    /// Rolls back on failure and on cancellation.
    pub async fn trigger_optimistic(&self, args: A, optimistic: T) -> Result<T, FetchError<E>> {
        if self.token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let previous = self.state.borrow().data.clone();
        self.state.send_modify(|s| s.data = Some(optimistic));

        let result = self.trigger(args).await;
        if result.is_err() {
            self.state.send_modify(|s| s.data = previous);
        }
        result
    }

    /// Apply a local edit to the current data, if any.
    pub fn update_data(&self, edit: impl FnOnce(&mut T)) {
        self.state.send_modify(|s| {
            if let Some(data) = s.data.as_mut() {
                edit(data);
            }
        });
    }
}
