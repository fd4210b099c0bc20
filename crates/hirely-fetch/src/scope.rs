use tokio_util::sync::CancellationToken;

/// Lifetime of the consumer that owns a set of fetches.
///
/// Dropping the scope cancels it. Child scopes are cancelled with their
/// parent but can also be cancelled on their own.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> ViewScope {
        ViewScope {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
