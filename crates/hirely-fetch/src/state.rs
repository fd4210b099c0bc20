use std::sync::Arc;

/// Observable state of a [`Fetch`](crate::Fetch).
#[derive(Debug)]
pub struct FetchState<T, E> {
    /// True while at least one trigger is in flight.
    pub loading: bool,
    /// Last successful result. Kept when a later trigger fails.
    pub data: Option<T>,
    /// Error of the most recent completed trigger, cleared on success.
    pub error: Option<Arc<E>>,
    pub(crate) in_flight: usize,
}

impl<T, E> Default for FetchState<T, E> {
    fn default() -> Self {
        Self {
            loading: false,
            data: None,
            error: None,
            in_flight: 0,
        }
    }
}

impl<T: Clone, E> Clone for FetchState<T, E> {
    fn clone(&self) -> Self {
        Self {
            loading: self.loading,
            data: self.data.clone(),
            error: self.error.clone(),
            in_flight: self.in_flight,
        }
    }
}

impl<T, E> FetchState<T, E> {
    pub(crate) fn begin(&mut self) {
        self.in_flight += 1;
        self.loading = true;
    }

    pub(crate) fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
    }

    /// Loaded, settled, and empty: the "nothing here yet" view.
    ///
    /// A state that has never loaded is not an empty view.
    pub fn is_empty_view<U>(&self) -> bool
    where
        T: AsRef<[U]>,
    {
        !self.loading
            && self.error.is_none()
            && self.data.as_ref().is_some_and(|d| d.as_ref().is_empty())
    }
}
