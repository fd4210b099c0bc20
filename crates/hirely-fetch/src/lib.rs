//! Request lifecycle wrapper.
//!
//! A [`Fetch`] wraps one async operation and tracks its pending flag, last
//! result and last error in an observable [`FetchState`]. Every `Fetch` is
//! bound to a [`ViewScope`]; dropping the scope cancels in-flight calls and
//! stops them from writing state.

mod error;
mod fetch;
mod scope;
mod state;

pub use error::FetchError;
pub use fetch::Fetch;
pub use scope::ViewScope;
pub use state::FetchState;
