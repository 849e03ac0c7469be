//! Connects views to a mini-redux store
//!
//! - [`Provider`] hands the store to root units through a [`ConnectContext`]
//! - [`connect`] binds a [`MapState`] and a [`MapDispatch`] to a [`View`]
//! - every mounted unit owns a [`Subscription`] node, so notifications travel
//!   from the root down
//! - a memoizing [`Selector`] decides whether a unit has to render again

pub mod connect;
pub mod props;
pub mod provider;
pub mod selector;
pub mod subscription;

pub use connect::{connect, Connect, Connected, View};
pub use props::{merge_props, shallow_equal, Callback, PropValue, Props};
pub use provider::{ConnectContext, Provider};
pub use selector::{MapDispatch, MapState, Selector, StatefulSelector};
pub use subscription::Subscription;
