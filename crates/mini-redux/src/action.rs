//! Actions and the values accepted by `dispatch`
//!
//! Typed actions are plain Rust enums. The only place an action is checked at
//! runtime is the JSON boundary: a `serde_json::Value` must be an object with a
//! `type` key before it is decoded into the store's action type.

use crate::dispatcher::{DispatchResult, Dispatcher, GetState};
use crate::error::{InvalidActionError, StoreError};
use crate::middleware::thunk::Thunk;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Tag of the action dispatched once when a store is created
pub const INIT: &str = "INIT";

/// A tagged description of an intended state transition
///
/// Implementors are usually enums deserialized with `#[serde(tag = "type")]`,
/// so the JSON shape `{"type": "CREATE_NOTE", ...}` maps onto a variant.
pub trait Action: fmt::Debug + DeserializeOwned + 'static {
    /// The bootstrap action, tagged [`INIT`]
    fn init() -> Self;

    /// The discriminator of this action
    fn action_type(&self) -> &'static str;
}

/// Anything that can be handed to `dispatch`
pub enum Dispatchable<S, A> {
    /// A typed action
    Action(A),
    /// An untyped action from outside the program, validated before decoding
    Value(Value),
    /// A deferred computation, run by the thunk middleware
    Thunk(Thunk<S, A>),
}

impl<S, A> Dispatchable<S, A> {
    /// Wrap a closure as a thunk
    pub fn thunk<F>(run: F) -> Self
    where
        F: FnOnce(Dispatcher<S, A>, GetState<S>) -> DispatchResult + 'static,
    {
        Dispatchable::Thunk(Thunk::new(run))
    }

    pub fn is_thunk(&self) -> bool {
        matches!(self, Dispatchable::Thunk(_))
    }
}

impl<S, A: Action> Dispatchable<S, A> {
    /// Resolve into a typed action for the reducer
    pub(crate) fn into_action(self) -> Result<A, StoreError> {
        match self {
            Dispatchable::Action(action) => Ok(action),
            Dispatchable::Value(value) => decode_action(value),
            Dispatchable::Thunk(_) => Err(InvalidActionError::NotAnObject { found: "thunk" }.into()),
        }
    }
}

impl<S, A> From<A> for Dispatchable<S, A> {
    fn from(action: A) -> Self {
        Dispatchable::Action(action)
    }
}

impl<S, A: fmt::Debug> fmt::Debug for Dispatchable<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatchable::Action(action) => action.fmt(f),
            Dispatchable::Value(value) => write!(f, "{}", value),
            Dispatchable::Thunk(thunk) => thunk.fmt(f),
        }
    }
}

/// Check that an untyped value has the shape of an action
pub fn validate_action(value: &Value) -> Result<(), InvalidActionError> {
    match value {
        Value::Object(map) if map.contains_key("type") => Ok(()),
        Value::Object(_) => Err(InvalidActionError::MissingType),
        other => Err(InvalidActionError::NotAnObject {
            found: json_kind(other),
        }),
    }
}

/// Validate and decode an untyped value into a typed action
pub fn decode_action<A: Action>(value: Value) -> Result<A, StoreError> {
    validate_action(&value)?;
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
    enum TestAction {
        Init,
        Add { amount: i64 },
        #[serde(other)]
        Unknown,
    }

    impl Action for TestAction {
        fn init() -> Self {
            TestAction::Init
        }

        fn action_type(&self) -> &'static str {
            match self {
                TestAction::Init => INIT,
                TestAction::Add { .. } => "ADD",
                TestAction::Unknown => "UNKNOWN",
            }
        }
    }

    #[test]
    fn test_validate_accepts_tagged_object() {
        assert!(validate_action(&json!({"type": "ADD", "amount": 1})).is_ok());
    }

    #[test]
    fn test_validate_rejects_scalars_and_sequences() {
        assert_eq!(
            validate_action(&json!(42)),
            Err(InvalidActionError::NotAnObject { found: "number" })
        );
        assert_eq!(
            validate_action(&json!([{"type": "ADD"}])),
            Err(InvalidActionError::NotAnObject { found: "array" })
        );
        assert_eq!(
            validate_action(&Value::Null),
            Err(InvalidActionError::NotAnObject { found: "null" })
        );
    }

    #[test]
    fn test_validate_rejects_missing_type() {
        assert_eq!(
            validate_action(&json!({"amount": 1})),
            Err(InvalidActionError::MissingType)
        );
    }

    #[test]
    fn test_decode_unknown_tag_falls_through() {
        let action: TestAction = decode_action(json!({"type": "NOPE"})).unwrap();
        assert_eq!(action, TestAction::Unknown);
    }

    #[test]
    fn test_decode_payload() {
        let action: TestAction = decode_action(json!({"type": "ADD", "amount": 3})).unwrap();
        assert_eq!(action, TestAction::Add { amount: 3 });
        assert_eq!(action.action_type(), "ADD");
    }

    #[test]
    fn test_thunk_is_not_an_action() {
        let thunk: Dispatchable<(), TestAction> =
            Dispatchable::thunk(|_dispatch, _get_state| Ok(crate::Dispatched::Done));
        assert!(thunk.is_thunk());
        let err = thunk.into_action().unwrap_err();
        assert!(err.is_invalid_action());
    }
}
