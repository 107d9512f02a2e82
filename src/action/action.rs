use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type tag of the reserved action used once, at store creation.
pub const INIT_ACTION_TYPE: &str = "@@INIT";

/// An action that can be dispatched to a [`Store`](crate::Store).
///
/// Implementors must provide the reserved INIT action. Reducers receive it
/// exactly once, with no prior state, and should answer with their default
/// state.
///
/// # Examples
///
/// ```
/// use statehouse::{Action, INIT_ACTION_TYPE};
///
/// #[derive(Debug)]
/// enum Counter {
///     Init,
///     Inc,
///     Dec,
/// }
///
/// impl Action for Counter {
///     fn init() -> Self {
///         Counter::Init
///     }
///
///     fn kind(&self) -> &str {
///         match self {
///             Counter::Init => INIT_ACTION_TYPE,
///             Counter::Inc => "INC",
///             Counter::Dec => "DEC",
///         }
///     }
/// }
///
/// assert!(Counter::init().is_init());
/// assert!(!Counter::Inc.is_init());
/// ```
pub trait Action {
    /// Build the reserved INIT action.
    fn init() -> Self
    where
        Self: Sized;

    /// The action's type tag.
    fn kind(&self) -> &str;

    /// Whether this is the reserved INIT action.
    fn is_init(&self) -> bool {
        self.kind() == INIT_ACTION_TYPE
    }
}

/// A loosely typed action: a type tag plus an arbitrary JSON payload.
///
/// Serializes as `{"type": ..., "payload": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypedAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl TypedAction {
    /// An action with no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    /// An action carrying `payload`.
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }
}

impl Action for TypedAction {
    fn init() -> Self {
        Self::new(INIT_ACTION_TYPE)
    }

    fn kind(&self) -> &str {
        &self.kind
    }
}
