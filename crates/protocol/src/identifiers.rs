//! Newtype identifiers.
//!
//! Names that flow through the invocation path are wrapped in distinct
//! newtypes so a [`MethodName`] is never confused with a [`ServicePath`] even
//! though both are strings under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// Exact, case-sensitive name of a remote method (e.g. `"SayHello"`).
    ///
    /// Resolution against a service stub never normalises case or whitespace.
    MethodName
}

string_id! {
    /// Service path of an endpoint (e.g. `"helloworld.Greeter"`).
    ServicePath
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies one outbound call.
///
/// Generated fresh for every invocation and recorded on the invocation span
/// so activity from a single call can be correlated across log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(Uuid);

impl CallId {
    /// Generates a new random call identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a [`CallId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_names_are_rejected() {
        assert!(MethodName::new("").is_none());
        assert!(ServicePath::new(String::new()).is_none());
    }

    #[test]
    fn method_names_are_case_sensitive() {
        let a = MethodName::new("Echo").unwrap();
        let b = MethodName::new("echo").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "Echo");
        assert_eq!(a.to_string(), "Echo");
    }

    #[test]
    fn call_ids_are_unique() {
        assert_ne!(CallId::new_random(), CallId::new_random());
    }
}
