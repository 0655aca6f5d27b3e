//! Config-named identities: action kinds and trigger identities.
//!
//! Unlike the uuid-based IDs in [`crate::ids`], these are human-authored
//! names that come straight out of agent profile configuration ("dash",
//! "jump_pressed"). They are ordered so they can key `BTreeMap` registries
//! and appear deterministically in logs.

use serde::{Deserialize, Serialize};

/// Generates an ordered string newtype with conversion and display impls.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identity from any string-like value.
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            /// Borrow the identity as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self(name.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(name)
            }
        }
    };
}

define_key! {
    /// The tag identifying one action type within an action set.
    ///
    /// Every definition registered with a set carries exactly one kind;
    /// the runner compares kinds to decide between the refresh and
    /// replacement paths.
    ActionKind
}

define_key! {
    /// The identity of a trigger: the lookup key from a fired condition
    /// detector to the action definition it requests.
    ///
    /// Several triggers may bind to the same action kind (e.g. a button
    /// press and a gesture both requesting "dash").
    TriggerId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_compare_by_name() {
        assert_eq!(ActionKind::from("dash"), ActionKind::new("dash"));
        assert!(ActionKind::from("dash") < ActionKind::from("jump"));
    }

    #[test]
    fn trigger_id_serde_is_transparent() {
        let id = TriggerId::from("jump_pressed");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"jump_pressed\""));
    }

    #[test]
    fn display_is_bare_name() {
        assert_eq!(TriggerId::from("dash_pressed").to_string(), "dash_pressed");
    }
}
