//! Free-text identifiers carried by chat and record requests.
//!
//! None of these types validate their content: the backend owns every
//! uniqueness and format rule, the client only carries what the user typed.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string slice.
            pub fn new(id: &str) -> Self {
                Self(id.to_string())
            }

            /// Return the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// `true` when the identifier is empty or whitespace only.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }
    };
}

string_identifier!(
    /// Conversation identifier the agent uses to keep context between turns.
    ///
    /// ```
    /// use agentdesk_models::SessionId;
    ///
    /// let id = SessionId::new("default-session");
    /// assert_eq!(id.to_string(), "default-session");
    /// ```
    SessionId
);

string_identifier!(
    /// Identifier of the person chatting; also keys user-state records.
    UserId
);

string_identifier!(
    /// Key of a world-state record.
    WorldKey
);
