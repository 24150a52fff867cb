//! Identifiers of the objects stored on a board service
//!
//! Trello identifies every object (boards, lists, labels, cards, checklists) by an opaque string.
//! Each kind gets its own type, so that a list ID cannot be passed where a card ID is expected.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Declares a newtype around the opaque ID string of a remote object
macro_rules! remote_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            content: String,
        }

        impl $name {
            /// Get the inner ID string, as the remote service sent it
            pub fn as_str(&self) -> &str {
                &self.content
            }

            /// Generate a random ID. This is used by mocked services, real IDs are always created by the server
            #[cfg(any(test, feature = "mock_board"))]
            pub fn random() -> Self {
                let random = uuid::Uuid::new_v4().to_simple().to_string();
                Self { content: random }
            }
        }

        impl From<String> for $name {
            fn from(content: String) -> Self {
                Self { content }
            }
        }

        impl From<&str> for $name {
            fn from(content: &str) -> Self {
                Self { content: content.to_string() }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
                write!(f, "{}", self.content)
            }
        }
    }
}

remote_id!(
    /// The ID of a board
    BoardId
);
remote_id!(
    /// The ID of a list (a column of a board)
    ListId
);
remote_id!(
    /// The ID of a label defined on a board
    LabelId
);
remote_id!(
    /// The ID of a card
    CardId
);
remote_id!(ChecklistId);


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids_are_transparent_strings() {
        let id = CardId::from("5f1d2c3b4a");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"5f1d2c3b4a\"");

        let parsed: ListId = serde_json::from_str("\"60aa\"").unwrap();
        assert_eq!(parsed.as_str(), "60aa");
        assert_eq!(parsed.to_string(), "60aa");
    }

    #[test]
    fn random_ids_differ() {
        assert_ne!(BoardId::random(), BoardId::random());
    }
}
