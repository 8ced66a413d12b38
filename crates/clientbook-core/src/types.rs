use serde::{Deserialize, Serialize};

/// The two linkable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Contact,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Contact => "contact",
        }
    }

    /// The kind on the other side of a link.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Client => Self::Contact,
            Self::Contact => Self::Client,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
