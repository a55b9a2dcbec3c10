use rbb_core::ID;
use rbb_core::Unique;
use serde::Deserialize;
use serde::Serialize;

/// A robot entered in the competition.
///
/// Identity is the `id`; everything else refers to a contestant by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contestant {
    id: ID<Contestant>,
    name: String,
}

impl Contestant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ID::default(),
            name: name.into(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Unique for Contestant {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl std::fmt::Display for Contestant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
