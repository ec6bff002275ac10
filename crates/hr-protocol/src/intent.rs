use serde::{Deserialize, Serialize};

/// Coarse category assigned to one line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntentType {
    /// Information request answered from the record store.
    Question,
    /// Action request executed through the capability set.
    Command,
    /// Neither cue family matched.
    Undetermined,
}

impl IntentType {
    /// Short label used in logs and the interactive loop.
    pub fn label(self) -> &'static str {
        match self {
            IntentType::Question => "query",
            IntentType::Command => "action",
            IntentType::Undetermined => "undetermined",
        }
    }
}
