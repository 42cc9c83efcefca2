use serde::{Deserialize, Serialize};

/// Which dialog panel renders.
///
/// `Options` is part of the enumerated model but no transition targets it: the
/// option menu renders inside `Initial`, gated by
/// [`SceneState::options_visible`](crate::reducer::SceneState::options_visible).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    Initial,
    Options,
    Introduction,
    OtherInput,
    Hidden,
}

/// Whether the librarian sprite renders, and what the mail icon does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibrarianState {
    Visible,
    Hidden,
    MakingCoffee,
}

/// The three choices offered from the greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOption {
    Nothing,
    Introduction,
    Other,
}

impl DialogOption {
    pub const ALL: [DialogOption; 3] = [Self::Nothing, Self::Introduction, Self::Other];

    pub fn label(self) -> &'static str {
        match self {
            Self::Nothing => "Nothing",
            Self::Introduction => "Introduction",
            Self::Other => "Other",
        }
    }
}

/// Identity of a scheduled deferred message. Only the most recently armed seq
/// is honored when a timer fires; anything older is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerSeq(pub u64);
