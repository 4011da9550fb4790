//! Per-chat conversation state.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// What the bot expects next from a chat
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatState {
    #[default]
    Idle,
    /// `/track` was issued; the next non-command text is a meal description
    AwaitingFoodDescription,
}

impl ChatState {
    pub fn is_awaiting_food(&self) -> bool {
        matches!(self, ChatState::AwaitingFoodDescription)
    }
}

/// Type alias for the calorie tracking dialogue
pub type CalorieDialogue = Dialogue<ChatState, InMemStorage<ChatState>>;
