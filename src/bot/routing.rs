//! Pure mapping from inbound text to the handler that should answer it.
//!
//! Priority: exact command, then exact button label, then a pending food
//! description, then the unrecognized fallback.

use lazy_static::lazy_static;
use regex::Regex;

use crate::dialogue::ChatState;

lazy_static! {
    static ref COMMAND_TOKEN: Regex =
        Regex::new(r"^/([A-Za-z]+)(?:@[A-Za-z0-9_]+)?(?:\s|$)").expect("valid command regex");
}

/// Slash commands the bot answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Reg,
    Plan,
    Recipe,
    Track,
    Help,
    HealthTip,
    SetReminder,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Start,
        Command::Reg,
        Command::Plan,
        Command::Recipe,
        Command::Track,
        Command::Help,
        Command::HealthTip,
        Command::SetReminder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Reg => "reg",
            Command::Plan => "plan",
            Command::Recipe => "recipe",
            Command::Track => "track",
            Command::Help => "help",
            Command::HealthTip => "healthtip",
            Command::SetReminder => "setreminder",
        }
    }

    /// Parse the first token of a message. Names are case-sensitive and may
    /// carry an `@botname` suffix.
    pub fn parse(text: &str) -> Option<Self> {
        let captures = COMMAND_TOKEN.captures(text)?;
        let name = captures.get(1)?.as_str();
        Self::ALL.into_iter().find(|command| command.name() == name)
    }
}

/// Goals offered by the `/plan` keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    WeightLoss,
    MassGain,
    Maintenance,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::WeightLoss, Goal::MassGain, Goal::Maintenance];

    /// Keyboard button text
    pub fn label(self) -> &'static str {
        match self {
            Goal::WeightLoss => "Похудение 🔽",
            Goal::MassGain => "Набор массы 🔼",
            Goal::Maintenance => "Поддержание веса ⚖️",
        }
    }

    /// Goal value stored in `meal_plans.goal`
    pub fn category(self) -> &'static str {
        match self {
            Goal::WeightLoss => "Похудение",
            Goal::MassGain => "Набор массы",
            Goal::Maintenance => "Поддержание веса",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|goal| goal.label() == text)
    }
}

/// Dish categories offered by the `/recipe` keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Drink,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Dessert,
        MealType::Drink,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MealType::Breakfast => "Завтрак 🍳",
            MealType::Lunch => "Обед 🍲",
            MealType::Dinner => "Ужин 🍽️",
            MealType::Dessert => "Десерт 🍰",
            MealType::Drink => "Напиток 🥤",
        }
    }

    /// Value stored in `recipes.meal_type`
    pub fn category(self) -> &'static str {
        match self {
            MealType::Breakfast => "Завтрак",
            MealType::Lunch => "Обед",
            MealType::Dinner => "Ужин",
            MealType::Dessert => "Десерт",
            MealType::Drink => "Напиток",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|meal| meal.label() == text)
    }
}

/// Where an inbound text message goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Command(Command),
    GoalSelected(Goal),
    MealTypeSelected(MealType),
    FoodDescription(String),
    Unrecognized,
}

pub fn route_message(text: &str, state: &ChatState) -> Route {
    if let Some(command) = Command::parse(text) {
        return Route::Command(command);
    }
    if let Some(goal) = Goal::from_label(text) {
        return Route::GoalSelected(goal);
    }
    if let Some(meal_type) = MealType::from_label(text) {
        return Route::MealTypeSelected(meal_type);
    }
    if state.is_awaiting_food() && !text.starts_with('/') {
        return Route::FoodDescription(text.to_string());
    }
    Route::Unrecognized
}

/// Chat state after handling `route`
pub fn next_state(route: &Route) -> ChatState {
    match route {
        Route::Command(Command::Track) => ChatState::AwaitingFoodDescription,
        _ => ChatState::Idle,
    }
}

/// Chat state once the handler for `route` has finished. A failed handler
/// leaves the chat idle so a lost `/track` prompt never captures the next text.
pub fn settled_state(route: &Route, handled: bool) -> ChatState {
    if handled {
        next_state(route)
    } else {
        ChatState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_suffix_and_arguments() {
        assert_eq!(Command::parse("/plan@PlanEatBot"), Some(Command::Plan));
        assert_eq!(Command::parse("/track some text"), Some(Command::Track));
        assert_eq!(Command::parse("/planner"), None);
        assert_eq!(Command::parse("plan"), None);
    }

    #[test]
    fn test_every_command_name_round_trips() {
        for command in Command::ALL {
            assert_eq!(Command::parse(&format!("/{}", command.name())), Some(command));
        }
    }
}
