use plan_eat::bot::routing::{
    next_state, route_message, settled_state, Command, Goal, MealType, Route,
};
use plan_eat::dialogue::ChatState;

#[test]
fn test_commands_take_priority() {
    let idle = ChatState::Idle;
    let awaiting = ChatState::AwaitingFoodDescription;

    assert_eq!(route_message("/start", &idle), Route::Command(Command::Start));
    assert_eq!(route_message("/reg", &idle), Route::Command(Command::Reg));
    assert_eq!(route_message("/healthtip", &idle), Route::Command(Command::HealthTip));
    assert_eq!(route_message("/setreminder", &idle), Route::Command(Command::SetReminder));

    // A command while a food description is pending is still a command
    assert_eq!(route_message("/plan", &awaiting), Route::Command(Command::Plan));
}

#[test]
fn test_commands_are_case_sensitive() {
    assert_eq!(route_message("/Start", &ChatState::Idle), Route::Unrecognized);
    assert_eq!(route_message("/HELP", &ChatState::Idle), Route::Unrecognized);
}

#[test]
fn test_bot_name_suffix() {
    assert_eq!(
        route_message("/recipe@PlanEatBot", &ChatState::Idle),
        Route::Command(Command::Recipe)
    );
}

#[test]
fn test_goal_labels_map_to_full_categories() {
    assert_eq!(
        route_message("Набор массы 🔼", &ChatState::Idle),
        Route::GoalSelected(Goal::MassGain)
    );
    assert_eq!(Goal::MassGain.category(), "Набор массы");
    assert_eq!(Goal::Maintenance.category(), "Поддержание веса");
    assert_eq!(Goal::from_label("Похудение 🔽"), Some(Goal::WeightLoss));
    assert_eq!(Goal::from_label("Похудение"), None);
}

#[test]
fn test_meal_type_labels() {
    for meal in MealType::ALL {
        assert_eq!(
            route_message(meal.label(), &ChatState::Idle),
            Route::MealTypeSelected(meal)
        );
        assert!(meal.label().starts_with(meal.category()));
    }
    assert_eq!(MealType::Drink.category(), "Напиток");
}

#[test]
fn test_button_label_beats_pending_food_description() {
    assert_eq!(
        route_message("Обед 🍲", &ChatState::AwaitingFoodDescription),
        Route::MealTypeSelected(MealType::Lunch)
    );
}

#[test]
fn test_food_description_only_when_awaiting() {
    assert_eq!(
        route_message("курица и рис", &ChatState::AwaitingFoodDescription),
        Route::FoodDescription("курица и рис".to_string())
    );
    assert_eq!(route_message("курица и рис", &ChatState::Idle), Route::Unrecognized);
}

#[test]
fn test_unknown_slash_text_is_never_food() {
    assert_eq!(
        route_message("/unknown курица", &ChatState::AwaitingFoodDescription),
        Route::Unrecognized
    );
}

#[test]
fn test_next_state() {
    assert_eq!(
        next_state(&Route::Command(Command::Track)),
        ChatState::AwaitingFoodDescription
    );
    assert_eq!(next_state(&Route::Command(Command::Plan)), ChatState::Idle);
    assert_eq!(
        next_state(&Route::FoodDescription("рис".to_string())),
        ChatState::Idle
    );
    assert_eq!(next_state(&Route::Unrecognized), ChatState::Idle);
}

#[test]
fn test_failed_track_prompt_leaves_chat_idle() {
    let track = Route::Command(Command::Track);

    assert_eq!(settled_state(&track, true), ChatState::AwaitingFoodDescription);
    assert_eq!(settled_state(&track, false), ChatState::Idle);

    // The following text is then not mistaken for a food description
    let state = settled_state(&track, false);
    assert_eq!(route_message("курица и рис", &state), Route::Unrecognized);
}

#[test]
fn test_failed_handler_on_other_routes_is_idle() {
    assert_eq!(
        settled_state(&Route::FoodDescription("рис".to_string()), false),
        ChatState::Idle
    );
    assert_eq!(settled_state(&Route::Command(Command::Plan), true), ChatState::Idle);
}
