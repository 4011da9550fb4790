use plan_eat::bot::routing::Goal;
use plan_eat::bot::ui_builder::*;
use plan_eat::db::{MealPlanRow, Recipe};
use plan_eat::dialogue::ChatState;
use plan_eat::localization::LocalizationManager;
use plan_eat::nutrition::CalorieEstimate;
use plan_eat::reminders::ReminderSchedule;

fn row(day: &str, meal: &str, dish: &str, calories: i64) -> MealPlanRow {
    MealPlanRow {
        day: day.to_string(),
        meal: meal.to_string(),
        dish: dish.to_string(),
        calories,
    }
}

fn manager() -> LocalizationManager {
    LocalizationManager::new().unwrap()
}

#[test]
fn test_chat_state_defaults_to_idle() {
    assert_eq!(ChatState::default(), ChatState::Idle);
    assert!(!ChatState::Idle.is_awaiting_food());
    assert!(ChatState::AwaitingFoodDescription.is_awaiting_food());
}

#[test]
fn test_keyboards_layout() {
    let goals = create_goal_keyboard();
    assert_eq!(goals.keyboard.len(), 3);
    assert!(goals.keyboard.iter().all(|row| row.len() == 1));
    assert_eq!(goals.keyboard[1][0].text, "Набор массы 🔼");

    let meals = create_meal_type_keyboard();
    let per_row: Vec<usize> = meals.keyboard.iter().map(Vec::len).collect();
    assert_eq!(per_row, vec![2, 2, 1]);
    assert_eq!(meals.keyboard[2][0].text, "Напиток 🥤");
}

#[test]
fn test_meal_plan_groups_by_day() {
    let rows = vec![
        row("Понедельник", "Завтрак", "Омлет", 350),
        row("Понедельник", "Ужин", "Рыба", 400),
        row("Вторник", "Завтрак", "Каша", 300),
    ];

    let text = format_meal_plan(&manager(), Goal::WeightLoss, &rows, None);

    assert!(text.starts_with("📋 План питания на неделю для похудение:"));
    assert!(text.ends_with("... и так далее на всю неделю"));
    assert!(text.contains("🔸 Понедельник:\n  • Завтрак: Омлет (350 ккал)\n  • Ужин: Рыба (400 ккал)\n"));

    let tuesday = text.find("🔸 Вторник").unwrap();
    let monday = text.find("🔸 Понедельник").unwrap();
    assert!(tuesday < monday);
}

#[test]
fn test_recipe_card_escapes_and_flags_missing_image() {
    let recipe = Recipe {
        id: 1,
        meal_type: "Десерт".to_string(),
        name: "Чизкейк <классический>".to_string(),
        instructions: "Смешать & запечь".to_string(),
        calories: "Около 300 ккал".to_string(),
        image_url: None,
        ingredients: vec!["200г творога".to_string(), "2 яйца".to_string()],
    };
    let localization = manager();

    let without_image = format_recipe(&localization, &recipe, false, None);
    assert!(without_image.contains("<b>Чизкейк &lt;классический&gt;</b>"));
    assert!(without_image.contains("Изображение блюда недоступно"));
    assert!(without_image.contains("• 200г творога\n• 2 яйца\n"));
    assert!(without_image.contains("Смешать &amp; запечь"));
    assert!(without_image.ends_with("Около 300 ккал"));

    let with_image = format_recipe(&localization, &recipe, true, None);
    assert!(!with_image.contains("Изображение блюда недоступно"));
}

#[test]
fn test_calorie_estimate_rounding() {
    let estimate = CalorieEstimate {
        found_foods: vec!["курица".to_string(), "рис".to_string()],
        calories: 295.0,
        protein: 33.7,
        fats: 3.9,
        carbs: 28.0,
    };

    let text = format_calorie_estimate(&manager(), "курица и рис", &estimate, Some("ru"));
    assert!(text.contains("курица, рис"));
    assert!(text.contains("• Калории: 295 ккал"));
    assert!(text.contains("• Белки: 33.7 г"));
    assert!(text.contains("• Жиры: 3.9 г"));
    assert!(text.contains("• Углеводы: 28.0 г"));
}

#[test]
fn test_reminder_confirmation_lists_times() {
    let text = format_reminder_confirmation(&manager(), &ReminderSchedule::default(), None);
    assert!(text.contains("8:00, 12:00 и 18:00"));
}

#[test]
fn test_help_lists_every_command() {
    let text = format_help(&manager(), Some("en"));
    for command in ["/start", "/reg", "/plan", "/recipe", "/track", "/healthtip", "/setreminder", "/help"] {
        assert!(text.contains(command), "{command} missing from help");
    }
}
