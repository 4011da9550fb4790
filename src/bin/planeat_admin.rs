//! Read-only inspection of the PlanEat database.

use anyhow::Result;
use clap::{Parser, Subcommand};
use plan_eat::config::DatabaseConfig;
use plan_eat::db;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "planeat_admin")]
#[command(about = "Read-only inspection of the PlanEat database", long_about = None)]
struct Cli {
    /// Print results as pretty JSON
    #[arg(long, global = true)]
    json: bool,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://planeat.db")]
    database_url: String,

    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum AdminCommand {
    /// Registered users, newest first
    Users,
    /// Recipes by meal type
    Recipes,
    /// Meal plan rows by goal, day and meal
    Plans,
    /// Food nutrition table by name
    Foods,
    /// Health tips
    Tips,
    /// One recipe with its ingredients
    Recipe { id: i64 },
    /// One meal plan row
    Plan { id: i64 },
    /// One food row
    Food { id: i64 },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn not_found(kind: &str, id: i64) {
    println!("{kind} with ID {id} not found");
}

async fn run(pool: &sqlx::SqlitePool, command: AdminCommand, json: bool) -> Result<()> {
    match command {
        AdminCommand::Users => {
            let users = db::get_all_users(pool).await?;
            if json {
                return print_json(&users);
            }
            for user in users {
                println!(
                    "{}\t@{}\t{} {}\tchat={}\t{}",
                    user.user_id,
                    user.username.unwrap_or_default(),
                    user.first_name.unwrap_or_default(),
                    user.last_name.unwrap_or_default(),
                    user.chat_id,
                    user.registration_date.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        AdminCommand::Recipes => {
            let recipes = db::get_all_recipes(pool).await?;
            if json {
                return print_json(&recipes);
            }
            for recipe in recipes {
                println!("{}\t{}\t{}\t{}", recipe.id, recipe.meal_type, recipe.name, recipe.calories);
            }
        }
        AdminCommand::Plans => {
            let plans = db::get_all_meal_plans(pool).await?;
            if json {
                return print_json(&plans);
            }
            for plan in plans {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{} ккал",
                    plan.id, plan.goal, plan.day, plan.meal, plan.dish, plan.calories
                );
            }
        }
        AdminCommand::Foods => {
            let foods = db::get_all_foods(pool).await?;
            if json {
                return print_json(&foods);
            }
            for food in foods {
                println!(
                    "{}\t{}\t{} ккал\tБ {}\tЖ {}\tУ {}",
                    food.id, food.name, food.calories, food.protein, food.fats, food.carbs
                );
            }
        }
        AdminCommand::Tips => {
            let tips = db::get_health_tips(pool).await?;
            if json {
                return print_json(&tips);
            }
            for tip in tips {
                println!("{tip}");
            }
        }
        AdminCommand::Recipe { id } => match db::get_recipe_by_id(pool, id).await? {
            Some(recipe) if json => print_json(&recipe)?,
            Some(recipe) => {
                println!("{} ({}) - {}", recipe.name, recipe.meal_type, recipe.calories);
                for ingredient in &recipe.ingredients {
                    println!("  • {ingredient}");
                }
                println!("{}", recipe.instructions);
                if let Some(url) = recipe.image_url {
                    println!("{url}");
                }
            }
            None => not_found("Recipe", id),
        },
        AdminCommand::Plan { id } => match db::get_meal_plan_by_id(pool, id).await? {
            Some(plan) if json => print_json(&plan)?,
            Some(plan) => println!(
                "{}: {} / {} / {}: {} ({} ккал)",
                plan.id, plan.goal, plan.day, plan.meal, plan.dish, plan.calories
            ),
            None => not_found("Meal plan", id),
        },
        AdminCommand::Food { id } => match db::get_food_by_id(pool, id).await? {
            Some(food) if json => print_json(&food)?,
            Some(food) => println!(
                "{}: {} ккал, белки {} г, жиры {} г, углеводы {} г",
                food.name, food.calories, food.protein, food.fats, food.carbs
            ),
            None => not_found("Food", id),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = DatabaseConfig {
        url: cli.database_url,
        ..DatabaseConfig::default()
    };
    config.validate()?;

    let pool = db::connect_pool(&config).await?;
    let result = run(&pool, cli.command, cli.json).await;
    pool.close().await;
    result
}
