use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::observability::record_db_metrics;
use crate::seed_data;

/// Represents a registered chat participant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub chat_id: i64,
    pub registration_date: DateTime<Utc>,
}

/// Fields needed to register a user
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub user_id: i64,
    pub username: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub chat_id: i64,
}

/// One line of a goal's weekly plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPlanRow {
    pub day: String,
    pub meal: String,
    pub dish: String,
    pub calories: i64,
}

/// A full meal plan row, as listed by the admin tools
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPlanEntry {
    pub id: i64,
    pub goal: String,
    pub day: String,
    pub meal: String,
    pub dish: String,
    pub calories: i64,
}

/// Represents a recipe together with its ingredient lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: i64,
    pub meal_type: String,
    pub name: String,
    pub instructions: String,
    pub calories: String,
    pub image_url: Option<String>,
    pub ingredients: Vec<String>,
}

/// Recipe listing row without instructions or ingredients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub meal_type: String,
    pub name: String,
    pub calories: String,
}

/// Nutrition values per 100g of a reference food
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub fats: f64,
    pub carbs: f64,
}

/// Which reference tables were filled during initialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub meal_plans: bool,
    pub recipes: bool,
    pub foods: bool,
    pub health_tips: bool,
}

impl SeedReport {
    pub fn seeded_any(&self) -> bool {
        self.meal_plans || self.recipes || self.foods || self.health_tips
    }
}

const MEAL_RANK_SQL: &str = "CASE meal \
    WHEN 'Завтрак' THEN 1 \
    WHEN 'Перекус 1' THEN 2 \
    WHEN 'Обед' THEN 3 \
    WHEN 'Перекус 2' THEN 4 \
    WHEN 'Ужин' THEN 5 \
    ELSE 6 END";

/// Open the SQLite pool, creating the file if needed
pub async fn connect_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database URL: {}", config.url))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .context("Failed to open database")?;

    Ok(pool)
}

/// Create the schema and seed every empty reference table.
///
/// Runs in one transaction so a half-seeded store is never observed. Calling
/// it again on a seeded store changes nothing.
pub async fn init_database(pool: &SqlitePool) -> Result<SeedReport> {
    info!("Initializing database schema");
    let start = Instant::now();

    let mut tx = pool
        .begin()
        .await
        .context("Failed to begin initialization transaction")?;

    create_schema(&mut tx).await?;

    let mut report = SeedReport::default();

    if table_is_empty(&mut tx, "meal_plans").await? {
        seed_meal_plans(&mut tx).await?;
        report.meal_plans = true;
        info!(rows = seed_data::MEAL_PLANS.len(), "Initial meal plans data inserted");
    }

    if table_is_empty(&mut tx, "recipes").await? {
        seed_recipes(&mut tx).await?;
        report.recipes = true;
        info!(rows = seed_data::RECIPES.len(), "Initial recipes and ingredients data inserted");
    }

    if table_is_empty(&mut tx, "food_data").await? {
        seed_foods(&mut tx).await?;
        report.foods = true;
        info!(rows = seed_data::FOODS.len(), "Initial food data inserted");
    }

    if table_is_empty(&mut tx, "health_tips").await? {
        seed_health_tips(&mut tx).await?;
        report.health_tips = true;
        info!(rows = seed_data::HEALTH_TIPS.len(), "Initial health tips data inserted");
    }

    tx.commit()
        .await
        .context("Failed to commit initialization transaction")?;

    record_db_metrics("init_database", start.elapsed());
    info!(seeded = report.seeded_any(), "Database schema initialized successfully");
    Ok(report)
}

async fn create_schema(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY,
            username TEXT,
            first_name TEXT,
            last_name TEXT,
            chat_id INTEGER NOT NULL,
            registration_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(&mut *conn)
    .await
    .context("Failed to create users table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS meal_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            goal TEXT NOT NULL,
            day TEXT NOT NULL,
            meal TEXT NOT NULL,
            dish TEXT NOT NULL,
            calories INTEGER NOT NULL
        )",
    )
    .execute(&mut *conn)
    .await
    .context("Failed to create meal_plans table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            meal_type TEXT NOT NULL,
            name TEXT NOT NULL,
            instructions TEXT NOT NULL,
            calories TEXT NOT NULL,
            image_url TEXT
        )",
    )
    .execute(&mut *conn)
    .await
    .context("Failed to create recipes table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipe_ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL,
            ingredient TEXT NOT NULL,
            FOREIGN KEY (recipe_id) REFERENCES recipes (id)
        )",
    )
    .execute(&mut *conn)
    .await
    .context("Failed to create recipe_ingredients table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS food_data (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            calories REAL NOT NULL,
            protein REAL NOT NULL,
            fats REAL NOT NULL,
            carbs REAL NOT NULL
        )",
    )
    .execute(&mut *conn)
    .await
    .context("Failed to create food_data table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS health_tips (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tip TEXT NOT NULL
        )",
    )
    .execute(&mut *conn)
    .await
    .context("Failed to create health_tips table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS meal_plans_goal_idx ON meal_plans(goal)")
        .execute(&mut *conn)
        .await
        .context("Failed to create meal_plans goal index")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS recipes_meal_type_idx ON recipes(meal_type)")
        .execute(&mut *conn)
        .await
        .context("Failed to create recipes meal_type index")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS recipe_ingredients_recipe_id_idx ON recipe_ingredients(recipe_id)",
    )
    .execute(&mut *conn)
    .await
    .context("Failed to create recipe_ingredients recipe_id index")?;

    Ok(())
}

async fn table_is_empty(conn: &mut SqliteConnection, table: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&mut *conn)
        .await
        .with_context(|| format!("Failed to count rows in {table}"))?;
    Ok(count == 0)
}

async fn seed_meal_plans(conn: &mut SqliteConnection) -> Result<()> {
    for (goal, day, meal, dish, calories) in seed_data::MEAL_PLANS {
        sqlx::query(
            "INSERT INTO meal_plans (goal, day, meal, dish, calories) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(goal)
        .bind(day)
        .bind(meal)
        .bind(dish)
        .bind(calories)
        .execute(&mut *conn)
        .await
        .context("Failed to insert meal plan seed row")?;
    }
    Ok(())
}

async fn seed_recipes(conn: &mut SqliteConnection) -> Result<()> {
    for recipe in seed_data::RECIPES {
        let recipe_id = sqlx::query(
            "INSERT INTO recipes (meal_type, name, instructions, calories, image_url) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(recipe.meal_type)
        .bind(recipe.name)
        .bind(recipe.instructions)
        .bind(recipe.calories)
        .bind(recipe.image_url)
        .execute(&mut *conn)
        .await
        .context("Failed to insert recipe seed row")?
        .last_insert_rowid();

        for ingredient in recipe.ingredients {
            sqlx::query("INSERT INTO recipe_ingredients (recipe_id, ingredient) VALUES (?, ?)")
                .bind(recipe_id)
                .bind(ingredient)
                .execute(&mut *conn)
                .await
                .context("Failed to insert recipe ingredient seed row")?;
        }
    }
    Ok(())
}

async fn seed_foods(conn: &mut SqliteConnection) -> Result<()> {
    for (name, calories, protein, fats, carbs) in seed_data::FOODS {
        sqlx::query(
            "INSERT INTO food_data (name, calories, protein, fats, carbs) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(calories)
        .bind(protein)
        .bind(fats)
        .bind(carbs)
        .execute(&mut *conn)
        .await
        .context("Failed to insert food seed row")?;
    }
    Ok(())
}

async fn seed_health_tips(conn: &mut SqliteConnection) -> Result<()> {
    for tip in seed_data::HEALTH_TIPS {
        sqlx::query("INSERT INTO health_tips (tip) VALUES (?)")
            .bind(tip)
            .execute(&mut *conn)
            .await
            .context("Failed to insert health tip seed row")?;
    }
    Ok(())
}

/// Check whether a user with the given Telegram id is registered
pub async fn user_exists(pool: &SqlitePool, user_id: i64) -> Result<bool> {
    debug!(user_id = %user_id, "Checking user existence");

    let row = sqlx::query("SELECT user_id FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to check user existence")?;

    Ok(row.is_some())
}

/// Insert a new user. Callers check [`user_exists`] first; a duplicate id is an error.
pub async fn add_user(pool: &SqlitePool, user: &NewUser<'_>) -> Result<()> {
    let start = Instant::now();

    sqlx::query(
        "INSERT INTO users (user_id, username, first_name, last_name, chat_id, registration_date) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user.user_id)
    .bind(user.username)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.chat_id)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to insert new user")?;

    record_db_metrics("add_user", start.elapsed());
    info!(
        user_id = %user.user_id,
        username = ?user.username,
        first_name = ?user.first_name,
        last_name = ?user.last_name,
        "Added new user"
    );
    Ok(())
}

/// Weekly plan for a goal, ordered by day then by meal slot
pub async fn get_meal_plan(pool: &SqlitePool, goal: &str) -> Result<Vec<MealPlanRow>> {
    debug!(goal = %goal, "Loading meal plan");
    let start = Instant::now();

    let rows = sqlx::query(&format!(
        "SELECT day, meal, dish, calories FROM meal_plans WHERE goal = ? ORDER BY day, {MEAL_RANK_SQL}"
    ))
    .bind(goal)
    .fetch_all(pool)
    .await
    .context("Failed to load meal plan")?;

    let plan: Vec<MealPlanRow> = rows
        .into_iter()
        .map(|row| MealPlanRow {
            day: row.get(0),
            meal: row.get(1),
            dish: row.get(2),
            calories: row.get(3),
        })
        .collect();

    record_db_metrics("get_meal_plan", start.elapsed());
    debug!(goal = %goal, rows = plan.len(), "Meal plan loaded");
    Ok(plan)
}

async fn load_ingredients(pool: &SqlitePool, recipe_id: i64) -> Result<Vec<String>> {
    sqlx::query_scalar("SELECT ingredient FROM recipe_ingredients WHERE recipe_id = ? ORDER BY id")
        .bind(recipe_id)
        .fetch_all(pool)
        .await
        .context("Failed to load recipe ingredients")
}

/// First recipe of a meal type, with its ingredients
pub async fn get_recipe(pool: &SqlitePool, meal_type: &str) -> Result<Option<Recipe>> {
    debug!(meal_type = %meal_type, "Loading recipe");
    let start = Instant::now();

    let row = sqlx::query(
        "SELECT id, meal_type, name, instructions, calories, image_url FROM recipes WHERE meal_type = ? ORDER BY id LIMIT 1",
    )
    .bind(meal_type)
    .fetch_optional(pool)
    .await
    .context("Failed to load recipe")?;

    let recipe = match row {
        Some(row) => {
            let id: i64 = row.get(0);
            Some(Recipe {
                id,
                meal_type: row.get(1),
                name: row.get(2),
                instructions: row.get(3),
                calories: row.get(4),
                image_url: row.get(5),
                ingredients: load_ingredients(pool, id).await?,
            })
        }
        None => {
            debug!(meal_type = %meal_type, "No recipe found");
            None
        }
    };

    record_db_metrics("get_recipe", start.elapsed());
    Ok(recipe)
}

/// Every reference food in table order
pub async fn get_food_data(pool: &SqlitePool) -> Result<Vec<FoodItem>> {
    let start = Instant::now();

    let rows = sqlx::query("SELECT id, name, calories, protein, fats, carbs FROM food_data ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to load food data")?;

    record_db_metrics("get_food_data", start.elapsed());
    Ok(rows.into_iter().map(food_from_row).collect())
}

fn food_from_row(row: sqlx::sqlite::SqliteRow) -> FoodItem {
    FoodItem {
        id: row.get(0),
        name: row.get(1),
        calories: row.get(2),
        protein: row.get(3),
        fats: row.get(4),
        carbs: row.get(5),
    }
}

/// All stored health tips
pub async fn get_health_tips(pool: &SqlitePool) -> Result<Vec<String>> {
    let start = Instant::now();

    let tips = sqlx::query_scalar("SELECT tip FROM health_tips")
        .fetch_all(pool)
        .await
        .context("Failed to load health tips")?;

    record_db_metrics("get_health_tips", start.elapsed());
    Ok(tips)
}

/// All users, newest registration first
pub async fn get_all_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(
        "SELECT user_id, username, first_name, last_name, chat_id, registration_date FROM users ORDER BY registration_date DESC",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list users")?;

    let users: Vec<User> = rows
        .into_iter()
        .map(|row| User {
            user_id: row.get(0),
            username: row.get(1),
            first_name: row.get(2),
            last_name: row.get(3),
            chat_id: row.get(4),
            registration_date: row.get(5),
        })
        .collect();

    info!("Found {} users", users.len());
    Ok(users)
}

/// All recipes ordered by meal type
pub async fn get_all_recipes(pool: &SqlitePool) -> Result<Vec<RecipeSummary>> {
    let rows = sqlx::query("SELECT id, meal_type, name, calories FROM recipes ORDER BY meal_type")
        .fetch_all(pool)
        .await
        .context("Failed to list recipes")?;

    Ok(rows
        .into_iter()
        .map(|row| RecipeSummary {
            id: row.get(0),
            meal_type: row.get(1),
            name: row.get(2),
            calories: row.get(3),
        })
        .collect())
}

/// Look a recipe up by id
pub async fn get_recipe_by_id(pool: &SqlitePool, recipe_id: i64) -> Result<Option<Recipe>> {
    debug!(recipe_id = %recipe_id, "Reading recipe");

    let row = sqlx::query(
        "SELECT id, meal_type, name, instructions, calories, image_url FROM recipes WHERE id = ?",
    )
    .bind(recipe_id)
    .fetch_optional(pool)
    .await
    .context("Failed to read recipe")?;

    match row {
        Some(row) => Ok(Some(Recipe {
            id: row.get(0),
            meal_type: row.get(1),
            name: row.get(2),
            instructions: row.get(3),
            calories: row.get(4),
            image_url: row.get(5),
            ingredients: load_ingredients(pool, recipe_id).await?,
        })),
        None => {
            info!("No recipe found with ID: {recipe_id}");
            Ok(None)
        }
    }
}

fn meal_plan_entry_from_row(row: sqlx::sqlite::SqliteRow) -> MealPlanEntry {
    MealPlanEntry {
        id: row.get(0),
        goal: row.get(1),
        day: row.get(2),
        meal: row.get(3),
        dish: row.get(4),
        calories: row.get(5),
    }
}

/// All meal plan rows ordered by goal, day and meal name
pub async fn get_all_meal_plans(pool: &SqlitePool) -> Result<Vec<MealPlanEntry>> {
    let rows = sqlx::query(
        "SELECT id, goal, day, meal, dish, calories FROM meal_plans ORDER BY goal, day, meal",
    )
    .fetch_all(pool)
    .await
    .context("Failed to list meal plans")?;

    Ok(rows.into_iter().map(meal_plan_entry_from_row).collect())
}

/// Look a meal plan row up by id
pub async fn get_meal_plan_by_id(pool: &SqlitePool, plan_id: i64) -> Result<Option<MealPlanEntry>> {
    let row = sqlx::query("SELECT id, goal, day, meal, dish, calories FROM meal_plans WHERE id = ?")
        .bind(plan_id)
        .fetch_optional(pool)
        .await
        .context("Failed to read meal plan")?;

    if row.is_none() {
        info!("No meal plan found with ID: {plan_id}");
    }
    Ok(row.map(meal_plan_entry_from_row))
}

/// All foods ordered by name
pub async fn get_all_foods(pool: &SqlitePool) -> Result<Vec<FoodItem>> {
    let rows = sqlx::query("SELECT id, name, calories, protein, fats, carbs FROM food_data ORDER BY name")
        .fetch_all(pool)
        .await
        .context("Failed to list foods")?;

    Ok(rows.into_iter().map(food_from_row).collect())
}

/// Look a food up by id
pub async fn get_food_by_id(pool: &SqlitePool, food_id: i64) -> Result<Option<FoodItem>> {
    let row = sqlx::query("SELECT id, name, calories, protein, fats, carbs FROM food_data WHERE id = ?")
        .bind(food_id)
        .fetch_optional(pool)
        .await
        .context("Failed to read food")?;

    if row.is_none() {
        info!("No food found with ID: {food_id}");
    }
    Ok(row.map(food_from_row))
}

/// Check database connectivity and basic query capability
pub async fn check_database_health(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .context("Database health check failed")?;

    debug!("Database health check passed");
    Ok(())
}
