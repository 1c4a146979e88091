//! SQLite drink storage
//!
//! Ingredients are stored as JSON text and decoded on every read.

use coffeeshop_core::{
    async_trait, not_found_error, storage_error, validation_error, CoffeeShopError,
    CoffeeShopResult, DatabaseConfig, Drink, DrinkId, DrinkStore, Ingredient, NewDrink,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};
use std::str::FromStr;
use tracing::{debug, info};

const COMPONENT: &str = "drink_database";

const CREATE_DRINK_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drink (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        ingredients TEXT NOT NULL
    )
"#;

/// Drink store backed by a sqlx SQLite pool
#[derive(Debug, Clone)]
pub struct DrinkDatabase {
    pool: SqlitePool,
}

impl DrinkDatabase {
    /// Open the database and make sure the schema exists
    pub async fn connect(config: &DatabaseConfig) -> CoffeeShopResult<Self> {
        info!("Connecting to database: {}", config.url);

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| {
                storage_error!(format!("Invalid database url: {}", e), COMPONENT, e)
            })?
            .create_if_missing(true);

        // Every connection to an in-memory database sees its own empty
        // database, so keep exactly one alive for the pool's lifetime.
        let pool_options = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| storage_error!(format!("Failed to connect: {}", e), COMPONENT, e))?;

        let database = Self { pool };
        database.create_tables().await?;

        info!("Database ready");
        Ok(database)
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create_tables(&self) -> CoffeeShopResult<()> {
        debug!("Creating drink table");
        sqlx::query(CREATE_DRINK_TABLE)
            .execute(&self.pool)
            .await
            .map_err(db_error("create_tables"))?;
        Ok(())
    }

    /// Drop all drinks, recreate the schema and seed a sample drink
    pub async fn drop_and_create_all(&self) -> CoffeeShopResult<Drink> {
        info!("Resetting drink table");
        sqlx::query("DROP TABLE IF EXISTS drink")
            .execute(&self.pool)
            .await
            .map_err(db_error("drop_table"))?;
        self.create_tables().await?;

        self.insert(NewDrink::new(
            "water",
            vec![Ingredient::new("water", "blue", 1)],
        ))
        .await
    }
}

/// Map a sqlx failure, turning constraint violations into validation errors
fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> CoffeeShopError {
    move |e| {
        let unique_violation = e
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);

        if unique_violation {
            validation_error!("a drink with this title already exists", "title", COMPONENT)
        } else {
            CoffeeShopError::Storage {
                message: format!("{} failed: {}", operation, e),
                source: Some(Box::new(e)),
                context: coffeeshop_core::ErrorContext::new(COMPONENT).with_operation(operation),
            }
        }
    }
}

fn drink_from_row(row: &SqliteRow) -> CoffeeShopResult<Drink> {
    let id: DrinkId = row.try_get("id").map_err(db_error("decode_row"))?;
    let title: String = row.try_get("title").map_err(db_error("decode_row"))?;
    let recipe: String = row.try_get("ingredients").map_err(db_error("decode_row"))?;

    let ingredients = serde_json::from_str(&recipe).map_err(|e| {
        storage_error!(
            format!("Drink {} has an unreadable ingredient list: {}", id, e),
            COMPONENT,
            e
        )
    })?;

    Ok(Drink {
        id,
        title,
        ingredients,
    })
}

#[async_trait]
impl DrinkStore for DrinkDatabase {
    async fn list(&self) -> CoffeeShopResult<Vec<Drink>> {
        let rows = sqlx::query("SELECT id, title, ingredients FROM drink ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list"))?;

        rows.iter().map(drink_from_row).collect()
    }

    async fn find(&self, id: DrinkId) -> CoffeeShopResult<Option<Drink>> {
        let row = sqlx::query("SELECT id, title, ingredients FROM drink WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find"))?;

        row.as_ref().map(drink_from_row).transpose()
    }

    async fn insert(&self, drink: NewDrink) -> CoffeeShopResult<Drink> {
        drink.validate()?;
        let recipe = serde_json::to_string(&drink.ingredients)?;

        let result = sqlx::query("INSERT INTO drink (title, ingredients) VALUES (?, ?)")
            .bind(&drink.title)
            .bind(&recipe)
            .execute(&self.pool)
            .await
            .map_err(db_error("insert"))?;

        let id = result.last_insert_rowid();
        debug!("Inserted drink {} ({})", id, drink.title);

        Ok(Drink {
            id,
            title: drink.title,
            ingredients: drink.ingredients,
        })
    }

    async fn update(&self, drink: &Drink) -> CoffeeShopResult<()> {
        let recipe = serde_json::to_string(&drink.ingredients)?;

        let result = sqlx::query("UPDATE drink SET title = ?, ingredients = ? WHERE id = ?")
            .bind(&drink.title)
            .bind(&recipe)
            .bind(drink.id)
            .execute(&self.pool)
            .await
            .map_err(db_error("update"))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error!(format!("drink {}", drink.id), COMPONENT));
        }

        debug!("Updated drink {}", drink.id);
        Ok(())
    }

    async fn delete(&self, id: DrinkId) -> CoffeeShopResult<()> {
        let result = sqlx::query("DELETE FROM drink WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete"))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error!(format!("drink {}", id), COMPONENT));
        }

        debug!("Deleted drink {}", id);
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }
}
