// src/shopcarts/shopcart_store.rs

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::query_as;
use tracing::{debug, info};

use super::shopcart_structs::{ItemKey, ShopCartItem};
use crate::shared::api_error::AppError;

/// Storage contract for shopcart items. Route handlers only ever see this
/// trait, so the backend can be swapped without touching them.
///
/// All listing methods return items ordered by (customer_id, product_id).
#[async_trait]
pub trait ShopCartStore: Send + Sync {
    /// Inserts a new item. Fails with `Conflict` if the key is taken.
    async fn create(&self, item: &ShopCartItem) -> Result<(), AppError>;

    /// Looks up a single item by its composite key.
    async fn find_by_key(&self, key: ItemKey) -> Result<Option<ShopCartItem>, AppError>;

    /// All items in one customer's cart.
    async fn find_by_customer(&self, customer_id: i32) -> Result<Vec<ShopCartItem>, AppError>;

    /// All items with exactly this price, across customers.
    async fn find_by_price(&self, price: f64) -> Result<Vec<ShopCartItem>, AppError>;

    /// All items with exactly this quantity, across customers.
    async fn find_by_quantity(&self, quantity: i32) -> Result<Vec<ShopCartItem>, AppError>;

    /// All items for one product, across customers.
    async fn find_by_product_id(&self, product_id: i32) -> Result<Vec<ShopCartItem>, AppError>;

    /// Every item in the table.
    async fn list_all(&self) -> Result<Vec<ShopCartItem>, AppError>;

    /// Overwrites name, quantity and price of an existing item. The key
    /// fields themselves are immutable. Fails with `NotFound` if the item
    /// no longer exists.
    async fn update(&self, item: &ShopCartItem) -> Result<(), AppError>;

    /// Removes an item, reporting whether it existed.
    async fn delete(&self, key: ItemKey) -> Result<bool, AppError>;
}

const SELECT_COLUMNS: &str = "SELECT customer_id, product_id, name, quantity, price FROM shopcarts";

/// PostgreSQL-backed store. Each method is a single statement on the pool.
pub struct PostgresShopCartStore {
    pool: PgPool,
}

impl PostgresShopCartStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresShopCartStore { pool }
    }

    /// Creates the `shopcarts` table when it does not exist yet. Run once at
    /// startup, before the server starts accepting requests.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS shopcarts (
                customer_id INTEGER NOT NULL,
                product_id INTEGER NOT NULL,
                name VARCHAR(128) NOT NULL,
                quantity INTEGER NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                PRIMARY KEY (customer_id, product_id)
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ShopCartStore for PostgresShopCartStore {
    async fn create(&self, item: &ShopCartItem) -> Result<(), AppError> {
        info!("Creating {}", item.name);
        // A duplicate key trips the primary-key constraint, which the error
        // conversion turns into a Conflict.
        sqlx::query(
            "INSERT INTO shopcarts (customer_id, product_id, name, quantity, price)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(item.customer_id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_key(&self, key: ItemKey) -> Result<Option<ShopCartItem>, AppError> {
        debug!("Processing lookup for {}", key);
        let item = query_as::<_, ShopCartItem>(&format!(
            "{SELECT_COLUMNS} WHERE customer_id = $1 AND product_id = $2"
        ))
        .bind(key.customer_id)
        .bind(key.product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn find_by_customer(&self, customer_id: i32) -> Result<Vec<ShopCartItem>, AppError> {
        debug!("Processing lookup for customer '{}'", customer_id);
        let items = query_as::<_, ShopCartItem>(&format!(
            "{SELECT_COLUMNS} WHERE customer_id = $1 ORDER BY product_id"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn find_by_price(&self, price: f64) -> Result<Vec<ShopCartItem>, AppError> {
        debug!("Processing price query for '{}'", price);
        let items = query_as::<_, ShopCartItem>(&format!(
            "{SELECT_COLUMNS} WHERE price = $1 ORDER BY customer_id, product_id"
        ))
        .bind(price)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn find_by_quantity(&self, quantity: i32) -> Result<Vec<ShopCartItem>, AppError> {
        debug!("Processing quantity query for '{}'", quantity);
        let items = query_as::<_, ShopCartItem>(&format!(
            "{SELECT_COLUMNS} WHERE quantity = $1 ORDER BY customer_id, product_id"
        ))
        .bind(quantity)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn find_by_product_id(&self, product_id: i32) -> Result<Vec<ShopCartItem>, AppError> {
        debug!("Processing product query for '{}'", product_id);
        let items = query_as::<_, ShopCartItem>(&format!(
            "{SELECT_COLUMNS} WHERE product_id = $1 ORDER BY customer_id"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn list_all(&self) -> Result<Vec<ShopCartItem>, AppError> {
        debug!("Processing list request");
        let items = query_as::<_, ShopCartItem>(&format!(
            "{SELECT_COLUMNS} ORDER BY customer_id, product_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn update(&self, item: &ShopCartItem) -> Result<(), AppError> {
        info!("Saving {}", item.name);
        let result = sqlx::query(
            "UPDATE shopcarts SET name = $3, quantity = $4, price = $5
             WHERE customer_id = $1 AND product_id = $2",
        )
        .bind(item.customer_id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Item with {} was not found",
                item.key()
            )));
        }
        Ok(())
    }

    async fn delete(&self, key: ItemKey) -> Result<bool, AppError> {
        info!("Deleting item for {}", key);
        let result = sqlx::query("DELETE FROM shopcarts WHERE customer_id = $1 AND product_id = $2")
            .bind(key.customer_id)
            .bind(key.product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-memory backend behind the same trait, letting the test suite exercise
/// the store contract and the routes without a running database.
/// RwLock allows many readers or a single writer.
#[derive(Default)]
pub struct MemoryShopCartStore {
    items: RwLock<HashMap<ItemKey, ShopCartItem>>,
}

fn sorted(mut items: Vec<ShopCartItem>) -> Vec<ShopCartItem> {
    items.sort_by_key(|item| (item.customer_id, item.product_id));
    items
}

#[async_trait]
impl ShopCartStore for MemoryShopCartStore {
    async fn create(&self, item: &ShopCartItem) -> Result<(), AppError> {
        let mut items = self.items.write().unwrap();
        if items.contains_key(&item.key()) {
            return Err(AppError::Conflict(
                "An item with this key already exists".to_string(),
            ));
        }
        items.insert(item.key(), item.clone());
        Ok(())
    }

    async fn find_by_key(&self, key: ItemKey) -> Result<Option<ShopCartItem>, AppError> {
        let items = self.items.read().unwrap();
        Ok(items.get(&key).cloned())
    }

    async fn find_by_customer(&self, customer_id: i32) -> Result<Vec<ShopCartItem>, AppError> {
        let items = self.items.read().unwrap();
        Ok(sorted(
            items
                .values()
                .filter(|item| item.customer_id == customer_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_price(&self, price: f64) -> Result<Vec<ShopCartItem>, AppError> {
        let items = self.items.read().unwrap();
        Ok(sorted(
            items
                .values()
                .filter(|item| item.price == price)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_quantity(&self, quantity: i32) -> Result<Vec<ShopCartItem>, AppError> {
        let items = self.items.read().unwrap();
        Ok(sorted(
            items
                .values()
                .filter(|item| item.quantity == quantity)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_product_id(&self, product_id: i32) -> Result<Vec<ShopCartItem>, AppError> {
        let items = self.items.read().unwrap();
        Ok(sorted(
            items
                .values()
                .filter(|item| item.product_id == product_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<ShopCartItem>, AppError> {
        let items = self.items.read().unwrap();
        Ok(sorted(items.values().cloned().collect()))
    }

    async fn update(&self, item: &ShopCartItem) -> Result<(), AppError> {
        let mut items = self.items.write().unwrap();
        if !items.contains_key(&item.key()) {
            return Err(AppError::NotFound(format!(
                "Item with {} was not found",
                item.key()
            )));
        }
        items.insert(item.key(), item.clone());
        Ok(())
    }

    async fn delete(&self, key: ItemKey) -> Result<bool, AppError> {
        let mut items = self.items.write().unwrap();
        Ok(items.remove(&key).is_some())
    }
}
