//! SQLite storage for products and orders.
//!
//! An order copies its product's current price when it is placed, so later
//! price changes leave order history alone.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::price::Price;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub current_price: Price,
    pub order_count: i64,
}

/// An order joined with its product's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id: i64,
    pub created: NaiveDateTime,
    pub price: Price,
    pub product_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductDeletion {
    Deleted,
    NotFound,
    /// Products with order history are kept; carries the order count.
    HasOrders(i64),
}

/// Database handle shared by all request handlers.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if needed) the database at `url` and ensure the schema.
    pub async fn open(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        if let Some(parent) = options.get_filename().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", url))?;

        let store = Self { pool };
        store.init_schema().await?;

        log::info!("[store] database ready at {}", url);
        Ok(store)
    }

    /// A private in-memory database, used by tests and throwaway runs.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // Every connection to `:memory:` is its own database, so keep exactly one alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "
            CREATE TABLE IF NOT EXISTS product (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                current_price INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "
            CREATE TABLE IF NOT EXISTS coffee_order (
                id INTEGER PRIMARY KEY,
                product INTEGER NOT NULL REFERENCES product(id),
                price INTEGER NOT NULL,
                created TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS coffee_order_product ON coffee_order (product)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ── Products ──────────────────────────────────────────────────────────────

    pub async fn products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            "SELECT product.id, product.name, product.current_price, COUNT(coffee_order.id) AS order_count
             FROM product LEFT JOIN coffee_order ON coffee_order.product = product.id
             GROUP BY product.id
             ORDER BY product.id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load products")?;

        rows.iter()
            .map(|r| -> Result<Product> {
                Ok(Product {
                    id: r.get("id"),
                    name: r.get("name"),
                    current_price: Price::from_cents(r.get("current_price"))?,
                    order_count: r.get("order_count"),
                })
            })
            .collect()
    }

    pub async fn create_product(&self, name: &str, price: Price) -> Result<i64> {
        let result = sqlx::query("INSERT INTO product (name, current_price) VALUES (?, ?)")
            .bind(name)
            .bind(price.cents())
            .execute(&self.pool)
            .await
            .context("Failed to create product")?;

        let id = result.last_insert_rowid();
        log::info!("[store] created product {} ({:?} at {})", id, name, price);
        Ok(id)
    }

    /// Returns false if no product has this id.
    pub async fn update_product(&self, id: i64, name: &str, price: Price) -> Result<bool> {
        let result = sqlx::query("UPDATE product SET current_price = ?, name = ? WHERE id = ?")
            .bind(price.cents())
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to update product {}", id))?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a product that has no orders.
    ///
    /// The order check and the delete are one statement, so an order placed
    /// concurrently either lands first (and blocks the delete) or finds the
    /// product gone.
    pub async fn delete_product(&self, id: i64) -> Result<ProductDeletion> {
        let result = sqlx::query(
            "DELETE FROM product WHERE id = ? AND NOT EXISTS (SELECT 1 FROM coffee_order WHERE product = ?)",
        )
        .bind(id)
        .bind(id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to delete product {}", id))?;

        if result.rows_affected() > 0 {
            log::info!("[store] deleted product {}", id);
            return Ok(ProductDeletion::Deleted);
        }

        let order_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coffee_order WHERE product = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to count orders for product {}", id))?;

        Ok(if order_count > 0 {
            ProductDeletion::HasOrders(order_count)
        } else {
            ProductDeletion::NotFound
        })
    }

    // ── Orders ────────────────────────────────────────────────────────────────

    /// Orders, newest first.
    pub async fn orders(&self) -> Result<Vec<OrderRow>> {
        self.fetch_orders("DESC").await
    }

    /// Orders, oldest first (CSV export order).
    pub async fn order_history(&self) -> Result<Vec<OrderRow>> {
        self.fetch_orders("ASC").await
    }

    async fn fetch_orders(&self, direction: &'static str) -> Result<Vec<OrderRow>> {
        let sql = format!(
            "SELECT coffee_order.id AS id, coffee_order.created AS created, coffee_order.price AS price,
                    product.name AS product_name
             FROM coffee_order INNER JOIN product ON coffee_order.product = product.id
             ORDER BY coffee_order.created {direction}, coffee_order.id {direction}"
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to load orders")?;

        rows.iter().map(order_row).collect()
    }

    /// Places an order at the product's current price.
    /// Returns `None` if the product doesn't exist.
    pub async fn create_order(&self, product: i64) -> Result<Option<i64>> {
        let result = sqlx::query(
            "INSERT INTO coffee_order (product, price) SELECT id, current_price FROM product WHERE id = ?",
        )
        .bind(product)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to create order for product {}", product))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(result.last_insert_rowid()))
    }

    /// Returns false if no order has this id.
    pub async fn delete_order(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM coffee_order WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete order {}", id))?;

        Ok(result.rows_affected() > 0)
    }
}

fn order_row(r: &SqliteRow) -> Result<OrderRow> {
    Ok(OrderRow {
        id: r.get("id"),
        created: r.get("created"),
        price: Price::from_cents(r.get("price"))?,
        product_name: r.get("product_name"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn products_include_order_counts() {
        let store = Store::in_memory().await.unwrap();
        let espresso = store.create_product("Espresso", price("2.00")).await.unwrap();
        let latte = store.create_product("Latte", price("3.50")).await.unwrap();

        store.create_order(espresso).await.unwrap();
        store.create_order(espresso).await.unwrap();

        let products = store.products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, espresso);
        assert_eq!(products[0].order_count, 2);
        assert_eq!(products[1].id, latte);
        assert_eq!(products[1].name, "Latte");
        assert_eq!(products[1].current_price, price("3.50"));
        assert_eq!(products[1].order_count, 0);
    }

    #[tokio::test]
    async fn order_keeps_price_from_when_it_was_placed() {
        let store = Store::in_memory().await.unwrap();
        let id = store.create_product("Mocha", price("4.00")).await.unwrap();
        store.create_order(id).await.unwrap();

        assert!(store.update_product(id, "Mocha", price("4.50")).await.unwrap());
        store.create_order(id).await.unwrap();

        let orders = store.order_history().await.unwrap();
        let prices: Vec<_> = orders.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![price("4.00"), price("4.50")]);
        assert!(orders.iter().all(|o| o.product_name == "Mocha"));
    }

    #[tokio::test]
    async fn orders_are_listed_newest_first() {
        let store = Store::in_memory().await.unwrap();
        let id = store.create_product("Tea", price("1.80")).await.unwrap();
        let first = store.create_order(id).await.unwrap().unwrap();
        let second = store.create_order(id).await.unwrap().unwrap();

        let newest_first: Vec<_> = store.orders().await.unwrap().iter().map(|o| o.id).collect();
        let oldest_first: Vec<_> = store.order_history().await.unwrap().iter().map(|o| o.id).collect();
        assert_eq!(newest_first, vec![second, first]);
        assert_eq!(oldest_first, vec![first, second]);
    }

    #[tokio::test]
    async fn ordering_unknown_product_creates_nothing() {
        let store = Store::in_memory().await.unwrap();
        assert_eq!(store.create_order(99).await.unwrap(), None);
        assert!(store.orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_order_reports_missing_rows() {
        let store = Store::in_memory().await.unwrap();
        let id = store.create_product("Tea", price("1.80")).await.unwrap();
        let order = store.create_order(id).await.unwrap().unwrap();

        assert!(store.delete_order(order).await.unwrap());
        assert!(!store.delete_order(order).await.unwrap());
    }

    #[tokio::test]
    async fn products_with_orders_are_not_deleted() {
        let store = Store::in_memory().await.unwrap();
        let kept = store.create_product("Flat white", price("3.20")).await.unwrap();
        let dropped = store.create_product("Cortado", price("2.90")).await.unwrap();
        store.create_order(kept).await.unwrap();

        assert_eq!(store.delete_product(kept).await.unwrap(), ProductDeletion::HasOrders(1));
        assert_eq!(store.delete_product(dropped).await.unwrap(), ProductDeletion::Deleted);
        assert_eq!(store.delete_product(dropped).await.unwrap(), ProductDeletion::NotFound);

        let names: Vec<_> = store.products().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Flat white".to_string()]);
    }

    #[tokio::test]
    async fn refused_delete_keeps_product_and_its_orders() {
        let store = Store::in_memory().await.unwrap();
        let id = store.create_product("Flat white", price("3.20")).await.unwrap();
        let order = store.create_order(id).await.unwrap().unwrap();

        assert_eq!(store.delete_product(id).await.unwrap(), ProductDeletion::HasOrders(1));

        assert_eq!(store.products().await.unwrap()[0].id, id);
        assert!(store.delete_order(order).await.unwrap());
        assert_eq!(store.delete_product(id).await.unwrap(), ProductDeletion::Deleted);
    }

    #[tokio::test]
    async fn racing_order_and_delete_never_orphans_an_order() {
        let path = std::env::temp_dir().join(format!("coffee-web-delete-race-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let store = Store::open(&format!("sqlite://{}", path.display())).await.unwrap();

        for round in 0..20 {
            let id = store.create_product(&format!("Round {}", round), price("1.00")).await.unwrap();

            let (order, deletion) = tokio::join!(store.create_order(id), store.delete_product(id));

            match (order.unwrap(), deletion.unwrap()) {
                (Some(_), ProductDeletion::HasOrders(1)) => {}
                (None, ProductDeletion::Deleted) => {}
                other => panic!("round {}: inconsistent outcome {:?}", round, other),
            }
        }

        let orphans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM coffee_order WHERE product NOT IN (SELECT id FROM product)",
        )
        .fetch_one(&store.pool)
        .await
        .unwrap();
        assert_eq!(orphans, 0);

        store.pool.close().await;
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn update_of_unknown_product_reports_false() {
        let store = Store::in_memory().await.unwrap();
        assert!(!store.update_product(7, "Ghost", price("1")).await.unwrap());
    }
}
