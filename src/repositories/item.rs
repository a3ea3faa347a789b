//! ItemRepository - item persistence
//!
//! Items use a single-table layout: the `kind` column discriminates the
//! variant, variant columns are nullable. Stock mutations that belong to an
//! order (decrement on placement, restore on cancel) are persisted by the
//! `OrderRepository` inside the order transaction, not here.

use super::{Create, Read, Update};
use crate::dtos::{CreateItemDTO, UpdateItemDTO};
use crate::entities::{Item, ItemKind};
use sqlx::{Error, SqlitePool};
use tracing::{debug, info, instrument};

const SELECT_ITEM: &str =
    "SELECT item_id, kind, name, price, stock_quantity, author, isbn FROM items";

// ITEM REPOSITORY
pub struct ItemRepository {
    connection_pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Item>, Error> {
        let items = sqlx::query_as::<_, Item>(&format!("{SELECT_ITEM} ORDER BY item_id"))
            .fetch_all(&self.connection_pool)
            .await?;

        Ok(items)
    }
}

impl Create<Item, CreateItemDTO> for ItemRepository {
    #[instrument(skip(self, data), fields(name = %data.name))]
    async fn create(&self, data: &CreateItemDTO) -> Result<Item, Error> {
        debug!("Creating new item");
        let kind = ItemKind::Book {
            author: data.author.clone(),
            isbn: data.isbn.clone(),
        };

        let result = sqlx::query(
            "INSERT INTO items (kind, name, price, stock_quantity, author, isbn) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(kind.discriminator())
        .bind(&data.name)
        .bind(data.price)
        .bind(data.stock_quantity)
        .bind(&data.author)
        .bind(&data.isbn)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();

        info!("Item created with id {}", new_id);

        Ok(Item {
            item_id: new_id,
            name: data.name.clone(),
            price: data.price,
            stock_quantity: data.stock_quantity,
            kind,
        })
    }
}

impl Read<Item, i64> for ItemRepository {
    async fn read(&self, id: &i64) -> Result<Option<Item>, Error> {
        let item = sqlx::query_as::<_, Item>(&format!("{SELECT_ITEM} WHERE item_id = ?"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await?;

        Ok(item)
    }
}

impl Update<Item, UpdateItemDTO, i64> for ItemRepository {
    #[instrument(skip(self, data), fields(item_id = %id))]
    async fn update(&self, id: &i64, data: &UpdateItemDTO) -> Result<Item, Error> {
        debug!("Updating item");
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.name.is_none() && data.price.is_none() && data.stock_quantity.is_none() {
            debug!("No fields to update, returning current item");
            return Ok(current);
        }

        // Dynamic UPDATE built with QueryBuilder, one assignment per
        // present field.
        let mut query_builder = sqlx::QueryBuilder::new("UPDATE items SET ");

        let mut separated = query_builder.separated(", ");
        if let Some(ref name) = data.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }
        if let Some(price) = data.price {
            separated.push("price = ");
            separated.push_bind_unseparated(price);
        }
        if let Some(stock_quantity) = data.stock_quantity {
            separated.push("stock_quantity = ");
            separated.push_bind_unseparated(stock_quantity);
        }

        query_builder.push(" WHERE item_id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;

        info!("Item updated successfully");

        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}
