//! Item entity - single-table variants with stock management

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use thiserror::Error;

/// Raised by [`Item::remove_stock`] when a decrement would drive the stock
/// below zero. The item is left unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("not enough stock: requested {requested}, remaining {remaining}")]
pub struct NotEnoughStock {
    pub requested: i64,
    pub remaining: i64,
}

#[derive(Debug, Error)]
#[error("unknown item kind `{0}`")]
pub struct UnknownItemKind(pub String);

/// Variant-specific item data, selected by the `kind` discriminator column.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum ItemKind {
    Book {
        author: Option<String>,
        isbn: Option<String>,
    },
}

impl ItemKind {
    /// Rebuilds the variant from its discriminator and the nullable
    /// variant columns of the single-table layout.
    pub fn from_parts(
        kind: &str,
        author: Option<String>,
        isbn: Option<String>,
    ) -> Result<Self, UnknownItemKind> {
        match kind {
            "BOOK" => Ok(ItemKind::Book { author, isbn }),
            other => Err(UnknownItemKind(other.to_string())),
        }
    }

    pub fn discriminator(&self) -> &'static str {
        match self {
            ItemKind::Book { .. } => "BOOK",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Item {
    pub item_id: i64,
    pub name: String,
    pub price: i64,
    pub stock_quantity: i64,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    pub fn add_stock(&mut self, quantity: i64) {
        self.stock_quantity += quantity;
    }

    /// Decrements the stock. Fails without mutating when the remaining
    /// stock would go negative.
    pub fn remove_stock(&mut self, quantity: i64) -> Result<(), NotEnoughStock> {
        let rest = self.stock_quantity - quantity;
        if rest < 0 {
            return Err(NotEnoughStock {
                requested: quantity,
                remaining: self.stock_quantity,
            });
        }
        self.stock_quantity = rest;
        Ok(())
    }
}

// Manual mapping: the discriminator decides which variant columns to read.
impl<'r> FromRow<'r, SqliteRow> for Item {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("kind")?;
        let kind = ItemKind::from_parts(&kind, row.try_get("author")?, row.try_get("isbn")?)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Self {
            item_id: row.try_get("item_id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            stock_quantity: row.try_get("stock_quantity")?,
            kind,
        })
    }
}
