//! Item catalog repository.

use sqlx::PgPool;

use ecoleta_core::{Item, ItemId};

use super::RepositoryError;

/// A row of the `items` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemRow {
    pub id: ItemId,
    pub title: String,
    /// File name under the uploads directory.
    pub image: String,
}

impl ItemRow {
    /// Convert to the API shape, resolving the image file to a URL.
    #[must_use]
    pub fn into_item(self, image_url: impl FnOnce(&str) -> String) -> Item {
        Item {
            id: self.id,
            image_url: image_url(&self.image),
            title: self.title,
        }
    }
}

/// Repository for the item catalog.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every item, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ItemRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ItemRow>("SELECT id, title, image FROM items ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// Insert an item, or refresh its image if the title already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn upsert(&self, title: &str, image: &str) -> Result<ItemRow, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            INSERT INTO items (title, image)
            VALUES ($1, $2)
            ON CONFLICT (title) DO UPDATE SET image = EXCLUDED.image
            RETURNING id, title, image
            ",
        )
        .bind(title)
        .bind(image)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_item_resolves_image() {
        let row = ItemRow {
            id: ItemId::new(1),
            title: "Lâmpadas".to_owned(),
            image: "lampadas.svg".to_owned(),
        };
        let item = row.into_item(|image| format!("http://localhost:3333/uploads/{image}"));
        assert_eq!(item.id, ItemId::new(1));
        assert_eq!(item.title, "Lâmpadas");
        assert_eq!(item.image_url, "http://localhost:3333/uploads/lampadas.svg");
    }
}
