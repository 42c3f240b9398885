//! Collection point repository.
//!
//! Points are written once, together with their item associations, inside a
//! single transaction. Nothing here updates or deletes rows.

use sqlx::PgPool;

use ecoleta_core::{ItemIdList, NewPoint, Point, PointId, PointSearch};

use super::RepositoryError;

/// A row of the `points` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PointRow {
    pub id: PointId,
    pub image: String,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub latitude: f64,
    pub longitude: f64,
    pub street_number: String,
    pub city: String,
    pub state: String,
}

impl From<PointRow> for Point {
    fn from(row: PointRow) -> Self {
        Self {
            id: row.id,
            image: row.image,
            name: row.name,
            email: row.email,
            whatsapp: row.whatsapp,
            latitude: row.latitude,
            longitude: row.longitude,
            street_number: row.street_number,
            city: row.city,
            state: row.state,
        }
    }
}

/// Repository for collection points and their item associations.
pub struct PointRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PointRepository<'a> {
    /// Create a new point repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a point and one `points_items` row per id in `items`.
    ///
    /// `items` is the point's deduplicated item list, as returned by
    /// [`NewPoint::item_ids`]. Both inserts share a transaction; if either fails the transaction is
    /// dropped without commit and no point row survives.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if an item id does not
    /// exist, `RepositoryError::Database` for any other failure.
    pub async fn create(
        &self,
        point: &NewPoint,
        items: &ItemIdList,
        image: &str,
    ) -> Result<Point, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, PointRow>(
            r"
            INSERT INTO points (
                image, name, email, whatsapp, latitude, longitude,
                street_number, city, state
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, image, name, email, whatsapp, latitude, longitude,
                      street_number, city, state
            ",
        )
        .bind(image)
        .bind(&point.name)
        .bind(&point.email)
        .bind(&point.whatsapp)
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(&point.street_number)
        .bind(&point.city)
        .bind(&point.state)
        .fetch_one(&mut *tx)
        .await?;

        let linked = sqlx::query(
            r"
            INSERT INTO points_items (point_id, item_id)
            SELECT $1, item_id FROM UNNEST($2::int4[]) AS t(item_id)
            ",
        )
        .bind(row.id)
        .bind(items.as_slice())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::InvalidReference("unknown item id".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        tx.commit().await?;

        tracing::debug!(
            point_id = %row.id,
            items = linked.rows_affected(),
            "Point created"
        );

        Ok(row.into())
    }

    /// Get a point by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: PointId) -> Result<Option<Point>, RepositoryError> {
        let row = sqlx::query_as::<_, PointRow>(
            r"
            SELECT id, image, name, email, whatsapp, latitude, longitude,
                   street_number, city, state
            FROM points
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Point::from))
    }

    /// Titles of the items a point accepts, ordered by item id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_titles(&self, id: PointId) -> Result<Vec<String>, RepositoryError> {
        let titles = sqlx::query_scalar::<_, String>(
            r"
            SELECT items.title
            FROM items
            JOIN points_items ON items.id = points_items.item_id
            WHERE points_items.point_id = $1
            ORDER BY items.id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(titles)
    }

    /// Points in a city/state that accept at least one of the given items.
    ///
    /// Each point appears once however many of the requested items it
    /// accepts. An empty item list matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, search: &PointSearch) -> Result<Vec<Point>, RepositoryError> {
        if search.items.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, PointRow>(
            r"
            SELECT DISTINCT points.id, points.image, points.name, points.email,
                   points.whatsapp, points.latitude, points.longitude,
                   points.street_number, points.city, points.state
            FROM points
            JOIN points_items ON points.id = points_items.point_id
            WHERE points_items.item_id = ANY($1)
              AND points.city = $2
              AND points.state = $3
            ORDER BY points.id
            ",
        )
        .bind(search.items.as_slice())
        .bind(&search.city)
        .bind(&search.state)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Point::from).collect())
    }
}
