//! Seed the item catalog.
//!
//! Items are keyed by title: re-running the command updates the image of an
//! existing title instead of inserting a duplicate.
//!
//! A catalog file is a YAML list:
//!
//! ```yaml
//! - title: Lâmpadas
//!   image: lampadas.svg
//! - title: Pilhas e Baterias
//!   image: baterias.svg
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use ecoleta_api::db::{self, ItemRepository};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    /// File name under the API's uploads directory.
    pub image: String,
}

/// The six categories the web client ships icons for.
const DEFAULT_CATALOG: [(&str, &str); 6] = [
    ("Lâmpadas", "lampadas.svg"),
    ("Pilhas e Baterias", "baterias.svg"),
    ("Papéis e Papelão", "papeis-papelao.svg"),
    ("Resíduos Eletrônicos", "eletronicos.svg"),
    ("Resíduos Orgânicos", "organicos.svg"),
    ("Óleo de Cozinha", "oleo.svg"),
];

/// The built-in catalog.
pub fn default_catalog() -> Vec<CatalogEntry> {
    DEFAULT_CATALOG
        .iter()
        .map(|&(title, image)| CatalogEntry {
            title: title.to_owned(),
            image: image.to_owned(),
        })
        .collect()
}

/// Parse and check a YAML catalog.
fn parse_catalog(content: &str) -> Result<Vec<CatalogEntry>, Box<dyn std::error::Error>> {
    let catalog: Vec<CatalogEntry> = serde_yaml::from_str(content)?;

    if catalog.is_empty() {
        return Err("catalog is empty".into());
    }
    if let Some(entry) = catalog
        .iter()
        .find(|e| e.title.trim().is_empty() || e.image.trim().is_empty())
    {
        return Err(format!("catalog entry has a blank title or image: {entry:?}").into());
    }

    Ok(catalog)
}

/// Upsert the item catalog, from `file_path` or the built-in default.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be read
/// or parsed, or a database operation fails.
pub async fn items(file_path: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()?;

    // Read and validate before connecting
    let catalog = match file_path {
        Some(file_path) => {
            let path = Path::new(file_path);
            if !path.exists() {
                return Err(format!("File not found: {file_path}").into());
            }
            info!(path = %file_path, "Loading item catalog from file");
            parse_catalog(&tokio::fs::read_to_string(path).await?)?
        }
        None => default_catalog(),
    };

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let repo = ItemRepository::new(&pool);
    for entry in &catalog {
        let row = repo.upsert(&entry.title, &entry.image).await?;
        info!(id = %row.id, title = %row.title, "Upserted item");
    }

    info!(items = catalog.len(), "Seeding complete!");
    Ok(())
}
