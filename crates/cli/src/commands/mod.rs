pub mod migrate;
pub mod point;
pub mod seed;

use secrecy::SecretString;

/// Database URL from `ECOLETA_DATABASE_URL`, falling back to `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, &'static str> {
    std::env::var("ECOLETA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "ECOLETA_DATABASE_URL not set")
}
