//! Register a collection point through the API.
//!
//! Drives the same form state as the web page: reference data is loaded,
//! the state and city are checked against the geography service, items are
//! checked against the catalog, and the assembled payload is submitted.
//!
//! # Environment Variables
//!
//! - `ECOLETA_API_URL` - Ecoleta API base URL
//! - `IBGE_API_URL` - IBGE localidades base URL

use clap::Args;
use tracing::info;

use ecoleta_core::{Coordinates, ItemIdList};
use ecoleta_web::{ClientConfig, CreatePointForm, EcoletaClient, Field, GeographyClient};

/// Arguments of `point create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Entity name
    #[arg(short, long)]
    pub name: String,

    /// Contact email
    #[arg(short, long)]
    pub email: String,

    /// Contact WhatsApp number
    #[arg(short, long, default_value = "")]
    pub whatsapp: String,

    /// Street number
    #[arg(long, default_value = "")]
    pub number: String,

    /// Two-letter state code (UF)
    #[arg(short, long)]
    pub state: String,

    /// City name, as listed for the state
    #[arg(short, long)]
    pub city: String,

    #[arg(long, allow_hyphen_values = true)]
    pub latitude: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub longitude: f64,

    /// Comma-separated item ids, e.g. `1,2`
    #[arg(short, long)]
    pub items: ItemIdList,
}

/// Fill the form from `args` and submit it.
///
/// # Errors
///
/// Returns an error if reference data cannot be loaded, the state, city or
/// an item is unknown, or the API rejects the point.
pub async fn create(args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let api = EcoletaClient::new(config.api_url)?;
    let geo = GeographyClient::new(config.ibge_url)?;

    let mut form = CreatePointForm::new();
    form.load(&api, &geo).await?;
    info!(
        items = form.items().len(),
        states = form.states().len(),
        "Loaded reference data"
    );

    let state = args.state.trim().to_uppercase();
    if !form.states().contains(&state) {
        return Err(format!("Unknown state: {state}").into());
    }
    form.change_state(&geo, &state).await?;

    let city = form
        .cities()
        .iter()
        .find(|c| c.eq_ignore_ascii_case(args.city.trim()))
        .cloned()
        .ok_or_else(|| format!("Unknown city for {state}: {}", args.city))?;
    form.select_city(&city);

    form.set_field(Field::Name, args.name);
    form.set_field(Field::Email, args.email);
    form.set_field(Field::Whatsapp, args.whatsapp);
    form.set_field(Field::Number, args.number);
    form.click_map(Coordinates::new(args.latitude, args.longitude));

    for &id in args.items.as_slice() {
        if !form.items().iter().any(|item| item.id == id) {
            return Err(format!("Unknown item id: {id}").into());
        }
        form.toggle_item(id);
    }

    let point = form.submit(&api).await?;
    info!(id = %point.id, name = %point.name, city = %point.city, "Point created");

    Ok(())
}
