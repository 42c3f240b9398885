//! Create-point form state.
//!
//! [`CreatePointForm`] holds everything the create-point page tracks and
//! turns UI events into state changes. Fetches are either driven by the
//! async helpers ([`CreatePointForm::load`], [`CreatePointForm::change_state`],
//! [`CreatePointForm::submit`]) or by the rendering layer itself, which then
//! feeds results back through the `apply_*` methods.
//!
//! City lists are tied to the state selection that requested them. Each
//! state change bumps a generation counter and hands out a [`CityRequest`];
//! [`CreatePointForm::apply_cities`] drops responses whose request is no
//! longer current.

use std::str::FromStr;

use thiserror::Error;

use ecoleta_core::{Coordinates, Item, ItemId, NewPoint, Point, PointError};

use crate::api::EcoletaClient;
use crate::error::ClientError;
use crate::geography::GeographyClient;

/// Select value meaning "nothing chosen".
const PLACEHOLDER: &str = "0";

/// Why the form cannot produce a payload.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("no state selected")]
    NoState,

    #[error("no city selected")]
    NoCity,

    #[error("no position selected on the map")]
    NoPosition,

    #[error(transparent)]
    Invalid(#[from] PointError),

    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Failure of [`CreatePointForm::submit`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The form is incomplete or invalid; nothing was sent.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The API call failed or the server rejected the payload.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Free-text inputs of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Whatsapp,
    Number,
}

impl FromStr for Field {
    type Err = FormError;

    /// Parse an input's `name` attribute.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nome" | "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "whatsapp" => Ok(Self::Whatsapp),
            "numero" | "number" => Ok(Self::Number),
            other => Err(FormError::UnknownField(other.to_owned())),
        }
    }
}

/// Current values of the free-text inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub number: String,
}

/// A pending city-list fetch for one state selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRequest {
    /// State whose cities are wanted.
    pub uf: String,
    /// Selection generation the response must match.
    pub generation: u64,
}

/// State of the create-point page.
#[derive(Debug, Clone, Default)]
pub struct CreatePointForm {
    items: Vec<Item>,
    states: Vec<String>,
    selected_state: Option<String>,
    cities: Vec<String>,
    selected_city: Option<String>,
    initial_position: Option<Coordinates>,
    selected_position: Option<Coordinates>,
    fields: ContactFields,
    selected_items: Vec<ItemId>,
    city_generation: u64,
}

impl CreatePointForm {
    /// An empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Centre the map on `position` (typically the user's geolocation).
    ///
    /// This does not select a position for the point.
    #[must_use]
    pub fn with_initial_position(mut self, position: Coordinates) -> Self {
        self.initial_position = Some(position);
        self
    }

    /// Item catalog.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// State UF codes.
    #[must_use]
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Cities of the selected state.
    #[must_use]
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    #[must_use]
    pub fn selected_state(&self) -> Option<&str> {
        self.selected_state.as_deref()
    }

    #[must_use]
    pub fn selected_city(&self) -> Option<&str> {
        self.selected_city.as_deref()
    }

    #[must_use]
    pub const fn initial_position(&self) -> Option<Coordinates> {
        self.initial_position
    }

    #[must_use]
    pub const fn selected_position(&self) -> Option<Coordinates> {
        self.selected_position
    }

    #[must_use]
    pub const fn fields(&self) -> &ContactFields {
        &self.fields
    }

    /// Selected item ids, in the order they were selected.
    #[must_use]
    pub fn selected_items(&self) -> &[ItemId] {
        &self.selected_items
    }

    /// Replace the item catalog.
    pub fn apply_items(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Replace the state list.
    pub fn apply_states(&mut self, states: Vec<String>) {
        self.states = states;
    }

    /// Select a state by UF code.
    ///
    /// The city list and city selection are cleared. Returns the fetch to
    /// perform for the new state, or `None` when the selection was reset to
    /// the placeholder.
    pub fn select_state(&mut self, uf: &str) -> Option<CityRequest> {
        self.city_generation += 1;
        self.cities.clear();
        self.selected_city = None;

        let uf = uf.trim();
        if uf.is_empty() || uf == PLACEHOLDER {
            self.selected_state = None;
            return None;
        }

        self.selected_state = Some(uf.to_owned());
        Some(CityRequest {
            uf: uf.to_owned(),
            generation: self.city_generation,
        })
    }

    /// Apply a city list fetched for `request`.
    ///
    /// The list replaces any previous one. Returns `false` and leaves the
    /// form untouched when the state selection has moved on since the
    /// request was issued.
    pub fn apply_cities(&mut self, request: &CityRequest, cities: Vec<String>) -> bool {
        let current = request.generation == self.city_generation
            && self.selected_state.as_deref() == Some(request.uf.as_str());
        if !current {
            tracing::debug!(uf = %request.uf, "Discarding stale city list");
            return false;
        }

        self.cities = cities;
        true
    }

    /// Select a city; the placeholder clears the selection.
    pub fn select_city(&mut self, city: &str) {
        let city = city.trim();
        self.selected_city = if city.is_empty() || city == PLACEHOLDER {
            None
        } else {
            Some(city.to_owned())
        };
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.fields.name = value,
            Field::Email => self.fields.email = value,
            Field::Whatsapp => self.fields.whatsapp = value,
            Field::Number => self.fields.number = value,
        }
    }

    /// Set a field from an input's `name` attribute.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] if `name` is not a form input.
    pub fn set_field_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    /// Record a map click as the point's position.
    pub fn click_map(&mut self, position: Coordinates) {
        self.selected_position = Some(position);
    }

    /// Flip membership of `id` in the selection.
    ///
    /// Returns whether the item is selected afterwards.
    pub fn toggle_item(&mut self, id: ItemId) -> bool {
        if let Some(index) = self.selected_items.iter().position(|&s| s == id) {
            self.selected_items.remove(index);
            false
        } else {
            self.selected_items.push(id);
            true
        }
    }

    #[must_use]
    pub fn is_item_selected(&self, id: ItemId) -> bool {
        self.selected_items.contains(&id)
    }

    /// Assemble the create payload from the current state.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NoState`], [`FormError::NoCity`] or
    /// [`FormError::NoPosition`] for a missing selection, or
    /// [`FormError::Invalid`] if the assembled payload fails validation.
    pub fn payload(&self) -> Result<NewPoint, FormError> {
        let state = self.selected_state.clone().ok_or(FormError::NoState)?;
        let city = self.selected_city.clone().ok_or(FormError::NoCity)?;
        let position = self.selected_position.ok_or(FormError::NoPosition)?;

        let point = NewPoint {
            name: self.fields.name.clone(),
            email: self.fields.email.clone(),
            whatsapp: self.fields.whatsapp.clone(),
            latitude: position.latitude,
            longitude: position.longitude,
            street_number: self.fields.number.clone(),
            city,
            state,
            items: self.selected_items.clone(),
        };
        point.validate()?;

        Ok(point)
    }

    /// Fetch the item catalog and the state list concurrently.
    ///
    /// Each result is applied as soon as both calls settle, independently
    /// of the other; a failure in one does not discard the other.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error, after applying whatever succeeded.
    pub async fn load(&mut self, api: &EcoletaClient, geo: &GeographyClient) -> Result<(), ClientError> {
        let (items, states) = tokio::join!(api.list_items(), geo.states());

        let mut first_error = None;
        match items {
            Ok(items) => self.apply_items(items),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load items");
                first_error = Some(e);
            }
        }
        match states {
            Ok(states) => self.apply_states(states),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load states");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Select a state and load its cities.
    ///
    /// # Errors
    ///
    /// Returns error if the city fetch fails; the selection still changes.
    pub async fn change_state(&mut self, geo: &GeographyClient, uf: &str) -> Result<(), ClientError> {
        let Some(request) = self.select_state(uf) else {
            return Ok(());
        };

        let cities = geo.cities(&request.uf).await?;
        self.apply_cities(&request, cities);
        Ok(())
    }

    /// Assemble the payload and create the point.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Form`] without sending anything if the form is
    /// incomplete, or [`SubmitError::Client`] if the API call fails.
    pub async fn submit(&self, api: &EcoletaClient) -> Result<Point, SubmitError> {
        let payload = self.payload()?;
        let point = api.create_point(&payload).await?;

        tracing::info!(point_id = %point.id, "Point registered");
        Ok(point)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ecoleta_core::PointId;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn filled_form() -> CreatePointForm {
        let mut form = CreatePointForm::new();
        form.set_field(Field::Name, "Mercado Verde");
        form.set_field(Field::Email, "contato@mercadoverde.com.br");
        form.set_field(Field::Whatsapp, "11999990000");
        form.set_field(Field::Number, "120");
        form.select_state("SP");
        form.select_city("Diadema");
        form.click_map(Coordinates::new(-23.686, -46.622));
        form.toggle_item(ItemId::new(1));
        form.toggle_item(ItemId::new(2));
        form
    }

    #[test]
    fn test_toggle_twice_unselects() {
        let mut form = CreatePointForm::new();
        assert!(form.toggle_item(ItemId::new(3)));
        assert!(form.is_item_selected(ItemId::new(3)));
        assert!(!form.toggle_item(ItemId::new(3)));
        assert!(form.selected_items().is_empty());
    }

    #[test]
    fn test_toggle_keeps_selection_order() {
        let mut form = CreatePointForm::new();
        for id in [4, 1, 6, 1, 2] {
            form.toggle_item(ItemId::new(id));
        }
        assert_eq!(
            form.selected_items(),
            &[ItemId::new(4), ItemId::new(6), ItemId::new(2)]
        );
    }

    #[test]
    fn test_select_state_clears_cities() {
        let mut form = CreatePointForm::new();
        let request = form.select_state("SP").unwrap();
        assert!(form.apply_cities(&request, vec!["Diadema".to_owned()]));
        form.select_city("Diadema");

        let request = form.select_state("RJ").unwrap();
        assert!(form.cities().is_empty());
        assert_eq!(form.selected_city(), None);

        assert!(form.apply_cities(&request, vec!["Niterói".to_owned()]));
        assert_eq!(form.cities(), &["Niterói".to_owned()]);
    }

    #[test]
    fn test_stale_city_list_is_discarded() {
        let mut form = CreatePointForm::new();
        let first = form.select_state("SP").unwrap();
        let second = form.select_state("RJ").unwrap();

        assert!(form.apply_cities(&second, vec!["Niterói".to_owned()]));
        assert!(!form.apply_cities(&first, vec!["Diadema".to_owned()]));
        assert_eq!(form.cities(), &["Niterói".to_owned()]);
    }

    #[test]
    fn test_reselecting_same_state_supersedes_request() {
        let mut form = CreatePointForm::new();
        let first = form.select_state("SP").unwrap();
        let second = form.select_state("SP").unwrap();
        assert!(!form.apply_cities(&first, vec!["Santos".to_owned()]));
        assert!(form.apply_cities(&second, vec!["Diadema".to_owned()]));
    }

    #[test]
    fn test_placeholder_resets_state() {
        let mut form = CreatePointForm::new();
        let request = form.select_state("SP").unwrap();
        assert!(form.select_state("0").is_none());
        assert_eq!(form.selected_state(), None);
        assert!(!form.apply_cities(&request, vec!["Diadema".to_owned()]));
    }

    #[test]
    fn test_placeholder_resets_city() {
        let mut form = CreatePointForm::new();
        form.select_city("Diadema");
        form.select_city("0");
        assert_eq!(form.selected_city(), None);
    }

    #[test]
    fn test_set_field_by_name() {
        let mut form = CreatePointForm::new();
        form.set_field_by_name("nome", "Mercado Verde").unwrap();
        form.set_field_by_name("numero", "12").unwrap();
        assert_eq!(form.fields().name, "Mercado Verde");
        assert_eq!(form.fields().number, "12");

        assert_eq!(
            form.set_field_by_name("telefone", "x"),
            Err(FormError::UnknownField("telefone".to_owned()))
        );
    }

    #[test]
    fn test_initial_position_is_not_a_selection() {
        let form = CreatePointForm::new().with_initial_position(Coordinates::new(-23.5, -46.6));
        assert_eq!(form.initial_position(), Some(Coordinates::new(-23.5, -46.6)));
        assert_eq!(form.selected_position(), None);
    }

    #[test]
    fn test_payload_assembles_tracked_values() {
        let payload = filled_form().payload().unwrap();
        assert_eq!(payload.name, "Mercado Verde");
        assert_eq!(payload.street_number, "120");
        assert_eq!(payload.city, "Diadema");
        assert_eq!(payload.state, "SP");
        assert!((payload.latitude - -23.686).abs() < f64::EPSILON);
        assert_eq!(payload.items, vec![ItemId::new(1), ItemId::new(2)]);
    }

    #[test]
    fn test_payload_requires_selections() {
        let mut form = filled_form();
        form.select_city("0");
        assert_eq!(form.payload(), Err(FormError::NoCity));

        let mut form = filled_form();
        form.select_state("0");
        assert_eq!(form.payload(), Err(FormError::NoState));

        let mut form = filled_form();
        form.selected_position = None;
        assert_eq!(form.payload(), Err(FormError::NoPosition));
    }

    #[test]
    fn test_payload_requires_items() {
        let mut form = filled_form();
        form.toggle_item(ItemId::new(1));
        form.toggle_item(ItemId::new(2));
        assert_eq!(form.payload(), Err(FormError::Invalid(PointError::NoItems)));
    }

    fn clients(server: &MockServer) -> (EcoletaClient, GeographyClient) {
        let url = Url::parse(&server.uri()).unwrap();
        (
            EcoletaClient::new(url.clone()).unwrap(),
            GeographyClient::new(url).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_load_applies_items_and_states() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "Lâmpadas", "image_url": "http://x/uploads/lampadas.svg"},
                {"id": 2, "title": "Pilhas e Baterias", "image_url": "http://x/uploads/baterias.svg"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/localidades/estados"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"sigla": "SP"}, {"sigla": "RJ"}])),
            )
            .mount(&server)
            .await;

        let (api, geo) = clients(&server);
        let mut form = CreatePointForm::new();
        form.load(&api, &geo).await.unwrap();

        assert_eq!(form.items().len(), 2);
        assert_eq!(form.states(), &["SP".to_owned(), "RJ".to_owned()]);
    }

    #[tokio::test]
    async fn test_load_keeps_partial_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "down"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/localidades/estados"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"sigla": "SP"}])))
            .mount(&server)
            .await;

        let (api, geo) = clients(&server);
        let mut form = CreatePointForm::new();
        let err = form.load(&api, &geo).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(form.items().is_empty());
        assert_eq!(form.states(), &["SP".to_owned()]);
    }

    #[tokio::test]
    async fn test_change_state_loads_cities() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/localidades/estados/SP/municipios"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"nome": "Diadema"}, {"nome": "Santos"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (_, geo) = clients(&server);
        let mut form = CreatePointForm::new();
        form.change_state(&geo, "SP").await.unwrap();

        assert_eq!(form.selected_state(), Some("SP"));
        assert_eq!(form.cities(), &["Diadema".to_owned(), "Santos".to_owned()]);
    }

    #[tokio::test]
    async fn test_submit_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/points"))
            .and(body_partial_json(json!({
                "cidade": "Diadema",
                "estado": "SP",
                "items": [1, 2]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 9,
                "image": "https://images.example/p.jpg",
                "nome": "Mercado Verde",
                "email": "contato@mercadoverde.com.br",
                "whatsapp": "11999990000",
                "latitude": -23.686,
                "longitude": -46.622,
                "numero": "120",
                "cidade": "Diadema",
                "estado": "SP"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (api, _) = clients(&server);
        let point = filled_form().submit(&api).await.unwrap();
        assert_eq!(point.id, PointId::new(9));
    }

    #[tokio::test]
    async fn test_submit_incomplete_form_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/points"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (api, _) = clients(&server);
        let err = CreatePointForm::new().submit(&api).await.unwrap_err();
        assert!(matches!(err, SubmitError::Form(FormError::NoState)));
    }

    #[tokio::test]
    async fn test_submit_surfaces_api_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/points"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "unknown item id"})),
            )
            .mount(&server)
            .await;

        let (api, _) = clients(&server);
        let err = filled_form().submit(&api).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Client(ClientError::Api { status: 400, ref message }) if message == "unknown item id"
        ));
    }
}
