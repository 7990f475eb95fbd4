use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{errors::ValidationErrors, record::{Record, RecordInput}, validation};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: u64,
    pub origin: String,
    pub destination: String,
    pub price: f64,
    /// Non-owning reference into the user service.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlightFields {
    pub origin: String,
    pub destination: String,
    pub price: f64,
    pub user_id: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FlightInput {
    #[serde(default)]
    pub origin: Option<Value>,
    #[serde(default)]
    pub destination: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<Value>,
}

impl FlightInput {
    pub fn validate(&self) -> Result<FlightFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let origin = validation::required_string(&mut errors, "origin", self.origin.as_ref());
        let destination = validation::required_string(&mut errors, "destination", self.destination.as_ref());
        let price = validation::number(&mut errors, "price", self.price.as_ref());
        let user_id = validation::optional_id(&mut errors, "userId", self.user_id.as_ref());
        match (origin, destination, price, user_id) {
            (Some(origin), Some(destination), Some(price), Some(user_id)) => {
                errors.finish(|| FlightFields { origin, destination, price, user_id })
            }
            _ => Err(errors),
        }
    }
}

impl Record for Flight {
    type Fields = FlightFields;
    const ENTITY: &'static str = "flight";
    const LABEL: &'static str = "Flight";

    fn id(&self) -> u64 { self.id }

    fn from_fields(id: u64, fields: FlightFields) -> Self {
        Self {
            id,
            origin: fields.origin,
            destination: fields.destination,
            price: fields.price,
            user_id: fields.user_id,
        }
    }

    fn replace_fields(&mut self, fields: FlightFields) {
        self.origin = fields.origin;
        self.destination = fields.destination;
        self.price = fields.price;
        self.user_id = fields.user_id;
    }
}

impl RecordInput for FlightInput {
    type Record = Flight;

    fn validate(&self) -> Result<FlightFields, ValidationErrors> {
        FlightInput::validate(self)
    }
}
