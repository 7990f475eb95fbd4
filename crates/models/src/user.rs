use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{errors::ValidationErrors, record::{Record, RecordInput}, validation};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Validated user fields, everything but the id.
#[derive(Clone, Debug, PartialEq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
}

/// Raw create/replace body. Fields stay untyped until `validate`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
}

impl UserInput {
    pub fn validate(&self) -> Result<UserFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = validation::required_string(&mut errors, "name", self.name.as_ref());
        let email = validation::email(&mut errors, "email", self.email.as_ref());
        match (name, email) {
            (Some(name), Some(email)) => errors.finish(|| UserFields { name, email }),
            _ => Err(errors),
        }
    }
}

impl Record for User {
    type Fields = UserFields;
    const ENTITY: &'static str = "user";
    const LABEL: &'static str = "User";

    fn id(&self) -> u64 { self.id }

    fn from_fields(id: u64, fields: UserFields) -> Self {
        Self { id, name: fields.name, email: fields.email }
    }

    fn replace_fields(&mut self, fields: UserFields) {
        self.name = fields.name;
        self.email = fields.email;
    }
}

impl RecordInput for UserInput {
    type Record = User;

    fn validate(&self) -> Result<UserFields, ValidationErrors> {
        UserInput::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(v: Value) -> UserInput {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn valid_user_passes() {
        let fields = input(json!({"name": "Alice Johnson", "email": "alice@example.com"}))
            .validate()
            .unwrap();
        assert_eq!(fields.name, "Alice Johnson");
        assert_eq!(fields.email, "alice@example.com");
    }

    #[test]
    fn bad_email_is_reported() {
        let errs = input(json!({"name": "Alice", "email": "not-an-email"})).validate().unwrap_err();
        assert_eq!(errs.messages(), ["email must be a valid email address"]);
    }

    #[test]
    fn every_failing_field_is_listed_in_order() {
        let errs = input(json!({})).validate().unwrap_err();
        assert_eq!(errs.messages(), ["name is required", "email is required"]);
    }

    #[test]
    fn replace_keeps_id() {
        let mut u = User::from_fields(7, UserFields { name: "a".into(), email: "a@b.co".into() });
        u.replace_fields(UserFields { name: "b".into(), email: "b@b.co".into() });
        assert_eq!(u, User { id: 7, name: "b".into(), email: "b@b.co".into() });
    }
}
