//! Contracts and a typed scenario client for the Petstore v2 API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    ApiConfig, Executor, FixtureSource, JsonSchema, ReqwestExecutor, RequestDescriptor, Result,
    VerifiedClient,
};

/// Message returned by `GET /user/login` on success, followed by a session id.
pub const LOGIN_MESSAGE_PREFIX: &str = "logged in user session:";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub user_status: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub name: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Approved,
    Delivered,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub pet_id: i64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub complete: bool,
}

/// The `{code, type, message}` envelope returned by write operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub code: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// Schema of the response envelope; `message` is pinned when given.
pub fn api_response_schema(code: i64, kind: &str, message: Option<&str>) -> Result<JsonSchema> {
    let message = match message {
        Some(text) => json!({"const": text}),
        None => json!({"type": "string"}),
    };
    JsonSchema::new(json!({
        "type": "object",
        "required": ["code", "type", "message"],
        "properties": {
            "code": {"const": code},
            "type": {"const": kind},
            "message": message
        }
    }))
}

/// Envelope of a successful login.
pub fn login_schema() -> Result<JsonSchema> {
    JsonSchema::new(json!({
        "type": "object",
        "required": ["code", "type", "message"],
        "properties": {
            "code": {"const": 200},
            "type": {"const": "unknown"},
            "message": {"type": "string", "pattern": format!("^{LOGIN_MESSAGE_PREFIX}")}
        }
    }))
}

fn id_and_name() -> Value {
    json!({
        "type": "object",
        "required": ["id", "name"],
        "properties": {
            "id": {"type": "integer"},
            "name": {"type": "string"}
        }
    })
}

pub fn user_schema() -> Result<JsonSchema> {
    JsonSchema::new(json!({
        "type": "object",
        "required": ["id", "username", "userStatus"],
        "properties": {
            "id": {"type": "integer"},
            "username": {"type": "string"},
            "firstName": {"type": ["string", "null"]},
            "lastName": {"type": ["string", "null"]},
            "email": {"type": ["string", "null"]},
            "password": {"type": ["string", "null"]},
            "phone": {"type": ["string", "null"]},
            "userStatus": {"type": "integer"}
        }
    }))
}

pub fn pet_schema() -> Result<JsonSchema> {
    JsonSchema::new(json!({
        "type": "object",
        "required": ["id", "name", "photoUrls"],
        "properties": {
            "id": {"type": "integer"},
            "category": {"anyOf": [{"type": "null"}, id_and_name()]},
            "name": {"type": "string"},
            "photoUrls": {"type": "array", "items": {"type": "string"}},
            "tags": {
                "anyOf": [{"type": "null"}, {"type": "array", "items": id_and_name()}]
            },
            "status": {"type": ["string", "null"]}
        }
    }))
}

pub fn order_schema() -> Result<JsonSchema> {
    JsonSchema::new(json!({
        "type": "object",
        "required": ["id", "petId", "quantity", "complete"],
        "properties": {
            "id": {"type": "integer"},
            "petId": {"type": "integer"},
            "quantity": {"type": "integer"},
            "shipDate": {"type": ["string", "null"]},
            "status": {"type": ["string", "null"]},
            "complete": {"type": "boolean"}
        }
    }))
}

pub fn new_user(fixtures: &mut impl FixtureSource) -> User {
    User {
        id: fixtures.integer(1..1_000_000),
        username: fixtures.username(),
        first_name: fixtures.first_name(),
        last_name: fixtures.last_name(),
        email: fixtures.email(),
        password: fixtures.password(),
        phone: fixtures.phone(),
        user_status: 0,
    }
}

pub fn new_pet(fixtures: &mut impl FixtureSource) -> Pet {
    let id = fixtures.integer(1..1_000_000);
    Pet {
        id,
        category: Some(Category {
            id: fixtures.integer(1..100),
            name: fixtures.word(),
        }),
        name: fixtures.first_name(),
        photo_urls: vec![format!("https://example.com/pets/{id}.png")],
        tags: vec![Tag {
            id: fixtures.integer(1..100),
            name: fixtures.word(),
        }],
        status: Some(PetStatus::Available),
    }
}

pub fn new_order(fixtures: &mut impl FixtureSource, pet_id: i64) -> Order {
    Order {
        id: fixtures.integer(1..10),
        pet_id,
        quantity: i32::try_from(fixtures.integer(1..5)).unwrap_or(1),
        ship_date: None,
        status: Some(OrderStatus::Placed),
        complete: false,
    }
}

/// Collection paths relative to the versioned API root. Item URLs append
/// one percent-encoded segment through [`ApiConfig::item_url`].
pub mod paths {
    pub const USER: &str = "user";
    pub const USER_LOGIN: &str = "user/login";
    pub const USER_LOGOUT: &str = "user/logout";
    pub const PET: &str = "pet";
    pub const STORE_ORDER: &str = "store/order";
}

/// Typed Petstore operations, each one verified call expecting `200`.
#[derive(Clone, Debug)]
pub struct PetStoreApi<E = ReqwestExecutor> {
    client: VerifiedClient<E>,
    config: ApiConfig,
}

impl PetStoreApi<ReqwestExecutor> {
    /// Creates an API handle backed by a fresh `reqwest` client.
    pub fn new(config: ApiConfig) -> Self {
        Self::with_client(VerifiedClient::new(), config)
    }

    /// Creates an API handle from `PETSTORE_BASE_URL` / `PETSTORE_API_VERSION`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ApiConfig::from_env()?))
    }
}

impl<E: Executor> PetStoreApi<E> {
    pub fn with_client(client: VerifiedClient<E>, config: ApiConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &VerifiedClient<E> {
        &self.client
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    fn item_url(&self, path: &str, item: &str) -> Result<String> {
        self.config.item_url(path, item)
    }

    /// `POST /user`; the service echoes the new user's id as the message.
    pub async fn create_user(&self, user: &User) -> Result<ApiMessage> {
        let id = user.id.to_string();
        let schema = api_response_schema(200, "unknown", Some(id.as_str()))?;
        let response = self
            .client
            .post(self.url(paths::USER), user, 200, &schema)
            .await?;
        response.json_as()
    }

    pub async fn get_user(&self, username: &str) -> Result<User> {
        let response = self
            .client
            .get(self.item_url(paths::USER, username)?, 200, &user_schema()?)
            .await?;
        response.json_as()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<ApiMessage> {
        let request = RequestDescriptor::get(self.url(paths::USER_LOGIN))
            .with_query("username", username)
            .with_query("password", password);
        let response = self.client.call(&request, &login_schema()?).await?;
        response.json_as()
    }

    pub async fn logout(&self) -> Result<ApiMessage> {
        let schema = api_response_schema(200, "unknown", Some("ok"))?;
        let response = self
            .client
            .get(self.url(paths::USER_LOGOUT), 200, &schema)
            .await?;
        response.json_as()
    }

    /// `DELETE /user/{username}`; the service echoes the username.
    pub async fn delete_user(&self, username: &str) -> Result<ApiMessage> {
        let schema = api_response_schema(200, "unknown", Some(username))?;
        let response = self
            .client
            .delete(self.item_url(paths::USER, username)?, 200, &schema)
            .await?;
        response.json_as()
    }

    pub async fn add_pet(&self, pet: &Pet) -> Result<Pet> {
        let response = self
            .client
            .post(self.url(paths::PET), pet, 200, &pet_schema()?)
            .await?;
        response.json_as()
    }

    pub async fn update_pet(&self, pet: &Pet) -> Result<Pet> {
        let response = self
            .client
            .put(self.url(paths::PET), pet, 200, &pet_schema()?)
            .await?;
        response.json_as()
    }

    pub async fn get_pet(&self, id: i64) -> Result<Pet> {
        let url = self.item_url(paths::PET, &id.to_string())?;
        let response = self.client.get(url, 200, &pet_schema()?).await?;
        response.json_as()
    }

    /// `DELETE /pet/{id}` with the `api_key` header the service expects.
    pub async fn delete_pet(&self, id: i64, api_key: &str) -> Result<ApiMessage> {
        let id_text = id.to_string();
        let schema = api_response_schema(200, "unknown", Some(id_text.as_str()))?;
        let request = RequestDescriptor::delete(self.item_url(paths::PET, &id_text)?)
            .with_header("api_key", api_key);
        let response = self.client.call(&request, &schema).await?;
        response.json_as()
    }

    pub async fn place_order(&self, order: &Order) -> Result<Order> {
        let response = self
            .client
            .post(self.url(paths::STORE_ORDER), order, 200, &order_schema()?)
            .await?;
        response.json_as()
    }

    pub async fn get_order(&self, id: i64) -> Result<Order> {
        let url = self.item_url(paths::STORE_ORDER, &id.to_string())?;
        let response = self.client.get(url, 200, &order_schema()?).await?;
        response.json_as()
    }

    pub async fn delete_order(&self, id: i64) -> Result<ApiMessage> {
        let id_text = id.to_string();
        let schema = api_response_schema(200, "unknown", Some(id_text.as_str()))?;
        let response = self
            .client
            .delete(self.item_url(paths::STORE_ORDER, &id_text)?, 200, &schema)
            .await?;
        response.json_as()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        api_response_schema, login_schema, new_order, new_pet, new_user, order_schema, pet_schema,
        user_schema, OrderStatus, PetStatus,
    };
    use crate::{FakeFixtures, Schema};

    #[test]
    fn generated_bodies_satisfy_their_own_schemas() {
        let mut fixtures = FakeFixtures::seeded(11);
        let user = new_user(&mut fixtures);
        let pet = new_pet(&mut fixtures);
        let order = new_order(&mut fixtures, pet.id);

        let user_json = serde_json::to_value(&user).expect("user serializes");
        let pet_json = serde_json::to_value(&pet).expect("pet serializes");
        let order_json = serde_json::to_value(&order).expect("order serializes");

        let user_schema = user_schema().expect("user schema compiles");
        let pet_schema = pet_schema().expect("pet schema compiles");
        let order_schema = order_schema().expect("order schema compiles");
        assert_eq!(user_schema.validate(&user_json), Ok(()));
        assert_eq!(pet_schema.validate(&pet_json), Ok(()));
        assert_eq!(order_schema.validate(&order_json), Ok(()));
        assert_eq!(order.pet_id, pet.id);
        assert_eq!(pet.status, Some(PetStatus::Available));
        assert_eq!(order.status, Some(OrderStatus::Placed));
    }

    #[test]
    fn user_serializes_with_camel_case_keys() {
        let mut fixtures = FakeFixtures::seeded(3);
        let user = serde_json::to_value(new_user(&mut fixtures)).expect("user serializes");
        for key in ["firstName", "lastName", "userStatus"] {
            assert!(user.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn envelope_schema_pins_message_only_when_given() {
        let body = json!({"code": 200, "type": "unknown", "message": "9001"});
        let pinned = api_response_schema(200, "unknown", Some("9001")).expect("schema compiles");
        let open = api_response_schema(200, "unknown", None).expect("schema compiles");
        let other = api_response_schema(200, "unknown", Some("1")).expect("schema compiles");
        assert!(pinned.validate(&body).is_ok());
        assert!(open.validate(&body).is_ok());
        let violation = other.validate(&body).expect_err("message differs");
        assert_eq!(violation.path, "/message");
    }

    #[test]
    fn login_schema_requires_session_prefix() {
        let schema = login_schema().expect("login schema compiles");
        let body = json!({
            "code": 200,
            "type": "unknown",
            "message": "logged in user session:1712345678901"
        });
        assert!(schema.validate(&body).is_ok());
        let expired = json!({"code": 200, "type": "unknown", "message": "session expired"});
        assert!(schema.validate(&expired).is_err());
    }

    #[test]
    fn pet_schema_tolerates_null_optionals_but_requires_photo_urls() {
        let schema = pet_schema().expect("pet schema compiles");
        let sparse = json!({"id": 7, "name": "Rex", "photoUrls": [], "category": null, "tags": null});
        assert!(schema.validate(&sparse).is_ok());
        let missing = json!({"id": 7, "name": "Rex"});
        assert!(schema.validate(&missing).is_err());
        let bad_tag = json!({"id": 7, "name": "Rex", "photoUrls": [], "tags": [{"id": 1, "name": 2}]});
        assert!(schema.validate(&bad_tag).is_err());
    }
}
