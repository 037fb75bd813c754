//! Petstore API demo.
//!
//! Declares a client for the Swagger petstore and calls it. Set
//! `PETSTORE_URL` to point the demo at another deployment.

#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use std::time::Duration;

use declarest::prelude::*;

const DEFAULT_URL: &str = "https://petstore.swagger.io/v2";

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, rename = "photoUrls")]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

// ============================================================================
// Declared API
// ============================================================================

#[rest_client(user_agent = "declarest-petstore-demo/0.1.0")]
#[headers(accept = "application/json")]
pub trait PetStore {
    /// Find pets by status, e.g. `available`, `pending`, `sold`.
    #[get("/pet/findByStatus")]
    async fn find_by_status(
        &self,
        #[query(format = "MULTI")] status: &[&str],
    ) -> declarest::Result<Vec<Pet>>;

    /// Find a pet by id.
    #[get("/pet/{pet_id}")]
    async fn get_pet(&self, pet_id: u64) -> declarest::Result<Pet>;

    /// Add a new pet.
    #[post("/pet")]
    async fn add_pet(&self, pet: &Pet) -> declarest::Result<Pet>;

    /// Update name and status with a form post.
    #[post("/pet/{pet_id}")]
    async fn update_pet_with_form(
        &self,
        pet_id: u64,
        #[plain_body] form: &str,
    ) -> declarest::Result<ApiResponse>;

    /// Delete a pet. The API key is optional.
    #[delete("/pet/{pet_id}")]
    async fn delete_pet(
        &self,
        pet_id: u64,
        #[header("api_key")] api_key: Option<&str>,
    ) -> declarest::Result<Response>;
}

fn petstore(base_url: &str) -> declarest::Result<RestApi<HyperClient>> {
    let http = HyperClient::builder()
        .timeout(Duration::from_secs(10))
        .with_logging()
        .build();
    RestApi::new(http, base_url)
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> declarest::Result<()> {
    let base_url = std::env::var("PETSTORE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let api = petstore(&base_url)?;

    let pet = Pet {
        id: 9_223_372_000,
        name: "Rex".to_string(),
        category: Some(Category {
            id: 1,
            name: "dogs".to_string(),
        }),
        photo_urls: Vec::new(),
        status: Some("available".to_string()),
    };

    let created = api.add_pet(&pet).await?;
    println!("created: {created:?}");

    let fetched = api.get_pet(created.id).await?;
    println!("fetched: {fetched:?}");

    let updated = api
        .update_pet_with_form(created.id, "name=Rex%20II&status=sold")
        .await?;
    println!("updated: {}", updated.message);

    let sold = api.find_by_status(&["sold"]).await?;
    println!("{} pets sold", sold.len());

    let response = api.delete_pet(created.id, Some("special-key")).await?;
    println!("delete: HTTP {}", response.status());

    Ok(())
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    use super::*;

    #[tokio::test]
    async fn find_by_status_repeats_the_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pet/findByStatus"))
            .and(query_param("status", "available"))
            .and(query_param("status", "pending"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json_pets()))
            .mount(&mock_server)
            .await;

        let api = petstore(&mock_server.uri()).expect("client");
        let pets = api
            .find_by_status(&["available", "pending"])
            .await
            .expect("pets");

        assert_eq!(pets.len(), 1);
        assert_eq!(pets.first().map(|p| p.name.as_str()), Some("Rex"));
    }

    #[tokio::test]
    async fn delete_without_api_key_omits_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/pet/7"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let api = petstore(&mock_server.uri()).expect("client");
        let response = api.delete_pet(7, None).await.expect("response");

        assert_eq!(response.status(), 404);
        let requests = mock_server.received_requests().await.expect("recording");
        assert!(requests.iter().all(|r| !r.headers.contains_key("api_key")));
    }

    fn serde_json_pets() -> declarest::serde_json::Value {
        declarest::serde_json::json!([{ "id": 1, "name": "Rex", "photoUrls": [] }])
    }
}
