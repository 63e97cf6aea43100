use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::http::{path_segment, ApiClient};
use crate::features::categories::dtos::{CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::models::Category;

const CATEGORIES_PATH: &str = "categories";

/// Backend operations on categories
#[async_trait]
pub trait CategoryApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>>;
    async fn get(&self, id: &str) -> Result<Category>;
    async fn create(&self, dto: &CreateCategoryDto) -> Result<Category>;
    async fn update(&self, id: &str, dto: &UpdateCategoryDto) -> Result<Category>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// REST client for `/categories`
pub struct CategoryClient {
    api: ApiClient,
}

impl CategoryClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", CATEGORIES_PATH, path_segment(id))
    }
}

#[async_trait]
impl CategoryApi for CategoryClient {
    async fn list(&self) -> Result<Vec<Category>> {
        let categories: Vec<Category> = self.api.get(CATEGORIES_PATH).await?;
        tracing::debug!("Fetched {} categories", categories.len());
        Ok(categories)
    }

    async fn get(&self, id: &str) -> Result<Category> {
        self.api.get(&Self::item_path(id)).await
    }

    async fn create(&self, dto: &CreateCategoryDto) -> Result<Category> {
        let category: Category = self.api.post(CATEGORIES_PATH, dto).await?;
        tracing::info!("Created category '{}' ({})", category.name, category.id);
        Ok(category)
    }

    async fn update(&self, id: &str, dto: &UpdateCategoryDto) -> Result<Category> {
        let category: Category = self.api.put(&Self::item_path(id), dto).await?;
        tracing::info!("Updated category '{}' ({})", category.name, category.id);
        Ok(category)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&Self::item_path(id)).await?;
        tracing::info!("Deleted category {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::shared::test_helpers::{clothing_fixture, spawn_mock_backend, test_api_client};

    #[tokio::test]
    async fn test_list_unwraps_envelope() {
        let backend = spawn_mock_backend(clothing_fixture()).await;
        let client = CategoryClient::new(test_api_client(&backend.base_url));

        let categories = client.list().await.unwrap();
        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].name, "Clothing");
    }

    #[tokio::test]
    async fn test_list_accepts_raw_array() {
        let backend = spawn_mock_backend(clothing_fixture()).await;
        backend.state.lock().unwrap().raw_lists = true;
        let client = CategoryClient::new(test_api_client(&backend.base_url));

        let categories = client.list().await.unwrap();
        assert_eq!(categories.len(), 3);
    }

    #[tokio::test]
    async fn test_get_missing_maps_to_not_found() {
        let backend = spawn_mock_backend(clothing_fixture()).await;
        let client = CategoryClient::new(test_api_client(&backend.base_url));

        match client.get("404").await {
            Err(AppError::NotFound(message)) => assert_eq!(message, "Category not found"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_failure_prefers_body_message() {
        let backend = spawn_mock_backend(clothing_fixture()).await;
        backend.state.lock().unwrap().fail_lists = true;
        let client = CategoryClient::new(test_api_client(&backend.base_url));

        match client.list().await {
            Err(AppError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Database unavailable");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_update_delete_round_trip() {
        let backend = spawn_mock_backend(clothing_fixture()).await;
        let client = CategoryClient::new(test_api_client(&backend.base_url));

        let mut dto = CreateCategoryDto::new("Jackets").normalized();
        dto.parent_id = Some("1".to_string());
        let created = client.create(&dto).await.unwrap();
        assert_eq!(created.slug, "jackets");
        assert_eq!(created.parent_id.as_deref(), Some("1"));

        let updated = client
            .update(&created.id, &UpdateCategoryDto::status(false))
            .await
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.name, "Jackets");

        client.delete(&created.id).await.unwrap();
        assert_eq!(client.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_requests_carry_request_id() {
        let backend = spawn_mock_backend(clothing_fixture()).await;
        let client = CategoryClient::new(test_api_client(&backend.base_url));

        client.list().await.unwrap();
        let state = backend.state.lock().unwrap();
        assert_eq!(state.request_ids.len(), 1);
        assert!(uuid::Uuid::parse_str(&state.request_ids[0]).is_ok());
    }
}
