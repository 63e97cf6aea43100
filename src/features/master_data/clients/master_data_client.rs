use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::http::{path_segment, ApiClient};
use crate::features::master_data::dtos::{CreateMasterDataDto, UpdateMasterDataDto};
use crate::features::master_data::models::{MasterDataItem, MasterDataKind};

/// Backend operations shared by every master data collection
#[async_trait]
pub trait MasterDataApi: Send + Sync {
    async fn list(&self, kind: MasterDataKind) -> Result<Vec<MasterDataItem>>;
    async fn create(&self, kind: MasterDataKind, dto: &CreateMasterDataDto)
        -> Result<MasterDataItem>;
    async fn update(
        &self,
        kind: MasterDataKind,
        id: &str,
        dto: &UpdateMasterDataDto,
    ) -> Result<MasterDataItem>;
    async fn delete(&self, kind: MasterDataKind, id: &str) -> Result<()>;
}

pub struct MasterDataClient {
    api: ApiClient,
}

impl MasterDataClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn item_path(kind: MasterDataKind, id: &str) -> String {
        format!("{}/{}", kind.path(), path_segment(id))
    }
}

#[async_trait]
impl MasterDataApi for MasterDataClient {
    async fn list(&self, kind: MasterDataKind) -> Result<Vec<MasterDataItem>> {
        let items: Vec<MasterDataItem> = self.api.get(kind.path()).await?;
        tracing::debug!("Fetched {} {}", items.len(), kind);
        Ok(items)
    }

    async fn create(
        &self,
        kind: MasterDataKind,
        dto: &CreateMasterDataDto,
    ) -> Result<MasterDataItem> {
        let item: MasterDataItem = self.api.post(kind.path(), dto).await?;
        tracing::info!("Created {} '{}' ({})", kind.label(), item.name, item.id);
        Ok(item)
    }

    async fn update(
        &self,
        kind: MasterDataKind,
        id: &str,
        dto: &UpdateMasterDataDto,
    ) -> Result<MasterDataItem> {
        let item: MasterDataItem = self.api.put(&Self::item_path(kind, id), dto).await?;
        tracing::info!("Updated {} '{}' ({})", kind.label(), item.name, item.id);
        Ok(item)
    }

    async fn delete(&self, kind: MasterDataKind, id: &str) -> Result<()> {
        self.api.delete(&Self::item_path(kind, id)).await?;
        tracing::info!("Deleted {} {}", kind.label(), id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::shared::test_helpers::{spawn_mock_backend, test_api_client};

    #[tokio::test]
    async fn test_colors_crud_against_backend() {
        let backend = spawn_mock_backend(Vec::new()).await;
        let client = MasterDataClient::new(test_api_client(&backend.base_url));

        let colors = client.list(MasterDataKind::Colors).await.unwrap();
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[1].hex_code.as_deref(), Some("#000080"));

        let dto = CreateMasterDataDto {
            hex_code: Some("#808000".to_string()),
            ..CreateMasterDataDto::new("Olive")
        };
        let created = client.create(MasterDataKind::Colors, &dto).await.unwrap();
        assert_eq!(created.name, "Olive");

        let updated = client
            .update(MasterDataKind::Colors, "c1", &UpdateMasterDataDto::status(false))
            .await
            .unwrap();
        assert!(!updated.is_active);

        client.delete(MasterDataKind::Colors, "c2").await.unwrap();
        assert_eq!(client.list(MasterDataKind::Colors).await.unwrap().len(), 2);

        let state = backend.state.lock().unwrap();
        assert_eq!(
            state.requests,
            vec![
                "GET /colors",
                "POST /colors",
                "PUT /colors/c1",
                "DELETE /colors/c2",
                "GET /colors"
            ]
        );
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let backend = spawn_mock_backend(Vec::new()).await;
        let client = MasterDataClient::new(test_api_client(&backend.base_url));

        match client
            .update(MasterDataKind::Colors, "nope", &UpdateMasterDataDto::status(true))
            .await
        {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Item not found"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
