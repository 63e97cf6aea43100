use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::master_data::clients::MasterDataApi;
use crate::features::master_data::dtos::{CreateMasterDataDto, UpdateMasterDataDto};
use crate::features::master_data::models::{MasterDataItem, MasterDataKind};
use crate::shared::types::Mutation;

/// Cached list of one master data kind; reloaded in full after every mutation
pub struct MasterDataService {
    api: Arc<dyn MasterDataApi>,
    kind: MasterDataKind,
    items: Vec<MasterDataItem>,
}

impl MasterDataService {
    pub fn new(api: Arc<dyn MasterDataApi>, kind: MasterDataKind) -> Self {
        Self {
            api,
            kind,
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> MasterDataKind {
        self.kind
    }

    pub fn items(&self) -> &[MasterDataItem] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&MasterDataItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Items ordered for display: sort order, then name
    pub fn sorted(&self) -> Vec<&MasterDataItem> {
        let mut items: Vec<&MasterDataItem> = self.items.iter().collect();
        items.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        items
    }

    pub async fn reload(&mut self) -> Result<&[MasterDataItem]> {
        let items = self.api.list(self.kind).await.map_err(|e| {
            tracing::error!("Failed to load {}: {}", self.kind, e);
            e
        })?;
        self.items = items;
        Ok(&self.items)
    }

    /// Reload after a mutation the backend already applied
    async fn settle<T>(&mut self, value: T) -> Mutation<T> {
        Mutation {
            value,
            reload_error: self.reload().await.err(),
        }
    }

    pub async fn create(&mut self, dto: CreateMasterDataDto) -> Result<Mutation<MasterDataItem>> {
        let dto = dto.normalized();
        dto.validate_for(self.kind)?;

        let created = self.api.create(self.kind, &dto).await?;
        Ok(self.settle(created).await)
    }

    pub async fn update(
        &mut self,
        id: &str,
        dto: UpdateMasterDataDto,
    ) -> Result<Mutation<MasterDataItem>> {
        let dto = dto.normalized();
        if dto.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }
        dto.validate()?;

        let updated = self.api.update(self.kind, id, &dto).await?;
        Ok(self.settle(updated).await)
    }

    pub async fn toggle_status(&mut self, id: &str) -> Result<Mutation<MasterDataItem>> {
        let next = !self.require(id)?.is_active;
        self.update(id, UpdateMasterDataDto::status(next)).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<Mutation<()>> {
        self.api.delete(self.kind, id).await?;
        Ok(self.settle(()).await)
    }

    pub fn require(&self, id: &str) -> Result<&MasterDataItem> {
        self.find(id).ok_or_else(|| {
            AppError::NotFound(format!("{} '{}' not found", capitalize(self.kind.label()), id))
        })
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::master_data::clients::MasterDataClient;
    use crate::shared::test_helpers::{spawn_mock_backend, test_api_client, MockBackend};

    async fn colors() -> (MockBackend, MasterDataService) {
        let backend = spawn_mock_backend(Vec::new()).await;
        let api = Arc::new(MasterDataClient::new(test_api_client(&backend.base_url)));
        let mut service = MasterDataService::new(api, MasterDataKind::Colors);
        service.reload().await.unwrap();
        (backend, service)
    }

    #[tokio::test]
    async fn test_create_color_without_hex_never_posts() {
        let (backend, mut service) = colors().await;

        let result = service.create(CreateMasterDataDto::new("Olive")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(backend.state.lock().unwrap().count("POST /colors"), 0);
    }

    #[tokio::test]
    async fn test_toggle_reloads() {
        let (backend, mut service) = colors().await;

        let updated = service.toggle_status("c2").await.unwrap();
        assert!(!updated.value.is_active);
        assert!(!updated.is_stale());
        assert!(!service.find("c2").unwrap().is_active);
        assert_eq!(backend.state.lock().unwrap().count("GET /colors"), 2);
    }

    #[tokio::test]
    async fn test_toggle_unknown_item() {
        let (_backend, mut service) = colors().await;
        match service.toggle_status("zz").await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Color 'zz' not found"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sorted_by_order_then_name() {
        let (_backend, mut service) = colors().await;
        let dto = CreateMasterDataDto {
            hex_code: Some("#000000".to_string()),
            ..CreateMasterDataDto::new("Black")
        };
        service.create(dto).await.unwrap();

        let names: Vec<&str> = service.sorted().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Black", "Red", "Navy"]);
    }

    #[tokio::test]
    async fn test_toggle_applied_when_reload_fails() {
        let (backend, mut service) = colors().await;
        backend.state.lock().unwrap().fail_lists = true;

        let updated = service.toggle_status("c1").await.unwrap();
        assert!(!updated.value.is_active);
        assert!(matches!(updated.reload_error, Some(AppError::Api { .. })));
        assert_eq!(backend.state.lock().unwrap().colors[0]["isActive"], false);
        assert!(service.find("c1").unwrap().is_active);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_items() {
        let (backend, mut service) = colors().await;
        backend.state.lock().unwrap().fail_mutations = true;

        assert!(service.delete("c1").await.is_err());
        assert_eq!(service.items().len(), 2);
    }
}
