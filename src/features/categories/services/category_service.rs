use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::clients::CategoryApi;
use crate::features::categories::dtos::{CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::models::Category;
use crate::features::categories::services::tree_builder::would_create_cycle;
use crate::shared::types::Mutation;

/// Client-side cache of the backend's category list.
///
/// Every mutation is followed by a full reload; the list is never patched
/// locally. A failed reload keeps the previous (stale) list; after a
/// mutation that failure is returned alongside the saved record instead of
/// replacing it.
pub struct CategoryService {
    api: Arc<dyn CategoryApi>,
    categories: Vec<Category>,
    loaded: bool,
}

impl CategoryService {
    pub fn new(api: Arc<dyn CategoryApi>) -> Self {
        Self {
            api,
            categories: Vec::new(),
            loaded: false,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn find(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Fetch the full list, replacing the cache only on success
    pub async fn reload(&mut self) -> Result<&[Category]> {
        let categories = self.api.list().await.map_err(|e| {
            tracing::error!("Failed to load categories: {}", e);
            e
        })?;

        tracing::debug!("Loaded {} categories", categories.len());
        self.categories = categories;
        self.loaded = true;
        Ok(&self.categories)
    }

    /// Single category straight from the backend
    pub async fn get(&self, id: &str) -> Result<Category> {
        self.api.get(id).await
    }

    /// Reload after a mutation the backend already applied
    async fn settle<T>(&mut self, value: T) -> Mutation<T> {
        Mutation {
            value,
            reload_error: self.reload().await.err(),
        }
    }

    pub async fn create(&mut self, dto: CreateCategoryDto) -> Result<Mutation<Category>> {
        let dto = dto.normalized();
        dto.validate()?;

        if let Some(parent_id) = dto.parent_id.as_deref() {
            self.ensure_parent_exists(parent_id)?;
        }

        let created = self.api.create(&dto).await?;
        Ok(self.settle(created).await)
    }

    pub async fn update(&mut self, id: &str, dto: UpdateCategoryDto) -> Result<Mutation<Category>> {
        let dto = dto.normalized();
        if dto.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }
        dto.validate()?;

        if let Some(Some(parent_id)) = dto.parent_id.as_ref() {
            if parent_id == id {
                return Err(AppError::Validation(
                    "parent_id: A category cannot be its own parent".to_string(),
                ));
            }
            self.ensure_parent_exists(parent_id)?;
            if would_create_cycle(&self.categories, id, Some(parent_id.as_str())) {
                return Err(AppError::Validation(
                    "parent_id: A category cannot be moved under its own descendant".to_string(),
                ));
            }
        }

        let updated = self.api.update(id, &dto).await?;
        Ok(self.settle(updated).await)
    }

    /// Flip `is_active` on the backend, then reload
    pub async fn toggle_status(&mut self, id: &str) -> Result<Mutation<Category>> {
        let current = self
            .find(id)
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", id)))?;
        let next = !current.is_active;

        tracing::info!(
            "Setting category '{}' {}",
            current.name,
            if next { "active" } else { "inactive" }
        );
        self.update(id, UpdateCategoryDto::status(next)).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<Mutation<()>> {
        self.api.delete(id).await?;
        Ok(self.settle(()).await)
    }

    /// Only checked against a loaded cache; an unloaded cache defers to the backend
    fn ensure_parent_exists(&self, parent_id: &str) -> Result<()> {
        if self.loaded && self.find(parent_id).is_none() {
            return Err(AppError::Validation(format!(
                "parent_id: Parent category '{}' does not exist",
                parent_id
            )));
        }
        Ok(())
    }
}
