use std::collections::HashMap;

use crate::core::error::AppError;
use crate::features::categories::models::Category;
use crate::features::categories::services::CategoryService;
use crate::shared::banner::ErrorBanner;

/// Case-insensitive substring match on name, slug and description.
///
/// Order is preserved; a blank query returns every category.
pub fn search<'a>(query: &str, categories: &'a [Category]) -> Vec<&'a Category> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return categories.iter().collect();
    }

    categories
        .iter()
        .filter(|c| matches_query(c, &needle))
        .collect()
}

fn matches_query(category: &Category, needle: &str) -> bool {
    category.name.to_lowercase().contains(needle)
        || category.slug.to_lowercase().contains(needle)
        || category
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

/// Flat, searchable table of categories.
///
/// This is the boundary where backend failures stop: every action catches its
/// error into the banner and reports whether the change was applied. A failed
/// reload after an applied change still counts as applied; the banner then
/// says the list is stale.
pub struct CategoryListView {
    service: CategoryService,
    query: String,
    banner: ErrorBanner,
    pending_delete: Option<String>,
    saving: bool,
}

impl CategoryListView {
    pub fn new(service: CategoryService) -> Self {
        Self {
            service,
            query: String::new(),
            banner: ErrorBanner::new(),
            pending_delete: None,
            saving: false,
        }
    }

    pub fn service(&self) -> &CategoryService {
        &self.service
    }

    pub fn banner(&self) -> &ErrorBanner {
        &self.banner
    }

    pub fn dismiss_error(&mut self) {
        self.banner.dismiss();
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn visible(&self) -> Vec<&Category> {
        search(&self.query, self.service.categories())
    }

    pub async fn load(&mut self) -> bool {
        match self.service.reload().await {
            Ok(_) => true,
            Err(e) => {
                self.banner.show(&e);
                false
            }
        }
    }

    /// Flip the category's active flag on the backend and reload.
    ///
    /// Returns the saved record, which is current even when the reload failed.
    pub async fn toggle_status(&mut self, id: &str) -> Option<Category> {
        self.saving = true;
        let result = self.service.toggle_status(id).await;
        self.saving = false;

        match result {
            Ok(mutation) => {
                if let Some(e) = &mutation.reload_error {
                    self.banner.show_stale(e);
                }
                Some(mutation.value)
            }
            Err(e) => {
                self.banner.show(&e);
                None
            }
        }
    }

    /// First step of deletion; returns the category awaiting confirmation
    pub fn request_delete(&mut self, id: &str) -> Option<&Category> {
        if self.service.find(id).is_none() {
            self.banner
                .show(&AppError::NotFound(format!("Category '{}' not found", id)));
            return None;
        }
        self.pending_delete = Some(id.to_string());
        self.service.find(id)
    }

    pub fn pending_delete(&self) -> Option<&Category> {
        self.pending_delete
            .as_deref()
            .and_then(|id| self.service.find(id))
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second step of deletion: only acts on a previously requested id
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            tracing::debug!("confirm_delete called without a pending request");
            return false;
        };

        self.saving = true;
        let result = self.service.delete(&id).await;
        self.saving = false;

        match result {
            Ok(mutation) => {
                if let Some(e) = &mutation.reload_error {
                    self.banner.show_stale(e);
                }
                true
            }
            Err(e) => {
                self.banner.show(&e);
                false
            }
        }
    }

    /// Plain-text table of the visible rows
    pub fn render_table(&self) -> String {
        let names: HashMap<&str, &str> = self
            .service
            .categories()
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();

        let header = [
            "NAME".to_string(),
            "SLUG".to_string(),
            "PARENT".to_string(),
            "STATUS".to_string(),
            "ORDER".to_string(),
            "PRODUCTS".to_string(),
            "ID".to_string(),
        ];
        let rows: Vec<[String; 7]> = self
            .visible()
            .into_iter()
            .map(|c| {
                [
                    c.name.clone(),
                    c.slug.clone(),
                    c.parent_id
                        .as_deref()
                        .map(|p| names.get(p).copied().unwrap_or(p).to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    if c.is_active { "Active" } else { "Inactive" }.to_string(),
                    c.sort_order.to_string(),
                    c.product_count
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    c.id.clone(),
                ]
            })
            .collect();

        let mut widths = header.clone().map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let format_line = |cells: &[String; 7]| {
            cells
                .iter()
                .zip(widths.iter())
                .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![format_line(&header)];
        lines.extend(rows.iter().map(format_line));
        if rows.is_empty() {
            lines.push("(no categories match)".to_string());
        }
        lines.join("\n")
    }
}
