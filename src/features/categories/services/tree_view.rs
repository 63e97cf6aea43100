use std::collections::HashSet;

use crate::core::config::TreeConfig;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::categories::services::tree_builder::{children_of, CategoryForest};
use crate::shared::constants::{GLYPH_COLLAPSED, GLYPH_EXPANDED, GLYPH_SPACER};

/// Expand/collapse affordance shown in front of a row's label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Expanded,
    Collapsed,
    /// Leaf node; fixed-width blank keeps labels aligned
    Spacer,
}

/// One rendered line of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub indent: usize,
    pub toggle: Toggle,
    pub inactive: bool,
    pub selected: bool,
    pub show_actions: bool,
    pub product_count: Option<i64>,
}

/// User intent on a tree node. Each action touches exactly one concern:
/// toggling never selects, edit/delete never select or expand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    Toggle(String),
    Select(String),
    Edit(String),
    Delete(String),
}

impl TreeAction {
    pub fn id(&self) -> &str {
        match self {
            TreeAction::Toggle(id)
            | TreeAction::Select(id)
            | TreeAction::Edit(id)
            | TreeAction::Delete(id) => id,
        }
    }
}

/// Callbacks owned by whoever hosts the tree
pub trait TreeHandler {
    fn on_select(&mut self, category: &Category);

    fn on_edit(&mut self, _category: &Category) {}

    fn on_delete(&mut self, _category: &Category) {}
}

/// Recursive category tree with per-node expansion state.
///
/// Expansion lives only as long as this value; nothing is persisted.
#[derive(Debug, Clone)]
pub struct TreeView {
    expanded: HashSet<String>,
    selected_id: Option<String>,
    show_actions: bool,
    indent_width: usize,
    max_depth: usize,
}

impl TreeView {
    pub fn new(config: &TreeConfig) -> Self {
        Self {
            expanded: HashSet::new(),
            selected_id: None,
            show_actions: false,
            indent_width: config.indent_width,
            max_depth: config.max_depth,
        }
    }

    pub fn with_actions(mut self, show_actions: bool) -> Self {
        self.show_actions = show_actions;
        self
    }

    pub fn toggle_expand(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Expand every category that has at least one child
    pub fn expand_all(&mut self, categories: &[Category]) {
        for category in categories {
            if categories
                .iter()
                .any(|c| c.parent_id.as_deref() == Some(category.id.as_str()))
            {
                self.expanded.insert(category.id.clone());
            }
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn set_selected(&mut self, id: Option<&str>) {
        self.selected_id = id.map(str::to_string);
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Render roots at depth 0 and the children of every expanded node below them
    pub fn render(&self, categories: &[Category]) -> Result<Vec<TreeRow>> {
        let forest = CategoryForest::build(categories)?;
        if forest.is_empty() {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        let mut path = HashSet::new();

        for &root in forest.roots() {
            self.render_node(&forest, root, 0, &mut path, &mut rows)?;
        }

        tracing::debug!(
            "Rendered {} of {} categories ({} expanded)",
            rows.len(),
            forest.len(),
            self.expanded.len()
        );
        Ok(rows)
    }

    fn render_node(
        &self,
        forest: &CategoryForest<'_>,
        index: usize,
        depth: usize,
        path: &mut HashSet<usize>,
        rows: &mut Vec<TreeRow>,
    ) -> Result<()> {
        let category = forest.get(index);

        if depth >= self.max_depth {
            return Err(AppError::DataIntegrity(format!(
                "Category tree exceeds {} levels at '{}'",
                self.max_depth, category.id
            )));
        }
        if !path.insert(index) {
            return Err(AppError::DataIntegrity(format!(
                "Category '{}' appears twice on one branch",
                category.id
            )));
        }

        let has_children = forest.has_children(index);
        let expanded = has_children && self.is_expanded(&category.id);
        let toggle = match (has_children, expanded) {
            (false, _) => Toggle::Spacer,
            (true, true) => Toggle::Expanded,
            (true, false) => Toggle::Collapsed,
        };

        rows.push(TreeRow {
            id: category.id.clone(),
            name: category.name.clone(),
            depth,
            indent: depth * self.indent_width,
            toggle,
            inactive: !category.is_active,
            selected: self.selected_id.as_deref() == Some(category.id.as_str()),
            show_actions: self.show_actions,
            product_count: category.product_count,
        });

        if expanded {
            for &child in forest.children(index) {
                self.render_node(forest, child, depth + 1, path, rows)?;
            }
        }

        path.remove(&index);
        Ok(())
    }

    /// Route one user action to the state or callback it concerns
    pub fn dispatch<H>(
        &mut self,
        categories: &[Category],
        action: TreeAction,
        handler: &mut H,
    ) -> Result<()>
    where
        H: TreeHandler + ?Sized,
    {
        let category = categories
            .iter()
            .find(|c| c.id == action.id())
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", action.id())))?;

        match action {
            TreeAction::Toggle(_) => {
                // leaves have no toggle control
                if !children_of(categories, Some(&category.id)).is_empty() {
                    self.toggle_expand(&category.id);
                }
            }
            TreeAction::Select(_) => handler.on_select(category),
            TreeAction::Edit(_) if self.show_actions => handler.on_edit(category),
            TreeAction::Delete(_) if self.show_actions => handler.on_delete(category),
            TreeAction::Edit(_) | TreeAction::Delete(_) => {
                tracing::debug!("Inline actions hidden, ignoring {:?}", action);
            }
        }

        Ok(())
    }
}

pub fn format_rows(rows: &[TreeRow]) -> String {
    rows.iter().map(format_row).collect::<Vec<_>>().join("\n")
}

fn format_row(row: &TreeRow) -> String {
    let marker = if row.selected { ">" } else { " " };
    let glyph = match row.toggle {
        Toggle::Expanded => GLYPH_EXPANDED,
        Toggle::Collapsed => GLYPH_COLLAPSED,
        Toggle::Spacer => GLYPH_SPACER,
    };

    let mut line = format!("{} {}{} {}", marker, " ".repeat(row.indent), glyph, row.name);
    if let Some(count) = row.product_count {
        line.push_str(&format!(" ({})", count));
    }
    if row.inactive {
        line.push_str(" [Inactive]");
    }
    if row.show_actions {
        line.push_str(&format!("  [edit] [delete]  #{}", row.id));
    }
    line
}

/// Detail panel for the selected category
pub fn detail_panel(category: &Category, parent: Option<&Category>) -> String {
    let mut lines = vec![
        format!("Name:        {}", category.name),
        format!("Id:          {}", category.id),
        format!("Slug:        {}", category.slug),
        format!(
            "Parent:      {}",
            parent.map(|p| p.name.as_str()).unwrap_or("(root)")
        ),
        format!(
            "Status:      {}",
            if category.is_active { "Active" } else { "Inactive" }
        ),
        format!("Sort order:  {}", category.sort_order),
    ];

    if let Some(count) = category.product_count {
        lines.push(format!("Products:    {}", count));
    }
    if let Some(description) = &category.description {
        lines.push(format!("Description: {}", description));
    }
    for (label, value) in [
        ("Icon", &category.icon),
        ("Image", &category.image),
        ("Color", &category.color),
    ] {
        if let Some(value) = value {
            lines.push(format!("{:<13}{}", format!("{}:", label), value));
        }
    }
    if let Some(created_at) = category.created_at {
        lines.push(format!("Created:     {}", created_at.format("%Y-%m-%d %H:%M")));
    }
    if let Some(updated_at) = category.updated_at {
        lines.push(format!("Updated:     {}", updated_at.format("%Y-%m-%d %H:%M")));
    }

    lines.join("\n")
}
