use std::io::Write;
use std::sync::Arc;

use clap::{Args, Subcommand};

use crate::core::config::TreeConfig;
use crate::core::error::Result;
use crate::features::categories::clients::CategoryApi;
use crate::features::categories::dtos::{CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::models::Category;
use crate::features::categories::services::tree_view::{detail_panel, format_rows};
use crate::features::categories::services::{
    CategoryForest, CategoryListView, CategoryService, TreeAction, TreeHandler, TreeView,
};
use crate::shared::banner::ErrorBanner;
use crate::shared::confirm::Confirm;

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// Show categories as an indented tree
    Tree {
        /// Expand the node with this id (repeatable)
        #[arg(long = "expand", value_name = "ID")]
        expand: Vec<String>,

        /// Expand every node that has children
        #[arg(long, conflicts_with = "expand")]
        expand_all: bool,

        /// Select a node and print its detail panel
        #[arg(long, value_name = "ID")]
        select: Option<String>,

        /// Show inline edit/delete affordances with ids
        #[arg(long)]
        actions: bool,
    },

    /// Show categories as a flat table
    List {
        /// Case-insensitive filter on name, slug and description
        #[arg(long, short, default_value = "")]
        search: String,
    },

    /// Show one category
    Show { id: String },

    /// Create a category
    Create(CreateArgs),

    /// Update fields of a category
    Update(UpdateArgs),

    /// Flip a category between active and inactive
    Toggle { id: String },

    /// Delete a category after confirmation
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub name: String,

    /// Derived from the name when omitted
    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Parent category id; omit for a root category
    #[arg(long = "parent", value_name = "ID")]
    pub parent_id: Option<String>,

    #[arg(long, default_value_t = 0)]
    pub sort_order: i32,

    /// Create the category as inactive
    #[arg(long)]
    pub inactive: bool,

    #[arg(long)]
    pub icon: Option<String>,

    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub color: Option<String>,
}

impl From<CreateArgs> for CreateCategoryDto {
    fn from(args: CreateArgs) -> Self {
        Self {
            slug: args.slug.unwrap_or_default(),
            description: args.description,
            parent_id: args.parent_id,
            is_active: !args.inactive,
            sort_order: args.sort_order,
            icon: args.icon,
            image: args.image,
            color: args.color,
            ..CreateCategoryDto::new(args.name)
        }
    }
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Move under another category
    #[arg(long = "parent", value_name = "ID", conflicts_with = "root")]
    pub parent_id: Option<String>,

    /// Move to the root level
    #[arg(long)]
    pub root: bool,

    #[arg(long)]
    pub sort_order: Option<i32>,

    #[arg(long)]
    pub icon: Option<String>,

    #[arg(long)]
    pub image: Option<String>,

    #[arg(long)]
    pub color: Option<String>,
}

impl UpdateArgs {
    fn into_parts(self) -> (String, UpdateCategoryDto) {
        let parent_id = if self.root {
            Some(None)
        } else {
            self.parent_id.map(Some)
        };

        let dto = UpdateCategoryDto {
            name: self.name,
            slug: self.slug,
            description: self.description,
            parent_id,
            sort_order: self.sort_order,
            icon: self.icon,
            image: self.image,
            color: self.color,
            ..Default::default()
        };
        (self.id, dto)
    }
}

/// Everything a category command needs besides its arguments
pub struct CategoryContext<'a> {
    pub api: Arc<dyn CategoryApi>,
    pub tree: &'a TreeConfig,
    pub confirm: &'a mut dyn Confirm,
}

/// Run one category command.
///
/// Backend and validation failures are printed as the error banner and
/// reported as `Ok(false)`; only output failures are returned as errors.
pub async fn run(
    command: CategoryCommand,
    ctx: CategoryContext<'_>,
    out: &mut dyn Write,
) -> Result<bool> {
    let service = CategoryService::new(Arc::clone(&ctx.api));

    match command {
        CategoryCommand::Tree {
            expand,
            expand_all,
            select,
            actions,
        } => tree(service, ctx.tree, expand, expand_all, select, actions, out).await,
        CategoryCommand::List { search } => list(service, search, out).await,
        CategoryCommand::Show { id } => show(service, &id, out).await,
        CategoryCommand::Create(args) => create(service, args.into(), out).await,
        CategoryCommand::Update(args) => {
            let (id, dto) = args.into_parts();
            update(service, &id, dto, out).await
        }
        CategoryCommand::Toggle { id } => toggle(service, &id, out).await,
        CategoryCommand::Delete { id, yes } => delete(service, &id, yes, ctx.confirm, out).await,
    }
}

fn report(banner: &ErrorBanner, out: &mut dyn Write) -> Result<bool> {
    if let Some(line) = banner.render() {
        writeln!(out, "{}", line)?;
    }
    Ok(!banner.is_visible())
}

/// The change reached the backend; any banner left only flags a stale list
fn report_applied(banner: &ErrorBanner, out: &mut dyn Write) -> Result<bool> {
    report(banner, out)?;
    Ok(true)
}

/// Captures the node picked through the tree's select action
#[derive(Default)]
struct Selection {
    category: Option<Category>,
}

impl TreeHandler for Selection {
    fn on_select(&mut self, category: &Category) {
        self.category = Some(category.clone());
    }
}

async fn tree(
    mut service: CategoryService,
    config: &TreeConfig,
    expand: Vec<String>,
    expand_all: bool,
    select: Option<String>,
    actions: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let mut banner = ErrorBanner::new();
    if let Err(e) = service.reload().await {
        banner.show(&e);
        return report(&banner, out);
    }

    let categories = service.categories();
    let mut view = TreeView::new(config).with_actions(actions);
    let mut selection = Selection::default();

    let mut actions: Vec<TreeAction> = expand.into_iter().map(TreeAction::Toggle).collect();
    actions.extend(select.map(TreeAction::Select));
    if expand_all {
        view.expand_all(categories);
    }

    for action in actions {
        if let Err(e) = view.dispatch(categories, action, &mut selection) {
            banner.show(&e);
        }
    }
    if let Some(selected) = &selection.category {
        view.set_selected(Some(&selected.id));
    }

    match view.render(categories) {
        Ok(rows) if rows.is_empty() => writeln!(out, "(no categories)")?,
        Ok(rows) => writeln!(out, "{}", format_rows(&rows))?,
        Err(e) => banner.show(&e),
    }

    if let Some(selected) = &selection.category {
        let parent = selected
            .parent_id
            .as_deref()
            .and_then(|id| service.find(id));
        writeln!(out)?;
        writeln!(out, "{}", detail_panel(selected, parent))?;
        if let Some(path) = breadcrumb(categories, &selected.id) {
            writeln!(out, "Path:        {}", path)?;
        }
    }

    report(&banner, out)
}

/// "Clothing > Shirts > Polo" for nested categories, `None` for roots
fn breadcrumb(categories: &[Category], id: &str) -> Option<String> {
    let forest = CategoryForest::build(categories).ok()?;
    let index = forest.position(id)?;
    let ancestors = forest.ancestors(index);
    if ancestors.is_empty() {
        return None;
    }

    let mut names: Vec<&str> = ancestors.iter().map(|c| c.name.as_str()).collect();
    names.push(forest.get(index).name.as_str());
    Some(names.join(" > "))
}

async fn list(service: CategoryService, search: String, out: &mut dyn Write) -> Result<bool> {
    let mut view = CategoryListView::new(service);
    view.set_query(search);

    if view.load().await {
        writeln!(out, "{}", view.render_table())?;
    }
    report(view.banner(), out)
}

async fn show(service: CategoryService, id: &str, out: &mut dyn Write) -> Result<bool> {
    let mut banner = ErrorBanner::new();

    match service.get(id).await {
        Ok(category) => {
            let parent = match category.parent_id.as_deref() {
                Some(parent_id) => service.get(parent_id).await.ok(),
                None => None,
            };
            writeln!(out, "{}", detail_panel(&category, parent.as_ref()))?;
        }
        Err(e) => banner.show(&e),
    }

    report(&banner, out)
}

async fn create(
    mut service: CategoryService,
    dto: CreateCategoryDto,
    out: &mut dyn Write,
) -> Result<bool> {
    let mut banner = ErrorBanner::new();

    // parent checks run against the loaded list
    let result = match service.reload().await {
        Ok(_) => service.create(dto).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(mutation) => {
            let category = &mutation.value;
            match &mutation.reload_error {
                None => writeln!(
                    out,
                    "Created category '{}' ({}); {} categories total",
                    category.name,
                    category.id,
                    service.categories().len()
                )?,
                Some(e) => {
                    writeln!(out, "Created category '{}' ({})", category.name, category.id)?;
                    banner.show_stale(e);
                }
            }
            report_applied(&banner, out)
        }
        Err(e) => {
            banner.show(&e);
            report(&banner, out)
        }
    }
}

async fn update(
    mut service: CategoryService,
    id: &str,
    dto: UpdateCategoryDto,
    out: &mut dyn Write,
) -> Result<bool> {
    let mut banner = ErrorBanner::new();

    let result = match service.reload().await {
        Ok(_) => service.update(id, dto).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(mutation) => {
            let category = &mutation.value;
            writeln!(out, "Updated category '{}' ({})", category.name, category.id)?;
            if let Some(e) = &mutation.reload_error {
                banner.show_stale(e);
            }
            report_applied(&banner, out)
        }
        Err(e) => {
            banner.show(&e);
            report(&banner, out)
        }
    }
}

async fn toggle(service: CategoryService, id: &str, out: &mut dyn Write) -> Result<bool> {
    let mut view = CategoryListView::new(service);

    if !view.load().await {
        return report(view.banner(), out);
    }

    match view.toggle_status(id).await {
        Some(category) => {
            writeln!(
                out,
                "Category '{}' is now {}",
                category.name,
                if category.is_active { "active" } else { "inactive" }
            )?;
            report_applied(view.banner(), out)
        }
        None => report(view.banner(), out),
    }
}

async fn delete(
    service: CategoryService,
    id: &str,
    assume_yes: bool,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
) -> Result<bool> {
    let mut view = CategoryListView::new(service);
    if !view.load().await {
        return report(view.banner(), out);
    }

    let Some(category) = view.request_delete(id) else {
        return report(view.banner(), out);
    };

    let mut prompt = format!("Delete category '{}'?", category.name);
    if let Some(count) = category.product_count.filter(|&n| n > 0) {
        prompt.push_str(&format!(" It has {} products.", count));
    }
    let name = category.name.clone();

    if !assume_yes && !confirm.confirm(&prompt)? {
        view.cancel_delete();
        writeln!(out, "Delete cancelled")?;
        return Ok(true);
    }

    if !view.confirm_delete().await {
        return report(view.banner(), out);
    }

    if view.banner().is_visible() {
        writeln!(out, "Deleted category '{}'", name)?;
    } else {
        writeln!(
            out,
            "Deleted category '{}'; {} categories remain",
            name,
            view.service().categories().len()
        )?;
    }
    report_applied(view.banner(), out)
}
