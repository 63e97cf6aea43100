use std::io::Write;
use std::sync::Arc;

use clap::{Args, Subcommand};

use crate::core::error::{AppError, Result};
use crate::features::master_data::clients::MasterDataApi;
use crate::features::master_data::dtos::{CreateMasterDataDto, UpdateMasterDataDto};
use crate::features::master_data::models::{MasterDataItem, MasterDataKind};
use crate::features::master_data::services::MasterDataService;
use crate::shared::banner::ErrorBanner;
use crate::shared::confirm::Confirm;

#[derive(Debug, Subcommand)]
pub enum MasterDataCommand {
    /// List items ordered by sort order
    List {
        /// Case-insensitive filter on name and code
        #[arg(long, short, default_value = "")]
        search: String,
    },

    /// Create an item
    Create(ItemArgs),

    /// Update fields of an item
    Update {
        id: String,

        #[command(flatten)]
        fields: ItemFields,
    },

    /// Flip an item between active and inactive
    Toggle { id: String },

    /// Delete an item after confirmation
    Delete {
        id: String,

        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct ItemArgs {
    pub name: String,

    #[arg(long)]
    pub code: Option<String>,

    /// `#RRGGBB`, required for colors
    #[arg(long)]
    pub hex_code: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, default_value_t = 0)]
    pub sort_order: i32,

    #[arg(long)]
    pub inactive: bool,
}

#[derive(Debug, Default, Args)]
pub struct ItemFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub code: Option<String>,

    #[arg(long)]
    pub hex_code: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub sort_order: Option<i32>,
}

impl From<ItemArgs> for CreateMasterDataDto {
    fn from(args: ItemArgs) -> Self {
        Self {
            code: args.code,
            hex_code: args.hex_code,
            description: args.description,
            is_active: !args.inactive,
            sort_order: args.sort_order,
            ..CreateMasterDataDto::new(args.name)
        }
    }
}

impl From<ItemFields> for UpdateMasterDataDto {
    fn from(fields: ItemFields) -> Self {
        Self {
            name: fields.name,
            code: fields.code,
            hex_code: fields.hex_code,
            description: fields.description,
            sort_order: fields.sort_order,
            is_active: None,
        }
    }
}

/// Run one master data command; failures end up in the printed banner.
///
/// A failed reload after an applied change is still reported as success.
pub async fn run(
    kind: MasterDataKind,
    command: MasterDataCommand,
    api: Arc<dyn MasterDataApi>,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
) -> Result<bool> {
    let mut service = MasterDataService::new(api, kind);
    let mut banner = ErrorBanner::new();

    if let Err(e) = service.reload().await {
        banner.show(&e);
        return report(&banner, out);
    }

    match execute(&mut service, command, confirm, out).await {
        Ok(None) => report(&banner, out),
        Ok(Some(stale)) => {
            // the change itself went through
            banner.show_stale(&stale);
            report(&banner, out)?;
            Ok(true)
        }
        Err(e) => {
            banner.show(&e);
            report(&banner, out)
        }
    }
}

async fn execute(
    service: &mut MasterDataService,
    command: MasterDataCommand,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
) -> Result<Option<AppError>> {
    let kind = service.kind();

    let stale = match command {
        MasterDataCommand::List { search } => {
            writeln!(out, "{}", render_table(kind, &filter(service, &search)))?;
            None
        }
        MasterDataCommand::Create(args) => {
            let mutation = service.create(args.into()).await?;
            let item = &mutation.value;
            writeln!(out, "Created {} '{}' ({})", kind.label(), item.name, item.id)?;
            mutation.reload_error
        }
        MasterDataCommand::Update { id, fields } => {
            let mutation = service.update(&id, fields.into()).await?;
            let item = &mutation.value;
            writeln!(out, "Updated {} '{}' ({})", kind.label(), item.name, item.id)?;
            mutation.reload_error
        }
        MasterDataCommand::Toggle { id } => {
            let mutation = service.toggle_status(&id).await?;
            let item = &mutation.value;
            let state = if item.is_active { "active" } else { "inactive" };
            writeln!(out, "Marked {} '{}' as {}", kind.label(), item.name, state)?;
            mutation.reload_error
        }
        MasterDataCommand::Delete { id, yes } => delete(service, &id, yes, confirm, out).await?,
    };

    Ok(stale)
}

async fn delete(
    service: &mut MasterDataService,
    id: &str,
    assume_yes: bool,
    confirm: &mut dyn Confirm,
    out: &mut dyn Write,
) -> Result<Option<AppError>> {
    let kind = service.kind();
    let name = service.require(id)?.name.clone();

    let prompt = format!("Delete {} '{}'?", kind.label(), name);
    if !assume_yes && !confirm.confirm(&prompt)? {
        writeln!(out, "Delete cancelled")?;
        return Ok(None);
    }

    let mutation = service.delete(id).await?;
    writeln!(out, "Deleted {} '{}'", kind.label(), name)?;
    Ok(mutation.reload_error)
}

fn report(banner: &ErrorBanner, out: &mut dyn Write) -> Result<bool> {
    if let Some(line) = banner.render() {
        writeln!(out, "{}", line)?;
    }
    Ok(!banner.is_visible())
}

fn filter<'a>(service: &'a MasterDataService, query: &str) -> Vec<&'a MasterDataItem> {
    let needle = query.trim().to_lowercase();
    service
        .sorted()
        .into_iter()
        .filter(|item| {
            needle.is_empty()
                || item.name.to_lowercase().contains(&needle)
                || item
                    .code
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase().contains(&needle))
        })
        .collect()
}

fn render_table(kind: MasterDataKind, items: &[&MasterDataItem]) -> String {
    if items.is_empty() {
        return format!("(no {})", kind);
    }

    let name_width = items
        .iter()
        .map(|i| i.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let mut line = format!(
            "{:<width$}  {:<8}  {:>3}",
            item.name,
            if item.is_active { "Active" } else { "Inactive" },
            item.sort_order,
            width = name_width
        );
        if let Some(hex) = &item.hex_code {
            line.push_str(&format!("  {}", hex));
        }
        if let Some(code) = &item.code {
            line.push_str(&format!("  [{}]", code));
        }
        line.push_str(&format!("  #{}", item.id));
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::master_data::clients::MasterDataClient;
    use crate::shared::confirm::{AssumeYes, PromptConfirm};
    use crate::shared::test_helpers::{spawn_mock_backend, test_api_client, MockBackend};

    async fn run_colors(
        backend: &MockBackend,
        command: MasterDataCommand,
        confirm: &mut dyn Confirm,
    ) -> (bool, String) {
        let api = Arc::new(MasterDataClient::new(test_api_client(&backend.base_url)));
        let mut out = Vec::new();
        let ok = run(MasterDataKind::Colors, command, api, confirm, &mut out)
            .await
            .unwrap();
        (ok, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_list_colors() {
        let backend = spawn_mock_backend(Vec::new()).await;
        let (ok, out) = run_colors(
            &backend,
            MasterDataCommand::List {
                search: String::new(),
            },
            &mut AssumeYes,
        )
        .await;

        assert!(ok);
        assert_eq!(
            out,
            "Red   Active      0  #FF0000  #c1\nNavy  Active      1  #000080  #c2\n"
        );
    }

    #[tokio::test]
    async fn test_create_color_validation_failure() {
        let backend = spawn_mock_backend(Vec::new()).await;
        let args = ItemArgs {
            name: "Olive".to_string(),
            code: None,
            hex_code: Some("olive".to_string()),
            description: None,
            sort_order: 0,
            inactive: false,
        };

        let (ok, out) = run_colors(&backend, MasterDataCommand::Create(args), &mut AssumeYes).await;
        assert!(!ok);
        assert!(out.contains("hex_code: Hex code must look like #RRGGBB"));
        assert_eq!(backend.state.lock().unwrap().count("POST /colors"), 0);
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let backend = spawn_mock_backend(Vec::new()).await;

        let (ok, out) = run_colors(
            &backend,
            MasterDataCommand::Toggle {
                id: "c1".to_string(),
            },
            &mut AssumeYes,
        )
        .await;
        assert!(ok);
        assert_eq!(out, "Marked color 'Red' as inactive\n");

        let mut declined = PromptConfirm::new("no\n".as_bytes(), Vec::new());
        let (ok, out) = run_colors(
            &backend,
            MasterDataCommand::Delete {
                id: "c2".to_string(),
                yes: false,
            },
            &mut declined,
        )
        .await;
        assert!(ok);
        assert_eq!(out, "Delete cancelled\n");

        let (ok, out) = run_colors(
            &backend,
            MasterDataCommand::Delete {
                id: "c2".to_string(),
                yes: true,
            },
            &mut AssumeYes,
        )
        .await;
        assert!(ok);
        assert_eq!(out, "Deleted color 'Navy'\n");
        assert_eq!(backend.state.lock().unwrap().colors.len(), 1);
    }

    #[tokio::test]
    async fn test_create_color_reported_even_if_reload_fails() {
        let backend = spawn_mock_backend(Vec::new()).await;
        backend.state.lock().unwrap().fail_lists_after = Some(1);
        let args = ItemArgs {
            name: "Olive".to_string(),
            code: None,
            hex_code: Some("#808000".to_string()),
            description: None,
            sort_order: 2,
            inactive: false,
        };

        let (ok, out) = run_colors(&backend, MasterDataCommand::Create(args), &mut AssumeYes).await;
        assert!(ok, "{}", out);
        assert!(out.starts_with("Created color 'Olive' ("));
        assert!(out.contains("Saved, but the list could not be reloaded: Database unavailable"));
        assert_eq!(backend.state.lock().unwrap().colors.len(), 3);
    }

    #[tokio::test]
    async fn test_list_failure_shows_banner() {
        let backend = spawn_mock_backend(Vec::new()).await;
        backend.state.lock().unwrap().fail_lists = true;

        let (ok, out) = run_colors(
            &backend,
            MasterDataCommand::List {
                search: String::new(),
            },
            &mut AssumeYes,
        )
        .await;
        assert!(!ok);
        assert!(out.contains("Database unavailable"));
    }
}
