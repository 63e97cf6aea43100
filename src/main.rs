use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_admin::core::config::Config;
use catalog_admin::core::http::ApiClient;
use catalog_admin::features::auth::handlers::{self as auth_handlers, LoginArgs};
use catalog_admin::features::auth::services::AuthContext;
use catalog_admin::features::categories::clients::CategoryClient;
use catalog_admin::features::categories::handlers::{
    self as category_handlers, CategoryCommand, CategoryContext,
};
use catalog_admin::features::master_data::clients::MasterDataClient;
use catalog_admin::features::master_data::handlers::{
    self as master_data_handlers, MasterDataCommand,
};
use catalog_admin::features::master_data::models::MasterDataKind;
use catalog_admin::shared::confirm::{AssumeYes, Confirm, PromptConfirm, TerminalConfirm};
use catalog_admin::shared::password::{LinePassword, PasswordPrompt, TerminalPassword};

#[derive(Debug, Parser)]
#[command(name = "catalog-admin", version, about = "Manage the store catalog from the terminal")]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(long, global = true)]
    assume_yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the session locally
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the logged-in admin
    Whoami,

    /// Browse and edit the category hierarchy
    #[command(subcommand)]
    Categories(CategoryCommand),

    /// Manage master data lists (colors, sizes, ...)
    MasterData {
        #[arg(value_enum)]
        kind: MasterDataKind,

        #[command(subcommand)]
        command: MasterDataCommand,
    },
}

/// Stdin is only locked when a command actually asks for confirmation
fn confirmer(assume_yes: bool) -> Box<dyn Confirm> {
    if assume_yes {
        Box::new(AssumeYes)
    } else if std::io::stdin().is_terminal() {
        Box::new(TerminalConfirm)
    } else {
        Box::new(PromptConfirm::stdio())
    }
}

/// Hidden input on a terminal, one plain line when stdin is piped
fn password_prompt() -> Box<dyn PasswordPrompt> {
    if std::io::stdin().is_terminal() {
        Box::new(TerminalPassword)
    } else {
        Box::new(LinePassword::stdio())
    }
}

fn main() -> anyhow::Result<ExitCode> {
    // One request at a time; no worker pool needed
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<ExitCode> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::debug!("Using backend at {}", config.api.base_url);

    let mut auth = AuthContext::bootstrap(&config.session.path)?;
    let api = ApiClient::new(&config.api)?.with_token(auth.token().map(str::to_string));

    let mut stdout = std::io::stdout().lock();

    let ok = match cli.command {
        Command::Login(args) => {
            let mut prompt = password_prompt();
            auth_handlers::login(&mut auth, &api, args, prompt.as_mut(), &mut stdout).await?
        }
        Command::Logout => auth_handlers::logout(&mut auth, &mut stdout)?,
        Command::Whoami => auth_handlers::whoami(&auth, &mut stdout)?,
        Command::Categories(command) => {
            auth.require_session()?;
            let mut confirm = confirmer(cli.assume_yes);
            let ctx = CategoryContext {
                api: Arc::new(CategoryClient::new(api)),
                tree: &config.tree,
                confirm: confirm.as_mut(),
            };
            category_handlers::run(command, ctx, &mut stdout).await?
        }
        Command::MasterData { kind, command } => {
            auth.require_session()?;
            let mut confirm = confirmer(cli.assume_yes);
            let client = Arc::new(MasterDataClient::new(api));
            master_data_handlers::run(kind, command, client, confirm.as_mut(), &mut stdout).await?
        }
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
