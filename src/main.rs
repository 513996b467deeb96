//! wawidget - storefront contact widget.
//!
//! Command-line preview of what a storefront would draw for an account.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use wawidget_client::{ApiClient, PublicApi};
use wawidget_config::Config;
use wawidget_protocol::OptionId;
use wawidget_render::{ButtonSession, OptionAction, PanelView, WidgetSession};

#[derive(Debug, Parser)]
#[command(name = "wawidget", version, about)]
struct Cli {
    /// Merchant account; overrides the configuration.
    #[arg(long, global = true)]
    account: Option<String>,

    /// Configuration file to read instead of the usual locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the widget and print the resolved styles and options.
    Preview {
        /// Viewport width in pixels.
        #[arg(long, default_value_t = 1280)]
        width: u32,
    },
    /// Print whether the WhatsApp help button is available.
    Status {
        /// Product page to build the help link for.
        #[arg(long)]
        product_url: Option<String>,
    },
    /// Open an option's conversation link.
    Open {
        /// Option identity.
        option_id: String,
    },
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    debug!(api = %config.api_base_url, "configuration loaded");
    Ok(config)
}

async fn mounted_session(api: PublicApi, account: &str) -> anyhow::Result<WidgetSession> {
    let mut session = WidgetSession::new(api, account);
    session.mount().await?;
    Ok(session)
}

async fn preview(api: PublicApi, account: &str, width: u32) -> anyhow::Result<()> {
    let mut session = mounted_session(api, account).await?;
    if !session.is_visible() {
        println!("widget is hidden for {account}");
        return Ok(());
    }
    session.toggle_modal()?;

    let Some(view) = session.view(width) else {
        return Ok(());
    };
    println!("trigger  {}", view.trigger.style);
    println!("title    {}", view.trigger.title);

    if let Some(modal) = view.modal {
        println!("modal    {}", modal.style);
        println!("header   {} / {}", modal.header_title, modal.header_subtitle);
        if let PanelView::Options(rows) = modal.content {
            for row in rows {
                println!("  [{}] {} - {} ({:?})", row.id, row.title, row.message, row.icon);
            }
        }
    }
    Ok(())
}

async fn status(api: PublicApi, account: &str, product_url: Option<&str>) -> anyhow::Result<()> {
    let button = ButtonSession::check(&api, account).await;
    if !button.is_visible() {
        println!("WhatsApp button is unavailable for {account}");
        return Ok(());
    }

    println!("\"{}\" is available for {account}", button.label());
    if let Some(link) = product_url.and_then(|url| button.product_help_link(url)) {
        println!("{link}");
    }
    Ok(())
}

async fn open(api: PublicApi, account: &str, option_id: &str) -> anyhow::Result<()> {
    let mut session = mounted_session(api, account).await?;
    if !session.is_visible() {
        bail!("widget is hidden for {account}");
    }

    match session.select_option(&OptionId::from(option_id))? {
        OptionAction::OpenLink(url) => println!("opened {url}"),
        OptionAction::ShowCallbackForm => {
            println!("option {option_id} asks for a call back; use the storefront form");
        }
        OptionAction::OpenChat => println!("option {option_id} opens the external chat"),
        OptionAction::Unsupported(kind) => bail!("option type {kind} cannot be opened"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let Some(account) = cli.account.clone().or_else(|| config.account.clone()) else {
        bail!("no account given; pass --account or set WAWIDGET_ACCOUNT");
    };
    let api = PublicApi::new(ApiClient::public(&config)?);

    match &cli.command {
        Command::Preview { width } => preview(api, &account, *width).await,
        Command::Status { product_url } => status(api, &account, product_url.as_deref()).await,
        Command::Open { option_id } => open(api, &account, option_id).await,
    }
}
