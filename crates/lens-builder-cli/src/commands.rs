/*
[INPUT]:  Parsed CLI command, loaded Settings, WALLET_PRIVATE_KEY
[OUTPUT]: Rendered results on stdout and the process ExitStatus
[POS]:    Command layer - wires adapter collaborators for each subcommand
[UPDATE]: When adding subcommands or changing outcome rendering
*/

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use lens_builder_adapter::storage::{DataUriStorage, GROVE_API_URL, GroveStorage, StorageUploader};
use lens_builder_adapter::{
    App, CreateAppRequest, Credential, Environment, EvmAddress, ExitStatus, LensClient, LensError,
    OperationOutcome, OperationRequest, OperationService, OperationSubmitter, Orchestrator,
    SetAppMetadataRequest, TransactionStatus,
};
use tracing::{info, warn};

use crate::cli::{Command, StorageKind};
use crate::config::{AppConfig, SECRET_ENV_VAR, Settings};

type LensOrchestrator = Orchestrator<LensClient, LensClient>;

/// Everything a command needs besides its own arguments
pub struct CommandContext {
    pub settings: Settings,
    pub environment: Environment,
}

impl CommandContext {
    pub fn new(settings: Settings, environment: Option<Environment>) -> Self {
        let environment = environment.unwrap_or(settings.environment);
        Self {
            settings,
            environment,
        }
    }

    fn client(&self) -> Result<LensClient, LensError> {
        LensClient::with_config_and_api_url(
            self.environment,
            self.settings.client.clone(),
            &self.settings.api_url(self.environment),
        )
    }

    fn storage(&self, kind: StorageKind) -> Result<Box<dyn StorageUploader>, LensError> {
        Ok(match kind {
            StorageKind::Grove => Box::new(GroveStorage::with_api_url(
                self.environment,
                &self.settings.client,
                self.settings.storage_url.as_deref().unwrap_or(GROVE_API_URL),
            )?),
            StorageKind::DataUri => Box::new(DataUriStorage),
        })
    }

    fn orchestrator(&self) -> Result<LensOrchestrator, LensError> {
        let client = self.client()?;
        Ok(Orchestrator::new(
            client.clone(),
            client,
            self.settings.orchestrator(),
        ))
    }
}

pub async fn run(command: Command, ctx: &CommandContext) -> Result<ExitStatus> {
    info!(
        environment = %ctx.environment,
        chain = ctx.environment.chain_name(),
        chain_id = ctx.environment.chain_id(),
        "lens-builder starting"
    );
    match command {
        Command::Login => login(ctx).await,
        Command::CreateApp {
            config,
            dry_run,
            storage,
            wait,
        } => create_app(ctx, &config, dry_run, storage, wait).await,
        Command::SetAppMetadata {
            app,
            config,
            dry_run,
            storage,
            wait,
        } => set_app_metadata(ctx, &app, &config, dry_run, storage, wait).await,
        Command::UploadMetadata { config, storage } => {
            let app = load_app(&config)?;
            let uri = upload_metadata(ctx, app, storage).await?;
            println!("{uri}");
            Ok(ExitStatus::Success)
        }
        Command::UploadFile { path, storage } => {
            let uri = ctx.storage(storage)?.upload_file(&path).await?;
            println!("{uri}");
            Ok(ExitStatus::Success)
        }
        Command::TxStatus { hash, wait } => tx_status(ctx, &hash, wait).await,
        Command::FetchApp { hash } => {
            let app = ctx.client()?.fetch_app(&hash).await?;
            render_app(app.as_ref(), ctx.environment)?;
            Ok(ExitStatus::Success)
        }
        Command::Init { output } => {
            crate::cli::init::run_init(output)?;
            Ok(ExitStatus::Success)
        }
    }
}

/// Map a failed command to its exit status
pub fn exit_status_for(err: &anyhow::Error) -> ExitStatus {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<LensError>() {
            return ExitStatus::from_error(err);
        }
        if cause.downcast_ref::<config::ConfigError>().is_some() {
            return ExitStatus::Config;
        }
    }
    ExitStatus::Failure
}

fn credential() -> Result<Credential, LensError> {
    Ok(Credential::from_env(SECRET_ENV_VAR)?)
}

fn load_app(path: &Path) -> Result<AppConfig> {
    let app = AppConfig::from_file(path)
        .map_err(|e| LensError::Config(lens_builder_adapter::ConfigError::Invalid(format!("{e:#}"))))
        .with_context(|| format!("load app definition {}", path.display()))?;
    app.validate().map_err(LensError::from)?;
    Ok(app)
}

async fn login(ctx: &CommandContext) -> Result<ExitStatus> {
    let credential = credential()?;
    let mut orchestrator = ctx.orchestrator()?;
    let session = orchestrator.login(&credential).await?;

    println!("{} {}", style("✓ Authenticated as").green(), session.account());
    match session.expires_at() {
        Some(at) => println!("  expires at {at}"),
        None => println!("  expiry not advertised"),
    }
    Ok(ExitStatus::Success)
}

async fn create_app(
    ctx: &CommandContext,
    config: &Path,
    dry_run: bool,
    storage: StorageKind,
    wait: bool,
) -> Result<ExitStatus> {
    let app = load_app(config)?;
    let credential = credential()?;

    let admins = if app.admins.is_empty() {
        vec![credential.address().to_string()]
    } else {
        app.admins.clone()
    };

    if dry_run {
        // Inline metadata keeps the dry run offline
        let metadata_uri = upload_metadata(ctx, app.clone(), StorageKind::DataUri).await?;
        let request = build_create_app(&app, &admins, &metadata_uri)?;
        info!(admins = request.admins().len(), "dry-run requested; app definition validated");
        println!(
            "{} {} ({} admin(s), signer {})",
            style("✓ Valid createApp request for").green(),
            app.metadata.name,
            request.admins().len(),
            credential.address()
        );
        for admin in request.admins() {
            println!("  admin: {}", admin.short(4));
        }
        return Ok(ExitStatus::Success);
    }

    // Uploads are immutable, so only a signed-in builder may store them
    let mut orchestrator = ctx.orchestrator()?;
    orchestrator.login(&credential).await?;

    let metadata_uri = upload_metadata(ctx, app.clone(), storage).await?;
    let request = build_create_app(&app, &admins, &metadata_uri)?;

    submit(ctx, &orchestrator, request.into(), wait, true).await
}

fn build_create_app(
    app: &AppConfig,
    admins: &[String],
    metadata_uri: &str,
) -> Result<CreateAppRequest, LensError> {
    let request = CreateAppRequest::new(admins, metadata_uri, app.treasury.as_deref())?;
    Ok(match app.verification {
        Some(enabled) => request.with_verification(enabled),
        None => request,
    })
}

async fn set_app_metadata(
    ctx: &CommandContext,
    app_address: &str,
    config: &Path,
    dry_run: bool,
    storage: StorageKind,
    wait: bool,
) -> Result<ExitStatus> {
    let app = load_app(config)?;
    let credential = credential()?;
    EvmAddress::parse_field(app_address, "app").map_err(LensError::from)?;

    if dry_run {
        let metadata_uri = upload_metadata(ctx, app, StorageKind::DataUri).await?;
        let request =
            SetAppMetadataRequest::new(app_address, &metadata_uri).map_err(LensError::from)?;
        println!(
            "{} {}",
            style("✓ Valid setAppMetadata request for").green(),
            request.app()
        );
        return Ok(ExitStatus::Success);
    }

    let mut orchestrator = ctx.orchestrator()?;
    orchestrator.login(&credential).await?;

    let metadata_uri = upload_metadata(ctx, app, storage).await?;
    let request = SetAppMetadataRequest::new(app_address, &metadata_uri).map_err(LensError::from)?;

    submit(ctx, &orchestrator, request.into(), wait, false).await
}

/// Upload the logo (if any), then the metadata document
async fn upload_metadata(ctx: &CommandContext, mut app: AppConfig, kind: StorageKind) -> Result<String> {
    let storage = ctx.storage(kind)?;

    if let Some(logo_path) = app.logo_path.as_deref() {
        let logo = storage
            .upload_file(Path::new(logo_path))
            .await
            .with_context(|| format!("upload logo {logo_path}"))?;
        info!(%logo, "logo stored");
        app.metadata.logo = Some(logo);
    }

    let document = serde_json::to_value(&app.metadata).map_err(LensError::from)?;
    let uri = storage
        .upload_json(&document)
        .await
        .context("upload app metadata")?;
    info!(uri = %shorten(&uri), "metadata stored");
    Ok(uri)
}

/// Submit with an authenticated orchestrator.
///
/// The exit status follows the outcome alone; a failed `--wait` follow-up
/// is reported as a warning.
async fn submit(
    ctx: &CommandContext,
    orchestrator: &LensOrchestrator,
    request: OperationRequest,
    wait: bool,
    fetch_app: bool,
) -> Result<ExitStatus> {
    let outcome = orchestrator.submit(&request).await?;
    render_outcome(&request, &outcome, ctx.environment)?;

    if let (true, Some(hash)) = (wait, outcome.transaction_hash()) {
        if let Err(err) = confirm(ctx, orchestrator, hash, fetch_app).await {
            warn!(%hash, error = %err, "follow-up after submission failed");
            println!("{} {err:#}", style("! Could not confirm transaction:").yellow());
        }
    }

    Ok(ExitStatus::from_outcome(&outcome))
}

async fn confirm(
    ctx: &CommandContext,
    orchestrator: &LensOrchestrator,
    hash: &str,
    fetch_app: bool,
) -> Result<()> {
    let status = orchestrator.confirm(hash).await?;
    render_status(&status);
    if fetch_app && status == TransactionStatus::Finished {
        let app = orchestrator.submitter().service().fetch_app(hash).await?;
        render_app(app.as_ref(), ctx.environment)?;
    }
    Ok(())
}

async fn tx_status(ctx: &CommandContext, hash: &str, wait: bool) -> Result<ExitStatus> {
    let client = ctx.client()?;
    let status = if wait {
        OperationSubmitter::new(client, ctx.settings.retry)
            .wait_for_transaction(hash, ctx.settings.confirmation)
            .await?
    } else {
        client.transaction_status(hash).await?
    };
    render_status(&status);
    Ok(match status {
        TransactionStatus::Failed { .. } => ExitStatus::Failure,
        _ => ExitStatus::Success,
    })
}

fn render_outcome(
    request: &OperationRequest,
    outcome: &OperationOutcome,
    environment: Environment,
) -> Result<()> {
    match outcome {
        OperationOutcome::Finalized { transaction_hash } => {
            println!("{} {}", style("✓ Finalized").green().bold(), request.name());
            println!("  tx:       {transaction_hash}");
            println!("  explorer: {}", environment.transaction_url(transaction_hash));
        }
        OperationOutcome::SelfFundingRequired {
            raw_transaction,
            reason,
        } => {
            println!("{} {}", style("! Self-funding required for").yellow().bold(), request.name());
            if !reason.is_empty() {
                println!("  reason: {reason}");
            }
            println!("  sign and broadcast via {}:", environment.rpc_url());
            println!("{}", serde_json::to_string_pretty(raw_transaction)?);
        }
        OperationOutcome::WillFail { reason } => {
            println!("{} {}", style("✗ Would fail").red().bold(), request.name());
            println!("  reason: {reason}");
        }
        OperationOutcome::Unrecognized { payload } => {
            warn!("response shape not recognized");
            println!("{} {}", style("? Unrecognized result for").magenta().bold(), request.name());
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
    }
    Ok(())
}

fn render_status(status: &TransactionStatus) {
    match status {
        TransactionStatus::Finished => println!("{}", style("✓ Transaction indexed").green()),
        TransactionStatus::Pending => println!("{}", style("… Transaction pending").dim()),
        TransactionStatus::Failed { reason } => {
            println!("{} {reason}", style("✗ Transaction failed:").red())
        }
        TransactionStatus::NotIndexedYet {
            reason,
            tx_has_mined,
        } => println!(
            "{} {reason} (mined: {tx_has_mined})",
            style("… Not indexed yet:").dim()
        ),
        TransactionStatus::Unknown { typename } => {
            println!("{} {typename}", style("? Unknown status").magenta())
        }
    }
}

fn render_app(app: Option<&App>, environment: Environment) -> Result<()> {
    match app {
        Some(app) => {
            println!("{}", serde_json::to_string_pretty(app)?);
            println!("  explorer: {}", environment.address_url(&app.address));
        }
        None => println!("{}", style("App not indexed yet").dim()),
    }
    Ok(())
}

/// Inline data URIs are too long for a log line
fn shorten(uri: &str) -> String {
    const MAX: usize = 64;
    if uri.len() <= MAX {
        return uri.to_string();
    }
    let head: String = uri.chars().take(MAX - 3).collect();
    format!("{head}...")
}
