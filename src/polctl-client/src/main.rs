// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use dialoguer::{Confirm, Password};
use tokio::sync::mpsc;
use tracing::{debug, info};

use polctl_app::{init_logging, join_url};
use polctl_client::config::ClientConfig;
use polctl_client::resources::{CatalogApi, ManagementApi};
use polctl_client::token::TOKEN_PATH;
use polctl_client::{
    ApiClient, ConsoleContext, Navigation, SessionController, SessionState, TokenExchanger,
    WorkspaceError,
};
use polctl_core::{
    AuthConfig, DynResult, FileStore, KvStore, ServerConfig, Workspace, DEFAULT_REALM_HEADER,
    DEFAULT_SCOPE,
};
use polctl_protocol::{Catalog, ClientCredentials, Principal, PrincipalRole};

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - Polaris console workspaces and sessions");
/// Exit code when the server revoked the session mid-command.
const EXIT_RELOGIN: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", short = 'l')]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage saved workspaces
    #[command(subcommand)]
    Workspace(WorkspaceCommand),
    /// Exchange client credentials for a token
    Login(LoginArgs),
    /// Forget the active workspace and its token
    Logout,
    /// Show the active workspace and session state
    Status,
    #[command(subcommand)]
    Catalog(CatalogCommand),
    #[command(subcommand)]
    Principal(PrincipalCommand),
    #[command(subcommand)]
    PrincipalRole(PrincipalRoleCommand),
    #[command(subcommand)]
    CatalogRole(CatalogRoleCommand),
    #[command(subcommand)]
    Namespace(NamespaceCommand),
}

#[derive(Debug, Subcommand)]
enum WorkspaceCommand {
    List,
    /// Print one workspace as JSON (the active one by default)
    Show { name: Option<String> },
    Add(WorkspaceArgs),
    Update {
        /// Current name of the workspace
        old_name: String,
        #[command(flatten)]
        workspace: WorkspaceArgs,
    },
    /// Delete a workspace together with its token
    Delete { name: String },
    /// Replace all local workspaces with the server defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Make a workspace active
    Use { name: String },
}

#[derive(Debug, Args)]
struct WorkspaceArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Mark as the default workspace
    #[arg(long)]
    default: bool,
    #[arg(long, default_value = "POLARIS")]
    realm: String,
    #[arg(long = "realm-header", default_value = DEFAULT_REALM_HEADER)]
    realm_header: String,
    /// Server base URL (e.g. http://localhost:8181)
    #[arg(long)]
    api: Option<String>,
    /// Internal token endpoint; derived from --api when omitted
    #[arg(long = "token-url")]
    token_url: Option<String>,
    #[arg(long = "oidc-url")]
    oidc_url: Option<String>,
    #[arg(long = "oidc-client-id")]
    oidc_client_id: Option<String>,
    #[arg(long, default_value = DEFAULT_SCOPE)]
    scope: String,
}

impl WorkspaceArgs {
    fn into_workspace(self) -> Result<Workspace, WorkspaceError> {
        let mut auth = Vec::new();
        let token_url = self
            .token_url
            .or_else(|| self.api.as_deref().map(|api| join_url(api, TOKEN_PATH)));
        if let Some(url) = token_url {
            auth.push(AuthConfig::Internal {
                url,
                scope: self.scope.clone(),
            });
        }
        if let Some(url) = self.oidc_url {
            auth.push(AuthConfig::Oidc {
                url,
                client_id: self.oidc_client_id.unwrap_or_default(),
                scope: self.scope,
            });
        }

        let workspace = Workspace {
            name: self.name,
            description: self.description,
            is_default: self.default,
            realm_header: self.realm_header,
            realm: self.realm,
            server: self.api.map(|api| ServerConfig { api }),
            auth,
        };
        workspace.validate().map_err(WorkspaceError::Invalid)?;
        Ok(workspace)
    }
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Workspace to log in to (the active or default one when omitted)
    #[arg(long, short = 'w')]
    workspace: Option<String>,
    #[arg(long = "client-id", env = "POLCTL_CLIENT_ID")]
    client_id: String,
    /// Prompted for when not given
    #[arg(long = "client-secret", env = "POLCTL_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
    /// Defaults to the scope of the workspace's token provider
    #[arg(long)]
    scope: Option<String>,
    /// Log in with this realm under the default header instead of the
    /// workspace's own realm settings
    #[arg(long, conflicts_with = "workspace")]
    realm: Option<String>,
}

#[derive(Debug, Subcommand)]
enum CatalogCommand {
    List,
    Get {
        name: String,
    },
    Create {
        name: String,
        /// INTERNAL or EXTERNAL
        #[arg(long = "type", default_value = "INTERNAL")]
        kind: String,
        /// S3, GCS, AZURE or FILE
        #[arg(long = "storage-type")]
        storage_type: String,
        #[arg(long = "default-base-location")]
        default_base_location: String,
        #[arg(long = "allowed-location")]
        allowed_locations: Vec<String>,
    },
    Delete {
        name: String,
    },
}

#[derive(Debug, Subcommand)]
enum PrincipalCommand {
    List,
    Create { name: String },
    Delete { name: String },
}

#[derive(Debug, Subcommand)]
enum PrincipalRoleCommand {
    List,
    Create { name: String },
    Delete { name: String },
}

#[derive(Debug, Subcommand)]
enum CatalogRoleCommand {
    List {
        #[arg(long)]
        catalog: String,
    },
}

#[derive(Debug, Subcommand)]
enum NamespaceCommand {
    List {
        #[arg(long)]
        catalog: String,
        /// Parent namespace, levels separated by '.'
        #[arg(long)]
        parent: Option<String>,
    },
}

fn main() -> DynResult<ExitCode> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", ClientConfig::example_toml());
        return Ok(ExitCode::SUCCESS);
    }

    let (cfg, config_path) = if let Some(ref path) = cli.config {
        let cfg = ClientConfig::load_from_file(path)?;
        (cfg, Some(path.clone()))
    } else {
        ClientConfig::load_from_default_paths()?
    };
    cfg.validate()
        .map_err(|e| format!("Invalid polctl configuration: {}", e))?;

    init_logging(cli.log_level.as_deref().or(cfg.general.log_level.as_deref()));
    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let command = cli
        .command
        .ok_or("No command given. Run `polctl --help` for usage.")?;

    let rt = tokio::runtime::Runtime::new()?;
    let code = rt.block_on(run(cfg, command))?;
    Ok(ExitCode::from(code))
}

async fn run(cfg: ClientConfig, command: Command) -> DynResult<u8> {
    let http = reqwest::Client::builder()
        .timeout(cfg.http.timeout())
        .build()?;

    let durable_path = cfg.storage.durable_path();
    let session_path = cfg.storage.session_path();
    debug!(
        "Using durable store {} and session store {}",
        durable_path.display(),
        session_path.display()
    );
    let durable: Arc<dyn KvStore> = Arc::new(FileStore::open(&durable_path));
    let session: Arc<dyn KvStore> = Arc::new(FileStore::open_private(&session_path));
    let ctx = ConsoleContext::new(durable, session, cfg.manifest.source(&http));

    let (nav_tx, mut nav_rx) = mpsc::unbounded_channel::<Navigation>();
    let api = ApiClient::new(ctx.clone(), http.clone(), Arc::new(nav_tx));
    let controller = SessionController::new(ctx.clone(), TokenExchanger::new(http));
    controller.restore();

    let result = dispatch(&ctx, &api, &controller, command).await;
    exit_code(result, &mut nav_rx)
}

/// A pending Login signal wins over the command's own outcome.
fn exit_code(
    result: DynResult<()>,
    nav_rx: &mut mpsc::UnboundedReceiver<Navigation>,
) -> DynResult<u8> {
    if let Ok(Navigation::Login) = nav_rx.try_recv() {
        eprintln!("The server rejected the session token. Run `polctl login` to sign in again.");
        return Ok(EXIT_RELOGIN);
    }
    result.map(|()| 0)
}

async fn dispatch(
    ctx: &ConsoleContext,
    api: &ApiClient,
    controller: &SessionController,
    command: Command,
) -> DynResult<()> {
    match command {
        Command::Workspace(cmd) => workspace_command(ctx, controller, cmd).await,
        Command::Login(args) => login(ctx, controller, args).await,
        Command::Logout => {
            controller.logout()?;
            println!("Logged out");
            Ok(())
        }
        Command::Status => {
            status(ctx, controller);
            Ok(())
        }
        Command::Catalog(cmd) => catalog_command(api, cmd).await,
        Command::Principal(cmd) => principal_command(api, cmd).await,
        Command::PrincipalRole(cmd) => principal_role_command(api, cmd).await,
        Command::CatalogRole(CatalogRoleCommand::List { catalog }) => {
            for role in ManagementApi::new(api).list_catalog_roles(&catalog).await? {
                println!("{}", role.name);
            }
            Ok(())
        }
        Command::Namespace(NamespaceCommand::List { catalog, parent }) => {
            let parent: Option<Vec<String>> =
                parent.map(|p| p.split('.').map(str::to_string).collect());
            let namespaces = CatalogApi::new(api)
                .list_namespaces(&catalog, parent.as_deref())
                .await?;
            for ns in namespaces {
                println!("{}", ns.join("."));
            }
            Ok(())
        }
    }
}

async fn workspace_command(
    ctx: &ConsoleContext,
    controller: &SessionController,
    cmd: WorkspaceCommand,
) -> DynResult<()> {
    let store = ctx.workspaces();
    match cmd {
        WorkspaceCommand::List => {
            let config = store.load_config().await;
            let active = ctx.active().name();
            for ws in &config.workspaces {
                let marker = if active.as_deref() == Some(ws.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                let default = if ws.is_default { " (default)" } else { "" };
                let session = if ctx.credentials().has_token(&ws.name) {
                    " [logged in]"
                } else {
                    ""
                };
                println!(
                    "{} {}{}{}  {}",
                    marker,
                    ws.name,
                    default,
                    session,
                    ws.api_base().unwrap_or("-")
                );
            }
        }
        WorkspaceCommand::Show { name } => {
            let workspace = match name {
                Some(name) => store
                    .find(&name)
                    .await
                    .ok_or(WorkspaceError::NotFound(name))?,
                None => ctx
                    .active()
                    .get()
                    .ok_or("No active workspace. Use `polctl workspace use <name>`.")?,
            };
            println!("{}", serde_json::to_string_pretty(&workspace)?);
        }
        WorkspaceCommand::Add(args) => {
            let workspace = args.into_workspace()?;
            let name = workspace.name.clone();
            let config = store.load_config().await;
            store.add(&config, workspace)?;
            println!("Added workspace '{}'", name);
        }
        WorkspaceCommand::Update {
            old_name,
            workspace,
        } => {
            let workspace = workspace.into_workspace()?;
            let config = store.load_config().await;
            if !config.contains(&old_name) {
                return Err(WorkspaceError::NotFound(old_name).into());
            }
            store.update(&config, &old_name, workspace)?;
            println!("Updated workspace '{}'", old_name);
        }
        WorkspaceCommand::Delete { name } => {
            let config = store.load_config().await;
            if !config.contains(&name) {
                return Err(WorkspaceError::NotFound(name).into());
            }
            ctx.remove_workspace(&config, &name)?;
            println!("Deleted workspace '{}'", name);
        }
        WorkspaceCommand::Reset { yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt(
                        "Replace all local workspaces with the server defaults? This cannot be undone",
                    )
                    .default(false)
                    .interact()?;
            if !confirmed {
                println!("Aborted");
                return Ok(());
            }
            let config = store.reset_from_server().await?;
            let pruned = ctx.credentials().prune(&config)?;
            if !pruned.is_empty() {
                info!("Dropped tokens of removed workspaces: {}", pruned.join(", "));
            }
            println!("Reset to {} workspace(s) from server", config.workspaces.len());
        }
        WorkspaceCommand::Use { name } => {
            let workspace = store
                .find(&name)
                .await
                .ok_or(WorkspaceError::NotFound(name))?;
            let state = controller.switch_workspace(&workspace)?;
            println!("Switched to '{}'", workspace.name);
            if state != SessionState::Authenticated {
                println!("Not logged in to this workspace, run `polctl login`");
            }
        }
    }
    Ok(())
}

/// Without `--workspace` or `--realm` the active workspace is used, else the
/// configured default.
async fn login(
    ctx: &ConsoleContext,
    controller: &SessionController,
    args: LoginArgs,
) -> DynResult<()> {
    let workspace = match (args.workspace, &args.realm) {
        (Some(name), _) => Some(
            ctx.workspaces()
                .find(&name)
                .await
                .ok_or(WorkspaceError::NotFound(name))?,
        ),
        (None, Some(_)) => None,
        (None, None) => Some(match ctx.active().get() {
            Some(active) => active,
            None => ctx.workspaces().load_config().await.resolve_default(),
        }),
    };

    let client_secret = match args.client_secret {
        Some(secret) => secret,
        None => Password::new().with_prompt("Client secret").interact()?,
    };
    // an empty scope is filled from the workspace's token provider
    let credentials =
        ClientCredentials::new(args.client_id, client_secret, args.scope.unwrap_or_default());

    let realm = args.realm.unwrap_or_default();
    controller.login(&credentials, &realm, workspace).await?;
    match ctx.active().name() {
        Some(name) => println!("Logged in to '{}'", name),
        None => println!("Logged in"),
    }
    Ok(())
}

fn status(ctx: &ConsoleContext, controller: &SessionController) {
    match ctx.active().get() {
        Some(ws) => {
            println!("Workspace: {}", ws.name);
            println!("Server:    {}", ws.api_base().unwrap_or("-"));
            println!("Realm:     {} ({})", ws.realm, ws.realm_header_name());
        }
        None => println!("Workspace: none"),
    }
    let state = match controller.state() {
        SessionState::Authenticated => "authenticated",
        SessionState::Unauthenticated => "not logged in",
        SessionState::Loading => "unknown",
    };
    println!("Session:   {}", state);

    let sessions = ctx.credentials().workspaces_with_tokens();
    if !sessions.is_empty() {
        println!("Tokens:    {}", sessions.join(", "));
    }
}

async fn catalog_command(api: &ApiClient, cmd: CatalogCommand) -> DynResult<()> {
    let management = ManagementApi::new(api);
    match cmd {
        CatalogCommand::List => {
            for catalog in management.list_catalogs().await? {
                println!("{}\t{}", catalog.name, catalog.kind);
            }
        }
        CatalogCommand::Get { name } => {
            let catalog = management.get_catalog(&name).await?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        CatalogCommand::Create {
            name,
            kind,
            storage_type,
            default_base_location,
            mut allowed_locations,
        } => {
            if allowed_locations.is_empty() {
                allowed_locations.push(default_base_location.clone());
            }
            let catalog: Catalog = serde_json::from_value(serde_json::json!({
                "type": kind,
                "name": &name,
                "properties": { "default-base-location": default_base_location },
                "storageConfigInfo": {
                    "storageType": storage_type,
                    "allowedLocations": allowed_locations,
                },
            }))?;
            management.create_catalog(catalog).await?;
            println!("Created catalog '{}'", name);
        }
        CatalogCommand::Delete { name } => {
            management.delete_catalog(&name).await?;
            println!("Deleted catalog '{}'", name);
        }
    }
    Ok(())
}

async fn principal_command(api: &ApiClient, cmd: PrincipalCommand) -> DynResult<()> {
    let management = ManagementApi::new(api);
    match cmd {
        PrincipalCommand::List => {
            for principal in management.list_principals().await? {
                println!(
                    "{}\t{}",
                    principal.name,
                    principal.client_id.as_deref().unwrap_or("-")
                );
            }
        }
        PrincipalCommand::Create { name } => {
            let created = management.create_principal(Principal::named(name)).await?;
            println!("Created principal '{}'", created.principal.name);
            println!("client_id:     {}", created.credentials.client_id);
            println!("client_secret: {}", created.credentials.client_secret);
            println!("The secret is shown only once.");
        }
        PrincipalCommand::Delete { name } => {
            management.delete_principal(&name).await?;
            println!("Deleted principal '{}'", name);
        }
    }
    Ok(())
}

async fn principal_role_command(api: &ApiClient, cmd: PrincipalRoleCommand) -> DynResult<()> {
    let management = ManagementApi::new(api);
    match cmd {
        PrincipalRoleCommand::List => {
            for role in management.list_principal_roles().await? {
                println!("{}", role.name);
            }
        }
        PrincipalRoleCommand::Create { name } => {
            let role = PrincipalRole {
                name: name.clone(),
                federated: false,
                properties: Default::default(),
                entity_version: None,
            };
            management.create_principal_role(role).await?;
            println!("Created principal role '{}'", name);
        }
        PrincipalRoleCommand::Delete { name } => {
            management.delete_principal_role(&name).await?;
            println!("Deleted principal role '{}'", name);
        }
    }
    Ok(())
}
