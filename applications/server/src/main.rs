/// DevConnector Server - developer social network backend
use clap::{Parser, Subcommand};
use devconnector_core::{
    types::avatar_url,
    validation::{validate_register, RegisterInput},
    CreateUser, StorageContext,
};
use devconnector_server::{
    config::ServerConfig,
    create_router,
    services::{AuthService, GithubClient},
    state::AppState,
};
use devconnector_storage::SqliteStorageContext;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "devconnector-server")]
#[command(about = "DevConnector social network API server", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml)
    #[arg(short, long, global = true, env = "DEVCONNECTOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devconnector_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config)?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser {
            name,
            email,
            password,
        } => {
            add_user(&config, name, email, password).await?;
        }
        Commands::ListUsers => {
            list_users(&config).await?;
        }
    }

    Ok(())
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.bcrypt_cost,
    )
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting DevConnector Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let db = SqliteStorageContext::connect(&config.storage.database_url).await?;
    let db = Arc::new(db);
    tracing::info!("Database connected");

    let auth_service = Arc::new(auth_service(&config));
    tracing::info!("Auth service initialized");

    let github = Arc::new(GithubClient::new(&config.github)?);
    if config.github.client_id.is_empty() {
        tracing::warn!("No GitHub client credentials configured; using anonymous rate limits");
    }

    let app_state = AppState::new(db, auth_service, github);
    let app = create_router(app_state);

    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(
    config: &ServerConfig,
    name: String,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let input = RegisterInput {
        name: Some(name),
        email: Some(email),
        password: Some(password),
        password2: None,
    };
    if let Err(errors) = validate_register(&input).into_result() {
        anyhow::bail!("Invalid user: {errors}");
    }

    let db = SqliteStorageContext::connect(&config.storage.database_url).await?;
    let password = input.password.as_deref().unwrap_or_default();
    let password_hash = auth_service(config).hash_password(password)?;
    let email = input.email.unwrap_or_default();

    let user = db
        .create_user(CreateUser {
            name: input.name.unwrap_or_default(),
            avatar: avatar_url(&email),
            email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User created");
    println!("Created user {} <{}> ({})", user.name, user.email, user.id);

    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let db = SqliteStorageContext::connect(&config.storage.database_url).await?;
    let users = db.get_all_users().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}>", user.id, user.name, user.email);
    }

    Ok(())
}
