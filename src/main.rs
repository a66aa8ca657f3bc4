use std::sync::Arc;

use clap::Parser;
use poem::{Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;

use projecthub_backend::AppData;
use projecthub_backend::api::{AdminApi, AuthApi, HealthApi, MentorApi, StudentApi};
use projecthub_backend::cli::{self, Cli, Commands};
use projecthub_backend::config::{AppSettings, BootstrapSettings, DatabaseConnections, SecretManager, init_logging};
use projecthub_backend::coordinators::{AdminCoordinator, LoginCoordinator, MentorCoordinator, StudentCoordinator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logging()?;

    let cli = Cli::parse();
    let bootstrap_settings = BootstrapSettings::from_env()?;

    let command = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => return cli::migrate::run_migrations(&bootstrap_settings).await,
        other => other,
    };

    let connections = DatabaseConnections::connect(&bootstrap_settings).await?;
    connections.migrate().await?;
    tracing::info!("Database migrations completed");

    let secret_manager = Arc::new(SecretManager::init()?);
    let settings = AppSettings::from_env()?;
    let app_data = Arc::new(AppData::init(connections, settings, secret_manager).await?);

    match command {
        Commands::Serve => serve(app_data, &bootstrap_settings).await?,
        management => cli::execute_command(management, &app_data).await?,
    }

    Ok(())
}

async fn serve(app_data: Arc<AppData>, bootstrap_settings: &BootstrapSettings) -> Result<(), std::io::Error> {
    let token_provider = app_data.token_provider.clone();

    let login_coordinator = Arc::new(LoginCoordinator::new(app_data.clone()));
    let student_coordinator = Arc::new(StudentCoordinator::new(app_data.clone()));
    let mentor_coordinator = Arc::new(MentorCoordinator::new(app_data.clone()));
    let admin_coordinator = Arc::new(AdminCoordinator::new(app_data.clone()));

    let apis = (
        HealthApi::new(app_data.connections.main.clone()),
        AuthApi::new(login_coordinator),
        StudentApi::new(student_coordinator, token_provider.clone()),
        MentorApi::new(mentor_coordinator, token_provider.clone()),
        AdminApi::new(admin_coordinator, token_provider),
    );

    let address = bootstrap_settings.server_address();
    let api_service = OpenApiService::new(apis, "ProjectHub API", env!("CARGO_PKG_VERSION"))
        .server(format!("http://{}/api", address));
    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address)).run(app).await
}
