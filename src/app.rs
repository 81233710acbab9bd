use std::sync::Arc;

use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::fetcher::PowerFetcher;
use crate::geocoder::NominatimGeocoder;
use crate::narration::{DisabledModel, GeminiModel, NarrationModel};
use crate::services::{ChatService, WeatherService};

/// Services shared by the HTTP server and the command-line tool.
#[derive(Clone)]
pub struct Services {
    pub chat_service: ChatService,
    pub weather_service: WeatherService,
}

/// Wire the real HTTP collaborators from `config`.
///
/// Without a model key every narration call site uses its deterministic
/// fallback.
pub fn build_services(config: &Config) -> Result<Services, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .user_agent(config.user_agent.clone())
        .build()?;

    let model: Arc<dyn NarrationModel> = match &config.gemini_api_key {
        Some(key) => {
            info!("Narration model enabled: {}", config.gemini_model);
            Arc::new(GeminiModel::new(
                client.clone(),
                config.gemini_base_url.clone(),
                config.gemini_model.clone(),
                key.clone(),
            ))
        }
        None => {
            warn!("GEMINI_API_KEY not set, narration uses templated fallbacks");
            Arc::new(DisabledModel)
        }
    };

    let geocoder = Arc::new(NominatimGeocoder::new(
        client.clone(),
        config.geocoder_url.clone(),
    ));
    let data_source = Arc::new(PowerFetcher::new(client, config.power_api_url.clone()));

    let weather_service = WeatherService::new(geocoder, data_source);
    let chat_service = ChatService::new(
        model,
        weather_service.clone(),
        config.fallback_location.clone(),
    );

    Ok(Services {
        chat_service,
        weather_service,
    })
}

/// Running HTTP server.
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Build the services and spawn the Axum server on `config.server_addr()`.
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let services = build_services(&config)?;
        let app_state = AppState {
            chat_service: services.chat_service,
            weather_service: services.weather_service,
        };
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });

        info!("Application initialized successfully");

        Ok(Self { server_handle })
    }

    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
