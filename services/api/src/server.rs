use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;
use workforce_ai::assistant::AssistantService;
use workforce_ai::capabilities::TextModel;
use workforce_ai::config::AppConfig;
use workforce_ai::error::AppError;
use workforce_ai::i18n::TranslatorHandle;
use workforce_ai::records::{seed_store, MemoryStore};
use workforce_ai::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{AppState, HeuristicTextModel, PolicyIndex};
use crate::ollama::OllamaTextModel;
use crate::routes::with_assistant_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = MemoryStore::default();
    let summary = seed_store(&store)?;
    info!(employees = summary.employees, "record store ready");

    let model: Arc<dyn TextModel> = match OllamaTextModel::from_env() {
        Some(client) => Arc::new(client),
        None => {
            info!("no OLLAMA_URL configured, using the heuristic text model");
            Arc::new(HeuristicTextModel)
        }
    };

    let policies = match env::var("APP_POLICY_DIR") {
        Ok(dir) => PolicyIndex::from_dir(&PathBuf::from(dir))?,
        Err(_) => PolicyIndex::builtin(),
    };
    info!(sections = policies.len(), "policy corpus ready");

    let service = Arc::new(AssistantService::new(
        Arc::new(store),
        model,
        Arc::new(policies),
        TranslatorHandle::unavailable(),
        config.assistant.reference_date,
    ));

    let app = with_assistant_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "workforce assistant ready");

    axum::serve(listener, app).await?;
    Ok(())
}
