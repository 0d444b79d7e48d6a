use crate::events::EventBus;
use crate::handlers;
use crate::metrics::MetricsCollector;
use crate::table::{TableError, TableService, DEFAULT_SESSION_TTL};
use ratscrew_engine::engine::Match;
use ratscrew_engine::errors::LogError;
use ratscrew_engine::logger::ActionLogger;
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::reply::Reply;
use warp::Filter;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    session_ttl: Duration,
    deck_seed: Option<u64>,
    action_log: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            session_ttl: DEFAULT_SESSION_TTL,
            deck_seed: None,
            action_log: None,
        }
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0).with_deck_seed(42)
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Fixes the deck seed so deals are reproducible.
    pub fn with_deck_seed(mut self, seed: u64) -> Self {
        self.deck_seed = Some(seed);
        self
    }

    pub fn with_action_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.action_log = Some(path.into());
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn deck_seed(&self) -> Option<u64> {
        self.deck_seed
    }

    pub fn action_log(&self) -> Option<&Path> {
        self.action_log.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    event_bus: Arc<EventBus>,
    table: Arc<TableService>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let event_bus = Arc::new(EventBus::new());
        let game = match config.deck_seed() {
            Some(seed) => Match::new_with_seed(seed),
            None => Match::from_entropy(),
        };
        let seed = game.seed();
        tracing::info!(seed, "match created");

        let mut table = TableService::new(game, Arc::clone(&event_bus), MetricsCollector::new())
            .with_ttl(config.session_ttl());
        if let Some(path) = config.action_log() {
            let action_log_error = |err: LogError| ServerError::ConfigError(err.to_string());
            let mut logger = ActionLogger::create(path).map_err(action_log_error)?;
            let match_id = logger.start_match(seed).map_err(action_log_error)?;
            tracing::info!(match_id = %match_id, path = %path.display(), "action log opened");
            table = table.with_action_log(logger);
        }

        Ok(Self::new_with_dependencies(config, event_bus, Arc::new(table)))
    }

    pub fn new_with_dependencies(
        config: ServerConfig,
        event_bus: Arc<EventBus>,
        table: Arc<TableService>,
    ) -> Self {
        Self {
            config,
            event_bus,
            table,
        }
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests()).expect("test context")
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    pub fn table(&self) -> Arc<TableService> {
        Arc::clone(&self.table)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let context = AppContext::new(config)?;
        Ok(Self { context })
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let config = context.config().clone();
        let bind_addr = Self::bind_addr(&config)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(address = %addr, "table server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });
        let sweeper = Self::spawn_session_sweeper(context.table());

        Ok(ServerHandle::new(addr, shutdown_tx, task, sweeper, context))
    }

    /// Periodically departs idle sessions, the HTTP stand-in for a socket disconnect.
    fn spawn_session_sweeper(table: Arc<TableService>) -> JoinHandle<()> {
        let period = (table.session_ttl() / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                match table.cleanup_expired_sessions() {
                    Ok(expired) if !expired.is_empty() => {
                        tracing::info!(count = expired.len(), "expired idle sessions");
                        table.metrics().log_metrics();
                    }
                    Ok(_) => {}
                    Err(TableError::StoragePoisoned) => {
                        tracing::error!("table lock poisoned, stopping session sweeper");
                        return;
                    }
                    Err(err) => tracing::error!(error = %err, "session sweep failed"),
                }
            }
        })
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }

        ServerError::ConfigError(err.to_string())
    }

    pub fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        Self::health_route()
            .or(Self::table_routes(context))
            .unify()
            .or(Self::sse_routes(context))
            .unify()
            .boxed()
    }

    fn health_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health().into_response())
            .boxed()
    }

    fn table_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let table = context.table();

        let join = warp::path!("api" / "table" / "sessions")
            .and(warp::post())
            .and(Self::with_table(table.clone()))
            .and_then(|table: Arc<TableService>| async move {
                Ok::<_, Infallible>(handlers::join(table).await)
            });

        let leave = warp::path!("api" / "table" / "sessions" / String)
            .and(warp::delete())
            .and(Self::with_table(table.clone()))
            .and_then(|session_id: String, table: Arc<TableService>| async move {
                Ok::<_, Infallible>(handlers::leave(table, session_id).await)
            });

        let play = warp::path!("api" / "table" / "sessions" / String / "play")
            .and(warp::post())
            .and(Self::with_table(table.clone()))
            .and_then(|session_id: String, table: Arc<TableService>| async move {
                Ok::<_, Infallible>(handlers::play(table, session_id).await)
            });

        let slap = warp::path!("api" / "table" / "sessions" / String / "slap")
            .and(warp::post())
            .and(Self::with_table(table.clone()))
            .and_then(|session_id: String, table: Arc<TableService>| async move {
                Ok::<_, Infallible>(handlers::slap(table, session_id).await)
            });

        let state = warp::path!("api" / "table" / "state")
            .and(warp::get())
            .and(Self::with_table(table.clone()))
            .and_then(|table: Arc<TableService>| async move {
                Ok::<_, Infallible>(handlers::get_state(table).await)
            });

        let metrics = warp::path!("api" / "table" / "metrics")
            .and(warp::get())
            .and(Self::with_table(table))
            .and_then(|table: Arc<TableService>| async move {
                Ok::<_, Infallible>(handlers::get_metrics(table).await)
            });

        join.or(leave)
            .unify()
            .or(play)
            .unify()
            .or(slap)
            .unify()
            .or(state)
            .unify()
            .or(metrics)
            .unify()
            .boxed()
    }

    fn sse_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        warp::path!("api" / "table" / "events")
            .and(warp::get())
            .and(Self::with_table(context.table()))
            .and_then(|table: Arc<TableService>| async move {
                Ok::<_, Infallible>(handlers::stream_events(table).await)
            })
            .boxed()
    }

    fn with_table(
        table: Arc<TableService>,
    ) -> impl Filter<Extract = (Arc<TableService>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&table))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    sweeper: Option<JoinHandle<()>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        sweeper: JoinHandle<()>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            sweeper: Some(sweeper),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }

        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }

        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
