//! Hyper accept loop serving an [`ApiRouter`]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use super::api_router::ApiRouter;
use super::request::ApiRequest;
use super::utils::{log_access, Resp};
use crate::config::ServerConfig;

pub struct ApiServer {
    router: Arc<ApiRouter>,
    max_body_size: usize,
}

impl ApiServer {
    pub fn new(router: ApiRouter) -> Self {
        Self { router: Arc::new(router), max_body_size: ServerConfig::default().max_body_size }
    }

    /// Server for `router` honouring the body limit and form actions of `config`
    pub fn from_config(router: ApiRouter, config: &ServerConfig) -> Self {
        Self {
            router: Arc::new(router.with_form_actions(config.form_actions)),
            max_body_size: config.max_body_size,
        }
    }

    pub fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    pub fn router(&self) -> &ApiRouter {
        &self.router
    }

    /// Bind `addr` and serve until the task is cancelled
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let addr: SocketAddr = addr.parse().with_context(|| format!("invalid address {}", addr))?;
        let listener =
            TcpListener::bind(addr).await.with_context(|| format!("failed to bind {}", addr))?;
        self.serve_listener(listener).await
    }

    /// Serve connections from an already bound listener
    pub async fn serve_listener(self, listener: TcpListener) -> anyhow::Result<()> {
        let local = listener.local_addr().context("listener has no local address")?;
        log::info!("API server listening on http://{}", local);
        for path in self.router.paths() {
            log::info!("  {}", path);
        }

        loop {
            let (stream, remote) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    log::warn!("Failed to accept connection: {}", e);
                    continue;
                }
            };
            let io = TokioIo::new(stream);
            let router = Arc::clone(&self.router);
            let max_body_size = self.max_body_size;

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let router = Arc::clone(&router);
                    async move { handle(req, router, max_body_size, remote).await }
                });
                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    log::debug!("Error serving connection from {}: {:?}", remote, err);
                }
            });
        }
    }
}

async fn handle(
    req: Request<Incoming>,
    router: Arc<ApiRouter>,
    max_body_size: usize,
    remote: SocketAddr,
) -> Result<Resp, Infallible> {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let response = match ApiRequest::from_hyper(req, max_body_size).await {
        Ok(api_request) => router.dispatch(api_request).await,
        Err(e) => e.into_response(),
    };

    log_access(Some(remote), &method, &path, response.status().as_u16(), start);
    Ok(response.into_hyper())
}
