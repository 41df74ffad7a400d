//! Resource router
//!
//! Maps `<prefix>/<endpoint>[/<id>[/edit]]` onto the actions of registered
//! [`ApiController`]s. The longest registered endpoint prefix wins.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hyper::Method;

use super::error::{ApiError, ApiResult};
use super::request::ApiRequest;
use super::response::ApiResponse;
use super::utils::strip_path_segments;
use crate::controller::ApiController;

const COLLECTION_METHODS: &str = "GET, POST";
const MEMBER_METHODS: &str = "GET, PUT, PATCH, DELETE";

/// Object-safe wrapper so controllers of different model types share one table
trait ResourceHandler: Send + Sync {
    fn handle<'a>(
        &'a self,
        req: &'a ApiRequest,
        segments: &'a [String],
        form_actions: bool,
    ) -> Pin<Box<dyn Future<Output = ApiResult> + Send + 'a>>;
}

impl<C: ApiController> ResourceHandler for C {
    fn handle<'a>(
        &'a self,
        req: &'a ApiRequest,
        segments: &'a [String],
        form_actions: bool,
    ) -> Pin<Box<dyn Future<Output = ApiResult> + Send + 'a>> {
        Box::pin(dispatch_resource(self, req, segments, form_actions))
    }
}

/// Route one request to a controller action
pub async fn dispatch_resource<C: ApiController>(
    controller: &C,
    req: &ApiRequest,
    segments: &[String],
    form_actions: bool,
) -> ApiResult {
    let method = req.method();
    let parts: Vec<&str> = segments.iter().map(String::as_str).collect();

    match (method, parts.as_slice()) {
        (&Method::GET, ["create"]) if form_actions => controller.create(req).await,
        (&Method::GET, [id, "edit"]) if form_actions => controller.edit(id, req).await,

        (&Method::GET, []) => controller.index(req).await,
        (&Method::POST, []) => controller.store(req).await,
        (_, []) => Err(ApiError::MethodNotAllowed { allow: COLLECTION_METHODS.to_string() }),

        (&Method::GET, [id]) => controller.show(id, req).await,
        (&Method::PUT | &Method::PATCH, [id]) => controller.update(id, req).await,
        (&Method::DELETE, [id]) => controller.destroy(id, req).await,
        (_, [_]) => Err(ApiError::MethodNotAllowed { allow: MEMBER_METHODS.to_string() }),

        _ => Err(ApiError::not_found()),
    }
}

pub struct ApiRouter {
    prefix: String,
    resources: Vec<(String, Arc<dyn ResourceHandler>)>,
    form_actions: bool,
}

impl ApiRouter {
    /// Router mounting every resource under `prefix` (e.g. `/api`, or `` for the root)
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            resources: Vec::new(),
            form_actions: false,
        }
    }

    /// Also route `GET /res/create` and `GET /res/{id}/edit`
    pub fn with_form_actions(mut self, enabled: bool) -> Self {
        self.form_actions = enabled;
        self
    }

    /// Register `controller` under `<prefix>/<endpoint>`
    pub fn resource<C: ApiController>(&mut self, endpoint: &str, controller: C) -> &mut Self {
        let path = format!("{}/{}", self.prefix, endpoint.trim_matches('/'));
        log::info!("Registering resource {}", path);

        self.resources.retain(|(existing, _)| *existing != path);
        self.resources.push((path, Arc::new(controller)));
        self
    }

    /// Registered resource paths, in registration order
    pub fn paths(&self) -> Vec<&str> {
        self.resources.iter().map(|(path, _)| path.as_str()).collect()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Dispatch to the matching controller; failures become error envelopes
    pub async fn dispatch(&self, req: ApiRequest) -> ApiResponse {
        let mut best: Option<(&str, &Arc<dyn ResourceHandler>, Vec<String>)> = None;
        for (path, handler) in &self.resources {
            if let Some(segments) = strip_path_segments(req.path(), path) {
                if best.as_ref().map_or(true, |(best_path, _, _)| path.len() > best_path.len()) {
                    best = Some((path.as_str(), handler, segments));
                }
            }
        }

        let Some((matched, handler, segments)) = best else {
            log::debug!("No resource for {}", req.path());
            return ApiError::not_found().into_response();
        };
        log::debug!("Resource match: {} -> {}", req.path(), matched);

        match handler.handle(&req, &segments, self.form_actions).await {
            Ok(response) => response,
            Err(ApiError::Repository(e)) => {
                log::error!("{} {} failed: {}", req.method(), req.path(), e);
                ApiError::Repository(e).into_response()
            }
            Err(e) => {
                log::debug!("{} {} -> {}", req.method(), req.path(), e);
                e.into_response()
            }
        }
    }
}

impl Default for ApiRouter {
    fn default() -> Self {
        Self::new("")
    }
}
