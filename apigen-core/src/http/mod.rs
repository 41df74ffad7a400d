//! HTTP glue built on hyper
//!
//! - [`request`] - [`ApiRequest`]: method, path, query and JSON body
//! - [`response`] - [`ApiResponse`]: status, JSON body, extra headers
//! - [`error`] - [`ApiError`] and the `{"error": {..}}` envelope
//! - [`api_router`] - [`ApiRouter`]: endpoint to controller dispatch
//! - [`async_server`] - [`ApiServer`]: hyper http1 accept loop

pub mod api_router;
pub mod async_server;
pub mod error;
pub mod request;
pub mod response;
pub mod utils;

pub use api_router::{dispatch_resource, ApiRouter};
pub use async_server::ApiServer;
pub use error::{ApiError, ApiResult};
pub use request::ApiRequest;
pub use response::ApiResponse;
pub use utils::{body_from, Req, Resp, RespBody};
