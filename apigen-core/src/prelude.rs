//! Prelude module for convenient imports.
//!
//! Generated controllers and transformers start with:
//!
//! ```rust,ignore
//! use apigen_core::prelude::*;
//! ```

// === Controller stack ===
pub use crate::controller::{eager_load, ApiController};
pub use crate::repository::{MemoryRepository, Record, Repository, RepositoryError};
pub use crate::serializer::Manager;
pub use crate::transformer::{Resource, Transformer};
pub use crate::validation::{Rule, Rules};

// === HTTP ===
pub use crate::http::{ApiError, ApiRequest, ApiResponse, ApiResult, ApiRouter, ApiServer};
pub use http::{Method, StatusCode};

// === Generator ===
pub use crate::config::ApigenConfig;
pub use crate::generator::ApiGenerator;

// === Re-exported dependencies used by generated code ===
pub use async_trait::async_trait;
pub use serde_json::{json, to_value, Value};
