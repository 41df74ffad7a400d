//! Apigen - Core
//!
//! Scaffolding for REST/JSON:API endpoints over data models.
//!
//! # Overview
//!
//! Two halves share this crate:
//!
//! - a generator that, given a model name such as `Profile/Payer`, writes a
//!   controller and a transformer from stubs and registers a route;
//! - a generic CRUD controller ([`controller::ApiController`]) whose
//!   index / store / show / update / destroy actions delegate persistence to a
//!   [`repository::Repository`] and response shaping to a
//!   [`transformer::Transformer`] and the JSON:API [`serializer`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use apigen_core::prelude::*;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Serialize, Deserialize, Clone, Debug)]
//! struct Payer {
//!     id: u64,
//!     name: String,
//! }
//!
//! impl Record for Payer {
//!     fn id(&self) -> String {
//!         self.id.to_string()
//!     }
//!     fn fillable() -> &'static [&'static str] {
//!         &["name"]
//!     }
//! }
//!
//! struct PayerTransformer;
//!
//! impl Transformer for PayerTransformer {
//!     type Item = Payer;
//!     fn resource_key(&self) -> &str {
//!         "payers"
//!     }
//!     fn transform(&self, payer: &Payer) -> Value {
//!         json!({ "id": payer.id, "name": payer.name })
//!     }
//! }
//!
//! #[derive(Default)]
//! struct PayerController {
//!     repository: MemoryRepository<Payer>,
//! }
//!
//! impl ApiController for PayerController {
//!     type Model = Payer;
//!     type Repository = MemoryRepository<Payer>;
//!     type Transformer = PayerTransformer;
//!
//!     fn repository(&self) -> &Self::Repository {
//!         &self.repository
//!     }
//!     fn transformer(&self) -> Arc<PayerTransformer> {
//!         Arc::new(PayerTransformer)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut router = ApiRouter::new("/api");
//!     router.resource("payers", PayerController::default());
//!     ApiServer::new(router).serve("127.0.0.1:8080").await
//! }
//! ```
//!
//! # Architecture
//!
//! - [`config`] - `apigen.toml` + `AG_*` environment configuration
//! - [`naming`] - model identifier to names, namespaces and endpoint
//! - [`stub`] - stub loading and `{{placeholder}}` rendering
//! - [`emitter`] - no-overwrite file writing and module declaration
//! - [`routes`] - routes file patching
//! - [`generator`] - the `make:api` pipeline
//! - [`controller`], [`repository`], [`validation`], [`transformer`],
//!   [`serializer`] - the CRUD controller stack
//! - [`http`] - hyper request/response glue, router and server

pub mod config;
pub mod controller;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod http;
pub mod logging;
pub mod naming;
pub mod repository;
pub mod routes;
pub mod serializer;
pub mod stub;
pub mod transformer;
pub mod validation;

pub mod prelude;

pub use config::ApigenConfig;
pub use error::{GeneratorError, GeneratorResult};
pub use generator::ApiGenerator;
