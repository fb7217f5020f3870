//! A registry of content models.
//!
//! Content models are declared by plugins, by the admin area and by APIs. The
//! [`build_models_manager`] function collects them into a single [`Registry`],
//! validating every schema on the way in:
//!
//! ```no_run
//! use contentreg::config::read_config;
//! use contentreg::build_models_manager;
//!
//! let loaded = read_config(None)?;
//! let registry = build_models_manager(&loaded.config.sources)?;
//!
//! for key in registry.keys() {
//!     println!("{}", key);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod models;
pub mod registry;
pub mod schema;
pub mod sources;

pub use models::Model;
pub use registry::populate::{build_models_manager, collect_model_infos};
pub use registry::registry::{create_manager, Error, ModelInfo, Registry};
pub use registry::SharedRegistry;
pub use schema::ValidationError;
pub use sources::{Source, Sources};
