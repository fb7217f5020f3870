//! The registry holds every content model known to the application. Models are
//! declared by plugins, by the admin area and by APIs; each is registered under
//! a key made of its namespace and its name:
//!
//! ```text
//! <model key> := <namespace> "." <model name>
//! <namespace> := "admin" | <plugin name> | <api name>
//! ```
//!
//! For example, the `user` model of the `auth` plugin is registered as
//! `auth.user`, and the `permission` model of the admin area as
//! `admin.permission`.
//!
//! Sources are collected in a fixed order: plugins, then the admin area, then
//! APIs. When two sources declare the same key, the one collected last replaces
//! the other. This is not an error.
//!
//! Every schema is validated while the registry is built, and a single invalid
//! schema aborts the build. Once built, a registry is never modified; reloading
//! means building a new one and swapping it in through a [`SharedRegistry`].

pub mod handle;
pub mod populate;
pub mod registry;
pub mod relations;

pub use handle::SharedRegistry;
