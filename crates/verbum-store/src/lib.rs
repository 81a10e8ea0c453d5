//! # verbum-store
//!
//! Per-user annotation storage for Verbum, backed by the hosted
//! auth + database service.
//!
//! Bookmarks, highlights and reading-plan progress live in backend tables
//! guarded by row-level security on the signed-in user's id.  The crate
//! exposes the [`AnnotationStore`] and [`PlanStore`] traits, the
//! [`RestStore`] implementation that talks to the backend's REST interface,
//! and an in-process [`MemoryStore`] with the same uniqueness rules.
//!
//! Every user-scoped operation takes an explicit [`Session`]; one is
//! obtained from [`SessionContext::require`], which fails with
//! [`StoreError::Unauthenticated`] while nobody is signed in.

pub mod auth;
pub mod bookmarks;
pub mod highlights;
pub mod memory;
pub mod models;
pub mod plans;
pub mod rest;
pub mod session;
pub mod store;

mod error;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use models::*;
pub use rest::RestStore;
pub use session::{Session, SessionContext};
pub use store::{AnnotationStore, PlanStore};
