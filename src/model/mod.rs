//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (screens, categories, UI state, etc.)
//! - `entities`: Records returned by the media-library backend
//! - `requests`: Payloads for uploads and edits
//! - `forms`: Admin form state, validation and the resulting mutations
//! - `content`: Dashboard cards and admin tables
//! - `media`: Play targets and transient playlist manifests
//! - `error`: Backend and validation errors
//! - `api_client`: Media-library REST client
//! - `app_model`: Main application model with state management methods

mod types;
mod entities;
mod requests;
mod forms;
mod content;
mod media;
mod error;
mod api_client;
mod app_model;

// Re-export the types the controller and view work with
pub use types::{
    AdminSection, Category, ConfirmPrompt, LoginField, LoginState, Notice, NoticeKind,
    Screen, UiState,
};

pub use entities::{Profile, parse_timestamp};

#[cfg(test)]
pub use entities::{Book, SearchHit, SearchKind, Video};

pub use forms::{FieldKind, FormState, Mutation};

#[cfg(test)]
pub use forms::FormKind;

pub use content::{
    AdminLists, AdminState, CatalogItem, DashboardState, OpenCard, PreviewLookup, PreviewSlot,
    SearchState, format_duration,
};

pub use media::{MediaKind, NowPlaying, PlayTarget};

pub use error::{ApiError, ApiResult};

pub use api_client::MediaClient;

pub use app_model::AppModel;
