//! Special folders step of a mail account setup flow
//!
//! [`SpecialFoldersViewModel`] is a unidirectional state container:
//! callers dispatch [`Event`]s, observe [`State`] snapshots and react
//! to one-shot [`Effect`]s. Loading turns the folders of a remote
//! account into a form where each [`Role`] (Archive, Drafts, Sent,
//! Spam, Trash) gets its candidate folders and a preselected folder.
//!
//! Folders come from any [`FolderSource`]; [`ImapFolderSource`] reads
//! them from an IMAP server over STARTTLS.

mod client;
mod config;
mod connection;
mod error;
pub mod flow;
mod folder;
mod form;
pub mod mapping;
mod source;
mod state;
mod view_model;

pub use client::ImapFolderSource;
pub use config::ImapConfig;
pub use error::{Error, Result};
pub use folder::{Folder, FolderServerId, FolderType, Role, RoleMapping};
pub use form::{FormEvent, FormUiModel, SpecialFoldersForm};
pub use source::FolderSource;
pub use state::{FolderField, FormState, State};
pub use view_model::{Effect, Event, SpecialFoldersViewModel};
