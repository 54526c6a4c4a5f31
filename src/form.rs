//! Form sub-model for the special folder selection

use crate::folder::Role;
use std::collections::BTreeMap;

/// A user edit of one role's folder field.
///
/// The value is whatever identifier the presentation layer uses for
/// the chosen folder; it is not interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    ArchiveFolderChanged(String),
    DraftsFolderChanged(String),
    SentFolderChanged(String),
    SpamFolderChanged(String),
    TrashFolderChanged(String),
}

impl FormEvent {
    /// Build the change event for `role`.
    #[must_use]
    pub fn changed(role: Role, value: impl Into<String>) -> Self {
        let value = value.into();
        match role {
            Role::Archive => Self::ArchiveFolderChanged(value),
            Role::Drafts => Self::DraftsFolderChanged(value),
            Role::Sent => Self::SentFolderChanged(value),
            Role::Spam => Self::SpamFolderChanged(value),
            Role::Trash => Self::TrashFolderChanged(value),
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::ArchiveFolderChanged(_) => Role::Archive,
            Self::DraftsFolderChanged(_) => Role::Drafts,
            Self::SentFolderChanged(_) => Role::Sent,
            Self::SpamFolderChanged(_) => Role::Spam,
            Self::TrashFolderChanged(_) => Role::Trash,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::ArchiveFolderChanged(v)
            | Self::DraftsFolderChanged(v)
            | Self::SentFolderChanged(v)
            | Self::SpamFolderChanged(v)
            | Self::TrashFolderChanged(v) => v,
        }
    }
}

/// Receives form edits from the view model.
///
/// Implementations own their state; the view model never reads it back.
pub trait FormUiModel: Send + 'static {
    fn event(&mut self, event: FormEvent);
}

/// Default form model: remembers the latest value entered per role.
#[derive(Debug, Default, Clone)]
pub struct SpecialFoldersForm {
    selections: BTreeMap<Role, String>,
    edits: usize,
}

impl SpecialFoldersForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest value entered for `role`.
    #[must_use]
    pub fn selection(&self, role: Role) -> Option<&str> {
        self.selections.get(&role).map(String::as_str)
    }

    /// Number of edits received so far.
    #[must_use]
    pub const fn edits(&self) -> usize {
        self.edits
    }
}

impl FormUiModel for SpecialFoldersForm {
    fn event(&mut self, event: FormEvent) {
        self.edits += 1;
        let role = event.role();
        let value = match event {
            FormEvent::ArchiveFolderChanged(v)
            | FormEvent::DraftsFolderChanged(v)
            | FormEvent::SentFolderChanged(v)
            | FormEvent::SpamFolderChanged(v)
            | FormEvent::TrashFolderChanged(v) => v,
        };
        self.selections.insert(role, value);
    }
}
