//! Screen state of the special folders step

use crate::folder::{Folder, Role};
use indexmap::IndexMap;
use serde::Serialize;

/// Options and current choice for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderField {
    /// Eligible folders keyed by display label, in display order.
    pub candidates: IndexMap<String, Folder>,
    pub selected: Option<Folder>,
}

impl FolderField {
    /// Build a field from filtered candidates and the preselected
    /// folder.
    ///
    /// Candidates are taken as given; keeping the preselected folder
    /// among them is up to the filter.
    #[must_use]
    pub fn new(candidates: Vec<Folder>, selected: Option<Folder>) -> Self {
        Self {
            candidates: candidates
                .into_iter()
                .map(|folder| (folder.display_name.clone(), folder))
                .collect(),
            selected,
        }
    }

    /// Whether the selection is one of the candidates (or absent).
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.selected.as_ref().is_none_or(|selected| {
            self.candidates
                .values()
                .any(|f| f.server_id == selected.server_id)
        })
    }
}

/// One [`FolderField`] per role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub archive: FolderField,
    pub drafts: FolderField,
    pub sent: FolderField,
    pub spam: FolderField,
    pub trash: FolderField,
}

impl FormState {
    #[must_use]
    pub const fn field(&self, role: Role) -> &FolderField {
        match role {
            Role::Archive => &self.archive,
            Role::Drafts => &self.drafts,
            Role::Sent => &self.sent,
            Role::Spam => &self.spam,
            Role::Trash => &self.trash,
        }
    }

    pub const fn field_mut(&mut self, role: Role) -> &mut FolderField {
        match role {
            Role::Archive => &mut self.archive,
            Role::Drafts => &mut self.drafts,
            Role::Sent => &mut self.sent,
            Role::Spam => &mut self.spam,
            Role::Trash => &mut self.trash,
        }
    }

    #[must_use]
    pub fn selected(&self, role: Role) -> Option<&Folder> {
        self.field(role).selected.as_ref()
    }
}

/// Everything the special folders screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct State {
    pub is_loading: bool,
    pub form_state: FormState,
}
