//! Remote folder types
//!
//! Provides strongly-typed folders, folder types and the five special
//! roles a user can assign during account setup. Well-known folder
//! names like `Sent` and `Trash` map to their folder type; everything
//! else is [`FolderType::Regular`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque server-side identifier of a remote folder.
///
/// For IMAP this is the full mailbox name as returned by `LIST`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderServerId(String);

impl FolderServerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The type the remote account assigns to a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderType {
    Archive,
    Drafts,
    Sent,
    Spam,
    Trash,
    /// Any folder without a special purpose.
    Regular,
}

impl FolderType {
    /// Guess the type of a folder from its name.
    ///
    /// Only exact well-known names are recognized; `Junk` is treated
    /// as spam since several providers use it.
    ///
    /// # Examples
    ///
    /// ```
    /// use special_folders::FolderType;
    ///
    /// assert_eq!(FolderType::from_name("Junk"), FolderType::Spam);
    /// assert_eq!(FolderType::from_name("Projects"), FolderType::Regular);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Archive" => Self::Archive,
            "Drafts" => Self::Drafts,
            "Sent" => Self::Sent,
            "Spam" | "Junk" => Self::Spam,
            "Trash" => Self::Trash,
            _ => Self::Regular,
        }
    }

    /// The role this type fills, or `None` for regular folders.
    #[must_use]
    pub const fn role(self) -> Option<Role> {
        match self {
            Self::Archive => Some(Role::Archive),
            Self::Drafts => Some(Role::Drafts),
            Self::Sent => Some(Role::Sent),
            Self::Spam => Some(Role::Spam),
            Self::Trash => Some(Role::Trash),
            Self::Regular => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Drafts => "drafts",
            Self::Sent => "sent",
            Self::Spam => "spam",
            Self::Trash => "trash",
            Self::Regular => "regular",
        }
    }
}

impl fmt::Display for FolderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A semantic mailbox purpose the user maps onto a real folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Archive,
    Drafts,
    Sent,
    Spam,
    Trash,
}

impl Role {
    /// Every role, in the order the setup screen presents them.
    pub const ALL: [Self; 5] = [
        Self::Archive,
        Self::Drafts,
        Self::Sent,
        Self::Spam,
        Self::Trash,
    ];

    #[must_use]
    pub const fn folder_type(self) -> FolderType {
        match self {
            Self::Archive => FolderType::Archive,
            Self::Drafts => FolderType::Drafts,
            Self::Sent => FolderType::Sent,
            Self::Spam => FolderType::Spam,
            Self::Trash => FolderType::Trash,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.folder_type().as_str()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A folder as reported by the remote account.
///
/// Two folders are the same folder when their [`FolderServerId`]s
/// match; the display name and type are descriptive only.
///
/// # Examples
///
/// ```
/// use special_folders::{Folder, FolderType};
///
/// let sent = Folder::new("INBOX.Sent", "Sent", FolderType::Sent);
/// assert_eq!(sent.server_id.as_str(), "INBOX.Sent");
/// assert_eq!(sent.to_string(), "Sent");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Folder {
    pub server_id: FolderServerId,
    pub display_name: String,
    pub folder_type: FolderType,
}

impl Folder {
    #[must_use]
    pub fn new(
        server_id: impl Into<String>,
        display_name: impl Into<String>,
        folder_type: FolderType,
    ) -> Self {
        Self {
            server_id: FolderServerId::new(server_id),
            display_name: display_name.into(),
            folder_type,
        }
    }

    /// A folder whose id and display name are both `name`, with the
    /// type guessed from the name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::new(name, name, FolderType::from_name(name))
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// The folder the remote account already designates for each role.
///
/// Roles without a designated folder are simply absent.
pub type RoleMapping = BTreeMap<Role, Folder>;
