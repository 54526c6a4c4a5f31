//! Folder data source used by the view model

use crate::error::Result;
use crate::folder::{Folder, Role, RoleMapping};
use crate::mapping;
use std::future::Future;

/// Where the view model gets remote folders from.
///
/// Only [`FolderSource::remote_folders`] touches the network. The
/// mapping and filtering steps are pure and default to the rules in
/// [`crate::mapping`].
pub trait FolderSource: Send + Sync + 'static {
    /// List every folder of the remote account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be reached.
    fn remote_folders(&self) -> impl Future<Output = Result<Vec<Folder>>> + Send;

    /// The folder the account already designates for each role.
    fn folder_type_mapping(&self, folders: &[Folder]) -> RoleMapping {
        mapping::folder_type_mapping(folders)
    }

    /// Folders eligible for `role`, in display order.
    fn filter_folders_for_role(
        &self,
        folders: &[Folder],
        role: Role,
        mapping: &RoleMapping,
    ) -> Vec<Folder> {
        mapping::filter_folders_for_role(folders, role, mapping)
    }
}
