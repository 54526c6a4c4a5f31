//! Default role mapping and candidate filtering
//!
//! Both functions are pure and deterministic: the result depends only
//! on the folder list (and the mapping, for filtering) and keeps the
//! order of the input.

use crate::folder::{Folder, FolderType, Role, RoleMapping};

/// The folder the account already designates for each role.
///
/// The first folder of a role's type wins; later duplicates are
/// ignored.
#[must_use]
pub fn folder_type_mapping(folders: &[Folder]) -> RoleMapping {
    let mut mapping = RoleMapping::new();
    for folder in folders {
        if let Some(role) = folder.folder_type.role() {
            mapping.entry(role).or_insert_with(|| folder.clone());
        }
    }
    mapping
}

/// Folders the user may pick for `role`.
///
/// Keeps regular folders and folders of the role's own type, minus
/// any folder `mapping` assigns to another role. The role's own mapped
/// folder is always kept.
#[must_use]
pub fn filter_folders_for_role(
    folders: &[Folder],
    role: Role,
    mapping: &RoleMapping,
) -> Vec<Folder> {
    let own = mapping.get(&role);
    folders
        .iter()
        .filter(|folder| {
            if own.is_some_and(|f| f.server_id == folder.server_id) {
                return true;
            }
            let claimed_elsewhere = mapping
                .iter()
                .any(|(r, f)| *r != role && f.server_id == folder.server_id);
            !claimed_elsewhere
                && (folder.folder_type == FolderType::Regular
                    || folder.folder_type == role.folder_type())
        })
        .cloned()
        .collect()
}
