//! IMAP-backed folder source

use crate::config::ImapConfig;
use crate::connection::{self, ImapSession};
use crate::error::{Error, Result};
use crate::folder::{Folder, FolderType};
use crate::source::FolderSource;
use async_imap::imap_proto::{MailboxDatum, Response, Status};
use async_imap::types::NameAttribute;
use tracing::{debug, info, warn};

/// Lists the folders of an IMAP account for the special folders step.
///
/// Folder types come from RFC 6154 special-use attributes when the
/// server sends them, otherwise from well-known folder names.
pub struct ImapFolderSource {
    config: ImapConfig,
}

impl ImapFolderSource {
    #[must_use]
    pub const fn new(config: ImapConfig) -> Self {
        Self { config }
    }

    /// List all selectable folders except INBOX.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or LIST command fails, or
    /// [`Error::Timeout`] if it takes longer than the configured
    /// timeout.
    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        let timeout = self.config.timeout;
        tokio::time::timeout(timeout, self.fetch_folders())
            .await
            .map_err(|_| Error::Timeout(timeout))?
    }

    async fn fetch_folders(&self) -> Result<Vec<Folder>> {
        let mut session = connection::connect(&self.config).await?;
        let folders = list_all(&mut session).await?;

        session.logout().await.ok();
        info!("Listed {} remote folders", folders.len());
        Ok(folders)
    }
}

/// Run `LIST "" "*"` and collect folders up to the tagged completion.
///
/// The listing only counts once the server confirms it with a tagged
/// OK. A NO/BAD, an I/O error or a connection that closes before the
/// completion fails the whole listing.
async fn list_all(session: &mut ImapSession) -> Result<Vec<Folder>> {
    let tag = session
        .run_command(r#"LIST "" "*""#)
        .await
        .map_err(|e| Error::Imap(format!("List folders failed: {e}")))?;

    let mut folders = Vec::new();
    loop {
        let response = session
            .read_response()
            .await
            .map_err(|e| Error::Imap(format!("List folders failed: {e}")))?
            .ok_or_else(|| {
                warn!("Connection closed after {} LIST entries", folders.len());
                Error::Imap("List folders failed: connection closed".into())
            })?;

        match response.parsed() {
            Response::MailboxData(MailboxDatum::List {
                name_attributes,
                name,
                ..
            }) => {
                if let Some(folder) = classify(name, name_attributes) {
                    folders.push(folder);
                }
            }
            Response::Done {
                tag: done,
                status,
                information,
                ..
            } if *done == tag => {
                if *status == Status::Ok {
                    return Ok(folders);
                }
                return Err(Error::Imap(format!(
                    "List folders failed: {status:?} {}",
                    information.as_deref().unwrap_or_default()
                )));
            }
            _ => {}
        }
    }
}

impl FolderSource for ImapFolderSource {
    async fn remote_folders(&self) -> Result<Vec<Folder>> {
        self.list_folders().await
    }
}

/// Turn one LIST entry into a [`Folder`], or `None` if it can never
/// hold a special role.
fn classify(name: &str, attributes: &[NameAttribute<'_>]) -> Option<Folder> {
    if name.eq_ignore_ascii_case("INBOX") {
        return None;
    }
    if attributes.iter().any(|a| matches!(a, NameAttribute::NoSelect)) {
        debug!("Skipping non-selectable folder {}", name);
        return None;
    }

    let folder_type = attributes
        .iter()
        .find_map(special_use)
        .unwrap_or_else(|| FolderType::from_name(name));

    Some(Folder::new(name, name, folder_type))
}

const fn special_use(attribute: &NameAttribute<'_>) -> Option<FolderType> {
    match attribute {
        NameAttribute::Archive => Some(FolderType::Archive),
        NameAttribute::Drafts => Some(FolderType::Drafts),
        NameAttribute::Sent => Some(FolderType::Sent),
        NameAttribute::Junk => Some(FolderType::Spam),
        NameAttribute::Trash => Some(FolderType::Trash),
        _ => None,
    }
}
