//! LOGIN command handler.
//!
//! Credentials are never checked. The mailbox decides whether the
//! login succeeds so tests can simulate an account that refuses it.

use crate::fake_imap::io::write_line;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Answer LOGIN with OK or NO.
///
/// Returns `true` if the session should continue.
pub async fn handle_login<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    accept: bool,
    stream: &mut BufReader<S>,
) -> bool {
    let resp = if accept {
        format!("{tag} OK LOGIN completed\r\n")
    } else {
        format!("{tag} NO [AUTHENTICATIONFAILED] Invalid credentials\r\n")
    };
    write_line(stream, &resp).await.is_ok() && accept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::io::{pipe, received};

    #[tokio::test]
    async fn accepted_login_keeps_session() {
        let (client, mut server) = pipe();
        assert!(handle_login("A0001", true, &mut server).await);
        assert_eq!(received(client, server).await, "A0001 OK LOGIN completed\r\n");
    }

    #[tokio::test]
    async fn rejected_login_ends_session() {
        let (client, mut server) = pipe();
        assert!(!handle_login("A0002", false, &mut server).await);
        assert!(received(client, server).await.starts_with("A0002 NO [AUTHENTICATIONFAILED]"));
    }
}
