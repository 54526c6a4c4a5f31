//! NOOP command handler. Always succeeds.

use crate::fake_imap::io::write_line;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

pub async fn handle_noop<S: AsyncRead + AsyncWrite + Unpin>(tag: &str, stream: &mut BufReader<S>) {
    let _ = write_line(stream, &format!("{tag} OK NOOP completed\r\n")).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::io::{pipe, received};

    #[tokio::test]
    async fn sends_tagged_ok() {
        let (client, mut server) = pipe();
        handle_noop("A7", &mut server).await;

        assert_eq!(received(client, server).await, "A7 OK NOOP completed\r\n");
    }
}
