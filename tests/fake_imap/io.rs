//! Shared I/O helpers for the fake IMAP server.
//!
//! Every response is flushed right away so the client sees untagged
//! data before the tagged completion.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Write a string to the stream and flush.
pub async fn write_line<S: AsyncRead + AsyncWrite + Unpin>(
    stream: &mut BufReader<S>,
    line: &str,
) -> std::io::Result<()> {
    stream.get_mut().write_all(line.as_bytes()).await?;
    stream.get_mut().flush().await
}

/// In-memory connection for handler unit tests: the client end and the
/// buffered server end a handler writes to.
#[cfg(test)]
pub fn pipe() -> (tokio::io::DuplexStream, BufReader<tokio::io::DuplexStream>) {
    let (client, server) = tokio::io::duplex(4096);
    (client, BufReader::new(server))
}

/// Close the server end and return everything the client received.
#[cfg(test)]
pub async fn received(
    mut client: tokio::io::DuplexStream,
    server: BufReader<tokio::io::DuplexStream>,
) -> String {
    use tokio::io::AsyncReadExt;

    drop(server);
    let mut out = String::new();
    client.read_to_string(&mut out).await.unwrap();
    out
}
