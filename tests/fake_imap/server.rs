//! In-process fake IMAP server for integration testing
//!
//! A folder listing session, as async-imap drives it:
//!
//! ```text
//!   S: * OK IMAP4rev1 Fake server ready
//!   C: A0001 STARTTLS
//!   S: A0001 OK Begin TLS negotiation now
//!      <TLS handshake>
//!   C: A0002 LOGIN "testuser" "testpass"
//!   S: A0002 OK LOGIN completed
//!   C: A0003 LIST "" "*"
//!   S: * LIST (\HasNoChildren \Sent) "/" "Sent"
//!   S: A0003 OK LIST completed
//!   C: A0004 LOGOUT
//!   S: * BYE Logging out
//!   S: A0004 OK LOGOUT completed
//! ```
//!
//! The plaintext phase only understands STARTTLS. After the upgrade each
//! line is decoded with `imap-codec` and dispatched to `handlers/`.

use super::handlers::{
    handle_capability, handle_list, handle_login, handle_logout, handle_noop,
};
use super::io::write_line;
use super::mailbox::{ListReply, Mailbox};
use imap_codec::CommandCodec;
use imap_codec::decode::Decoder;
use imap_codec::imap_types::command::CommandBody;
use rcgen::generate_simple_self_signed;
use rustls::pki_types::PrivatePkcs8KeyDer;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;
use tokio_rustls::server::TlsStream;

/// A fake IMAP server on `127.0.0.1` with an OS-assigned port.
///
/// Serves any number of connections from the same [`Mailbox`] until it
/// is dropped.
pub struct FakeImapServer {
    port: u16,
    accept_loop: JoinHandle<()>,
}

impl FakeImapServer {
    /// Bind, generate a throwaway certificate with `rcgen`, and start
    /// accepting connections in the background.
    pub async fn start(mailbox: Mailbox) -> Self {
        // Several tests install the provider concurrently; only the
        // first call wins.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let port = listener.local_addr().expect("local address").port();

        let acceptor = tls_acceptor();
        let mailbox = Arc::new(mailbox);

        let accept_loop = tokio::spawn(async move {
            while let Ok((tcp, _)) = listener.accept().await {
                let acceptor = acceptor.clone();
                let mailbox = Arc::clone(&mailbox);
                tokio::spawn(async move {
                    if let Some(tls) = upgrade(tcp, &acceptor).await {
                        serve(tls, &mailbox).await;
                    }
                });
            }
        });

        Self { port, accept_loop }
    }

    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl Drop for FakeImapServer {
    fn drop(&mut self) {
        self.accept_loop.abort();
    }
}

fn tls_acceptor() -> TlsAcceptor {
    let cert = generate_simple_self_signed(vec!["127.0.0.1".to_string()])
        .expect("generate self-signed cert");
    let key = PrivatePkcs8KeyDer::from(cert.key_pair.serialize_der());

    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![cert.cert.der().clone()], key.into())
        .expect("build server TLS config");
    TlsAcceptor::from(Arc::new(config))
}

/// Greet, wait for STARTTLS and run the TLS handshake.
///
/// Returns `None` if the client hangs up or sends anything else first.
async fn upgrade(tcp: TcpStream, acceptor: &TlsAcceptor) -> Option<TlsStream<TcpStream>> {
    let mut plain = BufReader::new(tcp);
    write_line(&mut plain, "* OK IMAP4rev1 Fake server ready\r\n")
        .await
        .ok()?;

    let mut line = String::new();
    plain.read_line(&mut line).await.ok()?;
    let (tag, command) = line.trim_end().split_once(' ')?;

    if !command.eq_ignore_ascii_case("STARTTLS") {
        let _ = write_line(&mut plain, &format!("{tag} BAD Expected STARTTLS\r\n")).await;
        return None;
    }
    write_line(&mut plain, &format!("{tag} OK Begin TLS negotiation now\r\n"))
        .await
        .ok()?;

    acceptor.accept(plain.into_inner()).await.ok()
}

/// Command loop over the upgraded connection.
async fn serve<S: AsyncRead + AsyncWrite + Unpin>(stream: S, mailbox: &Mailbox) {
    let mut stream = BufReader::new(stream);
    let codec = CommandCodec::default();
    let mut line = String::new();

    loop {
        line.clear();
        match stream.read_line(&mut line).await {
            Ok(0) | Err(_) => return,
            Ok(_) if line.trim().is_empty() => continue,
            Ok(_) => {}
        }

        let Ok((_, command)) = codec.decode(line.as_bytes()) else {
            let tag = line.split_whitespace().next().unwrap_or("*");
            let _ = write_line(&mut stream, &format!("{tag} BAD Parse error\r\n")).await;
            continue;
        };
        let tag = command.tag.inner();

        match command.body {
            CommandBody::Capability => handle_capability(tag, &mut stream).await,
            CommandBody::Noop => handle_noop(tag, &mut stream).await,
            CommandBody::Login { .. } => {
                if !handle_login(tag, !mailbox.reject_login, &mut stream).await {
                    return;
                }
            }
            CommandBody::List { .. } if mailbox.list_reply == ListReply::Stall => {
                // Hold the connection open without ever answering.
                std::future::pending::<()>().await;
            }
            CommandBody::List { .. } => {
                if !handle_list(tag, mailbox, &mut stream).await {
                    return;
                }
            }
            CommandBody::Logout => {
                handle_logout(tag, &mut stream).await;
                return;
            }
            _ => {
                let _ = write_line(&mut stream, &format!("{tag} BAD Unknown command\r\n")).await;
            }
        }
    }
}
