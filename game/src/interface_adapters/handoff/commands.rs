use super::wire::move_line;
use crate::domain::Position;
use crate::domain::ports::PositionReporter;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

#[derive(Debug, Clone, Copy)]
pub struct HandoffTimeouts {
    pub dial: Duration,
    /// How long to wait for the `OK` handshake.
    pub reply: Duration,
}

impl Default for HandoffTimeouts {
    fn default() -> Self {
        Self {
            dial: Duration::from_millis(200),
            reply: Duration::from_millis(50),
        }
    }
}

/// Dial, write one `MOVE` line, wait briefly for `OK`, close.
/// A missing or late reply is not an error.
pub async fn send_move(addr: &str, at: Position, timeouts: HandoffTimeouts) -> io::Result<()> {
    let mut stream = timeout(timeouts.dial, TcpStream::connect(addr))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "hand-off dial timed out"))??;

    stream.write_all(move_line(at).as_bytes()).await?;

    let (reader, mut writer) = stream.split();
    let mut reply = String::new();
    match timeout(timeouts.reply, BufReader::new(reader).read_line(&mut reply)).await {
        Ok(Ok(_)) => trace!(reply = reply.trim_end(), "hand-off replied"),
        Ok(Err(e)) => trace!(error = %e, "hand-off reply failed"),
        Err(_) => trace!("hand-off reply timed out"),
    }
    let _ = writer.shutdown().await;
    Ok(())
}

/// Reports positions to the network client over the command hand-off.
/// Each report is its own short-lived connection, spawned and forgotten.
#[derive(Debug, Clone)]
pub struct TcpMoveReporter {
    addr: Arc<str>,
    timeouts: HandoffTimeouts,
}

impl TcpMoveReporter {
    pub fn new(addr: impl Into<Arc<str>>, timeouts: HandoffTimeouts) -> Self {
        Self {
            addr: addr.into(),
            timeouts,
        }
    }
}

impl PositionReporter for TcpMoveReporter {
    fn report(&self, at: Position) {
        let addr = self.addr.clone();
        let timeouts = self.timeouts;
        tokio::spawn(async move {
            if let Err(e) = send_move(&addr, at, timeouts).await {
                trace!(error = %e, %addr, "position hand-off failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn when_listener_is_up_then_move_line_is_delivered() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = stream.into_split();
            let mut line = String::new();
            BufReader::new(reader).read_line(&mut line).await.unwrap();
            writer.write_all(b"OK\n").await.unwrap();
            line
        });

        send_move(&addr, Position::new(2, 3), HandoffTimeouts::default())
            .await
            .expect("delivered");

        assert_eq!(server.await.unwrap(), "MOVE 2 3\n");
    }

    #[tokio::test]
    async fn when_listener_never_replies_then_send_still_succeeds() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let (done_tx, done_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            let _ = done_rx.await;
        });

        send_move(&addr, Position::new(1, 1), HandoffTimeouts::default())
            .await
            .expect("no reply is fine");
        let _ = done_tx.send(());
    }

    #[tokio::test]
    async fn when_nobody_listens_then_send_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        assert!(
            send_move(&addr, Position::new(1, 1), HandoffTimeouts::default())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn when_reporter_reports_then_listener_receives_in_background() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let reporter = TcpMoveReporter::new(addr, HandoffTimeouts::default());

        reporter.report(Position::new(5, 6));

        let (stream, _) = listener.accept().await.unwrap();
        let mut line = String::new();
        BufReader::new(stream).read_line(&mut line).await.unwrap();
        assert_eq!(line, "MOVE 5 6\n");
    }
}
