use crate::input::InputReader;
use log::{info, warn};
use shared::{classify_line, GameResult, ServerLine, QUIT_SENTINEL};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines,
};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// How a session with the server ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Finished(GameResult),
    Closed,
}

pub struct Client<R, W> {
    server: Lines<BufReader<R>>,
    writer: W,
}

impl Client<OwnedReadHalf, OwnedWriteHalf> {
    pub async fn connect(addr: &str) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        info!("Connected to {}", addr);
        let (reader, writer) = stream.into_split();
        Ok(Self::new(reader, writer))
    }
}

impl<R, W> Client<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            server: BufReader::new(reader).lines(),
            writer,
        }
    }

    pub async fn send_line(&mut self, line: &str) -> std::io::Result<()> {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await?;
        self.writer.flush().await
    }

    /// Echoes server lines to `output`, answers each turn prompt with the next
    /// input line, and stops at the final result or when the server hangs up.
    /// Running out of input answers the prompt with the quit sentinel.
    pub async fn run<I, O>(
        &mut self,
        input: &mut InputReader<I>,
        output: &mut O,
    ) -> std::io::Result<SessionEnd>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        while let Some(line) = self.server.next_line().await? {
            output.write_all(format!("{}\n", line).as_bytes()).await?;
            output.flush().await?;

            match classify_line(&line) {
                ServerLine::Prompt => {
                    let reply = match input.next_line().await? {
                        Some(reply) => reply,
                        None => {
                            warn!("Input closed, leaving the game");
                            QUIT_SENTINEL.to_string()
                        }
                    };
                    self.send_line(&reply).await?;
                }
                ServerLine::Outcome(result) => return Ok(SessionEnd::Finished(result)),
                ServerLine::Notice => {}
            }
        }

        Ok(SessionEnd::Closed)
    }
}
