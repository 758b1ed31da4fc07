//! Console input for the player

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-at-a-time reader over the player's terminal (or any buffered source)
pub struct InputReader<R> {
    lines: Lines<R>,
}

impl InputReader<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> InputReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Next trimmed line, or `None` once the input is exhausted.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    /// Reads the player's name. Blank or missing input yields `None`.
    pub async fn read_name(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.next_line().await?.filter(|name| !name.is_empty()))
    }
}
