//! Line-oriented interactive loop.
//!
//! Reserved words: `exit`/`quit` (case-insensitive) end the session and
//! `help` prints usage. Every other non-empty line goes to the dispatcher.

use chrono::NaiveDateTime;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::dispatcher::Dispatcher;
use crate::messages;

/// Run the loop until `exit`/`quit` or end of input.
///
/// `clock` supplies the reference time for each turn.
pub async fn run<R, W, C>(
    dispatcher: &Dispatcher,
    reader: R,
    mut writer: W,
    clock: C,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    C: Fn() -> NaiveDateTime,
{
    let mut lines = reader.lines();
    loop {
        writer.write_all(messages::PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            tracing::info!("input closed");
            break;
        };
        let input = line.trim();

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            writer
                .write_all(format!("\n{}\n", messages::FAREWELL).as_bytes())
                .await?;
            break;
        }
        if input.eq_ignore_ascii_case("help") {
            writer
                .write_all(format!("\n{}\n", messages::HELP).as_bytes())
                .await?;
            continue;
        }

        if let Some(reply) = dispatcher.handle(input, clock()).await {
            writer
                .write_all(format!("Agent: {reply}\n\n").as_bytes())
                .await?;
        }
    }
    writer.flush().await
}
