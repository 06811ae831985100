//! mcp-assistant - interactive keyword-routed tool assistant
//!
//! Reads one utterance per line from stdin, routes it to a single backend
//! tool and prints the assistant reply.

use mcp_assistant::config::{AppConfig, LogFormat};
use mcp_assistant::runtime::{ToolExecutor, TurnRuntime};
use mcp_assistant::state_machine::ConversationState;
use mcp_assistant::tools::ToolRegistry;
use std::error::Error;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

const EXIT_COMMANDS: [&str; 3] = ["quit", "exit", "q"];

/// Why an interactive session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    ExitCommand,
    EndOfInput,
    Interrupted,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_logging(config.log_format);

    let registry = ToolRegistry::standard(&config)?;
    tracing::info!(tools = ?registry.names(), "Tool registry initialized");

    println!("Assistant ready. Type 'quit', 'exit' or 'q' to leave.");
    println!("Available tools:");
    for definition in registry.definitions() {
        println!("  - {}: {}", definition.name, definition.description);
    }

    let runtime = TurnRuntime::new(registry);
    let stdin = BufReader::new(tokio::io::stdin());
    let end = run_session(stdin, &runtime, interrupt(), &mut std::io::stdout()).await?;

    match end {
        SessionEnd::Interrupted => println!("\nGoodbye!"),
        SessionEnd::EndOfInput => println!(),
        SessionEnd::ExitCommand => {}
    }
    tracing::debug!(?end, "Session finished");

    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Run the read-answer loop until an exit command, end of input or
/// `interrupt` resolves.
///
/// `interrupt` is polled while waiting for a line and while a turn is in
/// flight, so a slow tool call never blocks shutdown.
async fn run_session<R, T, W>(
    input: R,
    runtime: &TurnRuntime<T>,
    interrupt: impl Future<Output = ()>,
    out: &mut W,
) -> Result<SessionEnd, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    T: ToolExecutor + 'static,
    W: Write,
{
    tokio::pin!(interrupt);
    let mut state = ConversationState::new();
    let mut lines = input.lines();

    loop {
        write!(out, "\nYou: ")?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            () = &mut interrupt => return Ok(SessionEnd::Interrupted),
        };

        let Some(line) = line else {
            return Ok(SessionEnd::EndOfInput);
        };

        let utterance = line.trim();
        if is_exit_command(utterance) {
            return Ok(SessionEnd::ExitCommand);
        }
        if utterance.is_empty() {
            continue;
        }

        state.push_user(utterance);
        tokio::select! {
            result = runtime.run_turn(&mut state) => result?,
            () = &mut interrupt => return Ok(SessionEnd::Interrupted),
        }

        if let Some(reply) = state.last_turn() {
            writeln!(out, "\nAI: {}", reply.text())?;
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mcp_assistant=info".into());

    // Logs go to stderr so stdout stays a clean transcript
    let layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).with(filter).init();
}

fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS
        .iter()
        .any(|command| input.eq_ignore_ascii_case(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mcp_assistant::tools::{RollDiceTool, ToolError};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    /// Executor whose calls never complete, like a collaborator that
    /// accepts the connection and never answers
    struct StalledExecutor;

    #[async_trait]
    impl ToolExecutor for StalledExecutor {
        async fn invoke(&self, _name: &str, _input: Value) -> Result<String, ToolError> {
            std::future::pending().await
        }
    }

    async fn session<T: ToolExecutor + 'static>(
        input: &str,
        tools: T,
        interrupt: impl Future<Output = ()>,
    ) -> (SessionEnd, String) {
        let runtime = TurnRuntime::new(tools);
        let mut out = Vec::new();
        let end = tokio::time::timeout(
            Duration::from_secs(5),
            run_session(input.as_bytes(), &runtime, interrupt, &mut out),
        )
        .await
        .expect("session should finish")
        .unwrap();
        (end, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_exit_commands() {
        for input in ["quit", "EXIT", "Q", "Quit"] {
            assert!(is_exit_command(input), "{input}");
        }
    }

    #[test]
    fn test_other_input_continues() {
        for input in ["", "quitting", "exit now", "roll 1d6", "qq"] {
            assert!(!is_exit_command(input), "{input}");
        }
    }

    #[tokio::test]
    async fn test_interrupt_during_tool_call_ends_session() {
        let (end, out) = session(
            "magic card opt\nroll 1d6\n",
            StalledExecutor,
            tokio::time::sleep(Duration::from_millis(50)),
        )
        .await;

        assert_eq!(end, SessionEnd::Interrupted);
        assert!(!out.contains("AI:"), "{out}");
    }

    #[tokio::test]
    async fn test_interrupt_while_waiting_for_input() {
        // Keep the writer alive so the reader blocks instead of hitting EOF
        let (_writer, reader) = tokio::io::duplex(64);
        let runtime = TurnRuntime::new(StalledExecutor);
        let mut out = Vec::new();

        let end = run_session(
            BufReader::new(reader),
            &runtime,
            tokio::time::sleep(Duration::from_millis(20)),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert_eq!(String::from_utf8(out).unwrap(), "\nYou: ");
    }

    #[tokio::test]
    async fn test_exit_command_stops_before_later_lines() {
        let tools = ToolRegistry::new().with_tool(Arc::new(RollDiceTool));
        let (end, out) = session(
            "roll some dice\n\n   \nroll 1d6\nQUIT\nroll 2d6\n",
            tools,
            std::future::pending(),
        )
        .await;

        assert_eq!(end, SessionEnd::ExitCommand);
        assert_eq!(out.matches("AI:").count(), 2, "{out}");
        assert!(out.contains("\nAI: Please specify dice notation (e.g., '2d20k1')\n"));
        assert!(out.contains("\nAI: I used the roll_dice tool to help you:\n\nRoll 1: 1d6 -> ["));
        assert!(!out.contains("2d6"));
    }

    #[tokio::test]
    async fn test_end_of_input() {
        let (end, out) = session("roll some dice", ToolRegistry::new(), std::future::pending()).await;
        assert_eq!(end, SessionEnd::EndOfInput);
        assert_eq!(out.matches("AI:").count(), 1);
    }
}
