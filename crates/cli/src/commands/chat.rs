use parlor_agent::messages::WELCOME;
use parlor_agent::AgentRuntime;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::commands::{build_runtime, load_config, CommandResult};

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "bye"];

pub fn run() -> CommandResult {
    let config = match load_config("chat") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    crate::init_logging(&config);

    let runtime = match build_runtime("chat") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };
    let agent = match AgentRuntime::from_config(&config) {
        Ok(agent) => agent,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "agent_init",
                format!("failed to initialize assistant: {error:#}"),
                3,
            );
        }
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    match runtime.block_on(session(&agent, stdin, tokio::io::stdout())) {
        Ok(_) => CommandResult::reply(""),
        Err(error) => CommandResult::failure("chat", "io", error.to_string(), 1),
    }
}

/// Answers one line at a time until end of input or an exit word. Returns the
/// number of messages answered.
pub async fn session<R, W>(agent: &AgentRuntime, input: R, mut output: W) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(format!("{WELCOME}\n").as_bytes()).await?;
    let mut lines = input.lines();
    let mut answered = 0;

    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&line.to_ascii_lowercase().as_str()) {
            break;
        }

        let reply = agent.handle_message(line).await;
        output.write_all(format!("{reply}\n\n").as_bytes()).await?;
        answered += 1;
    }

    output.flush().await?;
    Ok(answered)
}
