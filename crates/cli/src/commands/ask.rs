use parlor_agent::AgentRuntime;

use crate::commands::{build_runtime, load_config, CommandResult};

pub fn run(query: &str) -> CommandResult {
    let config = match load_config("ask") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    crate::init_logging(&config);

    let runtime = match build_runtime("ask") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };
    let agent = match AgentRuntime::from_config(&config) {
        Ok(agent) => agent,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "agent_init",
                format!("failed to initialize assistant: {error:#}"),
                3,
            );
        }
    };

    CommandResult::reply(runtime.block_on(agent.handle_message(query)))
}
