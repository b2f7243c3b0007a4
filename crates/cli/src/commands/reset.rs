use crate::commands::{build_runtime, load_config, CommandResult};
use parlor_db::{connect_with_config, migrations};

/// Drops every managed table and recreates it empty. Requires explicit confirmation.
pub fn run(confirmed: bool) -> CommandResult {
    if !confirmed {
        return CommandResult::failure(
            "reset",
            "confirmation_required",
            "reset deletes all inventory, feedback and report rows; re-run with --yes to proceed",
            1,
        );
    }

    let config = match load_config("reset") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("reset") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        migrations::reset(&pool).await.map_err(|error| ("reset", error.to_string(), 5u8))?;
        pool.close().await;
        Ok::<(), (&'static str, String, u8)>(())
    });

    match result {
        Ok(()) => CommandResult::success("reset", "dropped and recreated inventory, feedback, report"),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("reset", error_class, message, exit_code)
        }
    }
}
