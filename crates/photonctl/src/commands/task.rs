//! Task command implementations

use photonctl_core::api::Task;
use photonctl_core::{ControlPlane, poll_task};
use serde_json::{Value, json};

use super::CommandContext;
use crate::cli::{OutputFormat, TaskCommands};
use crate::error::Result as CliResult;
use crate::output::{print_output, render_key_values};
use crate::progress::task_spinner;

pub async fn handle_task_command(cmd: &TaskCommands, ctx: &CommandContext<'_>) -> CliResult<()> {
    match cmd {
        TaskCommands::Show { id } => {
            let task = ctx.client()?.get_task(id.trim()).await?;
            print_task(&task, ctx.output)
        }
        TaskCommands::Wait {
            id,
            wait_timeout,
            wait_interval,
        } => {
            let client = ctx.client()?;
            let policy = ctx
                .conn_mgr
                .wait_policy(ctx.profile, *wait_timeout, *wait_interval)?;
            let (_pb, callback) =
                task_spinner(format!("Waiting for task {}", id), ctx.interactive);
            let task = poll_task(&client, id.trim(), &policy, Some(callback)).await?;
            print_task(&task, ctx.output)
        }
    }
}

/// Flat view of a task for display
pub fn task_summary(task: &Task) -> Value {
    json!({
        "id": task.id,
        "state": task.state.as_str(),
        "operation": task.operation,
        "entity": task.entity_id(),
        "errors": task.failure_message(),
    })
}

fn print_task(task: &Task, output: OutputFormat) -> CliResult<()> {
    match output {
        OutputFormat::Json | OutputFormat::Yaml => print_output(task, output),
        OutputFormat::Table => {
            println!("{}", render_key_values(&task_summary(task)));
            Ok(())
        }
        OutputFormat::Auto => {
            println!("Task ID:     {}", task.id);
            println!("  State:     {}", task.state);
            if let Some(operation) = &task.operation {
                println!("  Operation: {}", operation);
            }
            if let Some(entity) = task.entity_id() {
                println!("  Entity:    {}", entity);
            }
            if let Some(errors) = task.failure_message() {
                println!("  Errors:    {}", errors);
            }
            Ok(())
        }
    }
}
