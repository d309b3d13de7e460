//! Cluster command implementations

use photonctl_core::api::{Cluster, Vm};
use photonctl_core::cluster::{self, CreateClusterParams};
use photonctl_core::{ControlPlane, ProgressRenderer};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use super::CommandContext;
use crate::cli::{ClusterCommands, CreateClusterArgs, OutputFormat, WaitArgs};
use crate::error::Result as CliResult;
use crate::output::{print_output, render_key_values, render_table};
use crate::progress::{SpinnerRenderer, task_spinner};

pub async fn handle_cluster_command(
    cmd: &ClusterCommands,
    ctx: &CommandContext<'_>,
) -> CliResult<()> {
    match cmd {
        ClusterCommands::Create(args) => handle_create(args, ctx).await,
        ClusterCommands::Show { id } => handle_show(id, ctx).await,
        ClusterCommands::List { target, summary } => {
            let client = ctx.client()?;
            let (tenant, project) = ctx.conn_mgr.project_target(ctx.profile, target)?;
            let project =
                cluster::resolve_project(&client, tenant.as_deref(), project.as_deref()).await?;
            let clusters = client.list_clusters(&project.id).await?;
            print_cluster_list(&clusters, *summary, ctx.output)
        }
        ClusterCommands::ListVms { id } => {
            let id = cluster::validate_cluster_id(id)?;
            let vms = ctx.client()?.list_cluster_vms(id).await?;
            print_vms(&vms, ctx.output)
        }
        ClusterCommands::Resize {
            id,
            worker_count,
            wait,
        } => handle_resize(id, worker_count, wait, ctx).await,
        ClusterCommands::Delete { id } => handle_delete(id, ctx).await,
    }
}

fn create_params(args: &CreateClusterArgs) -> CreateClusterParams {
    CreateClusterParams {
        name: args.name.clone().unwrap_or_default(),
        cluster_type: args.cluster_type.clone().unwrap_or_default(),
        vm_flavor: args.vm_flavor.clone(),
        disk_flavor: args.disk_flavor.clone(),
        network_id: args.network_id.clone(),
        worker_count: args.worker_count,
        batch_size: args.batch_size,
        dns: args.dns.clone(),
        gateway: args.gateway.clone(),
        netmask: args.netmask.clone(),
        master_ip: args.master_ip.clone(),
        container_network: args.container_network.clone(),
        etcd: [args.etcd1.clone(), args.etcd2.clone(), args.etcd3.clone()],
        zookeeper: [
            args.zookeeper1.clone(),
            args.zookeeper2.clone(),
            args.zookeeper3.clone(),
        ],
        ssh_key_file: args.ssh_key.clone(),
    }
}

async fn handle_create(args: &CreateClusterArgs, ctx: &CommandContext<'_>) -> CliResult<()> {
    // Nothing is sent until the input is valid
    let spec = create_params(args).into_spec()?;
    let client = ctx.client()?;
    let policy = ctx.conn_mgr.wait_policy_for(ctx.profile, &args.wait)?;
    let (tenant, project) = ctx.conn_mgr.project_target(ctx.profile, &args.target)?;
    let project = cluster::resolve_project(&client, tenant.as_deref(), project.as_deref()).await?;

    if ctx.is_human() {
        println!();
        println!("Creating cluster: {} ({})", spec.name, spec.cluster_type);
        if let Some(flavor) = &spec.vm_flavor {
            println!("  VM flavor: {}", flavor);
        }
        if let Some(flavor) = &spec.disk_flavor {
            println!("  Disk flavor: {}", flavor);
        }
        println!("  Worker count: {}", spec.worker_count);
        if let Some(batch) = spec.batch_size {
            println!("  Batch size: {}", batch);
        }
        println!();
    }

    let (_pb, callback) = task_spinner(
        format!("Creating cluster {}", spec.name),
        ctx.interactive,
    );

    if args.wait.wait_for_ready {
        let renderer = ready_renderer(&spec.name, ctx);
        let cluster = cluster::create_cluster_and_wait(
            &client,
            &project.id,
            &spec,
            &policy,
            Some(callback),
            renderer,
        )
        .await?;
        return print_cluster_ready(&cluster, ctx.output);
    }

    let task =
        cluster::create_cluster(&client, &project.id, &spec, &policy, Some(callback)).await?;
    let cluster_id = cluster::created_cluster_id(&task)?;
    debug!("Create task {} produced cluster {}", task.id, cluster_id);

    if ctx.is_human() {
        println!("Cluster {} created", cluster_id);
        println!(
            "Note: the cluster has been created with minimal resources. You can use the cluster now."
        );
        println!(
            "A background task is running to gradually expand the cluster to its target capacity."
        );
        println!(
            "You can run 'photonctl cluster show {}' to see the state of the cluster.",
            cluster_id
        );
        Ok(())
    } else {
        print_output(&task, ctx.output)
    }
}

async fn handle_resize(
    id: &str,
    worker_count: &str,
    wait: &WaitArgs,
    ctx: &CommandContext<'_>,
) -> CliResult<()> {
    let operation = cluster::validate_resize(id, worker_count)?;
    let id = id.trim();
    let client = ctx.client()?;
    let policy = ctx.conn_mgr.wait_policy_for(ctx.profile, wait)?;

    if ctx.is_human() {
        println!();
        println!(
            "Resizing cluster {} to worker count {}",
            id, operation.new_worker_count
        );
    }

    let (_pb, callback) = task_spinner(format!("Resizing cluster {}", id), ctx.interactive);

    if wait.wait_for_ready {
        let renderer = ready_renderer(id, ctx);
        let cluster = cluster::resize_cluster_and_wait(
            &client,
            id,
            &operation,
            &policy,
            Some(callback),
            renderer,
        )
        .await?;
        return print_cluster_ready(&cluster, ctx.output);
    }

    let task = cluster::resize_cluster(&client, id, &operation, &policy, Some(callback)).await?;

    if ctx.is_human() {
        println!(
            "Note: A background task is running to gradually resize the cluster to its target capacity."
        );
        println!(
            "You may continue to use the cluster. You can run 'photonctl cluster show {}'",
            id
        );
        println!(
            "to see the state of the cluster. If the resize operation is still in progress, the cluster state"
        );
        println!(
            "will show as RESIZING. Once the cluster is resized, the cluster state will show as READY."
        );
        Ok(())
    } else {
        print_output(&task, ctx.output)
    }
}

async fn handle_delete(id: &str, ctx: &CommandContext<'_>) -> CliResult<()> {
    let id = cluster::validate_cluster_id(id)?;
    let client = ctx.client()?;
    let policy = ctx.conn_mgr.wait_policy(ctx.profile, None, None)?;

    if ctx.is_human() {
        println!();
        println!("Deleting cluster {}", id);
    }

    let (_pb, callback) = task_spinner(format!("Deleting cluster {}", id), ctx.interactive);
    let task = cluster::delete_cluster(&client, id, &policy, Some(callback)).await?;

    if ctx.is_human() {
        println!("Cluster {} deleted", id);
        Ok(())
    } else {
        print_output(&task, ctx.output)
    }
}

async fn handle_show(id: &str, ctx: &CommandContext<'_>) -> CliResult<()> {
    let id = cluster::validate_cluster_id(id)?;
    let client = ctx.client()?;
    let found = client.get_cluster(id).await?;
    let vms = client.list_cluster_vms(id).await?;
    let masters = cluster::master_vms(&vms);

    match ctx.output {
        OutputFormat::Json | OutputFormat::Yaml => print_output(
            json!({ "cluster": found, "masters": masters }),
            ctx.output,
        ),
        OutputFormat::Table => {
            println!("{}", render_key_values(&serde_json::to_value(&found)?));
            if !masters.is_empty() {
                println!("{}", vm_table(&masters));
            }
            Ok(())
        }
        OutputFormat::Auto => {
            print_cluster_details(&found);
            if !masters.is_empty() {
                println!("VM ID\tVM Name\tVM State");
                for vm in masters {
                    println!("{}\t{}\t{}", vm.id, vm.name, vm.state);
                }
            }
            Ok(())
        }
    }
}

/// Spinner for the readiness wait that follows a completed task
fn ready_renderer(cluster: &str, ctx: &CommandContext<'_>) -> Arc<dyn ProgressRenderer> {
    let message = format!("Waiting for cluster {} to become ready", cluster);
    Arc::new(SpinnerRenderer::new(message, ctx.interactive))
}

fn print_cluster_ready(cluster: &Cluster, output: OutputFormat) -> CliResult<()> {
    if output.is_structured() {
        return print_output(cluster, output);
    }
    println!("Cluster {} is ready", cluster.id);
    Ok(())
}

fn print_cluster_details(cluster: &Cluster) {
    println!("Cluster ID:             {}", cluster.id);
    println!("  Name:                 {}", cluster.name);
    println!("  State:                {}", cluster.state);
    println!("  Type:                 {}", cluster.cluster_type);
    println!("  Worker count:         {}", cluster.worker_count);
    println!(
        "  Extended Properties:  {}",
        cluster
            .extended_properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();
}

/// Table headers and rows; `summary` keeps only ID, name and state
fn cluster_rows(
    clusters: &[Cluster],
    summary: bool,
) -> (Vec<&'static str>, Vec<Vec<String>>) {
    let headers = if summary {
        vec!["ID", "Name", "State"]
    } else {
        vec!["ID", "Name", "State", "Type", "Workers"]
    };
    let rows = clusters
        .iter()
        .map(|c| {
            let mut row = vec![c.id.clone(), c.name.clone(), c.state.to_string()];
            if !summary {
                row.push(c.cluster_type.clone());
                row.push(c.worker_count.to_string());
            }
            row
        })
        .collect();
    (headers, rows)
}

fn print_cluster_list(
    clusters: &[Cluster],
    summary: bool,
    output: OutputFormat,
) -> CliResult<()> {
    match output {
        OutputFormat::Json | OutputFormat::Yaml if summary => {
            let list: Vec<_> = clusters
                .iter()
                .map(|c| json!({ "id": c.id, "name": c.name, "state": c.state }))
                .collect();
            print_output(list, output)
        }
        OutputFormat::Json | OutputFormat::Yaml => print_output(clusters, output),
        OutputFormat::Auto | OutputFormat::Table => {
            let (headers, rows) = cluster_rows(clusters, summary);
            println!("{}", render_table(&headers, rows));
            println!("Total: {}", clusters.len());
            Ok(())
        }
    }
}

fn vm_table(vms: &[&Vm]) -> String {
    let rows = vms
        .iter()
        .map(|vm| vec![vm.id.clone(), vm.name.clone(), vm.state.clone()])
        .collect();
    render_table(&["VM ID", "VM Name", "VM State"], rows)
}

fn print_vms(vms: &[Vm], output: OutputFormat) -> CliResult<()> {
    if output.is_structured() {
        return print_output(vms, output);
    }
    let refs: Vec<&Vm> = vms.iter().collect();
    println!("{}", vm_table(&refs));
    println!("Total: {}", vms.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn parse_create(args: &[&str]) -> Box<CreateClusterArgs> {
        let mut argv = vec!["photonctl", "cluster", "create"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Cluster(ClusterCommands::Create(args)) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_create_args_map_to_params() {
        let args = parse_create(&[
            "--name",
            "k8s",
            "--type",
            "kubernetes",
            "--etcd1",
            "10.0.0.1",
            "--etcd3",
            "10.0.0.3",
            "--worker-count",
            "4",
        ]);
        let params = create_params(&args);
        assert_eq!(params.name, "k8s");
        assert_eq!(params.cluster_type, "kubernetes");
        assert_eq!(params.worker_count, Some(4));
        assert_eq!(params.etcd[0].as_deref(), Some("10.0.0.1"));
        assert!(params.etcd[1].is_none());
        assert_eq!(params.etcd[2].as_deref(), Some("10.0.0.3"));
    }

    #[test]
    fn test_summary_list_drops_type_and_workers() {
        let clusters: Vec<Cluster> = serde_json::from_value(json!([
            { "id": "c-1", "name": "k8s-dev", "type": "KUBERNETES", "state": "READY", "workerCount": 3 },
            { "id": "c-2", "name": "swarm", "type": "SWARM", "state": "creating", "workerCount": 1 }
        ]))
        .unwrap();

        let (headers, rows) = cluster_rows(&clusters, true);
        assert_eq!(headers, vec!["ID", "Name", "State"]);
        assert_eq!(rows[1], vec!["c-2", "swarm", "CREATING"]);

        let (headers, rows) = cluster_rows(&clusters, false);
        assert_eq!(headers.len(), 5);
        assert_eq!(rows[0], vec!["c-1", "k8s-dev", "READY", "KUBERNETES", "3"]);

        match Cli::parse_from(["photonctl", "cluster", "list", "-s"]).command {
            Commands::Cluster(ClusterCommands::List { summary, .. }) => assert!(summary),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
