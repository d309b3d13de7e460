//! Input validation for cluster operations
//!
//! Everything here runs before any remote call is made.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{ClusterCreateSpec, ClusterResizeOperation, ClusterType};
use crate::error::{CoreError, Result};

pub const PROP_DNS: &str = "dns";
pub const PROP_GATEWAY: &str = "gateway";
pub const PROP_NETMASK: &str = "netmask";
pub const PROP_MASTER_IP: &str = "master_ip";
pub const PROP_CONTAINER_NETWORK: &str = "container_network";
pub const PROP_SSH_KEY: &str = "ssh_key";
pub const PROP_ETCD_IPS: [&str; 3] = ["etcd_ip1", "etcd_ip2", "etcd_ip3"];
pub const PROP_ZOOKEEPER_IPS: [&str; 3] = ["zookeeper_ip1", "zookeeper_ip2", "zookeeper_ip3"];

/// Worker count used when none is given
pub const DEFAULT_WORKER_COUNT: u32 = 1;

/// Everything a user may supply to `cluster create`
#[derive(Debug, Clone, Default)]
pub struct CreateClusterParams {
    pub name: String,
    pub cluster_type: String,
    pub vm_flavor: Option<String>,
    pub disk_flavor: Option<String>,
    pub network_id: Option<String>,
    pub worker_count: Option<u32>,
    pub batch_size: Option<u32>,
    pub dns: Option<String>,
    pub gateway: Option<String>,
    pub netmask: Option<String>,
    pub master_ip: Option<String>,
    pub container_network: Option<String>,
    pub etcd: [Option<String>; 3],
    pub zookeeper: [Option<String>; 3],
    pub ssh_key_file: Option<PathBuf>,
}

impl CreateClusterParams {
    /// Validate the parameters and build the request body
    pub fn into_spec(self) -> Result<ClusterCreateSpec> {
        let name = self.name.trim().to_string();
        let type_name = self.cluster_type.trim();
        if name.is_empty() || type_name.is_empty() {
            return Err(CoreError::Validation(
                "Provide a valid cluster name and type".to_string(),
            ));
        }

        let (dns, gateway, netmask) = match (
            non_empty(self.dns),
            non_empty(self.gateway),
            non_empty(self.netmask),
        ) {
            (Some(dns), Some(gateway), Some(netmask)) => (dns, gateway, netmask),
            _ => {
                return Err(CoreError::Validation(
                    "Provide a valid DNS, gateway, and netmask".to_string(),
                ));
            }
        };

        let cluster_type: ClusterType = type_name.parse().map_err(CoreError::Validation)?;

        let mut props = BTreeMap::new();
        props.insert(PROP_DNS.to_string(), dns);
        props.insert(PROP_GATEWAY.to_string(), gateway);
        props.insert(PROP_NETMASK.to_string(), netmask);

        if let Some(path) = &self.ssh_key_file {
            props.insert(PROP_SSH_KEY.to_string(), read_ssh_key(path)?);
        }

        match cluster_type {
            ClusterType::Kubernetes => {
                let master_ip = required(self.master_ip, "--master-ip", cluster_type)?;
                let network = required(
                    self.container_network,
                    "--container-network",
                    cluster_type,
                )?;
                props.insert(PROP_MASTER_IP.to_string(), master_ip);
                props.insert(PROP_CONTAINER_NETWORK.to_string(), network);
                insert_chain(&mut props, &PROP_ETCD_IPS, self.etcd, "--etcd1", cluster_type)?;
            }
            ClusterType::Mesos => {
                insert_chain(
                    &mut props,
                    &PROP_ZOOKEEPER_IPS,
                    self.zookeeper,
                    "--zookeeper1",
                    cluster_type,
                )?;
            }
            ClusterType::Swarm => {
                insert_chain(&mut props, &PROP_ETCD_IPS, self.etcd, "--etcd1", cluster_type)?;
            }
        }

        let worker_count = match self.worker_count {
            None | Some(0) => DEFAULT_WORKER_COUNT,
            Some(n) => n,
        };

        Ok(ClusterCreateSpec {
            name,
            cluster_type,
            vm_flavor: non_empty(self.vm_flavor),
            disk_flavor: non_empty(self.disk_flavor),
            network_id: non_empty(self.network_id),
            worker_count,
            batch_size: self.batch_size.filter(|n| *n > 0),
            extended_properties: props,
        })
    }
}

/// Validate `cluster resize <id> <count>` arguments
pub fn validate_resize(cluster_id: &str, worker_count: &str) -> Result<ClusterResizeOperation> {
    let count = worker_count.trim().parse::<i64>().ok();
    match count {
        Some(n) if n > 0 && !cluster_id.trim().is_empty() => Ok(ClusterResizeOperation {
            new_worker_count: u32::try_from(n).map_err(|_| {
                CoreError::Validation(format!("Worker count {} is too large", n))
            })?,
        }),
        _ => Err(CoreError::Validation(
            "Provide a valid cluster ID and worker count".to_string(),
        )),
    }
}

pub fn validate_cluster_id(cluster_id: &str) -> Result<&str> {
    let id = cluster_id.trim();
    if id.is_empty() {
        return Err(CoreError::Validation(
            "Please provide a valid cluster ID".to_string(),
        ));
    }
    Ok(id)
}

/// Read an SSH public key; only the first line of the file is used
pub fn read_ssh_key(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| {
        CoreError::Validation(format!(
            "Failed to read ssh key file {}: {}",
            path.display(),
            e
        ))
    })?;

    let key = content.lines().next().unwrap_or_default().trim();
    if key.is_empty() {
        return Err(CoreError::Validation(
            "The ssh-key file provided has no content".to_string(),
        ));
    }
    Ok(key.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, flag: &str, cluster_type: ClusterType) -> Result<String> {
    non_empty(value).ok_or_else(|| {
        CoreError::Validation(format!("{} is required for {} clusters", flag, cluster_type))
    })
}

/// First address is required; each later one only counts if the one before it was given
fn insert_chain(
    props: &mut BTreeMap<String, String>,
    keys: &[&str; 3],
    values: [Option<String>; 3],
    first_flag: &str,
    cluster_type: ClusterType,
) -> Result<()> {
    let [first, second, third] = values;
    props.insert(
        keys[0].to_string(),
        required(first, first_flag, cluster_type)?,
    );
    if let Some(second) = non_empty(second) {
        props.insert(keys[1].to_string(), second);
        if let Some(third) = non_empty(third) {
            props.insert(keys[2].to_string(), third);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn swarm_params() -> CreateClusterParams {
        CreateClusterParams {
            name: "swarm-dev".to_string(),
            cluster_type: "swarm".to_string(),
            dns: some("10.0.0.2"),
            gateway: some("10.0.0.1"),
            netmask: some("255.255.255.0"),
            etcd: [some("10.0.0.10"), None, None],
            ..Default::default()
        }
    }

    #[test]
    fn test_swarm_spec_defaults() {
        let spec = swarm_params().into_spec().unwrap();
        assert_eq!(spec.cluster_type, ClusterType::Swarm);
        assert_eq!(spec.worker_count, DEFAULT_WORKER_COUNT);
        assert_eq!(spec.batch_size, None);
        assert_eq!(spec.extended_properties["dns"], "10.0.0.2");
        assert_eq!(spec.extended_properties["etcd_ip1"], "10.0.0.10");
        assert!(!spec.extended_properties.contains_key("etcd_ip2"));
    }

    #[test]
    fn test_missing_name_or_type() {
        let mut params = swarm_params();
        params.name = "  ".to_string();
        let err = params.into_spec().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Provide a valid cluster name and type"
        );

        let mut params = swarm_params();
        params.cluster_type = String::new();
        assert!(params.into_spec().unwrap_err().is_validation());
    }

    #[test]
    fn test_missing_network_settings() {
        let mut params = swarm_params();
        params.netmask = some("");
        let err = params.into_spec().unwrap_err();
        assert!(err.to_string().contains("DNS, gateway, and netmask"));
    }

    #[test]
    fn test_unsupported_type() {
        let mut params = swarm_params();
        params.cluster_type = "nomad".to_string();
        let err = params.into_spec().unwrap_err();
        assert!(err.to_string().contains("Unsupported cluster type: NOMAD"));
    }

    #[test]
    fn test_kubernetes_requires_master_and_network() {
        let mut params = swarm_params();
        params.cluster_type = "KUBERNETES".to_string();
        let err = params.clone().into_spec().unwrap_err();
        assert!(err.to_string().contains("--master-ip"));

        params.master_ip = some("10.0.0.20");
        params.container_network = some("10.2.0.0/16");
        params.etcd = [some("10.0.0.10"), some("10.0.0.11"), some("10.0.0.12")];
        params.worker_count = Some(5);
        params.batch_size = Some(2);

        let spec = params.into_spec().unwrap();
        assert_eq!(spec.worker_count, 5);
        assert_eq!(spec.batch_size, Some(2));
        assert_eq!(spec.extended_properties["master_ip"], "10.0.0.20");
        assert_eq!(spec.extended_properties["container_network"], "10.2.0.0/16");
        assert_eq!(spec.extended_properties["etcd_ip3"], "10.0.0.12");
    }

    #[test]
    fn test_third_address_ignored_without_second() {
        let mut params = swarm_params();
        params.cluster_type = "mesos".to_string();
        params.zookeeper = [some("10.0.0.30"), None, some("10.0.0.32")];

        let spec = params.into_spec().unwrap();
        assert_eq!(spec.extended_properties["zookeeper_ip1"], "10.0.0.30");
        assert!(!spec.extended_properties.contains_key("zookeeper_ip3"));
    }

    #[test]
    fn test_mesos_requires_zookeeper() {
        let mut params = swarm_params();
        params.cluster_type = "MESOS".to_string();
        let err = params.into_spec().unwrap_err();
        assert!(err.to_string().contains("--zookeeper1 is required for MESOS"));
    }

    #[test]
    fn test_ssh_key_first_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  ssh-rsa AAAAB3Nza user@host  ").unwrap();
        writeln!(file, "ignored").unwrap();

        let mut params = swarm_params();
        params.ssh_key_file = Some(file.path().to_path_buf());
        let spec = params.into_spec().unwrap();
        assert_eq!(spec.extended_properties["ssh_key"], "ssh-rsa AAAAB3Nza user@host");
    }

    #[test]
    fn test_empty_ssh_key_rejected() {
        let file = NamedTempFile::new().unwrap();
        let err = read_ssh_key(file.path()).unwrap_err();
        assert!(err.to_string().contains("has no content"));

        let err = read_ssh_key(Path::new("/nonexistent/id_rsa.pub")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_resize() {
        let op = validate_resize("cluster-1", "4").unwrap();
        assert_eq!(op.new_worker_count, 4);

        for (id, count) in [
            ("cluster-1", "0"),
            ("cluster-1", "-2"),
            ("cluster-1", "four"),
            ("", "3"),
        ] {
            let err = validate_resize(id, count).unwrap_err();
            assert!(err.is_validation(), "{id} {count}");
        }
    }

    #[test]
    fn test_validate_cluster_id() {
        assert_eq!(validate_cluster_id(" cluster-1 ").unwrap(), "cluster-1");
        assert!(validate_cluster_id("").is_err());
    }
}
