//! Connection management: profile resolution, client creation, wait policy

use crate::cli::{ProjectArgs, WaitArgs};
use crate::error::Result as CliResult;
use anyhow::Context;
use photonctl_core::{Config, ConfigError, PhotonClient, Profile, WaitPolicy};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, trace};

/// User agent string for photonctl HTTP requests
const PHOTONCTL_USER_AGENT: &str = concat!("photonctl/", env!("CARGO_PKG_VERSION"));

pub const ENDPOINT_ENV: &str = "PHOTON_ENDPOINT";
pub const TOKEN_ENV: &str = "PHOTON_TOKEN";

/// Connection manager for creating authenticated clients
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    /// Create a new connection manager with a custom config path
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Save the configuration to the appropriate location
    pub fn save_config(&self) -> CliResult<()> {
        if let Some(ref path) = self.config_path {
            self.config
                .save_to_path(path)
                .context("Failed to save configuration")?;
        } else {
            self.config.save().context("Failed to save configuration")?;
        }
        Ok(())
    }

    /// Environment variables are ignored when --config-file was given
    fn use_env_vars(&self) -> bool {
        self.config_path.is_none()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        if !self.use_env_vars() {
            return None;
        }
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }

    /// The profile in effect, if any is configured
    pub fn active_profile(
        &self,
        profile_name: Option<&str>,
    ) -> CliResult<Option<(String, &Profile)>> {
        match self.config.resolve_profile(profile_name) {
            Ok(name) => {
                let profile = self.config.profile(&name)?;
                Ok(Some((name, profile)))
            }
            Err(ConfigError::NoProfiles { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create a client from the environment or the resolved profile
    pub fn create_client(&self, profile_name: Option<&str>) -> CliResult<PhotonClient> {
        debug!("Creating control-plane client");
        trace!("Profile name: {:?}", profile_name);

        if !self.use_env_vars() {
            info!("--config-file specified explicitly, ignoring environment variables");
        }

        let (endpoint, token) = match self.env_var(ENDPOINT_ENV) {
            Some(endpoint) => {
                info!("Using endpoint from {}", ENDPOINT_ENV);
                (endpoint, self.env_var(TOKEN_ENV))
            }
            None => {
                let (name, profile) = self
                    .active_profile(profile_name)?
                    .ok_or(crate::error::PhotonCtlError::NoProfileConfigured)?;
                info!("Using profile: {}", name);
                let token = self.env_var(TOKEN_ENV).or_else(|| profile.token.clone());
                (profile.endpoint.clone(), token)
            }
        };

        let mut builder = PhotonClient::builder()
            .base_url(endpoint)
            .user_agent(PHOTONCTL_USER_AGENT);
        if let Some(token) = token {
            builder = builder.token(token);
        }
        Ok(builder.build()?)
    }

    /// Profile wait settings with command-line overrides applied
    pub fn wait_policy(
        &self,
        profile_name: Option<&str>,
        timeout_secs: Option<u64>,
        interval_secs: Option<u64>,
    ) -> CliResult<WaitPolicy> {
        let mut policy = match self.active_profile(profile_name)? {
            Some((_, profile)) => profile.wait_policy()?,
            None => WaitPolicy::default(),
        };

        if let Some(secs) = timeout_secs {
            policy = policy.with_timeout(Duration::from_secs(secs.max(1)));
        }
        if let Some(secs) = interval_secs {
            policy = policy.with_interval(Duration::from_secs(secs.max(1)));
        }

        debug!("Wait policy: {:?}", policy);
        Ok(policy)
    }

    pub fn wait_policy_for(
        &self,
        profile_name: Option<&str>,
        wait: &WaitArgs,
    ) -> CliResult<WaitPolicy> {
        self.wait_policy(profile_name, wait.wait_timeout, wait.wait_interval)
    }

    /// Tenant and project names: flags first, then the profile
    pub fn project_target(
        &self,
        profile_name: Option<&str>,
        args: &ProjectArgs,
    ) -> CliResult<(Option<String>, Option<String>)> {
        let profile = self.active_profile(profile_name)?.map(|(_, p)| p);
        let tenant = args
            .tenant
            .clone()
            .or_else(|| profile.and_then(|p| p.tenant.clone()));
        let project = args
            .project
            .clone()
            .or_else(|| profile.and_then(|p| p.project.clone()));
        Ok((tenant, project))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photonctl_core::WaitConfig;

    fn manager() -> ConnectionManager {
        let mut config = Config::default();
        let mut lab = Profile::new("http://127.0.0.1:9000");
        lab.tenant = Some("dev".to_string());
        lab.project = Some("web".to_string());
        lab.wait = Some(WaitConfig {
            timeout_secs: 120,
            interval_secs: 5,
            retry_budget: 3,
        });
        config.set_profile("lab".to_string(), lab);
        ConnectionManager::with_config_path(config, Some(PathBuf::from("/tmp/unused.toml")))
    }

    #[test]
    fn test_wait_policy_overrides() {
        let mgr = manager();
        let policy = mgr.wait_policy(None, None, None).unwrap();
        assert_eq!(policy.timeout, Duration::from_secs(120));
        assert_eq!(policy.interval, Duration::from_secs(5));

        let policy = mgr.wait_policy(Some("lab"), Some(30), Some(0)).unwrap();
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.interval, Duration::from_secs(1));
    }

    #[test]
    fn test_project_target_prefers_flags() {
        let mgr = manager();
        let args = ProjectArgs {
            tenant: None,
            project: Some("db".to_string()),
        };
        let (tenant, project) = mgr.project_target(None, &args).unwrap();
        assert_eq!(tenant.as_deref(), Some("dev"));
        assert_eq!(project.as_deref(), Some("db"));
    }

    #[test]
    fn test_missing_profile_is_an_error() {
        let mgr = manager();
        assert!(mgr.create_client(Some("prod")).is_err());

        let empty = ConnectionManager::with_config_path(
            Config::default(),
            Some(PathBuf::from("/tmp/unused.toml")),
        );
        assert!(empty.active_profile(None).unwrap().is_none());
        assert!(empty.wait_policy(None, None, None).is_ok());
        assert!(empty.create_client(None).is_err());
    }

    #[test]
    fn test_client_from_profile() {
        let client = manager().create_client(None).unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9000/");
    }
}
