//! Server configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults
//! 2. `NOMAD_ADDR` / `NOMAD_TOKEN`
//! 3. `noaas.toml` in the working directory, if present
//! 4. the file given with `--config`
//! 5. `NOAAS_`-prefixed environment variables, nested keys split on `__`
//!    (e.g. `NOAAS_RESOLVER__MAX_WAIT_MS=60000`)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use noaas_core::{FetchConfig, JobTemplate, ResolverConfig};
use noaas_exec::ExecConfig;
use noaas_nomad::NomadConfig;
use noaas_observe::LoggerConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "noaas.toml";
const ENV_PREFIX: &str = "NOAAS_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file {0} does not exist")]
    MissingFile(PathBuf),

    #[error("invalid configuration: {0}")]
    Parse(#[source] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Parse(Box::new(err))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub logger: LoggerConfig,
    pub nomad: NomadConfig,
    pub fetch: FetchConfig,
    pub exec: ExecSettings,
    pub resolver: ResolverConfig,
    pub job: JobTemplate,
}

impl ServerConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(p) = path
            && !p.exists()
        {
            return Err(ConfigError::MissingFile(p.to_path_buf()));
        }
        Ok(Self::figment(path).extract()?)
    }

    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Env::raw().only(&["NOMAD_ADDR"]).map(|_| "nomad.address".into()))
            .merge(Env::raw().only(&["NOMAD_TOKEN"]).map(|_| "nomad.token".into()))
            .merge(Toml::file(DEFAULT_CONFIG_FILE));

        if let Some(p) = path {
            figment = figment.merge(Toml::file(p));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub listen: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080),
        }
    }
}

/// Script execution settings. Scripts run unbounded unless `timeout_ms` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecSettings {
    pub timeout_ms: Option<u64>,
}

impl ExecSettings {
    pub fn to_exec_config(&self) -> ExecConfig {
        ExecConfig {
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use noaas_observe::LoggerFormat;

    use super::*;

    fn extract(path: Option<&Path>) -> figment::Result<ServerConfig> {
        ServerConfig::figment(path).extract()
    }

    #[test]
    fn defaults_without_any_source() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let cfg = extract(None)?;

            assert_eq!(cfg.server.listen, "0.0.0.0:8080".parse().unwrap());
            assert_eq!(cfg.nomad.address, "http://127.0.0.1:4646");
            assert_eq!(cfg.nomad.token, None);
            assert_eq!(cfg.fetch.timeout_ms, 30_000);
            assert_eq!(cfg.exec.timeout_ms, None);
            assert_eq!(cfg.resolver.poll_interval_ms, 5_000);
            assert_eq!(cfg.resolver.max_wait_ms, 300_000);
            assert_eq!(cfg.job.image, "busybox:1");
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "noaas.toml",
                r#"
                [server]
                listen = "127.0.0.1:9000"

                [logger]
                format = "json"
                level = "debug"

                [nomad]
                address = "http://nomad.internal:4646"
                namespace = "web"

                [resolver]
                poll_interval_ms = 1000

                [job]
                memory_mb = 128
                "#,
            )?;
            let cfg = extract(None)?;

            assert_eq!(cfg.server.listen, "127.0.0.1:9000".parse().unwrap());
            assert_eq!(cfg.logger.format, LoggerFormat::Json);
            assert_eq!(cfg.logger.level, "debug");
            assert_eq!(cfg.nomad.address, "http://nomad.internal:4646");
            assert_eq!(cfg.nomad.namespace.as_deref(), Some("web"));
            assert_eq!(cfg.resolver.poll_interval_ms, 1_000);
            assert_eq!(cfg.resolver.max_wait_ms, 300_000);
            assert_eq!(cfg.job.memory_mb, 128);
            assert_eq!(cfg.job.cpu_mhz, 50);
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("noaas.toml", "[resolver]\nmax_wait_ms = 1000\n")?;
            jail.set_env("NOAAS_RESOLVER__MAX_WAIT_MS", "60000");
            jail.set_env("NOAAS_EXEC__TIMEOUT_MS", "2500");
            let cfg = extract(None)?;

            assert_eq!(cfg.resolver.max_wait_ms, 60_000);
            assert_eq!(
                cfg.exec.to_exec_config().timeout,
                Some(Duration::from_millis(2_500))
            );
            Ok(())
        });
    }

    #[test]
    fn nomad_env_applies_unless_file_sets_address() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("NOMAD_ADDR", "http://10.1.2.3:4646");
            jail.set_env("NOMAD_TOKEN", "s3cr3t");

            let cfg = extract(None)?;
            assert_eq!(cfg.nomad.address, "http://10.1.2.3:4646");
            assert_eq!(cfg.nomad.token.as_deref(), Some("s3cr3t"));

            jail.create_file("noaas.toml", "[nomad]\naddress = \"http://file:4646\"\n")?;
            let cfg = extract(None)?;
            assert_eq!(cfg.nomad.address, "http://file:4646");
            assert_eq!(cfg.nomad.token.as_deref(), Some("s3cr3t"));
            Ok(())
        });
    }

    #[test]
    fn explicit_file_overrides_default_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file("noaas.toml", "[fetch]\ntimeout_ms = 1000\n")?;
            jail.create_file("prod.toml", "[fetch]\ntimeout_ms = 5000\n")?;

            let cfg = extract(Some(Path::new("prod.toml")))?;
            assert_eq!(cfg.fetch.timeout_ms, 5_000);
            Ok(())
        });
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let err = ServerConfig::load(Some(Path::new("absent.toml"))).unwrap_err();
            assert!(matches!(err, ConfigError::MissingFile(_)));
            Ok(())
        });
    }

    #[test]
    fn bad_value_is_reported() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("NOAAS_SERVER__LISTEN", "not-an-address");
            let err = ServerConfig::load(None).unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)));
            Ok(())
        });
    }
}
