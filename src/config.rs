use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::{
    constants::{
        ADDR_ENV, BINARY_ENV, BUILD_TOOL_ENV, DEFAULT_ADDR, DEFAULT_BINARY, DEFAULT_BUILD_TOOL,
        DEFAULT_LOG_FILTER, DEFAULT_WORKDIR, DRY_RUN_ENV, LOG_ENV, WORKDIR_ENV,
    },
    core::pipeline::commands::Toolchain,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {msg}")]
    InvalidValue { name: String, msg: String },
    #[error("Working directory {path} is not accessible: {msg}")]
    Workdir { path: PathBuf, msg: String },
}

/// Process-wide settings, read once at start-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub workdir: PathBuf,
    pub binary: String,
    pub build_tool: String,
    pub log_filter: String,
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let addr = get(ADDR_ENV, DEFAULT_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                name: ADDR_ENV.to_string(),
                msg: e.to_string(),
            })?;

        let workdir = PathBuf::from(get(WORKDIR_ENV, DEFAULT_WORKDIR));
        let binary = resolve_binary(&workdir, Path::new(&get(BINARY_ENV, DEFAULT_BINARY)))?;

        let dry_run = match lookup(DRY_RUN_ENV).as_deref().map(str::trim) {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: DRY_RUN_ENV.to_string(),
                    msg: format!("expected 0, 1, true or false, got {:?}", other),
                });
            }
        };

        Ok(Self {
            addr,
            workdir,
            binary,
            build_tool: get(BUILD_TOOL_ENV, DEFAULT_BUILD_TOOL),
            log_filter: get(LOG_ENV, DEFAULT_LOG_FILTER),
            dry_run,
        })
    }

    /// Fails when the working directory is missing or not a directory.
    pub fn check_workdir(&self) -> Result<(), ConfigError> {
        let meta = std::fs::metadata(&self.workdir).map_err(|e| ConfigError::Workdir {
            path: self.workdir.clone(),
            msg: e.to_string(),
        })?;

        if !meta.is_dir() {
            return Err(ConfigError::Workdir {
                path: self.workdir.clone(),
                msg: "not a directory".to_string(),
            });
        }

        Ok(())
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            build_tool: self.build_tool.clone(),
            binary: self.binary.clone(),
            working_dir: self.workdir.clone(),
        }
    }
}

/// Relative binary paths are taken relative to the working directory, since
/// that is where the build tool leaves its output. The result is absolute
/// because the child is started inside the working directory.
fn resolve_binary(workdir: &Path, binary: &Path) -> Result<String, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidValue {
        name: BINARY_ENV.to_string(),
        msg,
    };

    let binary = std::path::absolute(workdir.join(binary)).map_err(|e| invalid(e.to_string()))?;

    binary
        .into_os_string()
        .into_string()
        .map_err(|path| invalid(format!("{:?} is not valid UTF-8", path)))
}
