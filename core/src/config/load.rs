use std::path::{Path, PathBuf};

use super::types::{AppConfig, WorkflowProvider};

pub const LOCAL_CONFIG_FILE: &str = "governor.toml";

/// Get the default governor data directory: ~/.governor
pub fn get_governor_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".governor"))
}

/// Loads configuration and applies environment overrides.
///
/// Priority: explicit `path` (must exist), then `./governor.toml`, then
/// `~/.governor/config.toml`, then built-in defaults.
pub fn load(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut cfg = match path {
        Some(p) => read_config(p)?,
        None => {
            let local_config = Path::new(LOCAL_CONFIG_FILE);
            let home_config = get_governor_data_dir()
                .ok()
                .map(|dir| dir.join("config.toml"));
            if local_config.exists() {
                read_config(local_config)?
            } else if let Some(home) = home_config.filter(|p| p.exists()) {
                read_config(&home)?
            } else {
                AppConfig::default()
            }
        }
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e))?;
    Ok(cfg)
}

/// Environment overrides; blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = var("GOVERNOR_KEY") {
        cfg.auth.governor_key = v;
    }
    if let Some(v) = var("PORT") {
        cfg.server.port = v
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT {:?}: {}", v, e))?;
    }
    if let Some(v) = var("GOVERNOR_COLLECTION") {
        cfg.store.collection = v;
    }
    if let Some(v) = var("GOVERNOR_REGISTRY") {
        cfg.registry.path = v;
    }
    if let WorkflowProvider::Service(ref mut svc_cfg) = cfg.workflow.provider {
        if let Some(v) = var("GOVERNOR_WORKFLOW_URL") {
            svc_cfg.base_url = v;
        }
        if let Some(v) = var("GOVERNOR_WORKFLOW_TOKEN") {
            svc_cfg.access_token = v;
        }
    }
    if var("GOVERNOR_MOCK_SERVICES").is_some_and(|v| v.trim().eq_ignore_ascii_case("true")) {
        cfg.use_mock_services();
    }

    Ok(())
}
