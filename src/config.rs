use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::shell::CommandLine;

/// Overrides the installer command, e.g. `python3 -m pip`.
///
/// Split on whitespace unless the whole value names an existing file.
pub const INSTALLER_ENV: &str = "EDITABLE_INSTALL_PIP";

pub const DEFAULT_INSTALLER: &str = "pip";

const CONFIG_CANDIDATES: &[(&str, ConfigFormat)] = &[
    ("editable-install.yml", ConfigFormat::Yaml),
    ("editable-install.yaml", ConfigFormat::Yaml),
    ("editable-install.toml", ConfigFormat::Toml),
];

#[derive(Debug, Clone)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

#[derive(Debug, Clone)]
pub struct LoadedInstallConfig {
    pub path: PathBuf,
    pub data: InstallConfig,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InstallConfig {
    #[serde(default)]
    pub installer: Option<String>,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Settings the installer runs with after env, file and defaults are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub installer: CommandLine,
    pub extra_args: Vec<String>,
}

impl Settings {
    /// Merge `file` with an optional env override; env wins.
    pub fn resolve(file: Option<&InstallConfig>, env_installer: Option<&str>) -> Result<Self> {
        let configured = env_installer
            .filter(|v| !v.trim().is_empty())
            .or_else(|| file.and_then(|c| c.installer.as_deref()))
            .unwrap_or(DEFAULT_INSTALLER);

        let installer = CommandLine::parse(configured)
            .with_context(|| format!("parsing installer command `{configured}`"))?;

        Ok(Self {
            installer,
            extra_args: file.map(|c| c.extra_args.clone()).unwrap_or_default(),
        })
    }
}

/// Load settings for the project in `base_dir`.
pub fn load_settings(base_dir: &Path) -> Result<Settings> {
    let loaded = load_install_config_from_dir(base_dir)?;
    if let Some(cfg) = &loaded {
        println!("Using installer config {}", cfg.path.display());
    }
    let env_installer = std::env::var(INSTALLER_ENV).ok();
    Settings::resolve(loaded.as_ref().map(|c| &c.data), env_installer.as_deref())
}

pub fn load_install_config_from_dir(base_dir: &Path) -> Result<Option<LoadedInstallConfig>> {
    for (file, format) in CONFIG_CANDIDATES {
        let path = base_dir.join(file);
        if !path.exists() {
            continue;
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading installer config at {}", path.display()))?;
        let data = match format {
            ConfigFormat::Yaml => parse_yaml_str(&content)
                .with_context(|| format!("parsing YAML config at {}", path.display()))?,
            ConfigFormat::Toml => parse_toml_str(&content)
                .with_context(|| format!("parsing TOML config at {}", path.display()))?,
        };
        return Ok(Some(LoadedInstallConfig { path, data }));
    }
    Ok(None)
}

pub(crate) fn parse_yaml_str(content: &str) -> Result<InstallConfig> {
    // An empty YAML document deserializes as null.
    if content.trim().is_empty() {
        return Ok(InstallConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub(crate) fn parse_toml_str(content: &str) -> Result<InstallConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_to_plain_pip() {
        let settings = Settings::resolve(None, None).expect("resolve");
        assert_eq!(settings.installer.program(), "pip");
        assert!(settings.installer.args().is_empty());
        assert!(settings.extra_args.is_empty());
    }

    #[test]
    fn env_override_beats_config_file() {
        let file = InstallConfig {
            installer: Some("uv pip".to_string()),
            extra_args: vec!["--no-deps".to_string()],
        };
        let settings = Settings::resolve(Some(&file), Some("python3 -m pip")).expect("resolve");
        assert_eq!(settings.installer.program(), "python3");
        assert_eq!(settings.installer.args(), ["-m", "pip"]);
        assert_eq!(settings.extra_args, vec!["--no-deps".to_string()]);
    }

    #[test]
    fn blank_env_override_is_ignored() {
        let file = InstallConfig {
            installer: Some("uv pip".to_string()),
            extra_args: Vec::new(),
        };
        let settings = Settings::resolve(Some(&file), Some("   ")).expect("resolve");
        assert_eq!(settings.installer.program(), "uv");
    }

    #[test]
    fn blank_configured_installer_is_rejected() {
        let file = InstallConfig {
            installer: Some(String::new()),
            extra_args: Vec::new(),
        };
        assert!(Settings::resolve(Some(&file), None).is_err());
    }

    #[test]
    fn missing_config_file_is_none() {
        let tmp = tempdir().expect("temp dir");
        assert!(
            load_install_config_from_dir(tmp.path())
                .expect("load")
                .is_none()
        );
    }

    #[test]
    fn parses_yaml_config() {
        let tmp = tempdir().expect("temp dir");
        let yaml = r#"installer: "python3 -m pip"
extra_args:
  - "--no-build-isolation"
"#;
        fs::write(tmp.path().join("editable-install.yml"), yaml).expect("write yaml");

        let loaded = load_install_config_from_dir(tmp.path())
            .expect("parse yaml")
            .expect("config present");
        assert_eq!(loaded.path, tmp.path().join("editable-install.yml"));
        assert_eq!(loaded.data.installer.as_deref(), Some("python3 -m pip"));
        assert_eq!(loaded.data.extra_args, vec!["--no-build-isolation".to_string()]);
    }

    #[test]
    fn parses_toml_config() {
        let tmp = tempdir().expect("temp dir");
        let toml = r#"installer = "uv pip"
extra_args = ["--no-deps", "-q"]
"#;
        fs::write(tmp.path().join("editable-install.toml"), toml).expect("write toml");

        let loaded = load_install_config_from_dir(tmp.path())
            .expect("parse toml")
            .expect("config present");
        assert_eq!(loaded.data.installer.as_deref(), Some("uv pip"));
        assert_eq!(
            loaded.data.extra_args,
            vec!["--no-deps".to_string(), "-q".to_string()]
        );
    }

    #[test]
    fn yaml_wins_over_toml() {
        let tmp = tempdir().expect("temp dir");
        fs::write(tmp.path().join("editable-install.yaml"), "installer: pip3\n").expect("yaml");
        fs::write(tmp.path().join("editable-install.toml"), "installer = \"uv pip\"\n")
            .expect("toml");

        let loaded = load_install_config_from_dir(tmp.path())
            .expect("load")
            .expect("config present");
        assert_eq!(loaded.data.installer.as_deref(), Some("pip3"));
    }

    #[test]
    fn malformed_config_reports_path() {
        let tmp = tempdir().expect("temp dir");
        fs::write(tmp.path().join("editable-install.toml"), "installer = [").expect("write");

        let err = load_install_config_from_dir(tmp.path()).expect_err("bad toml");
        assert!(format!("{err:#}").contains("editable-install.toml"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_toml_str("instaler = \"pip\"\n").is_err());
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(parse_yaml_str("").expect("parse"), InstallConfig::default());
    }
}
