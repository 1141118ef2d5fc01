//! Application configuration management.
//!
//! The config is a small INI file, `config.ini` in the working directory by
//! default:
//!
//! ```ini
//! [auth]
//! app_password = <app password>
//!
//! [pihole]
//! url = http://pi.hole
//! # optional
//! verify_tls = true
//! timeout = 30
//! ```
//!
//! Values are read literally (no quote or escape processing). Section and key
//! names are case-insensitive.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::{Ini, ParseOption};
use reqwest::Url;
use thiserror::Error;

const AUTH_SECTION: &str = "auth";
const PIHOLE_SECTION: &str = "pihole";

/// Canonical credential key
const CREDENTIAL_KEY: &str = "app_password";

/// Spellings seen in older config files. Detected only to point users at the
/// canonical key, never read as a credential.
const LEGACY_CREDENTIAL_KEYS: [&str; 2] = ["app_passsword", "token"];

const URL_KEY: &str = "url";
const VERIFY_TLS_KEY: &str = "verify_tls";
const TIMEOUT_KEY: &str = "timeout";

/// HTTP request timeout used when the config does not set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keys the loader cannot do without, in `[section] key` form
const REQUIRED_KEYS: &str = "[auth] app_password, [pihole] url";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file {} not found (required keys: {})", path.display(), REQUIRED_KEYS)]
    NotFound { path: PathBuf },

    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("config missing required sections or keys: {}{}", keys.join(", "), legacy_hint(legacy_key.as_deref()))]
    MissingKeys {
        keys: Vec<String>,
        legacy_key: Option<String>,
    },

    #[error("invalid value for [{section}] {key}: {value:?} ({reason})")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

fn legacy_hint(legacy_key: Option<&str>) -> String {
    match legacy_key {
        Some(key) => format!(" (found unsupported key `{key}` in [auth]; rename it to `{CREDENTIAL_KEY}`)"),
        None => String::new(),
    }
}

#[derive(Clone)]
pub struct Config {
    pub credential: String,
    pub base_url: String,
    pub verify_tls: bool,
    pub timeout: Duration,
}

// Keep the credential out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("credential", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_ini_str(&contents)
    }

    pub fn from_ini_str(contents: &str) -> Result<Self, ConfigError> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(contents, options)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        let get = |section: &str, key: &str| -> Option<String> {
            ini.get_from(Some(section), key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let credential = get(AUTH_SECTION, CREDENTIAL_KEY);
        let base_url = get(PIHOLE_SECTION, URL_KEY);

        let (credential, base_url) = match (credential, base_url) {
            (Some(c), Some(u)) => (c, u),
            (credential, base_url) => {
                let mut keys = Vec::new();
                let mut legacy_key = None;
                if credential.is_none() {
                    keys.push(format!("[{AUTH_SECTION}] {CREDENTIAL_KEY}"));
                    legacy_key = LEGACY_CREDENTIAL_KEYS
                        .into_iter()
                        .find(|&k| get(AUTH_SECTION, k).is_some())
                        .map(str::to_string);
                }
                if base_url.is_none() {
                    keys.push(format!("[{PIHOLE_SECTION}] {URL_KEY}"));
                }
                return Err(ConfigError::MissingKeys { keys, legacy_key });
            }
        };

        if !is_http_url(&base_url) {
            return Err(ConfigError::InvalidValue {
                section: PIHOLE_SECTION,
                key: URL_KEY,
                value: base_url,
                reason: "expected an http:// or https:// URL",
            });
        }

        let verify_tls = match get(PIHOLE_SECTION, VERIFY_TLS_KEY) {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                section: PIHOLE_SECTION,
                key: VERIFY_TLS_KEY,
                value,
                reason: "expected true or false",
            })?,
            None => true,
        };

        let timeout_secs = match get(PIHOLE_SECTION, TIMEOUT_KEY) {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        section: PIHOLE_SECTION,
                        key: TIMEOUT_KEY,
                        value,
                        reason: "expected a positive number of seconds",
                    })
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            credential,
            base_url,
            verify_tls,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Join the base URL with an API path such as `/api/auth`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "[auth]\napp_password = s3cret\n\n[pihole]\nurl = http://pi.hole/\n";

    #[test]
    fn test_from_ini_str_valid() {
        let config = Config::from_ini_str(VALID).expect("valid config");
        assert_eq!(config.credential, "s3cret");
        assert_eq!(config.base_url, "http://pi.hole/");
        assert!(config.verify_tls);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let mut config = Config::from_ini_str(VALID).unwrap();
        assert_eq!(config.endpoint("/api/auth"), "http://pi.hole/api/auth");

        config.base_url = "http://pi.hole".to_string();
        assert_eq!(config.endpoint("/api/dns/blocking"), "http://pi.hole/api/dns/blocking");
    }

    #[test]
    fn test_missing_keys_are_all_reported() {
        let err = Config::from_ini_str("[auth]\n[pihole]\n").unwrap_err();
        match &err {
            ConfigError::MissingKeys { keys, legacy_key } => {
                assert_eq!(keys, &["[auth] app_password", "[pihole] url"]);
                assert!(legacy_key.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("[auth] app_password"));
        assert!(msg.contains("[pihole] url"));
    }

    #[test]
    fn test_missing_sections() {
        let err = Config::from_ini_str("[other]\nkey = value\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKeys { ref keys, .. } if keys.len() == 2));
    }

    #[test]
    fn test_empty_values_count_as_missing() {
        let err = Config::from_ini_str("[auth]\napp_password =   \n[pihole]\nurl = http://pi.hole\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingKeys { ref keys, .. } if keys == &["[auth] app_password"]));
    }

    #[test]
    fn test_legacy_key_is_flagged_not_used() {
        for legacy in ["token", "app_passsword"] {
            let contents = format!("[auth]\n{legacy} = abc\n[pihole]\nurl = http://pi.hole\n");
            let err = Config::from_ini_str(&contents).unwrap_err();
            assert!(
                matches!(err, ConfigError::MissingKeys { ref legacy_key, .. } if legacy_key.as_deref() == Some(legacy))
            );
            assert!(err.to_string().contains("rename it to `app_password`"));
        }
    }

    #[test]
    fn test_optional_keys() {
        let contents = format!("{VALID}verify_tls = false\ntimeout = 5\n");
        let config = Config::from_ini_str(&contents).unwrap();
        assert!(!config.verify_tls);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_optional_values() {
        let err = Config::from_ini_str(&format!("{VALID}verify_tls = maybe\n")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "verify_tls", .. }));

        let err = Config::from_ini_str(&format!("{VALID}timeout = 0\n")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "timeout", .. }));

        let err = Config::from_ini_str(&format!("{VALID}timeout = soon\n")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "timeout", .. }));
    }

    #[test]
    fn test_values_are_read_literally() {
        for password in [r"ab\cd", r"x\ty", r#""quoted""#, "'single'"] {
            let contents = format!("[auth]\napp_password = {password}\n[pihole]\nurl = http://pi.hole\n");
            let config = Config::from_ini_str(&contents).unwrap();
            assert_eq!(config.credential, password);
        }
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let config = Config::from_ini_str("[Auth]\nApp_Password = pw\n[PIHOLE]\nURL = http://pi.hole\n").unwrap();
        assert_eq!(config.credential, "pw");
        assert_eq!(config.base_url, "http://pi.hole");
    }

    #[test]
    fn test_invalid_url() {
        for url in ["not a url", "pi.hole", "ftp://pi.hole", "http://"] {
            let contents = format!("[auth]\napp_password = pw\n[pihole]\nurl = {url}\n");
            let err = Config::from_ini_str(&contents).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { key: "url", .. }),
                "{url}: {err:?}"
            );
        }
        let config = Config::from_ini_str("[auth]\napp_password = pw\n[pihole]\nurl = https://192.168.1.2:8443\n").unwrap();
        assert_eq!(config.endpoint("/api/auth"), "https://192.168.1.2:8443/api/auth");
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = Config::from_ini_str(VALID).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_load_missing_file_names_required_keys() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("config.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        let msg = err.to_string();
        assert!(msg.contains("[auth] app_password"));
        assert!(msg.contains("[pihole] url"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, VALID).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.credential, "s3cret");
    }
}
