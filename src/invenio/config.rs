use super::InvenioError;
use log::debug;

static DEFAULT_HOST: &str = "127.0.0.1:5000";

// Connection settings, read from the environment or a .env file.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub token: String,
    pub host: String,
    // Local development instances use self-signed certificates.
    pub verify: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, InvenioError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars<F>(var: F) -> Result<Self, InvenioError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = var("INVENIO_TOKEN")
            .or_else(|| var("TOKEN"))
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                InvenioError::ConfigError(
                    "Provide a personal access token in the TOKEN or INVENIO_TOKEN env var"
                        .to_string(),
                )
            })?;
        let host = var("HOST")
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let verify = var("HTTPS_VERIFY").map_or(false, |v| v.eq_ignore_ascii_case("true"));
        Ok(Config {
            token,
            host,
            verify,
        })
    }

    // HOST may include a scheme, otherwise HTTPS is assumed.
    pub fn base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.host.trim_end_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvenioErrorDiscriminants;
    use maplit::hashmap;
    use std::collections::HashMap;

    fn config(vars: HashMap<&str, &str>) -> Result<Config, InvenioError> {
        Config::from_vars(|name| vars.get(name).map(|value| value.to_string()))
    }

    #[test]
    fn defaults() {
        let config = config(hashmap! {"TOKEN" => "secret"}).unwrap();
        assert_eq!(config.token, "secret");
        assert_eq!(config.host, "127.0.0.1:5000");
        assert!(!config.verify);
        assert_eq!(config.base_url(), "https://127.0.0.1:5000");
    }

    #[test]
    fn invenio_token_takes_precedence() {
        let config = config(hashmap! {
            "INVENIO_TOKEN" => "first",
            "TOKEN" => "second",
            "HOST" => "http://localhost:5000/",
            "HTTPS_VERIFY" => "True",
        })
        .unwrap();
        assert_eq!(config.token, "first");
        assert!(config.verify);
        assert_eq!(config.base_url(), "http://localhost:5000");
    }

    #[test]
    fn missing_token() {
        let err: InvenioErrorDiscriminants = config(hashmap! {"HOST" => "example.com"})
            .unwrap_err()
            .into();
        assert_eq!(err, InvenioErrorDiscriminants::ConfigError);
    }
}
