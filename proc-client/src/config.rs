use figment::providers::{Env, Format, Toml};
pub use figment::Figment;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
}

pub fn load_base_config() -> Figment {
    let mut figment = Figment::new().merge(Toml::file(".procrc.toml"));
    if let Some(home_dir) = home::home_dir() {
        figment = figment.merge(Toml::file(home_dir.join(".procrc.toml")));
    }
    figment.merge(Env::prefixed("PROC_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_is_optional() {
        let config: Config = Figment::new().extract().unwrap();
        assert_eq!(config.api_url, None);
    }

    #[test]
    fn api_url_reads_from_toml() {
        let figment = Figment::new().merge(figment::providers::Toml::string(
            "api_url = \"http://localhost:4242\"",
        ));
        let config: Config = figment.extract().unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:4242"));
    }
}
