//! Server configuration, layered with the `config` crate over a `.env`
//! file loaded with `dotenvy` — the same pairing the teacher's CLI crate
//! uses, applied here to the HTTP server instead (§10.4).

use serde::Deserialize;

/// Bind address, default CORS origin and request-body size cap. Every
/// field has a hardcoded default so the server runs with zero
/// configuration in development; `CDL_API__*` environment variables
/// (double-underscore nesting, `config`'s `Environment` convention)
/// override them.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_max_body_bytes() -> usize {
    1 << 20 // 1 MiB: comfortably above the 5000-char CDL input cap.
}

impl Config {
    /// Load `.env` (if present) then layer `CDL_API__*` environment
    /// variables over the defaults.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        config::Config::builder()
            .set_default("host", default_host())
            .unwrap()
            .set_default("port", default_port() as i64)
            .unwrap()
            .set_default("cors_origin", default_cors_origin())
            .unwrap()
            .set_default("max_body_bytes", default_max_body_bytes() as i64)
            .unwrap()
            .add_source(config::Environment::with_prefix("CDL_API").separator("__"))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap_or_else(|_| Config {
                host: default_host(),
                port: default_port(),
                cors_origin: default_cors_origin(),
                max_body_bytes: default_max_body_bytes(),
            })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_with_zero_configuration() {
        let cfg = Config::default();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert!(cfg.max_body_bytes > 5000);
    }
}
