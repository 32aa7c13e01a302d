use anyhow::{bail, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Runtime
    pub environment: String,
    pub port: u16,

    // Content
    pub content_dir: String,

    // Reference resolution (absent = resolve against local content)
    pub resolver_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let resolver_url = match std::env::var("RESOLVER_URL") {
            Ok(url) if url.is_empty() => None,
            Ok(url) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    bail!("RESOLVER_URL must start with http:// or https://");
                }
                Some(url)
            }
            Err(_) => None,
        };

        Ok(Self {
            // Runtime
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            // Content
            content_dir: std::env::var("CONTENT_DIR").unwrap_or_else(|_| "content".to_string()),

            // Reference resolution
            resolver_url,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
