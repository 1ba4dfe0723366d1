use std::fmt;

use anyhow::{bail, Result};

use crate::database::get_database_url;

/// App credentials from the Partner dashboard
#[derive(Clone)]
pub struct ShopifyCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for ShopifyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopifyCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub database_path: String,
    pub shopify: ShopifyCredentials,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.database_path.trim().is_empty() {
            bail!("database path must not be empty");
        }
        if self.shopify.api_key.trim().is_empty() {
            bail!("Shopify API key is required (--api-key or SHOPIFY_API_KEY)");
        }
        if self.shopify.api_secret.trim().is_empty() {
            bail!("Shopify API secret is required (--api-secret or SHOPIFY_API_SECRET)");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn database_url(&self) -> String {
        get_database_url(Some(&self.database_path))
    }
}
