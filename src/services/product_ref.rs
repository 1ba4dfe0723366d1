//! Product id canonicalization.
//!
//! Storefront scripts usually know the numeric product id (`"8123456789"`)
//! while the admin product picker hands back global ids
//! (`"gid://shopify/Product/8123456789"`). Both forms are stored and looked up
//! as the global id.

use std::collections::HashSet;

use crate::errors::{CoreError, CoreResult};

pub const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";

const GID_SCHEME: &str = "gid://";

/// Canonicalize a single product id into its global id form.
pub fn normalize_product_id(raw: &str) -> CoreResult<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(CoreError::invalid_field(
            "productId",
            "Product ID cannot be empty",
        ));
    }

    if trimmed.starts_with(GID_SCHEME) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{}{}", PRODUCT_GID_PREFIX, trimmed))
    }
}

/// Canonicalize a list of product ids, dropping duplicates but keeping the
/// first-seen order.
pub fn normalize_product_ids<S: AsRef<str>>(raw: &[S]) -> CoreResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(raw.len());

    for id in raw {
        let gid = normalize_product_id(id.as_ref())?;
        if seen.insert(gid.clone()) {
            ids.push(gid);
        }
    }

    Ok(ids)
}
