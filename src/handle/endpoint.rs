use crate::config::HandleConfig;

/// `{api_base_url}/{prefix}/{handle_name}`
pub fn handle_endpoint(config: &HandleConfig) -> String {
    format!(
        "{}/{}/{}",
        config.api_base_url.trim_end_matches('/'),
        config.resolved_prefix(),
        config.handle_name
    )
}

/// Endpoint for PUT, with `?overwrite=` when overwrite is set
pub fn set_handle_url(config: &HandleConfig) -> String {
    let endpoint = handle_endpoint(config);

    if config.overwrite.is_empty() {
        endpoint
    } else {
        format!("{}?overwrite={}", endpoint, config.overwrite)
    }
}
