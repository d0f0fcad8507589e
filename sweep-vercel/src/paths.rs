use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.vercel.com";
pub const LIST_DEPLOYMENTS: &str = "/v6/deployments";
pub const DELETE_DEPLOYMENT: &str = "/v13/deployments";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const USER_AGENT: &str = concat!("vercel-sweep/", env!("CARGO_PKG_VERSION"));

pub fn list_url(base: &str) -> String {
    format!("{}{LIST_DEPLOYMENTS}", base.trim_end_matches('/'))
}

pub fn delete_url(base: &str, id: &str) -> String {
    format!("{}{DELETE_DEPLOYMENT}/{id}", base.trim_end_matches('/'))
}
