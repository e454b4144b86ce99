// Site actions module for page-specific commands on known domains

mod registry;
mod types;

pub use registry::{default_site_configs, SiteActionRegistry};
pub use types::{SiteAction, SiteActionConfig, SiteMatch};
