pub mod app_config;
pub mod chat;
pub mod config;
pub mod geo;
pub mod map_view;
pub mod outlet;
pub mod overlap;
pub mod sanitize;
pub mod session;

pub use app_config::AppConfig;
pub use chat::{ChatMessage, Sender, Transcript};
pub use config::{load_app_config, load_app_config_from_env, load_app_config_with_base_url};
pub use geo::{
    haversine_distance_m, is_intersecting, is_intersecting_legacy, within_radius, Coordinate,
    COVERAGE_RADIUS_M, EARTH_RADIUS_M,
};
pub use map_view::{build_map_view, MapView, MarkerView};
pub use outlet::Outlet;
pub use overlap::highlighted_flags;
pub use sanitize::{html_to_text, sanitize_html};
pub use session::{PendingQuery, Session, OUTLETS_LOAD_ERROR};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
