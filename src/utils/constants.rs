//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_USER_AGENT: &str = concat!("dashboard-composer/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 1000;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Mean earth radius used for distances between coordinates.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Service identifier substituted into `Services.ServiceTemplateUrl`.
pub const OBS_STAMM_SERVICE_ID: &str = "obsstamm";

pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";
