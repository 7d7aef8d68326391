//! crumbs - browse captured browser sessions
//!
//! Parses captured cookie strings and local storage snapshots, groups the
//! captures by profile and exports cookies in the JSON shape browser
//! cookie-editor extensions import.

pub mod cli;
pub mod config;
pub mod error;
pub mod exit_code;
pub mod export;
pub mod http;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod profile;
pub mod record;
pub mod utils;

pub use error::{CrumbsError, Result};
pub use export::{to_clipboard_text, to_import_cookies, ClipboardPayload, ExportCookie, SameSite};
pub use normalize::{normalize_cookie_field, normalize_local_data};
pub use profile::{group_by_profile, Profile};
pub use record::{CookieMap, LocalDataMap, NormalizedRecord, RawRecord};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
