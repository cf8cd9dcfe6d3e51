pub mod load;
pub mod types;

pub use types::{
    CATALOG_PATH, CONTENT_SCHEME_PREFIX, Config, DIRECTORY_AUTHORITY, DISPLAY_NAME_COLUMN,
    ProbeSettings, catalog_uri,
};
