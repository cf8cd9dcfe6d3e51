//! 目錄服務存取
//!
//! `DirectoryService` 抽象外部的查詢能力，`DirectoryClient` 負責目錄查詢階段。

mod client;
mod http_directory;
mod row_set;
mod service;
mod static_directory;

pub use client::DirectoryClient;
pub(crate) use client::run_guarded;
pub use http_directory::HttpDirectory;
pub use row_set::{Row, RowSet, RowSetBody};
pub use service::{DirectoryService, MIME_TYPE_COLUMN, ProviderProbe};
pub use static_directory::StaticDirectory;
