//! Domain types and models

pub mod auth;
pub mod endpoint;
pub mod location;
pub mod page;
pub mod params;
pub mod record;
pub mod window;

pub use auth::{Credentials, Token, TokenGrant};
pub use endpoint::Endpoint;
pub use location::{ObjectLocation, SinkReceipt};
pub use page::{Page, PageLinks, ResponseBody};
pub use params::QueryParams;
pub use record::{Dataset, FlatRow, Record};
pub use window::{format_bound, QueryWindow, WindowPolicy};
