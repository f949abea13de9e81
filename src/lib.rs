pub mod auth;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod filter;
pub mod format;
pub mod model;
pub mod output;

pub use error::{AuthError, FetchError};
pub use feed::NeoFeedClient;
pub use model::{CloseApproach, FeedResponse, Neo};
