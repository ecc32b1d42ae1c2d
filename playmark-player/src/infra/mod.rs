pub mod api_client;
pub mod testing;

pub use api_client::{ApiClient, ClientError};
