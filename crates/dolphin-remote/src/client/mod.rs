//! Chat completions client.

mod credentials;
mod remote_client;
mod remote_config;
mod wire;

pub use self::credentials::RemoteCredentials;
pub use self::remote_client::RemoteClient;
pub use self::remote_config::{RemoteBuilder, RemoteBuilderError, RemoteConfig};
