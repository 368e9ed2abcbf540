//! Model provider backed by [`RemoteClient`](crate::RemoteClient).

mod chat;

pub use chat::RemoteProvider;
