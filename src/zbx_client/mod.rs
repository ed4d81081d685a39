pub(crate) mod client;
pub(crate) mod models;
pub(crate) mod ops;
pub(crate) mod query;
pub(crate) mod rpc;

pub use client::ZbxClient;
pub use models::{Application, Item, Items, WireApplication, convert_all};
pub use ops::get_applications;
pub use query::{ApplicationQuery, GetParameters};
pub use rpc::ZbxRpc;
