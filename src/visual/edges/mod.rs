pub mod connector;

pub use connector::{Connector, spawn_connector, update_connectors};
