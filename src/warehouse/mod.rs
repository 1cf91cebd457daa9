mod models;
mod schema;
mod store;
mod trait_def;

pub use models::*;
pub use schema::WAREHOUSE_VERSIONED_SCHEMAS;
pub use store::{LoadSession, SqliteWarehouse};
pub use trait_def::WarehouseWriter;
