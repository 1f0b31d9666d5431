//! Persistence module split across logical submodules.

mod connection;
mod records;

pub use connection::{ensure_schema, open_store, seed_sample_records};
pub use records::{
    delete_record, fetch_all_records, insert_record, search_records, update_status, StoreError,
};
