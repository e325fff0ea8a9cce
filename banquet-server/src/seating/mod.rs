pub mod geometry;
pub mod occupancy;

pub use occupancy::{check_capacity, party_size, table_occupancy, CapacityCheck};
