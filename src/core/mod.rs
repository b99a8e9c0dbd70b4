//! Mapping engine

pub mod aggregator;
pub mod dates;
pub mod filter;
pub mod hotel_key;
pub mod mapper;
pub mod projector;

pub use hotel_key::{extract_hotel_key, HotelSelector};
pub use mapper::{BudgetMapper, MappingOutcome};
pub use projector::{project, Projection};
