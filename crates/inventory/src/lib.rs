//! `quayside-inventory` — stock levels and all-or-nothing reservation.

pub mod item;
pub mod repository;
pub mod service;

pub use item::{InventoryItem, ReservationLine, ReservationOutcome, Shortage};
pub use repository::InventoryRepository;
pub use service::ReservationService;
