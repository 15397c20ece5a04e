pub mod availability;
pub mod client;
pub mod envelope;
pub mod models;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use availability::{Availability, AvailabilityCache};
pub use client::AnimeClient;
pub use envelope::Envelope;
