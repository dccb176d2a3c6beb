//! Domain types for the SkySurety oracle network

pub mod events;
pub mod flight;
pub mod oracle;
pub mod status;
