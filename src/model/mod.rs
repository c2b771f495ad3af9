// src/model/mod.rs
//! Domain model of the Hoppy Hour backend, in its camelCase wire format.

mod business;
mod photo;

pub use business::{format_deal_time, format_deals, Business, DealInfo};
pub use photo::{CdnUrls, CdnVariant, Photo};
