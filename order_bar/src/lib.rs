//! # Order bar
//! Shows how many orders a Shopify store has received today on a touch bar widget. It is responsible for:
//! * Finding the shop's favicon once at startup and saving it locally, so the widget can show it.
//! * Counting the orders created since local midnight, through the Shopify Admin API.
//! * Sending `Orders today: {count}` and the icon path to the widget host.
//! * Repeating the count and update on a fixed interval, one update at a time.
//!
//! ## Configuration
//! The binary is configured with command line flags, each of which can also be set with an environment variable or
//! in a `.env` file. See [cli](cli/index.html) for the full list.

pub mod cli;
pub mod config;
pub mod errors;
pub mod favicon;
pub mod metrics;
pub mod notifier;
pub mod runner;
pub mod scheduler;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(test)]
mod mocks;
