//! Azure CLI and Resource Graph discovery.
//!
//! - [`cli`] - running the `az` command
//! - [`cache`] - dated JSON cache of discovery data
//! - [`graph`] - VNet/subnet query and conversion to allocations

mod cache;
mod cli;
mod graph;

// Re-export public types and functions
pub use cache::{default_cache_file, read_inventory_cache};
pub use cli::run_az;
pub use graph::{
    run_az_cli_graph, Data, SubnetRecord, LABEL_RESOURCE_GROUP, LABEL_SUBSCRIPTION, LABEL_VNET,
};
