//! Clients for services outside this process.
pub mod google_maps;
pub mod offline;
