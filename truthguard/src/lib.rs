// Library interface for truthguard modules
// This allows tests and the binary to import modules

pub mod analysis;
pub mod client;
pub mod domains;
pub mod report;
pub mod server;
