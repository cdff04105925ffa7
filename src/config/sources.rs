//! Configuration file sources under the config root.

pub mod daemon_file;
pub mod shared_file;
