//! Smallest single IPv4 CIDR block enclosing a set of networks.
//!
//! ```
//! use cidr_aggregator::{aggregate_cidrs, Ipv4Cidr};
//!
//! let cidrs: Vec<Ipv4Cidr> = ["192.168.0.0/24", "192.168.3.0/24"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! assert_eq!("192.168.0.0/22", aggregate_cidrs(&cidrs).unwrap().to_string());
//! ```

pub mod aggregate;
pub mod error;
pub mod input;
pub mod ipv4;

pub use aggregate::{aggregate, aggregate_cidrs, find_smallest_cidr, AddressRange};
pub use error::{Error, FormatError, Result};
pub use input::{parse_cidr_lines, read_cidr_file};
pub use ipv4::{subnet_mask, Ipv4Cidr};
