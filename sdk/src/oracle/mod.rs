pub mod oracle_map;

pub use oracle_map::{OracleDecoder, OracleMap};
