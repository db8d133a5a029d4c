pub mod error;
pub mod whois;

#[cfg(test)]
pub(crate) mod testing;

pub use error::QueryError;
pub use whois::{ Connector, TcpConnector, WhoisClient, extract_redirect };
