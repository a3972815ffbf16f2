pub mod endpoints;
pub mod servers;

pub use endpoints::*;
pub use servers::ServerDescriptor;
