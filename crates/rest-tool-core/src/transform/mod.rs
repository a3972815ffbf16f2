pub mod endpoint;
pub mod enumerate;
pub mod responses;
pub mod servers;
pub mod uri;

pub use enumerate::{EndpointPartition, enumerate_endpoints, partition_by_staticness};
pub use servers::resolve_servers;
pub use uri::to_colon_style;
