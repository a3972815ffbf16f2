pub mod mock;
pub mod model;
pub mod registry;
pub mod test_cases;

pub use mock::MockBody;
pub use model::{
    Header, MethodDescriptor, RequestDescriptor, ServiceDescriptor, ServiceResponse, ServiceStyle,
    TestCase, TestMessage,
};
pub use registry::{DEFAULT_SERVICES_ROOT, ServiceRegistry};
pub use test_cases::TestCaseEntry;
