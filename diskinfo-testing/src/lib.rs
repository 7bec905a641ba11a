pub mod errors;
pub mod fake;
pub mod fixtures;
pub mod ledger;
pub mod spec;

pub use fake::FakeArbitration;
pub use fixtures::FakeDevice;
pub use ledger::PlatformCall;
