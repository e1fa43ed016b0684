pub use driver::Driver;
pub use result::{DriverErr, DriverErrKind, DriverResult, Summary};

pub mod driver;
pub mod result;
