pub use result::{ScanErr, ScanErrKind, ScanResult, ScanTokensResult};
pub use scanner::{scan_text, Scanner};
pub use token::{Token, TokenWithLocation};

mod keywords;
mod result;
#[allow(clippy::module_inception)]
mod scanner;
mod token;
