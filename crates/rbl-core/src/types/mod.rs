mod dnsbl;
mod range;
mod result;

pub use dnsbl::*;
pub use range::*;
pub use result::*;
