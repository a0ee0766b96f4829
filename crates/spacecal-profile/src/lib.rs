pub mod codec;
pub mod migrate;
pub mod profile;
pub mod store;

pub use codec::*;
pub use migrate::*;
pub use profile::*;
pub use store::*;
