pub mod branch;
pub mod commit;
pub mod files;
pub mod remote;
pub mod status;
pub mod tag;

pub use branch::*;
pub use commit::*;
pub use files::*;
pub use remote::*;
pub use status::*;
pub use tag::*;
