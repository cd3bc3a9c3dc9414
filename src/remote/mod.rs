pub mod listing;
pub mod smb;

pub use listing::Layout;
pub use smb::{Credentials, SmbRemote};
