pub mod account;
pub mod repository;

pub use account::{AccountSnapshot, Avatar};
pub use repository::{PageMarkers, RepositoryPage};
