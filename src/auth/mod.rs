pub mod access;
pub mod extractors;
pub mod jwt;

pub use access::Access;
pub use extractors::{AuthUser, IsAdmin};
pub use jwt::{Claims, Tokenizer, UserRole};
