mod order;
mod resolve;
mod types;

pub use resolve::DependencyResolver;
pub use types::Resolution;
