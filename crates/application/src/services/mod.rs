mod post_service;
mod seed_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use post_service::{NotifyPolicy, PostService, PostServiceDependencies};
pub use seed_service::{DemoSeeder, DemoSeederDependencies, SeedOutcome, DEMO_PASSWORD};
pub use user_service::{UserService, UserServiceDependencies};
