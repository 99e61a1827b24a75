//! Application layer.
//!
//! Use-case services over the domain model: registration and login, the post
//! ledger and the like toggle. Storage, hashing and realtime fan-out are
//! reached through the traits declared here and implemented by adapters.

pub mod broadcaster;
pub mod clock;
pub mod dto;
pub mod error;
pub mod memory;
pub mod password;
pub mod repository;
pub mod services;

pub use broadcaster::{BroadcastError, LikeEvent, LikeEventBroadcaster};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ApplicationError, ApplicationResult};
pub use memory::InMemoryStore;
pub use password::{PasswordHasher, PasswordHasherError};
pub use repository::{LikeRepository, PostRepository, UserRepository};
pub use services::{
    DemoSeeder, DemoSeederDependencies, NotifyPolicy, PostService, PostServiceDependencies,
    SeedOutcome, UserService, UserServiceDependencies, DEMO_PASSWORD,
};
