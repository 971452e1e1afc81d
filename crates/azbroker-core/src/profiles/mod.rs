//! API profiles
//!
//! A profile pins the API version each resource family's client speaks.
//! Connections resolve their configured profile name through a
//! `ProfileRegistry`; the process-wide one is seeded with the built-in
//! profiles and accepts new ones via `register_api_profile`.

mod error;
mod family;
mod registry;

pub use error::{ProfileError, ProfileResult};
pub use family::ResourceFamily;
pub use registry::{
    global_profile_registry, register_api_profile, ApiProfile, ClientConfig, ClientFactory, ProfileRegistry,
    RegisteredProfile,
};
