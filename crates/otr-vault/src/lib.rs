mod container;
mod secrets;

pub use container::secure_container::{SecureAccess, SecureContainer};
pub use secrets::{
    dynamic_secret::DynamicSecret, fixed_secret::FixedSecret, secure_ref::SecureRef,
};
