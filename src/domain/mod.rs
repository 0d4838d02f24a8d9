//! Domain logic - pure release rules independent of git operations

pub mod checkout;
pub mod descriptor;
pub mod tag;
pub mod version;

pub use checkout::CheckoutState;
pub use descriptor::VersionDescriptor;
pub use tag::Tag;
pub use version::{Version, VersionBump};
