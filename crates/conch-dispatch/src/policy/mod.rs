//! Policies: definitions, their XML codec, and the owned policy set.

mod definition;
mod set;
mod xml;

pub use definition::Policy;
pub use set::PolicySet;
pub use xml::parse_policies;
