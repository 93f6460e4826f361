pub mod reduce;
pub use reduce::{dot, rayleigh_quotient};
