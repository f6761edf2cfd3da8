mod business;
mod payment;
mod stats;
mod user;

pub use business::*;
pub use payment::*;
pub use stats::*;
pub use user::*;
