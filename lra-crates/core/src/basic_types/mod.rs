mod arith_error;
mod trail;

pub use arith_error::ArithError;
pub(crate) use trail::Trail;
