mod audit;
mod serve;

pub use audit::{run_audit, run_audit_html};
pub use serve::run_serve;
