pub mod tailor_flow;

pub use tailor_flow::{needs_refine, TailorFlow};
