mod handler;

pub use handler::{add_claps, count_claps};
