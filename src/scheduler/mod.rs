pub mod delay;

pub use delay::plan_day;
