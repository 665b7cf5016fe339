pub mod period;
pub mod run;
