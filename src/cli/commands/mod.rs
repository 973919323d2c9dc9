pub mod process;
pub mod report;

pub use process::execute_process;
pub use report::{ImageReport, ProcessReport, SystemInfo};
