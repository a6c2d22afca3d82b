//! Result reporting

pub mod reporter;

pub use reporter::RunReport;
