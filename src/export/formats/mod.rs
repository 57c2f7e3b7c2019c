pub mod haplogroup;
pub mod hsd;
pub mod report;
