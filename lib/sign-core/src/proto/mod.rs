pub mod dss;
pub mod mapper;
pub mod version;
