pub mod hunter;
pub mod lead_service;
