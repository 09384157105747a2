pub mod analysis_service;
pub mod catalog_service;
pub mod ledger_service;
pub mod simulator_service;
pub mod view_service;
