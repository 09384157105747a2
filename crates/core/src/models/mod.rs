pub mod analysis;
pub mod instrument;
pub mod ledger;
pub mod settings;
pub mod snapshot;
pub mod view;
