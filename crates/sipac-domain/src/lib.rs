// sipac-domain library entry point
pub mod answer;
pub mod asset;
pub mod catalog;
pub mod error;
pub use answer::{AnswerSet, AnswerValue};
pub use asset::AssetRecord;
pub use catalog::{Catalogs, CiCatalog, GiaCatalog};
pub use error::DomainError;
