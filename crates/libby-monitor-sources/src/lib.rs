pub mod error;
pub mod overdrive;
pub mod traits;

pub use error::SourceError;
pub use overdrive::ThunderClient;
pub use traits::CatalogueSource;
