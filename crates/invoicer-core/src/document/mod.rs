//! Invoice document model: asset resolution, assembly and page layout.

mod assemble;
pub mod assets;
pub mod layout;
pub mod model;

pub use assemble::assemble;
pub use assets::{ImageAsset, ResolvedAssets};
pub use layout::lay_out;
pub use model::{DocumentModel, IconCell, RowKind, Section, ServiceTable};
