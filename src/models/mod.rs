//! Value types shared between the ERP Read Gateway, the Local Projection
//! Store, and the allocation engine. None of these carry ORM behavior —
//! the gateway boundary returns plain, normalized records so
//! that no downstream code indexes data by string keys.

mod bom;
mod open_job;
mod projection;
mod result;
mod sales_order;

pub use bom::BomLine;
pub use open_job::OpenJob;
pub use projection::{RiskType, UserProjection};
pub use result::{Allocation, ComponentDetail, SoResult, SoStatus};
pub use sales_order::SalesOrderLine;
