//! Value objects - immutable types that represent domain concepts

mod capabilities;
mod filter;
mod page;
mod role;

pub use capabilities::Capabilities;
pub use filter::{
    FieldKind, FilterExpr, FilterField, FilterOp, FilterValue, MEAL_FILTER_FIELDS,
    USER_FILTER_FIELDS,
};
pub use page::{Page, PageRequest};
pub use role::Role;
