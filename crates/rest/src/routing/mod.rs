//! Route tables: scoring inputs against templates and selecting a target.
//!
//! ```
//! use micro_rest::routing::{RouteTable, RoutingMode};
//!
//! let table = RouteTable::builder()
//!     .mode(RoutingMode::Best)
//!     .route("/invoices", "list")
//!     .route("/invoices/{id}", "show")
//!     .build()
//!     .unwrap();
//!
//! let selected = table.dispatch("/invoices/42").unwrap();
//! assert_eq!(*selected.target(), "show");
//! assert_eq!(selected.get("id"), Some("42"));
//! ```

mod config;
mod error;
mod route;
mod route_table;

pub use config::RouterConfig;
pub use config::RoutingMode;
pub use error::RouteError;
pub use route::Route;
pub use route::RouteId;
pub use route_table::RouteMatch;
pub use route_table::RouteTable;
pub use route_table::RouteTableBuilder;
