//! Data structures describing the components of an energy system model.
//!
//! - **Handles** ([`ids`]) - Opaque keys for commodities, spaces, periods, and operations
//! - **Commodities** ([`commodity`]) - Tradable resources balanced by conversions
//! - **Spaces** ([`space`]) - Locations (nodes) and linkages (edges)
//! - **Periods** ([`periods`]) - Discretizations of the time horizon
//! - **System** ([`system`]) - The registry owning all of the above

pub mod commodity;
pub mod ids;
pub mod periods;
pub mod space;
pub mod system;
