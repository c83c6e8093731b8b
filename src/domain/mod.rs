// Domain layer: view models and ports. Adapters and controllers depend on this, never the reverse.

pub mod endpoints;
pub mod model;
pub mod ports;
