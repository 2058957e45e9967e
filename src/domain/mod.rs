// Domain layer: models, the static table schema, and the ports implemented by adapters.

pub mod model;
pub mod ports;
pub mod schema;
