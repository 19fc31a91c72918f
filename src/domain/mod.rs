// Domain layer: core models and ports.

pub mod model;
pub mod ports;
