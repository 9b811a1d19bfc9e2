// Domain layer: value types and the ports (interfaces) to external collaborators.

pub mod model;
pub mod ports;
