// Domain layer: airfoil data model and ports (interfaces) the pipeline is built on.

pub mod model;
pub mod ports;
