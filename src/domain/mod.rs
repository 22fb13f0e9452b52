// Domain layer: models and ports. No HTTP or filesystem code lives here.

pub mod health;
pub mod market;
pub mod model;
pub mod ports;
pub mod sports;
