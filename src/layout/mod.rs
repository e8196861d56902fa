pub mod radial;

pub use radial::{RadialConfig, RadialLayout, RadialNode, label_is_flipped, polar_to_cartesian, radial_layout};
