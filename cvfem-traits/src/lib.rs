use nalgebra::RealField;

pub use nalgebra;

pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}

pub mod collaborators;
pub mod fields;
pub mod topology;

pub use collaborators::*;
pub use fields::*;
pub use topology::*;
