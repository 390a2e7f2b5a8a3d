//! Correction models: atmosphere and satellite hardware biases.
pub(crate) mod iono;
pub use iono::{IonosphereModel, KbModel};

pub(crate) mod tropo;
pub use tropo::TroposphereModel;

pub(crate) mod spaceborn;
pub use spaceborn::GroupDelay;
