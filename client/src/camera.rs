use serde::Deserialize;
use strum_macros::{Display, EnumString};

use crate::error::CameraError;

/// Which physical camera supplies frames. Displays as the browser
/// `facingMode` constraint value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Facing {
    #[default]
    #[strum(to_string = "user", serialize = "front")]
    Front,
    #[strum(to_string = "environment", serialize = "back")]
    Back,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }
}

/// Access to camera hardware.
///
/// A handle returned by `activate` stays valid until it is passed back to
/// `deactivate`. Still images come back as `data:<mediaType>;base64,<data>`
/// strings, or `None` when no frame is ready.
pub trait CameraCapability {
    type Handle;

    fn activate(&mut self, facing: Facing) -> Result<Self::Handle, CameraError>;

    fn deactivate(&mut self, handle: Self::Handle);

    fn capture_still_image(&mut self, handle: &Self::Handle) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_parses_and_displays() {
        assert_eq!("back".parse::<Facing>().unwrap(), Facing::Back);
        assert_eq!("FRONT".parse::<Facing>().unwrap(), Facing::Front);
        assert_eq!(Facing::Front.to_string(), "user");
        assert_eq!(Facing::Back.to_string(), "environment");
        assert_eq!(Facing::Front.flipped(), Facing::Back);
        assert!("sideways".parse::<Facing>().is_err());
    }
}
