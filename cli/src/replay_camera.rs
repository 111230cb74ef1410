use client::{CameraCapability, CameraError, Facing};
use log::debug;

/// Camera that hands out one pre-recorded data-uri frame, e.g. a screenshot
/// saved from a browser session.
pub struct ReplayCamera {
    frame: Option<String>,
}

impl ReplayCamera {
    pub fn new(frame: Option<String>) -> Self {
        Self {
            frame: frame.map(|f| f.trim().to_string()),
        }
    }
}

impl CameraCapability for ReplayCamera {
    type Handle = Facing;

    fn activate(&mut self, facing: Facing) -> Result<Facing, CameraError> {
        if self.frame.is_none() {
            return Err(CameraError::NotSupported);
        }
        debug!("replay camera opened ({})", facing);
        Ok(facing)
    }

    fn deactivate(&mut self, facing: Facing) {
        debug!("replay camera closed ({})", facing);
    }

    fn capture_still_image(&mut self, _facing: &Facing) -> Option<String> {
        self.frame.clone()
    }
}
