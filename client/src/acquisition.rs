use std::sync::Arc;

use log::{debug, warn};

use crate::camera::{CameraCapability, Facing};
use crate::error::AcquisitionError;
use crate::payload::{Payload, PreviewHandle, decode_data_uri};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    #[default]
    FileUpload,
    Camera,
}

/// Snapshot of the image source. Only [`AcquisitionController`] mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcquisitionState {
    source_mode: SourceMode,
    camera_active: bool,
    facing: Facing,
    preview: Option<PreviewHandle>,
    payload: Option<Payload>,
}

impl AcquisitionState {
    pub fn source_mode(&self) -> SourceMode {
        self.source_mode
    }

    pub fn camera_active(&self) -> bool {
        self.camera_active
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    fn set_payload(&mut self, payload: Payload) {
        self.preview = Some(payload.preview());
        self.payload = Some(payload);
    }
}

/// Owns the image source choice and the camera handle.
///
/// Every path that turns the camera off hands the handle back to the
/// capability, including dropping the controller.
pub struct AcquisitionController<C: CameraCapability> {
    camera: C,
    handle: Option<C::Handle>,
    state: AcquisitionState,
}

impl<C: CameraCapability> AcquisitionController<C> {
    pub fn new(camera: C) -> Self {
        Self::with_facing(camera, Facing::default())
    }

    pub fn with_facing(camera: C, facing: Facing) -> Self {
        Self {
            camera,
            handle: None,
            state: AcquisitionState {
                facing,
                ..AcquisitionState::default()
            },
        }
    }

    pub fn state(&self) -> &AcquisitionState {
        &self.state
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.state.payload()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.state.preview()
    }

    pub fn select_file(&mut self, bytes: impl Into<Arc<[u8]>>, media_type: impl Into<String>) {
        self.select_payload(Payload::new(bytes, media_type));
    }

    /// Like [`select_file`](Self::select_file) for a payload that already
    /// carries its original file name.
    pub fn select_payload(&mut self, payload: Payload) {
        if self.state.camera_active {
            debug!("file selected while camera is on, releasing camera");
            self.release_camera();
        }

        debug!(
            "selected file {} ({}, {} bytes)",
            payload.file_name(),
            payload.media_type(),
            payload.len()
        );
        self.state.source_mode = SourceMode::FileUpload;
        self.state.set_payload(payload);
    }

    /// Turns the camera on or off and returns whether it is now active.
    pub fn toggle_camera(&mut self) -> Result<bool, AcquisitionError> {
        if self.state.camera_active {
            self.release_camera();
            return Ok(false);
        }

        self.open_camera()?;
        self.state.source_mode = SourceMode::Camera;
        Ok(true)
    }

    /// Flips between front and back camera. While the camera is on, the feed
    /// is reopened with the new facing so the next frame comes from it.
    pub fn switch_facing(&mut self) -> Result<Facing, AcquisitionError> {
        self.state.facing = self.state.facing.flipped();
        debug!("camera facing set to {:?}", self.state.facing);

        if self.state.camera_active {
            self.release_camera();
            self.open_camera()?;
        }

        Ok(self.state.facing)
    }

    pub fn capture_frame(&mut self) -> Result<&Payload, AcquisitionError> {
        let handle = self
            .handle
            .as_ref()
            .ok_or(AcquisitionError::CaptureUnavailable)?;

        let encoded = self.camera.capture_still_image(handle).ok_or_else(|| {
            warn!("camera returned no frame");
            AcquisitionError::CaptureUnavailable
        })?;

        // A bad frame leaves the previous payload in place.
        let payload = decode_data_uri(&encoded).inspect_err(|e| {
            warn!("captured frame could not be decoded: {:?}", e);
        })?;

        debug!(
            "captured {} frame ({} bytes)",
            payload.media_type(),
            payload.len()
        );
        self.state.preview = Some(payload.preview());
        Ok(&*self.state.payload.insert(payload))
    }

    /// Turns the camera off after the platform refused a stream that
    /// `activate` had already accepted, e.g. a permission prompt answered
    /// later. The previous payload is kept.
    pub fn camera_failed(&mut self, reason: impl Into<String>) -> AcquisitionError {
        let reason = reason.into();
        warn!("camera failed after activation: {}", reason);
        self.release_camera();
        AcquisitionError::ActivationFailed(reason)
    }

    fn open_camera(&mut self) -> Result<(), AcquisitionError> {
        let facing = self.state.facing;
        let handle = self.camera.activate(facing).map_err(|e| {
            warn!("camera activation failed: {}", e);
            AcquisitionError::ActivationFailed(e.to_string())
        })?;

        debug!("camera activated ({:?})", facing);
        self.handle = Some(handle);
        self.state.camera_active = true;
        Ok(())
    }

    fn release_camera(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.camera.deactivate(handle);
            debug!("camera released");
        }
        self.state.camera_active = false;
    }
}

impl<C: CameraCapability> Drop for AcquisitionController<C> {
    fn drop(&mut self) {
        self.release_camera();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CameraError;

    /// Host without a camera; activation always fails.
    struct NoCamera;

    impl CameraCapability for NoCamera {
        type Handle = ();

        fn activate(&mut self, _facing: Facing) -> Result<(), CameraError> {
            Err(CameraError::NotSupported)
        }

        fn deactivate(&mut self, _handle: ()) {}

        fn capture_still_image(&mut self, _handle: &()) -> Option<String> {
            None
        }
    }

    #[test]
    fn select_file_sets_payload_and_preview() {
        let mut controller = AcquisitionController::new(NoCamera);
        assert!(controller.payload().is_none());

        controller.select_file(b"png-bytes".to_vec(), "image/png");

        let payload = controller.payload().unwrap();
        assert_eq!(payload.media_type(), "image/png");
        assert_eq!(payload.bytes(), b"png-bytes");
        assert!(controller.preview().unwrap().shows(payload));
        assert_eq!(controller.state().source_mode(), SourceMode::FileUpload);
    }

    #[test]
    fn activation_failure_keeps_camera_off() {
        let mut controller = AcquisitionController::new(NoCamera);

        let err = controller.toggle_camera().unwrap_err();
        assert!(matches!(err, AcquisitionError::ActivationFailed(_)));
        assert!(!controller.state().camera_active());
        assert_eq!(controller.state().source_mode(), SourceMode::FileUpload);
    }

    #[test]
    fn capture_without_camera_is_unavailable() {
        let mut controller = AcquisitionController::new(NoCamera);
        controller.select_file(vec![9u8], "image/gif");

        assert_eq!(
            controller.capture_frame().unwrap_err(),
            AcquisitionError::CaptureUnavailable
        );
        assert_eq!(controller.payload().unwrap().bytes(), &[9u8]);
    }

    #[test]
    fn switch_facing_while_off_is_remembered() {
        let mut controller = AcquisitionController::with_facing(NoCamera, Facing::Back);
        assert_eq!(controller.switch_facing().unwrap(), Facing::Front);
        assert_eq!(controller.state().facing(), Facing::Front);
    }
}
