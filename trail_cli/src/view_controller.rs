use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::sleep};

use trail_lib::errors::TrailError as Error;
use trail_models::viewpoint::Viewpoint;

use crate::viewpoints::get_viewpoint;

/// Breakpoint between the desktop layout (description panel on the left) and
/// the mobile layout (description sheet along the bottom).
pub const DESKTOP_BREAKPOINT_PX: f64 = 681.0;
pub const PANEL_WIDTH_PX: f64 = 420.0;
pub const MOBILE_BOTTOM_FRACTION: f64 = 0.4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Padding {
    pub left: f64,
    pub bottom: f64,
}

/// Pure function of the viewport size, recomputed on every resize event.
#[must_use]
pub fn padding_for_viewport(width: f64, height: f64) -> Padding {
    if width >= DESKTOP_BREAKPOINT_PX {
        Padding {
            left: PANEL_WIDTH_PX,
            bottom: 0.0,
        }
    } else {
        Padding {
            left: 0.0,
            bottom: MOBILE_BOTTOM_FRACTION * height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Idle,
    Navigating,
}

#[derive(Debug)]
struct ViewInner {
    camera: Viewpoint,
    padding: Padding,
    nav_state: NavState,
    epoch: u64,
}

/// Owns the camera and viewport padding. Navigation is last-call-wins: a new
/// `go_to` aborts the in-flight animation task and restarts toward the new
/// target, there is no queue.
pub struct ViewController {
    inner: Arc<Mutex<ViewInner>>,
    animation: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ViewController {
    #[must_use]
    pub fn new(initial_camera: Viewpoint, animation: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ViewInner {
                camera: initial_camera,
                padding: Padding {
                    left: 0.0,
                    bottom: 0.0,
                },
                nav_state: NavState::Idle,
                epoch: 0,
            })),
            animation,
            task: Mutex::new(None),
        }
    }

    /// Start animating toward `target`. Must be called from within a tokio
    /// runtime.
    pub fn go_to(&self, target: Viewpoint) {
        let epoch = {
            let mut inner = self.inner.lock();
            inner.epoch += 1;
            inner.nav_state = NavState::Navigating;
            inner.epoch
        };
        let inner = Arc::clone(&self.inner);
        let animation = self.animation;
        let handle = tokio::spawn(async move {
            sleep(animation).await;
            let mut inner = inner.lock();
            // a later go_to superseded this animation
            if inner.epoch == epoch {
                inner.camera = target;
                inner.nav_state = NavState::Idle;
            }
        });
        if let Some(old) = self.task.lock().replace(handle) {
            old.abort();
        }
    }

    /// Navigate to a named viewpoint.
    ///
    /// # Errors
    /// Return `UnknownViewpoint` if the name is not in the table
    pub fn go_to_key(&self, key: &str) -> Result<(), Error> {
        let viewpoint =
            get_viewpoint(key).ok_or_else(|| Error::UnknownViewpoint(key.into()))?;
        self.go_to(viewpoint);
        Ok(())
    }

    pub fn set_padding(&self, viewport_width: f64, viewport_height: f64) {
        self.inner.lock().padding = padding_for_viewport(viewport_width, viewport_height);
    }

    #[must_use]
    pub fn padding(&self) -> Padding {
        self.inner.lock().padding
    }

    #[must_use]
    pub fn camera(&self) -> Viewpoint {
        self.inner.lock().camera
    }

    #[must_use]
    pub fn nav_state(&self) -> NavState {
        self.inner.lock().nav_state
    }

    /// Wait for the current navigation to settle, used by tests and by the
    /// cli status output.
    pub async fn wait_idle(&self) {
        while self.nav_state() == NavState::Navigating {
            sleep(Duration::from_millis(1)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use std::time::Duration;

    use trail_lib::errors::TrailError as Error;
    use trail_models::viewpoint::Viewpoint;

    use crate::{
        view_controller::{padding_for_viewport, NavState, ViewController},
        viewpoints::INITIAL_CAMERA,
    };

    #[test]
    fn test_padding_breakpoint() {
        let padding = padding_for_viewport(679.0, 800.0);
        assert_abs_diff_eq!(padding.left, 0.0);
        assert_abs_diff_eq!(padding.bottom, 320.0);

        let padding = padding_for_viewport(681.0, 800.0);
        assert_abs_diff_eq!(padding.left, 420.0);
        assert_abs_diff_eq!(padding.bottom, 0.0);
    }

    #[tokio::test]
    async fn test_go_to_last_call_wins() {
        let view = ViewController::new(INITIAL_CAMERA, Duration::from_millis(10));
        let a = Viewpoint::new(7.0, 46.0, 2000.0, 100.0, 70.0);
        let b = Viewpoint::new(8.0, 47.0, 2500.0, 200.0, 60.0);

        view.go_to(a);
        view.go_to(b);
        assert_eq!(view.nav_state(), NavState::Navigating);
        view.wait_idle().await;
        // never stopped at a
        assert_eq!(view.camera(), b);
    }

    #[tokio::test]
    async fn test_go_to_key() {
        let view = ViewController::new(INITIAL_CAMERA, Duration::from_millis(1));
        view.go_to_key("trainStation").unwrap();
        view.wait_idle().await;
        assert_abs_diff_eq!(view.camera().heading, 153.80);

        let err = view.go_to_key("gondola").unwrap_err();
        assert!(matches!(err, Error::UnknownViewpoint(_)));
        // a failed lookup leaves the camera alone
        assert_abs_diff_eq!(view.camera().heading, 153.80);
    }

    #[tokio::test]
    async fn test_set_padding_tracks_resize() {
        let view = ViewController::new(INITIAL_CAMERA, Duration::from_millis(1));
        view.set_padding(1200.0, 900.0);
        assert_abs_diff_eq!(view.padding().left, 420.0);
        view.set_padding(400.0, 900.0);
        assert_abs_diff_eq!(view.padding().bottom, 360.0);
    }
}
