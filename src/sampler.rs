use kurbo::Point;

use crate::color::Rgb;
use crate::error::{PringsError, PringsResult};
use crate::fit;
use crate::state::{ColorTarget, RingAction};

/// Off-screen surface holding the photo exactly as displayed: cover-fit into
/// the display box so pointer coordinates map 1:1 to pixels.
///
/// Owned by one picker session at a time; rebuilt when the session starts, so
/// every sample reads the same pixels the user is looking at.
pub struct SamplerSurface {
    width: u32,
    height: u32,
    pixels: image::RgbaImage,
}

impl SamplerSurface {
    pub fn new(photo: &image::RgbaImage, display_width: u32, display_height: u32) -> PringsResult<Self> {
        if display_width == 0 || display_height == 0 {
            return Err(PringsError::invalid_dimensions(format!(
                "display size must be non-zero, got {display_width}x{display_height}"
            )));
        }
        let (photo_w, photo_h) = photo.dimensions();
        let placed = fit::cover(
            f64::from(display_width),
            f64::from(display_height),
            f64::from(photo_w),
            f64::from(photo_h),
        )?;

        let scaled_w = placed.width.round().max(1.0) as u32;
        let scaled_h = placed.height.round().max(1.0) as u32;
        let scaled = image::imageops::resize(
            photo,
            scaled_w,
            scaled_h,
            image::imageops::FilterType::Triangle,
        );

        let mut pixels = image::RgbaImage::new(display_width, display_height);
        image::imageops::overlay(
            &mut pixels,
            &scaled,
            placed.offset_x.round() as i64,
            placed.offset_y.round() as i64,
        );

        Ok(Self {
            width: display_width,
            height: display_height,
            pixels,
        })
    }

    /// Color under `point` (display coordinates), or `None` outside the
    /// circular crop. Outside-the-circle is a no-op, never an error.
    pub fn sample(&self, point: Point) -> Option<Rgb> {
        let cx = f64::from(self.width) / 2.0;
        let cy = f64::from(self.height) / 2.0;
        let radius = f64::from(self.width) / 2.0;
        if point.distance(Point::new(cx, cy)) > radius {
            return None;
        }

        let x = point.x.floor();
        let y = point.y.floor();
        if x < 0.0 || y < 0.0 || x >= f64::from(self.width) || y >= f64::from(self.height) {
            return None;
        }

        let px = self.pixels.get_pixel(x as u32, y as u32);
        Some(Rgb::new(px[0], px[1], px[2]))
    }
}

/// Latest-wins pointer coalescing: rapid moves overwrite the pending
/// position and at most one sample happens per tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoalescedPointer {
    pending: Option<Point>,
}

impl CoalescedPointer {
    pub fn push(&mut self, point: Point) {
        self.pending = Some(point);
    }

    /// Take the most recent position, leaving the queue empty.
    pub fn take(&mut self) -> Option<Point> {
        self.pending.take()
    }

    /// Drop any pending position so a stale tick cannot fire after mode exit.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}

/// One picker-mode interaction: owns the sampling surface, the coalesced
/// pointer and the active color target.
pub struct PickerSession {
    surface: SamplerSurface,
    pointer: CoalescedPointer,
    target: ColorTarget,
    active: bool,
}

impl PickerSession {
    pub fn enter(
        photo: &image::RgbaImage,
        display_width: u32,
        display_height: u32,
        target: ColorTarget,
    ) -> PringsResult<Self> {
        Ok(Self {
            surface: SamplerSurface::new(photo, display_width, display_height)?,
            pointer: CoalescedPointer::default(),
            target,
            active: true,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn target(&self) -> ColorTarget {
        self.target
    }

    /// Record a pointer move; the sample happens on the next [`tick`].
    ///
    /// [`tick`]: Self::tick
    pub fn pointer_moved(&mut self, point: Point) {
        if self.active {
            self.pointer.push(point);
        }
    }

    /// Process at most one coalesced position: the hover preview color, if
    /// the latest position was inside the circle.
    pub fn tick(&mut self) -> Option<Rgb> {
        if !self.active {
            return None;
        }
        let point = self.pointer.take()?;
        self.surface.sample(point)
    }

    /// Commit a click: sample, and when the point is inside the circle, end
    /// picker mode and return the ring update for the active target. Outside
    /// the circle the click is a no-op and the session stays active.
    pub fn commit(&mut self, point: Point) -> Option<RingAction> {
        if !self.active {
            return None;
        }
        let color = self.surface.sample(point)?;
        self.active = false;
        self.pointer.cancel();
        Some(self.target.action_for(color))
    }

    /// The pointer left the displayable circle: drop any pending sample so a
    /// stale tick cannot fire, but stay in picker mode.
    pub fn pointer_left(&mut self) {
        self.pointer.cancel();
    }

    /// Leave picker mode without committing; drops any pending sample.
    pub fn leave(&mut self) {
        self.active = false;
        self.pointer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_photo(color: [u8; 4]) -> image::RgbaImage {
        image::RgbaImage::from_pixel(400, 400, image::Rgba(color))
    }

    #[test]
    fn center_of_solid_photo_samples_exact_color() {
        let surface = SamplerSurface::new(&solid_photo([90, 30, 200, 255]), 320, 320).unwrap();
        let c = surface.sample(Point::new(160.0, 160.0)).unwrap();
        assert_eq!(c, Rgb::new(90, 30, 200));
    }

    #[test]
    fn outside_circle_is_no_sample_not_error() {
        let surface = SamplerSurface::new(&solid_photo([1, 2, 3, 255]), 320, 320).unwrap();
        // Corners are outside the inscribed circle.
        assert_eq!(surface.sample(Point::new(1.0, 1.0)), None);
        assert_eq!(surface.sample(Point::new(319.0, 319.0)), None);
        assert_eq!(surface.sample(Point::new(-5.0, 160.0)), None);
    }

    #[test]
    fn edge_of_circle_still_samples() {
        let surface = SamplerSurface::new(&solid_photo([9, 9, 9, 255]), 320, 320).unwrap();
        assert!(surface.sample(Point::new(0.0, 160.0)).is_some());
        assert!(surface.sample(Point::new(160.0, 0.5)).is_some());
    }

    #[test]
    fn non_square_photo_is_cover_fit_before_sampling() {
        // Left half red, right half blue, twice as wide as tall: cover keeps
        // the vertical center band, so the display midline splits the halves.
        let photo = image::RgbaImage::from_fn(800, 400, |x, _| {
            if x < 400 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        let surface = SamplerSurface::new(&photo, 320, 320).unwrap();
        assert_eq!(
            surface.sample(Point::new(100.0, 160.0)).unwrap(),
            Rgb::new(255, 0, 0)
        );
        assert_eq!(
            surface.sample(Point::new(220.0, 160.0)).unwrap(),
            Rgb::new(0, 0, 255)
        );
    }

    #[test]
    fn coalescing_keeps_only_the_latest_position() {
        let mut pointer = CoalescedPointer::default();
        pointer.push(Point::new(1.0, 1.0));
        pointer.push(Point::new(2.0, 2.0));
        pointer.push(Point::new(3.0, 3.0));
        assert_eq!(pointer.take(), Some(Point::new(3.0, 3.0)));
        assert_eq!(pointer.take(), None);
    }

    #[test]
    fn cancel_drops_pending_position() {
        let mut pointer = CoalescedPointer::default();
        pointer.push(Point::new(1.0, 1.0));
        pointer.cancel();
        assert!(pointer.is_idle());
        assert_eq!(pointer.take(), None);
    }

    #[test]
    fn session_tick_samples_once_per_batch_of_moves() {
        let photo = solid_photo([10, 20, 30, 255]);
        let mut session = PickerSession::enter(&photo, 320, 320, ColorTarget::Ring).unwrap();
        session.pointer_moved(Point::new(50.0, 160.0));
        session.pointer_moved(Point::new(160.0, 160.0));
        assert_eq!(session.tick(), Some(Rgb::new(10, 20, 30)));
        // Queue drained; no further work this tick.
        assert_eq!(session.tick(), None);
    }

    #[test]
    fn commit_inside_circle_ends_session_and_routes_to_target() {
        let photo = solid_photo([200, 100, 50, 255]);
        let mut session = PickerSession::enter(&photo, 320, 320, ColorTarget::Fade).unwrap();
        let action = session.commit(Point::new(160.0, 160.0)).unwrap();
        assert_eq!(action, RingAction::SetFadeColor(Rgb::new(200, 100, 50)));
        assert!(!session.is_active());
        assert_eq!(session.commit(Point::new(160.0, 160.0)), None);
    }

    #[test]
    fn commit_outside_circle_is_noop_and_session_stays_active() {
        let photo = solid_photo([1, 1, 1, 255]);
        let mut session = PickerSession::enter(&photo, 320, 320, ColorTarget::Ring).unwrap();
        assert_eq!(session.commit(Point::new(2.0, 2.0)), None);
        assert!(session.is_active());
    }

    #[test]
    fn pointer_exit_drops_pending_but_keeps_session() {
        let photo = solid_photo([1, 1, 1, 255]);
        let mut session = PickerSession::enter(&photo, 320, 320, ColorTarget::Ring).unwrap();
        session.pointer_moved(Point::new(160.0, 160.0));
        session.pointer_left();
        assert_eq!(session.tick(), None);
        assert!(session.is_active());
    }

    #[test]
    fn leave_cancels_pending_sample() {
        let photo = solid_photo([1, 1, 1, 255]);
        let mut session = PickerSession::enter(&photo, 320, 320, ColorTarget::Ring).unwrap();
        session.pointer_moved(Point::new(160.0, 160.0));
        session.leave();
        assert_eq!(session.tick(), None);
    }
}
