use glam::{Mat4, Vec3};
use litegpu_common::Trigger;
use litegpu_input::{ClientPoint, PointerButton, PointerEvent};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Construction options for [`Camera`]. Unset fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescriptor {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Lower elevation bound in radians.
    pub miny: f32,
    /// Upper elevation bound in radians.
    pub maxy: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
}

impl Default for CameraDescriptor {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 60.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            miny: -89.0_f32.to_radians(),
            maxy: 89.0_f32.to_radians(),
            pan_speed: 0.1,
            zoom_speed: 1.1,
            rotate_speed: std::f32::consts::PI / 180.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    last: ClientPoint,
    panning: bool,
}

type PanCallback = Box<dyn FnMut(f32, f32)>;
type ZoomCallback = Box<dyn FnMut(f32)>;

/// Orbit camera with lazily recomputed view and projection matrices.
///
/// Mutators touching position, target or up invalidate only the view cache;
/// mutators touching fovy, aspect, near or far invalidate only the projection
/// cache. Each mutator fires exactly one `"change"` notification through the
/// embedded [`Trigger`].
///
/// The projection is right-handed with a 0..1 depth range, which is the clip
/// space wgpu expects.
pub struct Camera {
    fovy: f32,
    aspect: f32,
    near: f32,
    far: f32,
    position: Vec3,
    target: Vec3,
    up: Vec3,
    rx: f32,
    ry: f32,
    miny: f32,
    maxy: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub rotate_speed: f32,

    view: Cell<Mat4>,
    world: Cell<Mat4>,
    projection: Cell<Mat4>,
    projection_inv: Cell<Mat4>,
    projection_view: Cell<Mat4>,
    view_dirty: Cell<bool>,
    projection_dirty: Cell<bool>,

    trigger: Trigger,
    attached: bool,
    drag: Option<Drag>,
    on_pan: Option<PanCallback>,
    on_rotate: Option<PanCallback>,
    on_zoom: Option<ZoomCallback>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraDescriptor::default())
    }
}

impl Camera {
    pub fn new(desc: CameraDescriptor) -> Self {
        let mut camera = Self {
            fovy: desc.fovy,
            aspect: desc.aspect,
            near: desc.near,
            far: desc.far,
            position: desc.position,
            target: desc.target,
            up: desc.up,
            rx: 0.0,
            ry: 0.0,
            miny: desc.miny,
            maxy: desc.maxy,
            pan_speed: desc.pan_speed,
            zoom_speed: desc.zoom_speed,
            rotate_speed: desc.rotate_speed,
            view: Cell::new(Mat4::IDENTITY),
            world: Cell::new(Mat4::IDENTITY),
            projection: Cell::new(Mat4::IDENTITY),
            projection_inv: Cell::new(Mat4::IDENTITY),
            projection_view: Cell::new(Mat4::IDENTITY),
            view_dirty: Cell::new(true),
            projection_dirty: Cell::new(true),
            trigger: Trigger::new(),
            attached: false,
            drag: None,
            on_pan: None,
            on_rotate: None,
            on_zoom: None,
        };
        camera.reset_rotation();
        camera
    }

    /// Change notifications for this camera.
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    // ---- cached matrices ----

    /// World-to-camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        if self.view_dirty.get() {
            let view = Mat4::look_at_rh(self.position, self.target, self.up);
            self.view.set(view);
            self.world.set(view.inverse());
            self.view_dirty.set(false);
            self.projection_view.set(self.projection_matrix() * view);
        }
        self.view.get()
    }

    /// Camera-to-clip transform.
    pub fn projection_matrix(&self) -> Mat4 {
        if self.projection_dirty.get() {
            let projection =
                Mat4::perspective_rh(self.fovy.to_radians(), self.aspect, self.near, self.far);
            self.projection.set(projection);
            self.projection_inv.set(projection.inverse());
            self.projection_dirty.set(false);
            self.projection_view.set(projection * self.view_matrix());
        }
        self.projection.get()
    }

    /// `projection * view`.
    pub fn projection_view_matrix(&self) -> Mat4 {
        if self.projection_dirty.get() || self.view_dirty.get() {
            self.projection_view
                .set(self.projection_matrix() * self.view_matrix());
        }
        self.projection_view.get()
    }

    /// Camera-to-world transform (inverse of the view matrix).
    pub fn world_matrix(&self) -> Mat4 {
        self.projection_view_matrix();
        self.world.get()
    }

    pub fn projection_matrix_inv(&self) -> Mat4 {
        self.projection_view_matrix();
        self.projection_inv.get()
    }

    pub fn is_view_dirty(&self) -> bool {
        self.view_dirty.get()
    }

    pub fn is_projection_dirty(&self) -> bool {
        self.projection_dirty.get()
    }

    // ---- projection properties ----

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    /// Set the vertical field of view in degrees.
    pub fn set_fovy(&mut self, value: f32) {
        let old = std::mem::replace(&mut self.fovy, value);
        self.projection_dirty.set(true);
        self.trigger.fire_property_changed("fovy", old, value);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, value: f32) {
        let old = std::mem::replace(&mut self.aspect, value);
        self.projection_dirty.set(true);
        self.trigger.fire_property_changed("aspect", old, value);
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn set_near(&mut self, value: f32) {
        let old = std::mem::replace(&mut self.near, value);
        self.projection_dirty.set(true);
        self.trigger.fire_property_changed("near", old, value);
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_far(&mut self, value: f32) {
        let old = std::mem::replace(&mut self.far, value);
        self.projection_dirty.set(true);
        self.trigger.fire_property_changed("far", old, value);
    }

    // ---- view properties ----

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, value: Vec3) {
        let old = std::mem::replace(&mut self.position, value);
        self.view_dirty.set(true);
        self.reset_rotation();
        self.trigger.fire_property_changed("position", old, value);
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, value: Vec3) {
        let old = std::mem::replace(&mut self.target, value);
        self.view_dirty.set(true);
        self.reset_rotation();
        self.trigger.fire_property_changed("target", old, value);
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn set_up(&mut self, value: Vec3) {
        let old = std::mem::replace(&mut self.up, value);
        self.view_dirty.set(true);
        self.trigger.fire_property_changed("up", old, value);
    }

    /// Azimuth around the target, in radians.
    pub fn rx(&self) -> f32 {
        self.rx
    }

    pub fn set_rx(&mut self, value: f32) {
        let old = std::mem::replace(&mut self.rx, value);
        self.view_dirty.set(true);
        self.trigger.fire_property_changed("rx", old, value);
    }

    /// Elevation above the target's XZ plane, in radians.
    pub fn ry(&self) -> f32 {
        self.ry
    }

    /// Set the elevation, clamped into `[miny, maxy]`.
    pub fn set_ry(&mut self, value: f32) {
        let mut value = value;
        if value > self.maxy {
            value = self.maxy;
        }
        if value < self.miny {
            value = self.miny;
        }
        let old = std::mem::replace(&mut self.ry, value);
        self.view_dirty.set(true);
        self.trigger.fire_property_changed("ry", old, value);
    }

    pub fn miny(&self) -> f32 {
        self.miny
    }

    pub fn set_miny(&mut self, value: f32) {
        self.miny = value;
        if self.ry < value {
            self.set_ry(value);
        }
    }

    pub fn maxy(&self) -> f32 {
        self.maxy
    }

    pub fn set_maxy(&mut self, value: f32) {
        self.maxy = value;
        if self.ry > value {
            self.set_ry(value);
        }
    }

    // Derived angles follow the geometry exactly and are not clamped.
    fn reset_rotation(&mut self) {
        let d = self.position - self.target;
        let xz = (d.x * d.x + d.z * d.z).sqrt();
        self.rx = d.x.atan2(d.z);
        self.ry = d.y.atan2(xz);
    }

    // ---- interaction ----

    /// Start reacting to pointer events. Returns `false` if already attached.
    pub fn attach(&mut self) -> bool {
        if self.attached {
            return false;
        }
        self.attached = true;
        tracing::debug!("camera controls attached");
        true
    }

    /// Stop reacting to pointer events. Returns `false` if never attached.
    pub fn detach(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.attached = false;
        self.drag = None;
        tracing::debug!("camera controls detached");
        true
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_on_pan(&mut self, callback: impl FnMut(f32, f32) + 'static) {
        self.on_pan = Some(Box::new(callback));
    }

    pub fn set_on_rotate(&mut self, callback: impl FnMut(f32, f32) + 'static) {
        self.on_rotate = Some(Box::new(callback));
    }

    pub fn set_on_zoom(&mut self, callback: impl FnMut(f32) + 'static) {
        self.on_zoom = Some(Box::new(callback));
    }

    /// Feed one pointer event. Returns `true` if the camera used it.
    ///
    /// Primary drag orbits, secondary drag pans, the wheel zooms.
    pub fn apply_pointer_event(&mut self, event: PointerEvent) -> bool {
        if !self.attached {
            return false;
        }
        match event {
            PointerEvent::Down { button, point } => {
                let panning = match button {
                    PointerButton::Primary => false,
                    PointerButton::Secondary => true,
                    _ => return false,
                };
                self.drag = Some(Drag {
                    last: point,
                    panning,
                });
                true
            }
            PointerEvent::Move { point } => {
                let Some(drag) = self.drag else {
                    return false;
                };
                let (dx, dy) = point.delta_from(drag.last);
                if dx != 0.0 || dy != 0.0 {
                    if drag.panning {
                        self.pan(dx, dy);
                    } else {
                        self.orbit(dx, dy);
                    }
                }
                self.drag = Some(Drag {
                    last: point,
                    ..drag
                });
                true
            }
            PointerEvent::Up | PointerEvent::Blur => self.drag.take().is_some(),
            PointerEvent::Wheel { delta_y } => {
                if delta_y == 0.0 {
                    return false;
                }
                let scale = if delta_y > 0.0 {
                    self.zoom_speed
                } else {
                    1.0 / self.zoom_speed
                };
                self.zoom(scale);
                true
            }
        }
    }

    /// Rotate around the target by a pixel delta.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let x = dx * self.rotate_speed;
        let y = dy * self.rotate_speed;
        self.set_rx(self.rx - x);
        self.set_ry(self.ry + y);

        let distance = (self.position - self.target).length();
        let xz = self.ry.cos() * distance;
        let position = self.target
            + Vec3::new(
                self.rx.sin() * xz,
                self.ry.sin() * distance,
                self.rx.cos() * xz,
            );
        self.set_position(position);

        if let Some(callback) = self.on_rotate.as_mut() {
            callback(x, y);
        }
    }

    /// Translate position and target together along the camera's right/up axes.
    ///
    /// When the view direction is parallel to `up` there is no right axis and
    /// the pan moves nothing.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let x = dx * self.pan_speed;
        let y = dy * self.pan_speed;
        let camera_z = (self.position - self.target).normalize_or_zero();
        let camera_x = self.up.cross(camera_z).normalize_or_zero();
        let camera_y = camera_z.cross(camera_x);
        let offset = camera_x * -x + camera_y * y;

        self.set_position(self.position + offset);
        self.set_target(self.target + offset);

        if let Some(callback) = self.on_pan.as_mut() {
            callback(x, y);
        }
    }

    /// Scale the target-to-position distance by `scale`.
    pub fn zoom(&mut self, scale: f32) {
        let position = self.target.lerp(self.position, scale);
        self.set_position(position);

        if let Some(callback) = self.on_zoom.as_mut() {
            callback(scale);
        }
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("position", &self.position)
            .field("target", &self.target)
            .field("up", &self.up)
            .field("fovy", &self.fovy)
            .field("aspect", &self.aspect)
            .field("near", &self.near)
            .field("far", &self.far)
            .field("rx", &self.rx)
            .field("ry", &self.ry)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use litegpu_common::{CHANGE_EVENT, ChangeEvent, TriggerEvent};
    use std::cell::RefCell;
    use std::f32::consts::PI;
    use std::rc::Rc;

    const EPS: f32 = 1e-4;

    fn record_changes(camera: &Camera) -> Rc<RefCell<Vec<ChangeEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        camera.trigger().on(
            CHANGE_EVENT,
            Rc::new(move |e: &TriggerEvent| {
                if let Some(change) = e.as_change() {
                    sink.borrow_mut().push(change.clone());
                }
            }),
            None,
        );
        seen
    }

    fn attached_camera() -> Camera {
        let mut camera = Camera::default();
        camera.attach();
        camera
    }

    #[test]
    fn partial_descriptor_keeps_defaults() {
        let camera = Camera::new(CameraDescriptor {
            position: Vec3::new(0.0, 10.0, 10.0),
            aspect: 2.0,
            ..Default::default()
        });
        assert_eq!(camera.position(), Vec3::new(0.0, 10.0, 10.0));
        assert_eq!(camera.target(), Vec3::ZERO);
        assert_eq!(camera.up(), Vec3::Y);
        assert_eq!(camera.fovy(), 60.0);
        assert_eq!(camera.aspect(), 2.0);
        assert_eq!(camera.near(), 0.1);
        assert_eq!(camera.far(), 1000.0);
    }

    #[test]
    fn descriptor_from_partial_json() {
        let desc: CameraDescriptor =
            serde_json::from_str(r#"{ "position": [1.0, 2.0, 3.0], "fovy": 45.0 }"#).unwrap();
        assert_eq!(desc.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(desc.fovy, 45.0);
        assert_eq!(desc.far, 1000.0);
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::default();
        assert_eq!(camera.rx(), 0.0);
        assert_eq!(camera.ry(), 0.0);
    }

    #[test]
    fn elevated_camera_derives_angles() {
        let camera = Camera::new(CameraDescriptor {
            position: Vec3::new(0.0, 10.0, 10.0),
            ..Default::default()
        });
        assert!((camera.ry() - PI / 4.0).abs() < EPS);
        assert!(camera.rx().abs() < EPS);
    }

    #[test]
    fn view_dirty_until_read() {
        let mut camera = Camera::default();
        camera.view_matrix();
        assert!(!camera.is_view_dirty());

        camera.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert!(camera.is_view_dirty());
        let first = camera.view_matrix();
        assert!(!camera.is_view_dirty());
        assert_eq!(camera.view_matrix(), first);

        camera.set_target(Vec3::ONE);
        assert!(camera.is_view_dirty());
        camera.view_matrix();
        camera.set_up(Vec3::Z);
        assert!(camera.is_view_dirty());
    }

    #[test]
    fn projection_and_view_caches_are_independent() {
        let mut camera = Camera::default();
        camera.projection_view_matrix();
        assert!(!camera.is_view_dirty());
        assert!(!camera.is_projection_dirty());

        camera.set_fovy(45.0);
        camera.set_aspect(1.5);
        camera.set_near(0.5);
        camera.set_far(200.0);
        assert!(camera.is_projection_dirty());
        assert!(!camera.is_view_dirty());

        camera.projection_matrix();
        camera.set_position(Vec3::new(0.0, 0.0, 5.0));
        assert!(camera.is_view_dirty());
        assert!(!camera.is_projection_dirty());

        camera.projection_view_matrix();
        camera.set_rx(0.3);
        assert!(camera.is_view_dirty());
        assert!(!camera.is_projection_dirty());

        camera.projection_view_matrix();
        camera.set_ry(0.2);
        assert!(camera.is_view_dirty());
        assert!(!camera.is_projection_dirty());

        camera.projection_view_matrix();
        camera.set_up(Vec3::Z);
        assert!(camera.is_view_dirty());
        assert!(!camera.is_projection_dirty());
        assert_eq!(camera.rx(), 0.3);
        assert_eq!(camera.ry(), 0.2);
    }

    #[test]
    fn combined_matrix_tracks_both_caches() {
        let mut camera = Camera::default();
        camera.set_aspect(2.0);
        camera.set_position(Vec3::new(3.0, 4.0, 5.0));
        let expected = camera.projection_matrix() * camera.view_matrix();
        assert!(camera.projection_view_matrix().abs_diff_eq(expected, EPS));
        assert!(
            (camera.world_matrix() * camera.view_matrix()).abs_diff_eq(Mat4::IDENTITY, EPS)
        );
        assert!(
            (camera.projection_matrix_inv() * camera.projection_matrix())
                .abs_diff_eq(Mat4::IDENTITY, EPS)
        );
    }

    #[test]
    fn projection_maps_depth_zero_to_one() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();
        let near = proj * Vec4::new(0.0, 0.0, -camera.near(), 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -camera.far(), 1.0);
        assert!((near.z / near.w).abs() < EPS);
        assert!((far.z / far.w - 1.0).abs() < EPS);
    }

    #[test]
    fn ry_is_clamped_on_assignment() {
        let mut camera = Camera::default();
        let (lo, hi) = (camera.miny(), camera.maxy());
        for value in [-10.0, lo - 1e-3, lo, 0.0, hi, hi + 1e-3, 10.0] {
            camera.set_ry(value);
            assert!(camera.ry() >= lo && camera.ry() <= hi, "ry={}", camera.ry());
        }
        camera.set_ry(10.0);
        assert_eq!(camera.ry(), hi);
        camera.set_ry(-10.0);
        assert_eq!(camera.ry(), lo);
    }

    #[test]
    fn narrowing_bounds_reclamps_ry() {
        let mut camera = Camera::default();
        camera.set_ry(1.0);
        camera.set_maxy(0.5);
        assert_eq!(camera.ry(), 0.5);
        camera.set_ry(-1.0);
        camera.set_miny(-0.25);
        assert_eq!(camera.ry(), -0.25);
    }

    #[test]
    fn derived_ry_is_not_clamped() {
        let mut camera = Camera::default();
        camera.set_position(Vec3::new(0.0, 10.0, 0.0));
        assert!((camera.ry() - PI / 2.0).abs() < EPS);
        assert!(camera.ry() > camera.maxy());
    }

    #[test]
    fn each_setter_fires_one_change() {
        let mut camera = Camera::default();
        let seen = record_changes(&camera);

        camera.set_fovy(45.0);
        camera.set_position(Vec3::new(0.0, 0.0, 20.0));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].property, "fovy");
        assert_eq!(seen[0].old_value.as_scalar(), Some(60.0));
        assert_eq!(seen[0].new_value.as_scalar(), Some(45.0));
        assert_eq!(seen[1].property, "position");
        assert_eq!(seen[1].old_value.as_vec3(), Some(Vec3::new(0.0, 0.0, 10.0)));
        assert_eq!(seen[1].new_value.as_vec3(), Some(Vec3::new(0.0, 0.0, 20.0)));
    }

    #[test]
    fn primary_drag_orbits_around_target() {
        let mut camera = attached_camera();
        let rotated = Rc::new(RefCell::new(None));
        {
            let rotated = rotated.clone();
            camera.set_on_rotate(move |x, y| *rotated.borrow_mut() = Some((x, y)));
        }

        camera.apply_pointer_event(PointerEvent::Down {
            button: PointerButton::Primary,
            point: ClientPoint::new(100.0, 100.0),
        });
        camera.apply_pointer_event(PointerEvent::Move {
            point: ClientPoint::new(110.0, 100.0),
        });

        let expected_rx = -10.0 * PI / 180.0;
        assert!((camera.rx() - expected_rx).abs() < EPS);
        assert!(camera.ry().abs() < EPS);
        assert_eq!(camera.target(), Vec3::ZERO);
        let p = camera.position();
        assert!((p - Vec3::new(expected_rx.sin() * 10.0, 0.0, expected_rx.cos() * 10.0)).length() < EPS);
        assert!((p.length() - 10.0).abs() < EPS);

        let (x, y) = rotated.borrow().unwrap();
        assert!((x - 10.0 * PI / 180.0).abs() < EPS);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn vertical_drag_respects_elevation_limit() {
        let mut camera = attached_camera();
        camera.apply_pointer_event(PointerEvent::Down {
            button: PointerButton::Primary,
            point: ClientPoint::default(),
        });
        camera.apply_pointer_event(PointerEvent::Move {
            point: ClientPoint::new(0.0, 500.0),
        });
        assert!(camera.position().y > 9.9);
        assert!(camera.position().y < 10.0);
    }

    #[test]
    fn secondary_drag_pans_position_and_target() {
        let mut camera = attached_camera();
        let offset_before = camera.position() - camera.target();
        camera.apply_pointer_event(PointerEvent::Down {
            button: PointerButton::Secondary,
            point: ClientPoint::default(),
        });
        camera.apply_pointer_event(PointerEvent::Move {
            point: ClientPoint::new(10.0, 0.0),
        });
        // Dragging right moves the scene right, so the camera slides left.
        assert!((camera.target() - Vec3::new(-1.0, 0.0, 0.0)).length() < EPS);
        assert!(((camera.position() - camera.target()) - offset_before).length() < EPS);

        camera.apply_pointer_event(PointerEvent::Move {
            point: ClientPoint::new(10.0, 10.0),
        });
        assert!((camera.target().y - 1.0).abs() < EPS);
    }

    #[test]
    fn pan_straight_down_the_up_axis_moves_nothing() {
        let mut camera = Camera::new(CameraDescriptor {
            position: Vec3::new(0.0, 10.0, 0.0),
            ..Default::default()
        });
        camera.pan(10.0, 0.0);
        camera.pan(0.0, -5.0);
        assert_eq!(camera.position(), Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(camera.target(), Vec3::ZERO);

        // Orbiting off the pole recovers a usable view.
        camera.orbit(0.0, -10.0);
        assert!(camera.position().is_finite());
        assert!(camera.ry() < PI / 2.0);
        assert!(camera.projection_view_matrix().is_finite());
    }

    #[test]
    fn wheel_zooms_toward_and_away_from_target() {
        let mut camera = attached_camera();
        let zooms = Rc::new(RefCell::new(Vec::new()));
        {
            let zooms = zooms.clone();
            camera.set_on_zoom(move |s| zooms.borrow_mut().push(s));
        }
        camera.apply_pointer_event(PointerEvent::Wheel { delta_y: 100.0 });
        assert!((camera.position().z - 11.0).abs() < EPS);
        camera.apply_pointer_event(PointerEvent::Wheel { delta_y: -100.0 });
        assert!((camera.position().z - 10.0).abs() < EPS);
        assert!(!camera.apply_pointer_event(PointerEvent::Wheel { delta_y: 0.0 }));
        assert_eq!(zooms.borrow().len(), 2);
    }

    #[test]
    fn move_without_drag_and_release_end_interaction() {
        let mut camera = attached_camera();
        assert!(!camera.apply_pointer_event(PointerEvent::Move {
            point: ClientPoint::new(5.0, 5.0),
        }));
        camera.apply_pointer_event(PointerEvent::Down {
            button: PointerButton::Primary,
            point: ClientPoint::default(),
        });
        assert!(camera.apply_pointer_event(PointerEvent::Blur));
        let before = camera.position();
        camera.apply_pointer_event(PointerEvent::Move {
            point: ClientPoint::new(50.0, 0.0),
        });
        assert_eq!(camera.position(), before);
    }

    #[test]
    fn auxiliary_button_is_ignored() {
        let mut camera = attached_camera();
        assert!(!camera.apply_pointer_event(PointerEvent::Down {
            button: PointerButton::Auxiliary,
            point: ClientPoint::default(),
        }));
    }

    #[test]
    fn attach_and_detach_are_idempotent() {
        let mut camera = Camera::default();
        assert!(!camera.detach());
        assert!(camera.attach());
        assert!(!camera.attach());
        assert!(camera.detach());
        assert!(!camera.detach());

        let before = camera.position();
        assert!(!camera.apply_pointer_event(PointerEvent::Wheel { delta_y: 1.0 }));
        assert_eq!(camera.position(), before);
    }
}
