/// Interactive compositor for the selected pair
///
/// Holds one transform per slot, the drag state and the natural sizes of the
/// two selected images. Every position handled here is in drawing-buffer
/// pixels; the canvas widget converts from screen space before calling in.

use iced::{Point, Vector};

use super::data::Size;

/// Placement of one image on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Multiplicative scale applied to the natural size (1.0 = 100%)
    pub scale: f32,
    /// Left edge in canvas pixels
    pub x: f32,
    /// Top edge in canvas pixels
    pub y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self { x, y, ..Self::default() }
    }

    /// Inclusive bounding-box test against the scaled image
    pub fn contains(&self, point: Point, natural: Size) -> bool {
        point.x >= self.x
            && point.x <= self.x + natural.width * self.scale
            && point.y >= self.y
            && point.y <= self.y + natural.height * self.scale
    }

    /// Scaled size of an image drawn with this transform
    pub fn scaled(&self, natural: Size) -> Size {
        Size::new(natural.width * self.scale, natural.height * self.scale)
    }
}

/// Scroll direction as seen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    /// Wheel rolled away from the user: grow the image
    Up,
    /// Wheel rolled towards the user: shrink the image
    Down,
}

/// Multiplicative factors applied per wheel event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomFactors {
    pub zoom_in: f32,
    pub zoom_out: f32,
}

impl Default for ZoomFactors {
    fn default() -> Self {
        Self {
            zoom_in: 1.1,
            zoom_out: 0.9,
        }
    }
}

impl ZoomFactors {
    pub fn factor(&self, direction: WheelDirection) -> f32 {
        match direction {
            WheelDirection::Up => self.zoom_in,
            WheelDirection::Down => self.zoom_out,
        }
    }
}

/// The only state machine in the app: dragging or not
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Drag {
    #[default]
    Idle,
    Dragging {
        slot: usize,
        last: Point,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Compositor {
    transforms: [Transform; 2],
    /// Natural sizes of the selected pair; `None` unless exactly two are selected
    sizes: Option<[Size; 2]>,
    drag: Drag,
    zoom: ZoomFactors,
}

impl Compositor {
    pub fn new(zoom: ZoomFactors) -> Self {
        Self {
            zoom,
            ..Self::default()
        }
    }

    /// A new pair was selected: reset to side-by-side placement
    pub fn set_pair(&mut self, sizes: [Size; 2]) {
        self.transforms = Self::default_placement(&sizes);
        self.sizes = Some(sizes);
        self.drag = Drag::Idle;

        tracing::debug!(canvas = ?self.canvas_size(), "compositor reset for new pair");
    }

    /// Fewer than two images are selected; transforms are kept as they are
    pub fn clear_pair(&mut self) {
        self.sizes = None;
        self.drag = Drag::Idle;
    }

    fn default_placement(sizes: &[Size; 2]) -> [Transform; 2] {
        [Transform::default(), Transform::at(sizes[0].width, 0.0)]
    }

    pub fn transforms(&self) -> &[Transform; 2] {
        &self.transforms
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, Drag::Dragging { .. })
    }

    /// Drawing-buffer size: widths side by side, tallest height
    pub fn canvas_size(&self) -> Option<Size> {
        self.sizes.map(|[left, right]| {
            Size::new(left.width + right.width, left.height.max(right.height))
        })
    }

    /// Uniform factor that fits the drawing buffer inside `cap` (never enlarges)
    pub fn display_scale(&self, cap: Size) -> f32 {
        match self.canvas_size() {
            Some(size) if size.width > 0.0 && size.height > 0.0 => (cap.width / size.width)
                .min(cap.height / size.height)
                .min(1.0),
            _ => 1.0,
        }
    }

    /// On-screen size of the canvas, capped to `cap`
    pub fn display_size(&self, cap: Size) -> Option<Size> {
        let scale = self.display_scale(cap);
        self.canvas_size()
            .map(|size| Size::new(size.width * scale, size.height * scale))
    }

    /// Topmost slot under `point`, scanning from the last drawn image down
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        let sizes = self.sizes.as_ref()?;

        (0..self.transforms.len())
            .rev()
            .find(|&slot| self.transforms[slot].contains(point, sizes[slot]))
    }

    /// Start dragging the image under the pointer, if any
    pub fn pointer_down(&mut self, point: Point) -> Option<usize> {
        let slot = self.hit_test(point)?;
        self.drag = Drag::Dragging { slot, last: point };
        Some(slot)
    }

    /// Move the dragged image by the pointer delta. Returns true on change.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let Drag::Dragging { slot, last } = self.drag else {
            return false;
        };

        let delta: Vector = point - last;
        let transform = &mut self.transforms[slot];
        transform.x += delta.x;
        transform.y += delta.y;
        self.drag = Drag::Dragging { slot, last: point };

        delta != Vector::ZERO
    }

    pub fn pointer_up(&mut self) {
        self.drag = Drag::Idle;
    }

    /// Scale the image under the pointer. Returns the slot that changed.
    pub fn wheel(&mut self, point: Point, direction: WheelDirection) -> Option<usize> {
        let slot = self.hit_test(point)?;
        self.transforms[slot].scale *= self.zoom.factor(direction);
        Some(slot)
    }
}
