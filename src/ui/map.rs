/// Map and coordinate-capture widget.
///
/// A flat-projection map drawn on a canvas: degrees map linearly to
/// pixels around the view center, with a graticule instead of a tile
/// layer. A click relocates the marker and captures the coordinate pair
/// (rounded to 4 decimals); dragging pans and the wheel zooms. The
/// read-only variant shows a sighting's position without capturing.
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::geo::Coordinates;
use crate::ui::ACCENT;

/// Shown before geolocation answers; roughly the middle of Europe.
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    latitude: 45.0,
    longitude: 15.0,
};

/// Pixels per degree once a position is focused; street-ish scale.
const FOCUS_SCALE: f64 = 20_000.0;

/// Drag shorter than this is a click.
const CLICK_SLOP: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct MapView {
    center: Coordinates,
    /// Pixels per degree of longitude.
    scale: f64,
    marker: Option<Coordinates>,
    interactive: bool,
}

/// What the widget reports back to its page.
#[derive(Debug, Clone)]
pub enum Event {
    /// A click placed the marker and captured rounded coordinates.
    Picked(Coordinates),
    Panned(cgmath::Vector2<f32>),
    Zoomed(f32),
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

impl MapView {
    /// Interactive capture map at world scale.
    pub fn new() -> Self {
        MapView {
            center: DEFAULT_CENTER,
            scale: 4.0,
            marker: None,
            interactive: true,
        }
    }

    /// Display-only map centered on an existing sighting.
    pub fn read_only(marker: Coordinates) -> Self {
        MapView {
            center: marker,
            scale: FOCUS_SCALE,
            marker: Some(marker),
            interactive: false,
        }
    }

    pub fn marker(&self) -> Option<Coordinates> {
        self.marker
    }

    /// Place the marker and bring the view to it.
    pub fn place_marker(&mut self, coords: Coordinates) {
        self.marker = Some(coords);
        self.center = coords;
        if self.scale < FOCUS_SCALE {
            self.scale = FOCUS_SCALE;
        }
    }

    pub fn pan(&mut self, delta: cgmath::Vector2<f32>) {
        self.center.longitude -= delta.x as f64 / self.scale;
        self.center.latitude += delta.y as f64 / self.scale;
        self.center.latitude = self.center.latitude.clamp(-85.0, 85.0);
    }

    /// Multiplicative zoom around the view center.
    pub fn zoom(&mut self, delta: f32) {
        self.scale = (self.scale * (1.0 + delta as f64)).clamp(1.0, 400_000.0);
    }

    pub fn project(&self, coords: Coordinates, size: Size) -> Point {
        Point::new(
            size.width / 2.0 + ((coords.longitude - self.center.longitude) * self.scale) as f32,
            size.height / 2.0 - ((coords.latitude - self.center.latitude) * self.scale) as f32,
        )
    }

    pub fn unproject(&self, position: Point, size: Size) -> Coordinates {
        Coordinates::new(
            self.center.latitude - (position.y - size.height / 2.0) as f64 / self.scale,
            self.center.longitude + (position.x - size.width / 2.0) as f64 / self.scale,
        )
    }

    /// Graticule spacing that keeps lines comfortably apart on screen.
    fn graticule_step(&self) -> f64 {
        const LADDER: [f64; 9] = [0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0];
        for step in LADDER {
            if step * self.scale >= 70.0 {
                return step;
            }
        }
        30.0
    }
}

/// State for distinguishing clicks from drags.
#[derive(Debug, Clone, Default)]
pub struct Drag {
    pressed: bool,
    dragged: bool,
    last_position: Option<Point>,
}

impl Program<Event> for MapView {
    type State = Drag;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Event>) {
        match event {
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if cursor.position_in(bounds).is_none() {
                    return (canvas::event::Status::Ignored, None);
                }
                let zoom_delta = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y * 0.1,
                    mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                };
                (canvas::event::Status::Captured, Some(Event::Zoomed(zoom_delta)))
            }

            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    state.pressed = true;
                    state.dragged = false;
                    state.last_position = Some(position);
                    return (canvas::event::Status::Captured, None);
                }
                (canvas::event::Status::Ignored, None)
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if !state.pressed {
                    return (canvas::event::Status::Ignored, None);
                }
                state.pressed = false;
                state.last_position = None;

                if state.dragged || !self.interactive {
                    return (canvas::event::Status::Captured, None);
                }

                match cursor.position_in(bounds) {
                    Some(position) => {
                        let picked = self.unproject(position, bounds.size()).rounded();
                        (canvas::event::Status::Captured, Some(Event::Picked(picked)))
                    }
                    None => (canvas::event::Status::Captured, None),
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if !state.pressed {
                    return (canvas::event::Status::Ignored, None);
                }
                if let (Some(current), Some(last)) =
                    (cursor.position_in(bounds), state.last_position)
                {
                    let delta =
                        cgmath::Vector2::new(current.x - last.x, current.y - last.y);

                    if delta.x.abs() + delta.y.abs() > CLICK_SLOP {
                        state.dragged = true;
                    }

                    if state.dragged {
                        state.last_position = Some(current);
                        return (canvas::event::Status::Captured, Some(Event::Panned(delta)));
                    }
                }
                (canvas::event::Status::Ignored, None)
            }

            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let size = bounds.size();
        let mut frame = canvas::Frame::new(renderer, size);

        frame.fill_rectangle(Point::ORIGIN, size, Color::from_rgb8(0xE2, 0xEC, 0xF0));

        // Graticule.
        let grid = Color::from_rgb8(0xC2, 0xD3, 0xDB);
        let stroke = Stroke::default().with_width(1.0).with_color(grid);
        let step = self.graticule_step();

        let top_left = self.unproject(Point::ORIGIN, size);
        let bottom_right = self.unproject(Point::new(size.width, size.height), size);

        let mut lon = (top_left.longitude / step).floor() * step;
        let mut guard = 0;
        while lon <= bottom_right.longitude && guard < 200 {
            let x = self.project(Coordinates::new(0.0, lon), size).x;
            frame.stroke(
                &Path::line(Point::new(x, 0.0), Point::new(x, size.height)),
                stroke.clone(),
            );
            lon += step;
            guard += 1;
        }

        let mut lat = (bottom_right.latitude / step).floor() * step;
        guard = 0;
        while lat <= top_left.latitude && guard < 200 {
            let y = self.project(Coordinates::new(lat, 0.0), size).y;
            frame.stroke(
                &Path::line(Point::new(0.0, y), Point::new(size.width, y)),
                stroke.clone(),
            );
            lat += step;
            guard += 1;
        }

        // Marker pin.
        if let Some(marker) = self.marker {
            let at = self.project(marker, size);
            let stem = Path::line(at, Point::new(at.x, at.y - 14.0));
            frame.stroke(&stem, Stroke::default().with_width(3.0).with_color(ACCENT));
            frame.fill(&Path::circle(Point::new(at.x, at.y - 18.0), 7.0), ACCENT);
            frame.fill(&Path::circle(at, 2.5), ACCENT);

            frame.fill_text(canvas::Text {
                content: marker.label(),
                position: Point::new(at.x + 12.0, at.y - 26.0),
                color: Color::from_rgb8(0x4A, 0x55, 0x58),
                size: 12.0.into(),
                ..canvas::Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size() -> Size {
        Size::new(800.0, 400.0)
    }

    #[test]
    fn center_projects_to_the_middle() {
        let map = MapView::read_only(Coordinates::new(43.3438, 17.8078));
        let point = map.project(Coordinates::new(43.3438, 17.8078), size());
        assert!((point.x - 400.0).abs() < 0.001);
        assert!((point.y - 200.0).abs() < 0.001);
    }

    #[test]
    fn unproject_inverts_project() {
        let map = MapView::read_only(Coordinates::new(43.3438, 17.8078));
        let original = Coordinates::new(43.3452, 17.8091);

        let roundtrip = map.unproject(map.project(original, size()), size());
        assert!((roundtrip.latitude - original.latitude).abs() < 1e-6);
        assert!((roundtrip.longitude - original.longitude).abs() < 1e-6);
    }

    #[test]
    fn clicks_capture_rounded_coordinates() {
        let map = MapView::read_only(Coordinates::new(43.0, 17.0));
        let clicked = map
            .unproject(Point::new(413.0, 187.0), size())
            .rounded();

        // 13px east, 13px north of center at 20000 px/deg.
        assert_eq!(clicked, Coordinates::new(43.0007, 17.0007));
    }

    #[test]
    fn placing_a_marker_focuses_the_view() {
        let mut map = MapView::new();
        assert!(map.marker().is_none());

        let coords = Coordinates::new(-33.8679, 151.2073);
        map.place_marker(coords);

        assert_eq!(map.marker(), Some(coords));
        let center = map.project(coords, size());
        assert!((center.x - 400.0).abs() < 0.001);
    }

    #[test]
    fn panning_moves_the_center() {
        let mut map = MapView::read_only(Coordinates::new(43.0, 17.0));
        map.pan(cgmath::Vector2::new(100.0, 0.0));

        // Dragging east by 100px shifts the view west.
        let marker = map.project(Coordinates::new(43.0, 17.0), size());
        assert!((marker.x - 500.0).abs() < 0.001);
    }

    #[test]
    fn zoom_stays_within_bounds() {
        let mut map = MapView::new();
        for _ in 0..200 {
            map.zoom(-0.9);
        }
        let far_east = map.project(Coordinates::new(0.0, 180.0), size());
        let far_west = map.project(Coordinates::new(0.0, -180.0), size());
        // Fully zoomed out the whole world still spans some pixels.
        assert!(far_east.x > far_west.x);
    }
}
