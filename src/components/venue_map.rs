use jleague_api::view::VenueFeature;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::text::Span;
use tui::widgets::canvas::{Canvas, Map, MapResolution, Points};
use tui::widgets::{Block, Widget};

/// Longitude and latitude span of the home islands, used when nothing is selected.
pub const JAPAN_LON: [f64; 2] = [122.0, 154.0];
pub const JAPAN_LAT: [f64; 2] = [24.0, 46.0];

/// Degrees of margin around the markers.
const PADDING: f64 = 1.5;

/// World map with one marker per venue; the selected venue is drawn on top
/// in its own colour with its name beside it.
pub struct VenueMap<'a> {
    pub features: &'a [VenueFeature],
    pub selected: Option<usize>,
    pub block: Option<Block<'a>>,
}

impl Widget for VenueMap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (x_bounds, y_bounds) = bounds(self.features);
        let selected = self.selected.and_then(|i| self.features.get(i));
        let others: Vec<(f64, f64)> = self
            .features
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.selected)
            .map(|(_, f)| (f.lon, f.lat))
            .collect();

        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                ctx.draw(&Map { resolution: MapResolution::High, color: Color::DarkGray });
                ctx.layer();
                ctx.draw(&Points { coords: &others, color: Color::Yellow });
                if let Some(feature) = selected {
                    ctx.layer();
                    ctx.draw(&Points { coords: &[(feature.lon, feature.lat)], color: Color::Red });
                    ctx.print(
                        feature.lon,
                        feature.lat,
                        Span::styled(format!(" {}", feature.short_name), Style::default().fg(Color::Red)),
                    );
                }
            });
        if let Some(block) = self.block {
            canvas = canvas.block(block);
        }
        canvas.render(area, buf);
    }
}

/// Map window covering every marker, or all of Japan when there are none.
pub fn bounds(features: &[VenueFeature]) -> ([f64; 2], [f64; 2]) {
    if features.is_empty() {
        return (JAPAN_LON, JAPAN_LAT);
    }
    let (mut lon, mut lat) = ([f64::MAX, f64::MIN], [f64::MAX, f64::MIN]);
    for f in features {
        lon = [lon[0].min(f.lon), lon[1].max(f.lon)];
        lat = [lat[0].min(f.lat), lat[1].max(f.lat)];
    }
    (
        [lon[0] - PADDING, lon[1] + PADDING],
        [lat[0] - PADDING, lat[1] + PADDING],
    )
}
