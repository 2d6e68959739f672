use eframe::egui::{Color32, Painter, Pos2, Rect, Vec2, vec2};

use super::{CHART_HEIGHT, CHART_WIDTH};

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

const GROUP_PALETTE: [Color32; 7] = [
    Color32::from_rgb(102, 194, 255),
    Color32::from_rgb(129, 222, 182),
    Color32::from_rgb(255, 180, 120),
    Color32::from_rgb(197, 165, 255),
    Color32::from_rgb(255, 158, 180),
    Color32::from_rgb(255, 214, 110),
    Color32::from_rgb(148, 210, 120),
];

pub(super) fn group_color(group: u32) -> Color32 {
    GROUP_PALETTE[(group as usize) % GROUP_PALETTE.len()]
}

/// The fixed 600x500 drawing surface, centered in whatever space the panel
/// hands us.
pub(super) fn chart_surface_rect(rect: Rect) -> Rect {
    Rect::from_center_size(rect.center(), vec2(CHART_WIDTH, CHART_HEIGHT))
}

pub(super) fn draw_surface(painter: &Painter, surface: Rect) {
    painter.rect_filled(surface, 10.0, Color32::from_rgb(246, 247, 249));
}

pub(super) fn chart_to_screen(surface: Rect, point: Vec2) -> Pos2 {
    surface.min + point
}

pub(super) fn screen_to_chart(surface: Rect, point: Pos2) -> Vec2 {
    point - surface.min
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn chart_and_screen_transforms_are_inverses() {
        let surface = Rect::from_min_size(pos2(40.0, 30.0), vec2(CHART_WIDTH, CHART_HEIGHT));
        let point = vec2(300.0, 250.0);
        let screen = chart_to_screen(surface, point);
        assert_eq!(screen, pos2(340.0, 280.0));
        assert_eq!(screen_to_chart(surface, screen), point);
    }

    #[test]
    fn group_colors_cycle_through_the_palette() {
        assert_eq!(group_color(0), group_color(7));
        assert_ne!(group_color(1), group_color(2));
    }
}
