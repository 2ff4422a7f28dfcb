use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::classify::NodeCategory;

use super::RepographApp;

const NODE_RADIUS: f32 = 18.0;

pub(super) fn category_color(category: NodeCategory) -> Color32 {
    match category {
        NodeCategory::Module => Color32::from_rgb(88, 166, 255),
        NodeCategory::Component => Color32::from_rgb(63, 185, 80),
        NodeCategory::Utility => Color32::from_rgb(210, 153, 34),
        NodeCategory::Api => Color32::from_rgb(248, 81, 73),
        NodeCategory::Hook => Color32::from_rgb(188, 140, 255),
        NodeCategory::File => Color32::from_rgb(165, 214, 255),
        NodeCategory::Folder => Color32::from_rgb(139, 148, 158),
    }
}

fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

fn draw_background(painter: &Painter, rect: Rect, pan: egui::Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

fn hovered_index(pointer: Option<Pos2>, screen_positions: &[Pos2], radius: f32) -> Option<usize> {
    let pointer = pointer?;
    screen_positions
        .iter()
        .enumerate()
        .filter_map(|(index, position)| {
            let distance = position.distance(pointer);
            (distance <= radius).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

impl RepographApp {
    fn search_matches(&self) -> Option<Vec<bool>> {
        let query = self.model.search.trim();
        if query.is_empty() {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        Some(
            self.model
                .data
                .nodes
                .iter()
                .map(|node| matcher.fuzzy_match(&node.label, query).is_some())
                .collect(),
        )
    }

    pub(super) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.model.viewport.pan, self.model.viewport.zoom);

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            let pointer = ui
                .input(|input| input.pointer.hover_pos())
                .unwrap_or_else(|| rect.center());
            self.model.viewport.zoom_at(rect, pointer, scroll);
        }

        self.model.sim.tick();

        let zoom = self.model.viewport.zoom;
        let node_radius = (NODE_RADIUS * zoom.powf(0.85)).clamp(4.0, 42.0);
        let screen_positions = self
            .model
            .sim
            .nodes()
            .iter()
            .map(|node| self.model.viewport.world_to_screen(rect, node.pos.to_pos2()))
            .collect::<Vec<_>>();

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = if response.hovered() {
            hovered_index(pointer, &screen_positions, node_radius)
        } else {
            None
        };

        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        // Primary drag on a node moves it; any other drag pans the window.
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
        {
            self.model.dragging = Some(index);
            self.model.sim.begin_drag(index);
        }
        if let Some(index) = self.model.dragging {
            if let Some(pointer) = pointer {
                let world = self.model.viewport.screen_to_world(rect, pointer);
                self.model.sim.drag_to(index, world.to_vec2());
            }
            if response.drag_stopped() {
                self.model.sim.end_drag(index);
                self.model.dragging = None;
            }
        } else if response.dragged() {
            self.model.viewport.pan_by(response.drag_delta());
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            self.model.selected = hovered.and_then(|index| {
                self.model.data.nodes.get(index).map(|node| node.id.clone())
            });
        }

        let matches = self.search_matches();
        let search_active = matches
            .as_ref()
            .is_some_and(|matches| matches.iter().any(|&matched| matched));
        let selected_index = self
            .model
            .selected
            .as_deref()
            .and_then(|id| self.model.sim.index_of(id));

        let zoom_sqrt = zoom.sqrt();
        for &(from, to) in &self.model.edges {
            let start = screen_positions[from];
            let end = screen_positions[to];
            if !edge_visible(rect, start, end, 2.5) {
                continue;
            }

            let touches_focus = hovered == Some(from)
                || hovered == Some(to)
                || selected_index == Some(from)
                || selected_index == Some(to);
            let (line_width, line_color) = if touches_focus {
                (
                    (2.4 * zoom_sqrt).clamp(1.2, 4.4),
                    Color32::from_rgb(246, 206, 104),
                )
            } else {
                (
                    (1.2 * zoom_sqrt).clamp(0.6, 3.2),
                    Color32::from_rgba_unmultiplied(72, 78, 86, 180),
                )
            };
            painter.line_segment([start, end], Stroke::new(line_width, line_color));
        }

        for (index, node) in self.model.data.nodes.iter().enumerate() {
            let position = screen_positions[index];
            if !circle_visible(rect, position, node_radius + 4.0) {
                continue;
            }

            let is_selected = selected_index == Some(index);
            let is_hovered = hovered == Some(index);
            let is_match = matches
                .as_ref()
                .is_some_and(|matches| matches.get(index).copied().unwrap_or(false));

            let base = category_color(node.category);
            let color = if is_hovered {
                blend_color(base, Color32::WHITE, 0.25)
            } else if is_match {
                blend_color(base, Color32::from_rgb(103, 196, 255), 0.45)
            } else if search_active {
                dim_color(base, 0.40)
            } else {
                base
            };

            painter.circle_filled(position, node_radius, color);
            painter.circle_stroke(
                position,
                node_radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );

            if is_selected {
                painter.circle_stroke(
                    position,
                    node_radius + 4.0,
                    Stroke::new(2.0, Color32::from_rgb(245, 206, 93)),
                );
            }

            if let Some(passed) = node.metrics.as_ref().and_then(|metrics| metrics.gate_passed()) {
                let dot = position + vec2(node_radius * 0.7, -node_radius * 0.7);
                let dot_color = if passed {
                    Color32::from_rgb(63, 185, 80)
                } else {
                    Color32::from_rgb(248, 81, 73)
                };
                painter.circle_filled(dot, (node_radius * 0.22).max(2.5), dot_color);
            }

            let should_draw_label = is_selected || is_hovered || is_match || zoom > 0.9;
            if should_draw_label {
                painter.text(
                    position + vec2(0.0, node_radius + 4.0),
                    Align2::CENTER_TOP,
                    &node.label,
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if let Some(index) = hovered
            && let Some(node) = self.model.data.nodes.get(index)
        {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  {} connections",
                    node.label,
                    node.category.label(),
                    node.connections.len()
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
