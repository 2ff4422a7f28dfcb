use std::f32::consts::{PI, TAU};

pub const CANVAS_W: f32 = 800.0;
pub const CANVAS_H: f32 = 560.0;
pub const CANVAS_CX: f32 = CANVAS_W / 2.0;
pub const CANVAS_CY: f32 = CANVAS_H / 2.0;

const TIER_RADII: [f32; 3] = [80.0, 200.0, 340.0];
const TIER0_SHARE: f32 = 0.05;
const TIER1_SHARE: f32 = 0.20;

/// Deterministic initial coordinates for a degree-ranked visible list:
/// tier 0 (top 5%, min 1) on the innermost ring, tier 1 (next 20%, min 1)
/// on the middle ring with a half-spoke phase offset, the remainder on the
/// outer ring. Output is index-aligned with the input ranking.
pub fn place_radial(count: usize) -> Vec<(f32, f32)> {
    if count == 0 {
        return Vec::new();
    }

    let tier0 = ((count as f32 * TIER0_SHARE).round() as usize).max(1);
    let tier1 = ((count as f32 * TIER1_SHARE).round() as usize).max(1);

    let tier0_end = tier0.min(count);
    let tier1_end = (tier0 + tier1).min(count);

    let mut positions = Vec::with_capacity(count);

    if tier0_end == 1 {
        positions.push((CANVAS_CX, CANVAS_CY));
    } else {
        place_ring(&mut positions, tier0_end, TIER_RADII[0], 0.0);
    }

    let tier1_len = tier1_end - tier0_end;
    if tier1_len > 0 {
        // Phase offset keeps tier 1 spokes from lining up with tier 0.
        place_ring(&mut positions, tier1_len, TIER_RADII[1], PI / tier1_len as f32);
    }

    let tier2_len = count - tier1_end;
    if tier2_len > 0 {
        place_ring(&mut positions, tier2_len, TIER_RADII[2], 0.0);
    }

    positions
}

fn place_ring(positions: &mut Vec<(f32, f32)>, count: usize, radius: f32, offset: f32) {
    for index in 0..count {
        let angle = offset + (TAU * index as f32) / count as f32;
        // The outer ring overshoots the short canvas axis; clamp so initial
        // placement always lands in-canvas.
        positions.push((
            (CANVAS_CX + radius * angle.cos()).round().clamp(0.0, CANVAS_W),
            (CANVAS_CY + radius * angle.sin()).round().clamp(0.0, CANVAS_H),
        ));
    }
}
