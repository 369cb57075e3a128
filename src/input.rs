use egui::{Pos2, Vec2};

/// A pointer event in device (display) coordinates, as delivered by the
/// surrounding UI layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Pos2 },
    Moved { position: Pos2 },
    Up { position: Pos2 },
}

impl PointerEvent {
    pub fn position(&self) -> Pos2 {
        match self {
            PointerEvent::Down { position }
            | PointerEvent::Moved { position }
            | PointerEvent::Up { position } => *position,
        }
    }
}

/// Translates device-space pointer positions into surface pixels via the
/// ratio of surface size to displayed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMapping {
    pub surface_size: Vec2,
    pub display_size: Vec2,
}

impl SurfaceMapping {
    /// Identity mapping: the surface is displayed at its pixel size.
    pub fn identity(surface_size: Vec2) -> Self {
        Self {
            surface_size,
            display_size: surface_size,
        }
    }

    pub fn to_surface(&self, device: Pos2) -> Pos2 {
        let sx = if self.display_size.x > 0.0 {
            self.surface_size.x / self.display_size.x
        } else {
            1.0
        };
        let sy = if self.display_size.y > 0.0 {
            self.surface_size.y / self.display_size.y
        } else {
            1.0
        };
        Pos2::new(device.x * sx, device.y * sy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn maps_display_coordinates_to_surface_pixels() {
        let mapping = SurfaceMapping {
            surface_size: vec2(200.0, 100.0),
            display_size: vec2(100.0, 100.0),
        };
        assert_eq!(mapping.to_surface(pos2(50.0, 50.0)), pos2(100.0, 50.0));
    }

    #[test]
    fn identity_mapping_is_a_passthrough() {
        let mapping = SurfaceMapping::identity(vec2(64.0, 64.0));
        assert_eq!(mapping.to_surface(pos2(10.5, 3.0)), pos2(10.5, 3.0));
    }
}
