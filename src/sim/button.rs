//! UI button feel: pointer state straight to scale, no tick loop

use serde::{Deserialize, Serialize};

const HOVER_SCALE: f32 = 1.05;
const PRESS_SCALE: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerEvent {
    Enter,
    Leave,
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonFeel {
    pub scale: f32,
}

impl Default for ButtonFeel {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl ButtonFeel {
    pub fn apply(&mut self, event: PointerEvent) {
        self.scale = match event {
            PointerEvent::Enter | PointerEvent::Up => HOVER_SCALE,
            PointerEvent::Leave => 1.0,
            PointerEvent::Down => PRESS_SCALE,
        };
    }
}
