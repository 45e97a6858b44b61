//! Browser binding
//!
//! The page owns `requestAnimationFrame`; it calls [`JuiceDemo::frame`] with
//! the rAF timestamp while [`JuiceDemo::wants_frames`] is true and paints
//! the returned JSON.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::driver::DemoDriver;
use crate::settings::Settings;
use crate::sim::{DemoKind, PointerEvent};

#[wasm_bindgen(start)]
pub fn start() {
    super::init_logging();
    log::info!("Juice Guide demos ready");
}

#[wasm_bindgen]
pub struct JuiceDemo {
    driver: DemoDriver,
}

#[wasm_bindgen]
impl JuiceDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(tag: &str, seed: f64) -> JuiceDemo {
        JuiceDemo {
            driver: DemoDriver::with_settings(DemoKind::from_tag(tag), seed as u64, Settings::load()),
        }
    }

    /// Switch demo type; pending timers from the old demo never fire
    pub fn set_type(&mut self, tag: &str) {
        self.driver.switch(DemoKind::from_tag(tag));
    }

    /// Click at container percent coordinates (NaN when unknown)
    pub fn click(&mut self, x: f32, y: f32) {
        let at = (x.is_finite() && y.is_finite()).then(|| Vec2::new(x, y));
        self.driver.click(at);
    }

    pub fn jump(&mut self) {
        self.driver.jump();
    }

    /// "enter", "leave", "down" or "up"
    pub fn pointer(&mut self, event: &str) {
        let event = match event {
            "enter" => PointerEvent::Enter,
            "leave" => PointerEvent::Leave,
            "down" => PointerEvent::Down,
            "up" => PointerEvent::Up,
            other => {
                log::warn!("Unknown pointer event '{}'", other);
                return;
            }
        };
        self.driver.pointer(event);
    }

    pub fn set_juice(&mut self, enabled: bool) {
        self.driver.set_juice(enabled);
    }

    pub fn wants_frames(&self) -> bool {
        self.driver.wants_frames()
    }

    /// Advance to the rAF timestamp and return the frame as JSON
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        self.driver.advance(now_ms);
        self.driver
            .frame()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn save_settings(&self) {
        self.driver.settings().save();
    }
}
