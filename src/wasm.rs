//! WASM API module for browser/JS interop
//!
//! Exposes a lane whose backing buffer the page copies into an `ImageData`
//! after each animation frame.

use wasm_bindgen::prelude::*;

use crate::crosswalk::{CrosswalkRenderer, HeadlessLane};
use crate::models::{Archetype, LaneProfile};
use crate::output::encode_png;
use crate::random::SmallRandom;
use crate::schedule::FrameTicket;
use crate::spritesheet::SpriteSheet;
use crate::surface::{ImageSurface, Surface, Viewport};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn parse_archetype(name: &str) -> Result<Archetype, JsValue> {
    name.parse::<Archetype>().map_err(|e| JsValue::from_str(&e))
}

/// One animated lane driven by `requestAnimationFrame` timestamps.
#[wasm_bindgen]
pub struct WasmLane {
    inner: HeadlessLane,
    ticket: Option<FrameTicket>,
}

#[wasm_bindgen]
impl WasmLane {
    /// Create a lane for `archetype` ("human" or "robot").
    ///
    /// A `seed` of `undefined` seeds from the platform RNG.
    #[wasm_bindgen(constructor)]
    pub fn new(
        archetype: &str,
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
        rate: f64,
        seed: Option<u64>,
    ) -> Result<WasmLane, JsValue> {
        let archetype = parse_archetype(archetype)?;
        let inner = CrosswalkRenderer::new(
            LaneProfile::for_archetype(archetype),
            ImageSurface::new(0, 0),
            Viewport::new(width, height, device_pixel_ratio),
            rate,
            SmallRandom::from_option(seed),
        );
        Ok(WasmLane { inner, ticket: None })
    }

    #[wasm_bindgen(js_name = setRate)]
    pub fn set_rate(&mut self, rate: f64) {
        self.inner.set_rate(rate);
    }

    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
        self.inner.on_resize(Viewport::new(width, height, device_pixel_ratio));
    }

    pub fn start(&mut self) {
        self.ticket = Some(self.inner.start());
    }

    pub fn stop(&mut self) {
        self.inner.stop();
        self.ticket = None;
    }

    /// Advance to `timestamp` (milliseconds) and redraw.
    ///
    /// Returns false once the lane has been stopped; the caller should stop
    /// requesting frames.
    pub fn frame(&mut self, timestamp: f64) -> bool {
        let Some(ticket) = self.ticket else {
            return false;
        };
        self.ticket = self.inner.frame(ticket, timestamp);
        self.ticket.is_some()
    }

    /// Backing buffer width in device pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.surface().backing_size().0
    }

    /// Backing buffer height in device pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.surface().backing_size().1
    }

    /// Raw RGBA pixel data (4 bytes per pixel)
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.surface().pixels().to_vec()
    }

    #[wasm_bindgen(getter, js_name = walkerCount)]
    pub fn walker_count(&self) -> usize {
        self.inner.walkers().len()
    }
}

/// Render the six-frame sheet for one palette to PNG bytes.
///
/// Returns an empty array if the archetype is unknown.
#[wasm_bindgen(js_name = spriteSheetPng)]
pub fn sprite_sheet_png(archetype: &str, palette: usize) -> Vec<u8> {
    let Ok(archetype) = archetype.parse::<Archetype>() else {
        return Vec::new();
    };
    let sheet = SpriteSheet::build(archetype, palette, archetype.sprite_scale());
    encode_png(&sheet.to_strip(None)).unwrap_or_default()
}
