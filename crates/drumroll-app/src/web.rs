//! WebAssembly bindings.
//!
//! JavaScript owns the DOM listeners and the `requestAnimationFrame` loop; it forwards
//! events to a [`WebWheel`] or [`WebOrbit`] and keeps requesting frames while `frame`
//! returns true.

use drumroll_core::{
    FrameClock, InputEvent, OptionList, OrbitConfig, OrbitSelector, PointerTracker,
    ScrollConfig, SharedPointer, WheelSelector, Widget,
};
use js_sys::Function;
use kurbo::{Point, Size, Vec2};
use wasm_bindgen::prelude::*;
use web_time::Instant;

/// Install the panic hook and console logger.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// A wheel selector over string labels, driven from JavaScript.
#[wasm_bindgen]
pub struct WebWheel {
    selector: WheelSelector<String>,
    clock: FrameClock,
    origin: Instant,
}

#[wasm_bindgen]
impl WebWheel {
    /// `labels` is an array of strings; `config` is an optional scroll config object.
    #[wasm_bindgen(constructor)]
    pub fn new(labels: JsValue, initial: Option<String>, config: JsValue) -> Result<WebWheel, JsError> {
        let labels: Vec<String> = serde_wasm_bindgen::from_value(labels)?;
        let config: ScrollConfig = if config.is_undefined() || config.is_null() {
            ScrollConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };

        let options = OptionList::from_labels(labels)?;
        let initial = match initial {
            Some(label) => label,
            None => options
                .get(0)
                .map(|option| option.value.clone())
                .unwrap_or_default(),
        };
        let selector = WheelSelector::new(options, &initial, config)?;
        log::info!("Created wheel {}", selector.id());

        Ok(Self {
            selector,
            clock: FrameClock::new(),
            origin: Instant::now(),
        })
    }

    /// Register `callback(label, index)` for value changes. Replaces any previous one.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: Function) {
        self.selector.on_value_change(move |label: &String, index| {
            let result = callback.call2(
                &JsValue::NULL,
                &JsValue::from_str(label),
                &JsValue::from(index as u32),
            );
            if let Err(err) = result {
                web_sys::console::error_2(&"Value-change callback threw".into(), &err);
            }
        });
    }

    pub fn wheel(&mut self, delta_x: f64, delta_y: f64) -> bool {
        let event = InputEvent::Motion {
            delta: Vec2::new(delta_x, delta_y),
            timestamp_ms: self.now_ms(),
        };
        self.selector.handle_event(&event)
    }

    pub fn press(&mut self, x: f64, y: f64) -> bool {
        self.send_press(true, x, y)
    }

    #[wasm_bindgen(js_name = moveTo)]
    pub fn move_to(&mut self, x: f64, y: f64) -> bool {
        let event = InputEvent::PointerMove {
            position: Point::new(x, y),
            timestamp_ms: self.now_ms(),
        };
        self.selector.handle_event(&event)
    }

    pub fn release(&mut self, x: f64, y: f64) -> bool {
        self.send_press(false, x, y)
    }

    /// Report the number of active touches (0 on `touchend`/`touchcancel`).
    pub fn touches(&mut self, count: u32) -> bool {
        let event = InputEvent::TouchCount {
            count: count as usize,
            timestamp_ms: self.now_ms(),
        };
        self.selector.handle_event(&event)
    }

    /// Advance to the `requestAnimationFrame` timestamp. Returns true while more frames
    /// are needed.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        let dt = self.clock.advance(timestamp_ms);
        self.selector.tick(dt);
        let more = self.selector.state().needs_frames();
        if !more {
            self.clock.reset();
        }
        more
    }

    /// Scroll position in item-extent units (pixels, or degrees on a 3D drum).
    #[wasm_bindgen(js_name = renderPosition)]
    pub fn render_position(&self) -> f64 {
        self.selector.render_state().position
    }

    #[wasm_bindgen(js_name = selectedIndex)]
    pub fn selected_index(&self) -> usize {
        self.selector.selected_index()
    }

    #[wasm_bindgen(js_name = selectedLabel)]
    pub fn selected_label(&self) -> Option<String> {
        self.selector.selected().map(|option| option.label.clone())
    }

    pub fn destroy(&mut self) {
        self.selector.destroy();
        self.clock.reset();
    }
}

impl WebWheel {
    fn send_press(&mut self, pressed: bool, x: f64, y: f64) -> bool {
        let event = InputEvent::Press {
            pressed,
            position: Point::new(x, y),
            timestamp_ms: self.now_ms(),
        };
        self.selector.handle_event(&event)
    }

    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A 3D object selector driven from JavaScript.
///
/// Mouse and single-finger moves go through `moveTo`; two-finger touches through
/// `pair`; Safari `gesturechange` through `trackpad`, ended by `touches(0)`.
#[wasm_bindgen]
pub struct WebOrbit {
    selector: OrbitSelector,
    pointer: SharedPointer,
    clock: FrameClock,
    origin: Instant,
}

#[wasm_bindgen]
impl WebOrbit {
    /// `config` is an optional orbit config object. The viewport is the element size
    /// used to normalize the hover tilt.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config: JsValue) -> Result<WebOrbit, JsError> {
        let config: OrbitConfig = if config.is_undefined() || config.is_null() {
            OrbitConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let pointer = PointerTracker::shared(Size::new(width, height));
        let selector = OrbitSelector::new(config)?.with_pointer(pointer.clone());
        log::info!("Created orbit {}", selector.id());

        Ok(Self {
            selector,
            pointer,
            clock: FrameClock::new(),
            origin: Instant::now(),
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.pointer.borrow_mut().set_viewport(Size::new(width, height));
    }

    pub fn wheel(&mut self, delta_x: f64, delta_y: f64) -> bool {
        let event = InputEvent::Motion {
            delta: Vec2::new(delta_x, delta_y),
            timestamp_ms: self.now_ms(),
        };
        self.send(event)
    }

    pub fn press(&mut self, x: f64, y: f64) -> bool {
        let event = InputEvent::Press {
            pressed: true,
            position: Point::new(x, y),
            timestamp_ms: self.now_ms(),
        };
        self.send(event)
    }

    /// Pointer moved, pressed or not. Also feeds the hover tilt.
    #[wasm_bindgen(js_name = moveTo)]
    pub fn move_to(&mut self, x: f64, y: f64) -> bool {
        let event = InputEvent::PointerMove {
            position: Point::new(x, y),
            timestamp_ms: self.now_ms(),
        };
        self.send(event)
    }

    pub fn release(&mut self, x: f64, y: f64) -> bool {
        let event = InputEvent::Press {
            pressed: false,
            position: Point::new(x, y),
            timestamp_ms: self.now_ms(),
        };
        self.send(event)
    }

    /// Report the number of active touches (0 on `touchend` and `gestureend`).
    pub fn touches(&mut self, count: u32) -> bool {
        let event = InputEvent::TouchCount {
            count: count as usize,
            timestamp_ms: self.now_ms(),
        };
        self.send(event)
    }

    /// Positions of the first two active touches.
    pub fn pair(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
        let event = InputEvent::TwoPoint {
            p1: Point::new(x1, y1),
            p2: Point::new(x2, y2),
            timestamp_ms: self.now_ms(),
        };
        self.send(event)
    }

    /// `scale` and `rotation` (degrees) as reported by `gesturechange`.
    pub fn trackpad(&mut self, scale: f64, rotation: f64) -> bool {
        let event = InputEvent::Trackpad {
            scale,
            rotation_degrees: rotation,
            timestamp_ms: self.now_ms(),
        };
        self.send(event)
    }

    /// Advance to the `requestAnimationFrame` timestamp. Returns true while more frames
    /// are needed.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        let dt = self.clock.advance(timestamp_ms);
        self.selector.tick(dt);
        let more = self.selector.state().needs_frames();
        if !more {
            self.clock.reset();
        }
        more
    }

    /// Column-major 4x4 model matrix, hover tilt included.
    pub fn matrix(&self) -> Vec<f64> {
        self.selector.render_state().matrix().to_cols_array().to_vec()
    }

    /// Name of the active gesture, e.g. `"Twist"`.
    pub fn gesture(&self) -> String {
        format!("{:?}", self.selector.render_state().gesture)
    }

    #[wasm_bindgen(js_name = resetOrientation)]
    pub fn reset_orientation(&mut self) {
        self.selector.reset_orientation();
    }

    pub fn destroy(&mut self) {
        self.selector.destroy();
        self.clock.reset();
    }
}

impl WebOrbit {
    fn send(&mut self, event: InputEvent) -> bool {
        if let Ok(mut tracker) = self.pointer.try_borrow_mut() {
            tracker.handle_event(&event);
        }
        self.selector.handle_event(&event)
    }

    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
