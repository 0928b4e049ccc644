use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub mod animation;
pub mod config;
pub mod error;
pub mod growth;
pub mod math;
pub mod particles;
pub mod render;
pub mod scene;
pub mod sky;
pub mod terrain;
pub mod visual;

pub use config::{SceneConfig, SceneMode};
pub use error::SceneError;
pub use scene::{Lifecycle, Scene};

use config::SurfaceConfig;
use math::SceneRng;
use render::{FrameDriver, WebCanvas};

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("canvas-tree: a logger is already installed"));
    }
}

type WebScene = Scene<WebCanvas, SceneRng>;

/// Animated canvas scene exposed to JavaScript
#[wasm_bindgen]
pub struct CanvasTree {
    scene: Rc<RefCell<WebScene>>,
    driver: FrameDriver,
}

#[wasm_bindgen]
impl CanvasTree {
    /// Build a landscape scene on `canvas` with default settings and start it
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<CanvasTree, JsValue> {
        Self::build(canvas, SceneConfig::default()).map_err(JsValue::from)
    }

    /// Build a scene from a YAML configuration document and start it
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(canvas: HtmlCanvasElement, yaml: &str) -> Result<CanvasTree, JsValue> {
        let config = SceneConfig::from_yaml(yaml)?;
        Self::build(canvas, config).map_err(JsValue::from)
    }

    fn build(canvas: HtmlCanvasElement, config: SceneConfig) -> Result<CanvasTree, SceneError> {
        if config.surface.fit_to_window {
            fit_to_window(&canvas, &config.surface)?;
        }

        let rng = SceneRng::seeded(seed_from_unit(js_sys::Math::random()));
        let scene = Rc::new(RefCell::new(Scene::initialize(&canvas, config, rng)?));

        let frame_scene = Rc::clone(&scene);
        let driver = FrameDriver::new(move |now| {
            let Ok(mut scene) = frame_scene.try_borrow_mut() else {
                return true;
            };
            match scene.on_frame(now) {
                Ok(more) => more,
                // Tree growth has already aborted and logged
                Err(_) => scene.needs_frames(),
            }
        });

        let tree = CanvasTree { scene, driver };
        tree.start()?;
        Ok(tree)
    }

    /// Start (or resume) the animation; no-op if already running
    #[wasm_bindgen]
    pub fn enable(&self) -> Result<(), JsValue> {
        self.start().map_err(JsValue::from)
    }

    fn start(&self) -> Result<(), SceneError> {
        let enabled = self.scene.borrow_mut().enable();
        if enabled {
            self.driver.start()?;
        }
        Ok(())
    }

    /// Pause the animation. A growing tree finishes on its own.
    #[wasm_bindgen]
    pub fn disable(&self) {
        let mut scene = self.scene.borrow_mut();
        scene.disable();
        if !scene.needs_frames() {
            self.driver.stop();
        }
    }

    /// Stop everything and release the scene; the instance is inert afterwards
    #[wasm_bindgen]
    pub fn destroy(&self) {
        self.driver.release();
        self.scene.borrow_mut().destroy();
    }

    /// Drive one frame manually at host time `now` (ms)
    #[wasm_bindgen]
    pub fn frame(&self, now: f64) -> Result<bool, JsValue> {
        self.scene.borrow_mut().on_frame(now).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = isEnabled)]
    pub fn is_enabled(&self) -> bool {
        self.scene.borrow().is_enabled()
    }

    #[wasm_bindgen(js_name = branchCount)]
    pub fn branch_count(&self) -> usize {
        self.scene.borrow().branch_count()
    }

    #[wasm_bindgen(js_name = cloudCount)]
    pub fn cloud_count(&self) -> usize {
        self.scene.borrow().cloud_count()
    }

    /// Position of the sun along its path, or undefined once destroyed
    #[wasm_bindgen(js_name = sunProgress)]
    pub fn sun_progress(&self) -> Option<f32> {
        self.scene.borrow().sun_progress()
    }
}

/// Size the canvas from the window width before the layout is read
fn fit_to_window(canvas: &HtmlCanvasElement, surface: &SurfaceConfig) -> Result<(), SceneError> {
    let window = web_sys::window().ok_or_else(|| SceneError::Host("no global window".to_string()))?;
    let inner_width = window
        .inner_width()
        .map_err(|e| SceneError::Host(format!("innerWidth unavailable: {:?}", e)))?
        .as_f64()
        .unwrap_or(0.0);

    let (width, height) = surface.fit(inner_width.max(0.0) as u32);
    canvas.set_width(width);
    canvas.set_height(height);
    log::debug!("canvas fitted to {}x{}", width, height);
    Ok(())
}

/// Map a unit sample from the host's Math.random onto a 64-bit seed
fn seed_from_unit(sample: f64) -> u64 {
    (sample.clamp(0.0, 1.0) * u64::MAX as f64) as u64
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
        let document = web_sys::window().unwrap().document().unwrap();
        let canvas: HtmlCanvasElement = document.create_element("canvas").unwrap().dyn_into().unwrap();
        canvas.set_width(width);
        canvas.set_height(height);
        canvas
    }

    #[wasm_bindgen_test]
    fn starts_enabled_and_destroys() {
        let tree = CanvasTree::new(canvas(800, 500)).unwrap();
        assert!(tree.is_enabled());
        assert_eq!(tree.cloud_count(), 3);

        tree.disable();
        assert!(!tree.is_enabled());

        tree.destroy();
        assert_eq!(tree.sun_progress(), None);
        assert!(tree.enable().is_ok());
        assert!(!tree.is_enabled());
    }

    #[wasm_bindgen_test]
    fn tree_mode_grows_on_manual_frames() {
        let tree = CanvasTree::with_config(canvas(800, 500), "mode: tree").unwrap();
        tree.frame(0.0).unwrap();
        tree.frame(5000.0).unwrap();
        assert_eq!(tree.branch_count(), 2);
        tree.destroy();
    }

    #[wasm_bindgen_test]
    fn rejects_bad_yaml() {
        assert!(CanvasTree::with_config(canvas(800, 500), "fps: -1").is_err());
    }
}
