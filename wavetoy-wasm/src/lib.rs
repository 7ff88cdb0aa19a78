use wasm_bindgen::prelude::*;
use wavetoy_core::{Component, WaveToy, WaveToyConfig};

#[wasm_bindgen]
pub struct Solver {
    inner: WaveToy,
}

#[wasm_bindgen]
impl Solver {
    #[wasm_bindgen(constructor)]
    pub fn new(ncells: usize, max_grid_size: usize) -> Result<Solver, JsValue> {
        let cfg = WaveToyConfig {
            ncells,
            max_grid_size,
            ..Default::default()
        };
        let mut inner = WaveToy::new(&cfg).map_err(to_js)?;
        inner.initialize();
        Ok(Solver { inner })
    }

    pub fn ncells(&self) -> usize { self.inner.domain().ncells }
    pub fn num_patches(&self) -> usize { self.inner.field().num_patches() }
    pub fn time(&self) -> f64 { self.inner.time() }
    pub fn delta_time(&self) -> f64 { self.inner.delta_time() }
    pub fn iteration(&self) -> u64 { self.inner.iteration() }

    // Copy-based JS access (reliable)
    pub fn get_phi_slice(&self, k: usize) -> Vec<f64> {
        self.inner.slice_xy(Component::Phi, k)
    }
    pub fn get_error_slice(&mut self, k: usize) -> Vec<f64> {
        self.inner.compute_error();
        self.inner.slice_xy(Component::Error, k)
    }

    // Step + timing (WASM-only)
    pub fn step(&mut self, iterations: u32) -> Result<StepInfo, JsValue> {
        let t0 = now_ms();
        for _ in 0..iterations {
            self.inner.step().map_err(to_js)?;
        }
        let t1 = now_ms();
        self.inner.compute_error();
        let norms = self.inner.error_norms();
        Ok(StepInfo {
            iteration: self.inner.iteration(),
            time: self.inner.time(),
            compute_ms: t1 - t0,
            max_error: norms.max_abs,
        })
    }
}

#[wasm_bindgen]
pub struct StepInfo {
    iteration: u64,
    time: f64,
    compute_ms: f64,
    max_error: f64,
}

#[wasm_bindgen]
impl StepInfo {
    pub fn iteration(&self) -> u64 { self.iteration }
    pub fn time(&self) -> f64 { self.time }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
    pub fn max_error(&self) -> f64 { self.max_error }
}


fn to_js(e: wavetoy_core::WaveError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
