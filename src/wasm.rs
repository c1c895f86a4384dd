//! WebAssembly bindings for the fluid solver.
//!
//! Provides a thin wrapper around `FluidSolver` for browser environments.
//! Field getters copy into typed arrays indexed by `x + y * size`.

use wasm_bindgen::prelude::*;

use crate::{
    compute::{FluidError, FluidSolver, FluidStats},
    schema::{ConfigError, FluidConfig, Rgb, Scenario},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

fn config_error(e: ConfigError) -> JsValue {
    JsValue::from_str(&format!("Invalid configuration: {e}"))
}

fn fluid_error(e: FluidError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Convert JS integer coordinates, rejecting negatives.
fn cell(x: i32, y: i32) -> Result<(usize, usize), JsValue> {
    match (usize::try_from(x), usize::try_from(y)) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        _ => Err(JsValue::from_str(&format!("Cell ({x}, {y}) is outside the grid"))),
    }
}

/// WebAssembly wrapper for the fluid solver.
#[wasm_bindgen]
pub struct WasmFluid {
    solver: FluidSolver,
    scenario: Option<Scenario>,
}

#[wasm_bindgen]
impl WasmFluid {
    /// Create a solver from raw parameters.
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize, dt: f32, diffusion: f32, viscosity: f32) -> Result<WasmFluid, JsValue> {
        let solver = FluidSolver::with_params(size, dt, diffusion, viscosity).map_err(config_error)?;
        Ok(WasmFluid {
            solver,
            scenario: None,
        })
    }

    /// Create a solver from a JSON `FluidConfig`.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config_json: &str) -> Result<WasmFluid, JsValue> {
        let config = FluidConfig::from_json(config_json).map_err(config_error)?;
        let solver = FluidSolver::new(config).map_err(config_error)?;
        Ok(WasmFluid {
            solver,
            scenario: None,
        })
    }

    /// Perform one simulation step, applying per-step scenario input first.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<(), JsValue> {
        let step = self.solver.steps();
        if let Some(scenario) = &self.scenario {
            scenario
                .apply_step(&mut self.solver, step)
                .map_err(fluid_error)?;
        }
        self.solver.step();
        Ok(())
    }

    /// Run multiple simulation steps.
    #[wasm_bindgen]
    pub fn run(&mut self, steps: u64) -> Result<(), JsValue> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Add dye at a cell.
    #[wasm_bindgen(js_name = addDensity)]
    pub fn add_density(&mut self, x: i32, y: i32, amount: f32, r: f32, g: f32, b: f32) -> Result<(), JsValue> {
        let (x, y) = cell(x, y)?;
        self.solver
            .add_density(x, y, amount, Rgb::new(r, g, b))
            .map_err(fluid_error)
    }

    /// Add a velocity impulse at a cell.
    #[wasm_bindgen(js_name = addVelocity)]
    pub fn add_velocity(&mut self, x: i32, y: i32, dx: f32, dy: f32) -> Result<(), JsValue> {
        let (x, y) = cell(x, y)?;
        self.solver.add_velocity(x, y, dx, dy).map_err(fluid_error)
    }

    /// Add a random impulse with components in `[-strength / 2, strength / 2)`.
    #[wasm_bindgen(js_name = addRandomVelocity)]
    pub fn add_random_velocity(&mut self, x: i32, y: i32, strength: f32) -> Result<(), JsValue> {
        let dx = (js_sys::Math::random() as f32 - 0.5) * strength;
        let dy = (js_sys::Math::random() as f32 - 0.5) * strength;
        self.add_velocity(x, y, dx, dy)
    }

    /// Mark a cell as solid.
    #[wasm_bindgen(js_name = addObstacle)]
    pub fn add_obstacle(&mut self, x: i32, y: i32) -> Result<(), JsValue> {
        let (x, y) = cell(x, y)?;
        self.solver.add_obstacle(x, y).map_err(fluid_error)
    }

    /// Load a JSON `Scenario`: setup is applied now, per-step input on every step.
    #[wasm_bindgen(js_name = setScenario)]
    pub fn set_scenario(&mut self, scenario_json: &str) -> Result<(), JsValue> {
        let scenario: Scenario = serde_json::from_str(scenario_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid scenario JSON: {e}")))?;
        scenario.apply_setup(&mut self.solver).map_err(fluid_error)?;
        self.scenario = Some(scenario);
        Ok(())
    }

    /// Zero all fluid fields, keeping obstacles.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.solver.clear();
    }

    #[wasm_bindgen(js_name = setViscosity)]
    pub fn set_viscosity(&mut self, viscosity: f32) -> Result<(), JsValue> {
        self.solver.set_viscosity(viscosity).map_err(config_error)
    }

    #[wasm_bindgen(js_name = getViscosity)]
    pub fn get_viscosity(&self) -> f32 {
        self.solver.viscosity()
    }

    #[wasm_bindgen(js_name = setDiffusion)]
    pub fn set_diffusion(&mut self, diffusion: f32) -> Result<(), JsValue> {
        self.solver.set_diffusion(diffusion).map_err(config_error)
    }

    #[wasm_bindgen(js_name = getDiffusion)]
    pub fn get_diffusion(&self) -> f32 {
        self.solver.diffusion()
    }

    /// Get grid side length.
    #[wasm_bindgen(js_name = getSize)]
    pub fn get_size(&self) -> usize {
        self.solver.size()
    }

    /// Get current step count.
    #[wasm_bindgen(js_name = getStep)]
    pub fn get_step(&self) -> u64 {
        self.solver.steps()
    }

    /// Flat index of a cell.
    #[wasm_bindgen]
    pub fn index(&self, x: i32, y: i32) -> Result<usize, JsValue> {
        let (x, y) = cell(x, y)?;
        self.solver.grid().try_index(x, y).map_err(fluid_error)
    }

    #[wasm_bindgen]
    pub fn density(&self) -> Vec<f32> {
        self.solver.density().to_vec()
    }

    #[wasm_bindgen]
    pub fn red(&self) -> Vec<f32> {
        self.solver.red().to_vec()
    }

    #[wasm_bindgen]
    pub fn green(&self) -> Vec<f32> {
        self.solver.green().to_vec()
    }

    #[wasm_bindgen]
    pub fn blue(&self) -> Vec<f32> {
        self.solver.blue().to_vec()
    }

    #[wasm_bindgen(js_name = velocityX)]
    pub fn velocity_x(&self) -> Vec<f32> {
        self.solver.velocity_x().to_vec()
    }

    #[wasm_bindgen(js_name = velocityY)]
    pub fn velocity_y(&self) -> Vec<f32> {
        self.solver.velocity_y().to_vec()
    }

    /// Obstacle mask as 0/1 bytes.
    #[wasm_bindgen]
    pub fn obstacles(&self) -> Vec<u8> {
        self.solver.obstacles().iter().map(|&o| o as u8).collect()
    }

    /// Get field statistics as a JS object.
    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        let stats = FluidStats::from_solver(&self.solver);
        serde_wasm_bindgen::to_value(&stats)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }
}
