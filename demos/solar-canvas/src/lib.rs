use wasm_bindgen::prelude::*;

mod bodies;
mod sim;
use sim::SolarCanvas;

orrery_web::export_sim!(SolarCanvas, "solar-canvas");
