use wasm_bindgen::prelude::*;

mod sim;
use sim::SolarScene;

orrery_web::export_sim!(SolarScene, "solar-scene", scene);
