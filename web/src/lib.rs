use assetsweeper_core::Difficulty;
use clap::Parser;
use wasm_bindgen::prelude::*;

mod game;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Skip the start dialog and play this difficulty (easy, medium, hard)
    #[arg(short, long)]
    difficulty: Option<Difficulty>,
}

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(location_hash.split(['#', '&']))
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).map_err(|err| JsValue::from_str(&err.to_string()))?;
    }
    log::debug!("seed: {:?}, difficulty: {:?}", args.seed, args.difficulty);

    let root = document()
        .get_element_by_id("game")
        .ok_or_else(|| JsValue::from_str("Could not find id=\"game\" element"))?;

    let props = game::SweeperProps {
        seed: args.seed,
        difficulty: args.difficulty,
    };

    log::debug!("App started");
    yew::Renderer::<game::SweeperApp>::with_root_and_props(root, props).render();
    Ok(())
}
