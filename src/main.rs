use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result};

use y_shader::{
    config::{AppConfig, DEFAULT_CONFIG_FILE},
    prepare_scene, GlWindow,
};

fn run() -> Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = AppConfig::load_or_default(&config_path)?;

    config.logging.init()?;
    log::info!("Y_Shader starting");
    log::debug!("Configuration: {:?}", config);

    let (mut window, gl) = GlWindow::create(&config.window)?;
    let gl = Rc::new(gl);

    let mut frame_loop =
        prepare_scene(&gl, &config.shaders).context("Failed to prepare the scene")?;
    frame_loop.run(&mut window);

    log::logger().flush();
    log::info!("Y_Shader finishing");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            log::logger().flush();
            eprintln!("y_shader: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
