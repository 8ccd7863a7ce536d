use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use glscene_assets::AssetsRoot;
use glscene_core::{SceneKind, ViewerConfig};
use glscene_scenes::scene_catalog;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

mod app;

use app::App;

#[derive(Parser, Debug, Default)]
#[command(name = "glscene-viewer", about = "OpenGL demo scene viewer")]
struct Cli {
    /// JSON viewer config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial scene (see --list)
    #[arg(long)]
    scene: Option<SceneKind>,

    /// Assets directory (textures/, models/). Searched upward from the working directory
    /// when neither this nor the config sets it.
    #[arg(long)]
    assets: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Print the scene list and exit
    #[arg(long)]
    list: bool,

    /// Debug logging (RUST_LOG wins when set)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.list {
        print!("{}", catalog_text());
        return Ok(());
    }

    let cfg = resolve_config(&cli)?;
    let assets = resolve_assets(cfg.assets.as_deref())?;
    tracing::info!(
        scene = %cfg.scene,
        assets = %assets.dir().display(),
        width = cfg.window.width,
        height = cfg.window.height,
        "starting viewer"
    );
    for line in catalog_text().lines() {
        tracing::info!("{line}");
    }
    tracing::info!("Esc quit | 1-9 scene | F offscreen | Tab capture mouse | WASD/arrows move");

    let event_loop = EventLoop::new();
    let app = App::new(&event_loop, &cfg, assets)?;
    app.run(event_loop)
}

fn catalog_text() -> String {
    scene_catalog()
        .into_iter()
        .map(|(key, name, description)| format!("{key}  {name:<12} {description}\n"))
        .collect()
}

/// Defaults, then the config file, then CLI flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<ViewerConfig> {
    let mut cfg = match &cli.config {
        Some(path) => ViewerConfig::from_json_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    if let Some(scene) = cli.scene {
        cfg.scene = scene;
    }
    if let Some(dir) = &cli.assets {
        cfg.assets = Some(dir.clone());
    }
    if let Some(w) = cli.width {
        cfg.window.width = w;
    }
    if let Some(h) = cli.height {
        cfg.window.height = h;
    }

    let origin = cli.config.as_deref().unwrap_or(Path::new("<command line>"));
    cfg.validate(origin)?;
    Ok(cfg)
}

fn resolve_assets(explicit: Option<&Path>) -> anyhow::Result<AssetsRoot> {
    if let Some(dir) = explicit {
        return Ok(AssetsRoot::from_dir(dir)?);
    }
    let cwd = std::env::current_dir().context("reading working directory")?;
    match AssetsRoot::discover(&cwd) {
        Ok(root) => Ok(root),
        Err(e) => {
            // `cargo run` from elsewhere: try next to the executable
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(Path::to_path_buf));
            match exe_dir {
                Some(dir) => AssetsRoot::discover(dir).map_err(|_| e.into()),
                None => Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "glscene-viewer",
            "--scene",
            "stencil",
            "--width",
            "1280",
        ]);
        let cfg = resolve_config(&cli).unwrap();
        assert_eq!(cfg.scene, SceneKind::Stencil);
        assert_eq!(cfg.window.width, 1280);
        assert_eq!(cfg.window.height, 600);
    }

    #[test]
    fn unknown_scene_flag_is_rejected() {
        assert!(Cli::try_parse_from(["glscene-viewer", "--scene", "teapot"]).is_err());
    }

    #[test]
    fn zero_size_flag_fails_validation() {
        let cli = Cli::parse_from(["glscene-viewer", "--height", "0"]);
        let err = resolve_config(&cli).unwrap_err();
        assert!(err.to_string().contains("non-zero"), "{err}");
    }

    #[test]
    fn flags_override_config_file() {
        let path = std::env::temp_dir().join(format!("glscene_viewer_cli_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "scene": "cubemap", "window": { "width": 640 } }"#).unwrap();

        let cli = Cli {
            config: Some(path.clone()),
            width: Some(900),
            ..Cli::default()
        };
        let cfg = resolve_config(&cli).unwrap();
        assert_eq!(cfg.scene, SceneKind::Cubemap);
        assert_eq!(cfg.window.width, 900);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn catalog_lists_every_scene() {
        let text = catalog_text();
        assert_eq!(text.lines().count(), SceneKind::ALL.len());
        assert!(text.starts_with("1  triangle"));
    }
}
