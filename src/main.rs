use anyhow::{Context, Result};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};

use fbg::backends::Headless;
use fbg::cli::{Cli, SceneKind};
use fbg::config::ContextConfig;
use fbg::frame::FrameIterator;
use fbg::scenes::{AsciiScene, AtlasTextScene, BoxesScene, RainScene, WebScene};
use fbg::traits::{Backend, DynContext, Scene};
use fbg::RenderContext;

static KEEP_RUNNING: AtomicBool = AtomicBool::new(true);

extern "C" fn handle_sigint(_signal: libc::c_int) {
    KEEP_RUNNING.store(false, Ordering::SeqCst);
}

fn install_sigint_handler() {
    // SAFETY: the handler only performs an atomic store, which is
    // async-signal-safe.
    unsafe {
        libc::signal(libc::SIGINT, handle_sigint as libc::sighandler_t);
    }
}

#[cfg(target_os = "linux")]
fn open_device(cli: &Cli, config: &mut ContextConfig) -> Result<Box<dyn Backend>> {
    use fbg::backends::{FbDev, FbDevOptions};

    let options = FbDevOptions {
        page_flip: cli.page_flip,
        force_bgr: config.bgr,
    };
    let device = FbDev::open(&cli.device, options)
        .with_context(|| format!("Failed to open framebuffer {:?}", cli.device))?;

    // The device mode is fixed: draw at its resolution
    let (width, height) = device.dimensions();
    config.width = width;
    config.height = height;
    config.allow_resizing = false;

    Ok(Box::new(device))
}

#[cfg(not(target_os = "linux"))]
fn open_device(cli: &Cli, _config: &mut ContextConfig) -> Result<Box<dyn Backend>> {
    anyhow::bail!("framebuffer devices need Linux ({:?}); use --headless", cli.device)
}

fn build_scene(kind: SceneKind, cli: &Cli, ctx: &mut DynContext) -> Result<Box<dyn Scene>> {
    let (width, height) = (ctx.width(), ctx.height());
    Ok(match kind {
        SceneKind::Boxes => Box::new(BoxesScene::new(width, height)),
        SceneKind::Web => Box::new(WebScene::new(width, height)),
        SceneKind::Ascii => Box::new(AsciiScene::new(width, height, cli.word.clone())),
        SceneKind::AtlasText => Box::new(AtlasTextScene::new(ctx)?),
        SceneKind::Rain => Box::new(RainScene::new(width, height)),
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = cli.context_config()?;

    let backend: Box<dyn Backend> = if cli.headless {
        Box::new(Headless::new())
    } else {
        open_device(&cli, &mut config)?
    };

    let mut ctx = RenderContext::with_config(&config, backend).context("Failed to create render context")?;
    let mut scene = build_scene(cli.scene, &cli, &mut ctx)?;

    install_sigint_handler();
    log::info!("running {} scene", scene.name());

    let frames = match cli.frames {
        Some(limit) => FrameIterator::with_limit(limit),
        None => FrameIterator::new(),
    };

    let mut drawn = 0u64;
    for frame in frames {
        if !KEEP_RUNNING.load(Ordering::SeqCst) {
            break;
        }

        ctx.draw()?;
        scene.update(&frame, ctx.width(), ctx.height());
        scene.draw(&mut ctx)?;
        ctx.flip()?;
        drawn += 1;
    }

    log::info!(
        "{} stopped after {} frames ({} fps)",
        scene.name(),
        drawn,
        ctx.framerate()
    );
    Ok(())
}
