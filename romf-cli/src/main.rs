use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use romf_cli::{AppConfig, RomfCliArgs, bootstrap};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = RomfCliArgs::parse();
    init_tracing(&args);

    let mut config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    config.merge_with_env();
    let mut app = bootstrap(&config).context("booting client context")?;

    if args.list_capabilities {
        let summaries = app.capability_summaries();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    app.ctx.toaster_mut()?.on(|title, payload| {
        tracing::info!(title, %payload, "toast");
        Ok(())
    });
    app.mount("#app")?;

    let resolved = app
        .router
        .resolve(&args.route)
        .with_context(|| format!("resolving {}", args.route))?;
    match &resolved.redirected_from {
        Some(from) => println!(
            "{from} -> {} ({})",
            app.router.href(&resolved.path),
            resolved.view.component
        ),
        None => println!(
            "{} ({})",
            app.router.href(&resolved.path),
            resolved.view.component
        ),
    }

    let grill = match args.seed {
        Some(seed) => app.random_grill_with(&mut StdRng::seed_from_u64(seed)),
        None => app.random_grill(),
    };
    if let Some(grill) = grill {
        println!("grill: {} ({}, {} bytes)", grill.path, grill.mime, grill.len());
    }
    Ok(())
}

fn init_tracing(args: &RomfCliArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
