#![forbid(unsafe_code)]

//! IrisView demo viewer binary entry point.

use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;

use iris_core::StaticSurface;
use iris_demo_viewer::cli;
use iris_demo_viewer::views::{self, UserPrefs, slices};
use iris_engine::{DecoderSet, EngineAdapter, EngineConfig};
use iris_router::{ParamKind, ParamSchema, RouterBuilder};
use iris_shell::{AppContext, AppShell, ViewRegistry};
use iris_store::Store;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let opts = cli::Opts::parse();
    init_logging(opts.log_json);

    if let Err(e) = run(&opts) {
        eprintln!("Failed to start: {e}");
        std::process::exit(1);
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(opts: &cli::Opts) -> Result<(), Box<dyn std::error::Error>> {
    // Store: the cross-view state slices.
    let store = Rc::new(Store::new());
    store.register::<Option<String>>(slices::IMAGE_SESSION, None)?;
    store.register(slices::ACTIVE_TOOL, "scroll".to_string())?;
    store.register(slices::USER_PREFS, UserPrefs::default())?;

    // Router: route table registered before start, frozen at build.
    let router = Rc::new(
        RouterBuilder::new()
            .route("/", "home")?
            .route_with_schema(
                "/view/:studyId",
                "viewer",
                ParamSchema::new().require("studyId", ParamKind::Integer),
            )?
            .not_found("not-found")
            .build(),
    );

    // Engine: initialized independently, before any view loads imagery.
    let engine = Rc::new(EngineAdapter::with_null_engine());
    let config = match &opts.engine_config {
        Some(json) => serde_json::from_str(json)?,
        None => EngineConfig::new(
            DecoderSet::DICOM,
            NonZeroUsize::new(2).unwrap_or(NonZeroUsize::MIN),
        ),
    };
    engine.initialize(config)?;

    // Views.
    let mut registry = ViewRegistry::new();
    views::register_all(&mut registry)?;

    // Shell: compose and mount, once.
    let surface = Rc::new(RefCell::new(StaticSurface::with_selectors(["#app"])));
    let mut shell = AppShell::new(
        AppContext {
            store: Rc::clone(&store),
            router: Rc::clone(&router),
            engine,
        },
        registry,
    )
    .on_route_error("not-found");

    shell.start(Rc::clone(&surface), "#app", &opts.path)?;
    info!(
        view = %surface.borrow().attached("#app").map(ToString::to_string).unwrap_or_default(),
        "demo mounted"
    );

    // A short scripted session, standing in for user navigation.
    shell.navigate("/view/42")?;
    shell.navigate("/")?;

    shell.destroy()?;
    Ok(())
}
