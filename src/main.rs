mod app;
mod backend;
mod graph;
mod store;
mod util;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the repository analysis backend.
    #[arg(long, default_value = "http://localhost:8000")]
    backend_url: String,

    /// Directory for the durable repository store. Defaults to the
    /// platform data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "repograph",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(app::RepographApp::new(
                &args.backend_url,
                args.data_dir.clone(),
            )))
        }),
    )
}
