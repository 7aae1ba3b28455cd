mod app;
mod codegraph;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the code graph document produced by the indexing pipeline.
    #[arg(long, default_value = "code_graph.json")]
    graph_path: String,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "codegraph explorer",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::GraphExplorerApp::new(
                cc,
                args.graph_path.clone(),
            )))
        }),
    )
}
