mod app;
mod data;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to a skills dataset JSON file; uses the built-in dataset when omitted.
    #[arg(long)]
    data: Option<String>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([680.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "tech-bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(app::BubbleChartApp::new(cc, args.data.clone())))),
    )
}
