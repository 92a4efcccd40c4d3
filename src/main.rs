mod analysis;
mod cli;
mod data;
mod figure;
mod style;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use figure::OverlayOptions;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let thrash = cli::optional_input(cli.thrash.as_deref());
    let scramble = cli::optional_input(cli.scramble.as_deref());
    let specs = figure::ablation_specs(cli.default, thrash, scramble);

    let opts = OverlayOptions {
        show_fit: cli.show_fit,
        units: cli.units,
        legend_band: cli.legend_band,
        legend_n: cli.legend_n,
        figure_caption: !cli.no_figure_caption,
        thrash_jitter_pct: cli.thrash_jitter,
        style: cli.style,
    };
    figure::make_overlay(&specs, &cli.out, &opts)
}
