use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::error;

use gfxpack::profile::Profile;
use gfxpack::quantize::{self, UnmatchedPolicy};
use gfxpack::state::GraphicsState;
use gfxpack::{import, palette, persist};

#[derive(Parser, Debug)]
#[command(about = "Packs a truecolor TGA into a palette-indexed tile texture")]
struct Args {
    /// Input TGA texture
    #[arg(long, default_value = "graphics.tga")]
    input: PathBuf,

    /// Output packed texture container
    #[arg(long, default_value = "graphics.dat")]
    output: PathBuf,

    /// Output GIMP palette listing
    #[arg(long, default_value = "nskm_gui_graphics.gpl")]
    palette: PathBuf,

    /// On-disk format variant
    #[arg(long, value_enum, default_value_t = Profile::Classic)]
    profile: Profile,

    /// What to do with colors that have no exact match in palette 0
    #[arg(long, value_enum, default_value_t = UnmatchedPolicy::Leave)]
    unmatched: UnmatchedPolicy,

    /// Attempt the remaining stages after a failure (the output may then
    /// contain stale or zeroed cell data)
    #[arg(long)]
    keep_going: bool,
}

fn quantize_texture(args: &Args, state: &mut GraphicsState) -> Result<()> {
    // The pixel buffer lives only for this stage.
    let image = import::load_texture_tga(&args.input)?;
    quantize::quantize(&image, &state.palettes, &mut state.cells, args.unmatched)?;
    Ok(())
}

pub fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut state = GraphicsState::new(args.profile);
    state.reset();
    palette::generate(&mut state.palettes);

    let mut failed = false;

    if let Err(e) = persist::save_palette_gpl(&args.palette, &state.palettes) {
        error!("Palette listing failed: {e:#}");
        failed = true;
    }

    if !failed || args.keep_going {
        if let Err(e) = quantize_texture(&args, &mut state) {
            error!("Texture quantization failed: {e:#}");
            failed = true;
        }
    }

    if !failed || args.keep_going {
        if let Err(e) = persist::save_texture_dat(&args.output, &state) {
            error!("Texture output failed: {e:#}");
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
