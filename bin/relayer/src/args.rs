//! Parses command-line arguments for the relayer.
use std::path::PathBuf;

use argh::FromArgs;

#[derive(Debug, FromArgs)]
#[argh(name = "garnet-relayer")]
#[argh(description = "Withdrawal broadcast relayer")]
pub(crate) struct Args {
    #[argh(option, short = 'c', description = "path to configuration")]
    pub config: PathBuf,

    #[argh(option, short = 'd', description = "override for the data directory")]
    pub datadir: Option<PathBuf>,
}
