use clap::{ArgAction, Parser};

pub const DOWNLOAD_AFTER_HELP: &str = "\
With no TARGET, installs the latest mainline tip. A decimal TARGET is a
pending changelist id (the highest patch set is fetched, after
confirmation); any other TARGET is a branch label.

Every other invocation of tipup is forwarded verbatim to the installed
toolchain binary.";

/// Arguments for `tipup download`. The forward path never reaches clap:
/// its argument vector belongs to the installed toolchain.
#[derive(Parser, Debug)]
#[command(
    name = "tipup download",
    bin_name = "tipup download",
    version,
    about = "Build and install the SDK toolchain development tip",
    after_help = DOWNLOAD_AFTER_HELP
)]
pub struct DownloadCli {
    /// Changelist id or branch label to install instead of the mainline tip
    pub target: Option<String>,
    #[arg(
        short = 'y',
        long,
        help = "Assume yes for the change-fetch confirmation prompt"
    )]
    pub yes: bool,
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)"
    )]
    pub quiet: bool,
    #[arg(long, help = "Emit a {status,message,details} JSON envelope")]
    pub json: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v")]
    pub trace: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_accepts_at_most_one_positional() {
        let cli = DownloadCli::try_parse_from(["tipup download", "227037", "--yes"]).unwrap();
        assert_eq!(cli.target.as_deref(), Some("227037"));
        assert!(cli.yes);

        assert!(DownloadCli::try_parse_from(["tipup download", "a", "b"]).is_err());
    }

    #[test]
    fn download_defaults_to_the_mainline_tip() {
        let cli = DownloadCli::try_parse_from(["tipup download"]).unwrap();
        assert!(cli.target.is_none());
        assert!(!cli.yes);
        assert!(!cli.json);
    }
}
