//! Definition of CLI arguments
use std::path::PathBuf;
use structopt::clap::AppSettings;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "nitfetch",
    about = "Print the latest original post of an account",
    setting = AppSettings::TrailingVarArg,
    setting = AppSettings::AllowLeadingHyphen
)]
pub struct CommandLineArgs {
    /// Account to look up, nothing is done without it
    pub account: Option<String>,

    /// Extra arguments are accepted and ignored
    #[structopt(hidden = true)]
    pub ignored: Vec<String>,

    /// Use a different config file.
    #[structopt(parse(from_os_str), short, long)]
    pub config_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::CommandLineArgs;
    use structopt::StructOpt;

    #[test]
    fn no_account() {
        let args = CommandLineArgs::from_iter_safe(["nitfetch"]).unwrap();
        assert_eq!(args.account, None);
    }

    #[test]
    fn extra_arguments_are_ignored() {
        let args =
            CommandLineArgs::from_iter_safe(["nitfetch", "user", "more", "--stuff"]).unwrap();
        assert_eq!(args.account, Some("user".to_string()));
        assert_eq!(args.config_file, None);
    }

    #[test]
    fn config_file_before_account() {
        let args =
            CommandLineArgs::from_iter_safe(["nitfetch", "-c", "/tmp/nitfetch.json", "user"])
                .unwrap();
        assert_eq!(args.account, Some("user".to_string()));
        assert_eq!(
            args.config_file.unwrap().to_str(),
            Some("/tmp/nitfetch.json")
        );
    }

    #[test]
    fn unknown_leading_flag_is_taken_as_account() {
        let args = CommandLineArgs::from_iter_safe(["nitfetch", "-x", "user"]).unwrap();
        assert_eq!(args.account, Some("-x".to_string()));
        assert_eq!(args.ignored, vec!["user".to_string()]);
        assert_eq!(args.config_file, None);
    }
}
