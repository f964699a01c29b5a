use std::{error::Error as StdError, process::ExitCode};

use attachmail::{
    logging::{self, LogSettings},
    Config,
};

fn main() -> ExitCode {
    if let Err(err) = logging::init(&LogSettings::default()) {
        eprintln!("attachmail: {err}, continuing without the log file");
        let console_only = LogSettings {
            file: None,
            ..LogSettings::default()
        };
        let _ = logging::init(&console_only);
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut chain = err.to_string();
            let mut source = err.source();
            while let Some(cause) = source {
                chain.push_str(": ");
                chain.push_str(&cause.to_string());
                source = cause.source();
            }
            tracing::error!("{chain}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), attachmail::Error> {
    let config = Config::load_default()?;
    attachmail::send(&config)
}
