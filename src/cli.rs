use std::io::{self, IsTerminal};
use std::path::PathBuf;

use contentreg::config::read_config;
use contentreg::{build_models_manager, Registry, Sources};

use crate::{die, warn, RequestedColorMode};

pub(crate) mod check;
pub(crate) mod list;
pub(crate) mod show;

#[derive(Clone, Copy, Debug, PartialEq, strum_macros::Display)]
pub(crate) enum ColorMode {
    On,
    Off,
}

impl ColorMode {
    /// Returns whether ANSI color should be used
    /// If the user has specified a preference, this is honored. This preference
    /// can be specified through the command line or the "NO_COLOR" environment
    /// variable. If the user hasn't stated a preference, color is enabled if the
    /// output is a terminal.
    pub(crate) fn resolve_auto(cm: RequestedColorMode) -> ColorMode {
        match cm {
            RequestedColorMode::Auto => {
                let disable_color =
                    std::env::var_os("NO_COLOR").is_some() || !io::stdout().is_terminal();

                if disable_color {
                    ColorMode::Off
                } else {
                    ColorMode::On
                }
            }
            RequestedColorMode::On => ColorMode::On,
            RequestedColorMode::Off => ColorMode::Off,
        }
    }
}

/// Read the model sources from the configuration, warning about keys it ignores
pub(crate) fn load_sources(config: Option<PathBuf>) -> Sources {
    let loaded = match read_config(config) {
        Ok(loaded) => loaded,
        Err(err) => die!("{}", err),
    };

    match loaded.config.extraneous_keys(&loaded.raw) {
        Ok(keys) => {
            for key in keys {
                warn!("config contains extraneous key \"{}\", ignoring", key);
            }
        }
        Err(err) => warn!("unable to check the config for extraneous keys: {}", err),
    }

    loaded.config.sources
}

/// Build the registry, exiting if any model is invalid
pub(crate) fn registry_or_die(sources: &Sources) -> Registry {
    match build_models_manager(sources) {
        Ok(registry) => registry,
        Err(err) => die!("{}", err),
    }
}
